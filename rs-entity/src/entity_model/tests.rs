use std::collections::HashMap;

use bevy::math::Vec3;
use image::{Rgba, RgbaImage};
use rs_utils::TextureAtlas;

use super::*;

fn solid_atlas(width: u32, height: u32, color: [u8; 4]) -> TextureAtlas {
    TextureAtlas::from_rgba(RgbaImage::from_pixel(width, height, Rgba(color)))
}

fn gradient_atlas() -> TextureAtlas {
    TextureAtlas::from_rgba(RgbaImage::from_fn(64, 64, |x, y| {
        Rgba([x as u8 * 4, y as u8 * 4, (x ^ y) as u8, 255])
    }))
}

fn part(index: usize) -> &'static BodyPartDef {
    &PLAYER_MODEL.parts[index]
}

#[test]
fn six_prisms_of_eight_vertices_and_twelve_faces() {
    assert_eq!(PLAYER_MODEL.parts.len(), 6);
    let model = assemble_player(&gradient_atlas(), ColoringStrategy::TiledVertexColors);
    for mesh in &model.parts {
        assert_eq!(mesh.vertex_count(), PRISM_VERTEX_COUNT, "{}", mesh.name);
        assert_eq!(mesh.face_count(), PRISM_FACE_COUNT, "{}", mesh.name);
    }
    assert_eq!(model.triangle_count(), 72);
}

#[test]
fn winding_points_away_from_centroid() {
    let model = assemble_player(&gradient_atlas(), ColoringStrategy::SharedMaterial);
    for mesh in &model.parts {
        let centroid = mesh.centroid();
        for (i, tri) in mesh.faces.iter().enumerate() {
            let a = mesh.positions[tri[0] as usize];
            let b = mesh.positions[tri[1] as usize];
            let c = mesh.positions[tri[2] as usize];
            let normal = (b - a).cross(c - a);
            let outward = (a + b + c) / 3.0 - centroid;
            assert!(
                normal.dot(outward) > 0.0,
                "{} face {i} points inward",
                mesh.name
            );
        }
    }
}

#[test]
fn every_side_gets_exactly_two_triangles() {
    let mesh = &assemble_player(&gradient_atlas(), ColoringStrategy::SharedMaterial).parts[0];
    let mut sides = Vec::new();
    for i in 0..mesh.face_count() {
        sides.push(BoxFace::from_normal(mesh.face_normal(i)));
    }
    for face in [
        BoxFace::Bottom,
        BoxFace::Top,
        BoxFace::NegX,
        BoxFace::PosX,
        BoxFace::NegZ,
        BoxFace::PosZ,
    ] {
        assert_eq!(sides.iter().filter(|&&s| s == face).count(), 2, "{face:?}");
    }
}

#[test]
fn figure_is_stacked() {
    let head = part(PLAYER_HEAD);
    let torso = part(PLAYER_TORSO);

    for leg in [part(PLAYER_LEFT_LEG), part(PLAYER_RIGHT_LEG)] {
        assert_eq!(leg.assembled_min().y, 0.0);
        assert_eq!(leg.assembled_max().y, torso.assembled_min().y);
    }
    assert_eq!(torso.assembled_max().y, head.local_min().y + head.offset[1]);
    assert_eq!(head.assembled_min().y - head.offset[1], head.local_min().y);
}

#[test]
fn arms_flank_the_torso() {
    let torso = part(PLAYER_TORSO);
    let left = part(PLAYER_LEFT_ARM);
    let right = part(PLAYER_RIGHT_ARM);

    assert_eq!(left.assembled_max().x, torso.assembled_min().x);
    assert_eq!(right.assembled_min().x, torso.assembled_max().x);
    for arm in [left, right] {
        assert_eq!(arm.assembled_min().y, torso.assembled_min().y);
        assert_eq!(arm.assembled_max().y, torso.assembled_max().y);
    }
    // The player faces -Z, so their left is -X.
    assert!(left.centroid().x < 0.0 && right.centroid().x > 0.0);
}

#[test]
fn parts_do_not_overlap() {
    let parts = PLAYER_MODEL.parts;
    for (i, a) in parts.iter().enumerate() {
        for b in &parts[i + 1..] {
            let lo = a.assembled_min().max(b.assembled_min());
            let hi = a.assembled_max().min(b.assembled_max());
            let overlap = (hi - lo).max(Vec3::ZERO);
            assert_eq!(
                overlap.x * overlap.y * overlap.z,
                0.0,
                "{} intersects {}",
                a.name,
                b.name
            );
        }
    }
}

#[test]
fn tiling_keeps_every_pixel() {
    let atlas = gradient_atlas();
    let tiled = tile_atlas(&atlas, 8);
    assert_eq!(tiled.shape(), (8, 4096, 3));

    let rgb = atlas.rgb_bytes();
    for vertex in 0..8 {
        assert_eq!(tiled.swatch(vertex), rgb.as_slice());
    }
    assert_eq!(tiled.as_slice().len(), 8 * 4096 * 3);
}

#[test]
fn tiled_colors_are_the_swatch_mean() {
    let atlas = solid_atlas(64, 64, [200, 30, 40, 255]);
    let model = assemble_player(&atlas, ColoringStrategy::TiledVertexColors);
    assert!(model.material.is_none());
    for mesh in &model.parts {
        let PartColoring::VertexColors { colors, swatches } = &mesh.coloring else {
            panic!("{} is not vertex colored", mesh.name);
        };
        assert_eq!(swatches.shape(), (8, 4096, 3));
        assert!(colors.iter().all(|&c| c == [200, 30, 40, 255]));
    }

    // Alpha is dropped before tiling.
    let half = TextureAtlas::from_rgba(RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([100, 50, 255, 255])
        }
    }));
    assert_eq!(tile_atlas(&half, 1).mean_color(0), [50, 25, 128]);
}

#[test]
fn shared_material_spans_the_whole_atlas_per_face() {
    let atlas = gradient_atlas();
    let model = assemble_player(&atlas, ColoringStrategy::SharedMaterial);
    let material = model.material.as_ref().unwrap();
    assert_eq!(material.alpha_mode, AlphaMode::Mask(SKIN_ALPHA_CUTOFF));

    for mesh in &model.parts {
        let PartColoring::Textured { uvs } = &mesh.coloring else {
            panic!("{} is not textured", mesh.name);
        };
        assert_eq!(uvs.len(), PRISM_FACE_COUNT);
        for pair in uvs.chunks_exact(2) {
            let mut corners: Vec<[f32; 2]> = pair.iter().flatten().copied().collect();
            corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
            corners.dedup();
            assert_eq!(corners, vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
        }
    }
}

fn uv_bounds(uvs: &[[f32; 2]; 3], other: &[[f32; 2]; 3]) -> ([f32; 2], [f32; 2]) {
    let mut min = [f32::INFINITY; 2];
    let mut max = [f32::NEG_INFINITY; 2];
    for uv in uvs.iter().chain(other) {
        for k in 0..2 {
            min[k] = min[k].min(uv[k]);
            max[k] = max[k].max(uv[k]);
        }
    }
    (min, max)
}

fn front_face_region(model: &PlayerModel, kind: BodyPartKind) -> ([f32; 2], [f32; 2]) {
    let mesh = model.part(kind).unwrap();
    let PartColoring::Textured { uvs } = &mesh.coloring else {
        panic!("not textured");
    };
    let front: Vec<usize> = (0..mesh.face_count())
        .filter(|&i| BoxFace::from_normal(mesh.face_normal(i)) == BoxFace::NegZ)
        .collect();
    uv_bounds(&uvs[front[0]], &uvs[front[1]])
}

#[test]
fn skin_regions_pick_vanilla_face_rects() {
    let model = assemble_player(&gradient_atlas(), ColoringStrategy::SkinRegions);

    let (min, max) = front_face_region(&model, BodyPartKind::Head);
    assert_eq!(min, [8.0 / 64.0, 8.0 / 64.0]);
    assert_eq!(max, [16.0 / 64.0, 16.0 / 64.0]);

    let (min, max) = front_face_region(&model, BodyPartKind::LeftArm);
    assert_eq!(min, [36.0 / 64.0, 52.0 / 64.0]);
    assert_eq!(max, [40.0 / 64.0, 64.0 / 64.0]);
}

#[test]
fn legacy_atlas_mirrors_right_limbs() {
    let atlas = solid_atlas(64, 32, [1, 2, 3, 255]);
    let model = assemble_player(&atlas, ColoringStrategy::SkinRegions);

    let right = front_face_region(&model, BodyPartKind::RightLeg);
    let left = front_face_region(&model, BodyPartKind::LeftLeg);
    assert_eq!(right, ([4.0 / 64.0, 20.0 / 32.0], [8.0 / 64.0, 1.0]));
    assert_eq!(left, right);
}

/// UV at each prism corner (index `4y + 2x + z`) of the faces facing `side`.
fn corner_uvs(model: &PlayerModel, kind: BodyPartKind, side: BoxFace) -> HashMap<u32, [f32; 2]> {
    let mesh = model.part(kind).unwrap();
    let PartColoring::Textured { uvs } = &mesh.coloring else {
        panic!("not textured");
    };
    let mut corners = HashMap::new();
    for (i, tri) in mesh.faces.iter().enumerate() {
        if BoxFace::from_normal(mesh.face_normal(i)) != side {
            continue;
        }
        for (k, &corner) in tri.iter().enumerate() {
            corners.insert(corner, uvs[i][k]);
        }
    }
    assert_eq!(corners.len(), 4, "{kind:?} {side:?}");
    corners
}

#[test]
fn legacy_left_limbs_flip_the_right_limb_texture() {
    let model = assemble_player(&solid_atlas(64, 32, [1, 2, 3, 255]), ColoringStrategy::SkinRegions);

    // (left, right, doubled u-center of the right front rect, left +X u range)
    let limbs = [
        (BodyPartKind::LeftLeg, BodyPartKind::RightLeg, 12.0, [8.0, 12.0]),
        (BodyPartKind::LeftArm, BodyPartKind::RightArm, 92.0, [48.0, 52.0]),
    ];
    for (left, right, center2, outer) in limbs {
        let left_front = corner_uvs(&model, left, BoxFace::NegZ);
        let right_front = corner_uvs(&model, right, BoxFace::NegZ);
        let left_outer = corner_uvs(&model, left, BoxFace::PosX);
        let right_inner = corner_uvs(&model, right, BoxFace::NegX);

        for (&corner, &uv) in &left_front {
            // Flipping across the face swaps the x bit of the corner.
            let mirrored = right_front[&(corner ^ 2)];
            assert_eq!(uv, mirrored, "{left:?} front corner {corner}");
            assert!((uv[0] + right_front[&corner][0] - center2 / 64.0).abs() < 1e-6);
        }
        for (&corner, &uv) in &left_outer {
            assert_eq!(uv, right_inner[&(corner ^ 2)], "{left:?} +X corner {corner}");
        }

        let (min_u, max_u) = left_outer
            .values()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), uv| {
                (lo.min(uv[0]), hi.max(uv[0]))
            });
        assert_eq!([min_u, max_u], [outer[0] / 64.0, outer[1] / 64.0], "{left:?}");
    }
}

#[test]
fn cutout_discards_transparent_texels() {
    let material = SkinMaterial::cutout(TextureAtlas::from_rgba(RgbaImage::from_fn(
        2,
        1,
        |x, _| Rgba([9, 9, 9, if x == 0 { 0 } else { 255 }]),
    )));
    assert_eq!(material.sample([0.1, 0.5]), None);
    assert_eq!(material.sample([0.9, 0.5]), Some([9, 9, 9, 255]));
    assert!(AlphaMode::Opaque.keeps(0));
}

#[test]
fn strategy_option_values() {
    for strategy in ColoringStrategy::ALL {
        assert_eq!(
            ColoringStrategy::from_options_value(strategy.as_options_value()),
            Some(strategy)
        );
    }
    assert_eq!(
        ColoringStrategy::from_options_value(" Skin_Regions "),
        Some(ColoringStrategy::SkinRegions)
    );
    assert_eq!(ColoringStrategy::from_options_value("uv"), None);
}
