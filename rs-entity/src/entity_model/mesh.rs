use bevy::math::Vec3;
use rs_utils::TextureAtlas;
use tracing::debug;

use super::coloring::triangle_normal;
use super::{
    BodyPartDef, BodyPartKind, ColoringStrategy, PLAYER_MODEL, PlayerModelDef, SkinMaterial,
    TiledSwatches, Triangle, face_uvs, tile_atlas,
};

#[derive(Debug, Clone)]
pub enum PartColoring {
    /// One opaque RGBA color per vertex, derived from that vertex's tiled swatch.
    VertexColors {
        colors: Vec<[u8; 4]>,
        swatches: TiledSwatches,
    },
    /// UVs per face corner into the model's shared [`SkinMaterial`].
    Textured { uvs: Vec<[[f32; 2]; 3]> },
}

/// One body part in the assembled pose.
#[derive(Debug, Clone)]
pub struct PartMesh {
    pub name: &'static str,
    pub kind: BodyPartKind,
    pub positions: Vec<Vec3>,
    pub faces: Vec<Triangle>,
    pub coloring: PartColoring,
}

impl PartMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Unit outward normal of face `index`.
    pub fn face_normal(&self, index: usize) -> Vec3 {
        triangle_normal(&self.positions, &self.faces[index]).normalize_or_zero()
    }

    pub fn centroid(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), &p| (min.min(p), max.max(p)),
        )
    }
}

#[derive(Debug, Clone)]
pub struct PlayerModel {
    /// In `PLAYER_MODEL.parts` order.
    pub parts: Vec<PartMesh>,
    /// Present for the material strategies, shared by every part.
    pub material: Option<SkinMaterial>,
}

impl PlayerModel {
    pub fn part(&self, kind: BodyPartKind) -> Option<&PartMesh> {
        self.parts.iter().find(|p| p.kind == kind)
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(PartMesh::face_count).sum()
    }
}

pub fn part_mesh(
    model: &PlayerModelDef,
    part: &BodyPartDef,
    atlas: &TextureAtlas,
    strategy: ColoringStrategy,
) -> PartMesh {
    let positions = part.assembled_vertices().to_vec();

    let coloring = match strategy {
        ColoringStrategy::TiledVertexColors => {
            let swatches = tile_atlas(atlas, positions.len());
            let colors = (0..positions.len())
                .map(|i| {
                    let [r, g, b] = swatches.mean_color(i);
                    [r, g, b, u8::MAX]
                })
                .collect();
            PartColoring::VertexColors { colors, swatches }
        }
        ColoringStrategy::SharedMaterial | ColoringStrategy::SkinRegions => PartColoring::Textured {
            uvs: face_uvs(model, part, atlas, strategy),
        },
    };

    PartMesh {
        name: part.name,
        kind: part.kind,
        positions,
        faces: part.faces.to_vec(),
        coloring,
    }
}

/// Builds the six colored meshes of the standing player. Parts are independent of each other.
pub fn assemble_player(atlas: &TextureAtlas, strategy: ColoringStrategy) -> PlayerModel {
    let parts: Vec<PartMesh> = PLAYER_MODEL
        .parts
        .iter()
        .map(|part| part_mesh(&PLAYER_MODEL, part, atlas, strategy))
        .collect();
    let material = strategy
        .uses_material()
        .then(|| SkinMaterial::cutout(atlas.clone()));

    debug!(
        strategy = strategy.label(),
        parts = parts.len(),
        atlas_width = atlas.width(),
        atlas_height = atlas.height(),
        "assembled player model"
    );

    PlayerModel { parts, material }
}
