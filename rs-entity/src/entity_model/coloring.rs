use bevy::math::Vec3;
use rs_utils::{RGB_CHANNELS, TextureAtlas};

use super::{BodyPartDef, PlayerModelDef, SkinBox, Triangle};

/// How the atlas ends up on the six parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColoringStrategy {
    /// Every vertex receives a full copy of the RGB atlas; its color is the swatch mean.
    #[default]
    TiledVertexColors,
    /// Shared cutout material; every face is box-projected onto the whole atlas.
    SharedMaterial,
    /// Shared cutout material; every face samples its own skin region.
    SkinRegions,
}

impl ColoringStrategy {
    pub const ALL: [Self; 3] = [
        Self::TiledVertexColors,
        Self::SharedMaterial,
        Self::SkinRegions,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::TiledVertexColors => "Tiled vertex colors",
            Self::SharedMaterial => "Shared material",
            Self::SkinRegions => "Skin regions",
        }
    }

    pub const fn as_options_value(self) -> &'static str {
        match self {
            Self::TiledVertexColors => "tiled",
            Self::SharedMaterial => "shared-material",
            Self::SkinRegions => "skin-regions",
        }
    }

    pub fn from_options_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tiled" | "tiled-vertex-colors" | "vertex-colors" => Some(Self::TiledVertexColors),
            "shared-material" | "shared_material" | "material" => Some(Self::SharedMaterial),
            "skin-regions" | "skin_regions" | "regions" => Some(Self::SkinRegions),
            _ => None,
        }
    }

    pub const fn uses_material(self) -> bool {
        !matches!(self, Self::TiledVertexColors)
    }
}

/// The atlas broadcast across `N` vertices: shape `(N, atlas pixels, 3)`, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiledSwatches {
    vertex_count: usize,
    pixel_count: usize,
    data: Vec<u8>,
}

impl TiledSwatches {
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.vertex_count, self.pixel_count, RGB_CHANNELS)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn swatch(&self, vertex: usize) -> &[u8] {
        let len = self.pixel_count * RGB_CHANNELS;
        &self.data[vertex * len..(vertex + 1) * len]
    }

    /// Rounded per-channel mean of one vertex's swatch.
    pub fn mean_color(&self, vertex: usize) -> [u8; 3] {
        if self.pixel_count == 0 {
            return [0; 3];
        }
        let mut sum = [0u64; 3];
        for px in self.swatch(vertex).chunks_exact(RGB_CHANNELS) {
            for (acc, &c) in sum.iter_mut().zip(px) {
                *acc += u64::from(c);
            }
        }
        let n = self.pixel_count as u64;
        sum.map(|s| ((s + n / 2) / n) as u8)
    }
}

pub fn tile_atlas(atlas: &TextureAtlas, vertex_count: usize) -> TiledSwatches {
    let rgb = atlas.rgb_bytes();
    let mut data = Vec::with_capacity(rgb.len() * vertex_count);
    for _ in 0..vertex_count {
        data.extend_from_slice(&rgb);
    }
    TiledSwatches {
        vertex_count,
        pixel_count: atlas.pixel_count(),
        data,
    }
}

/// The six faces of a prism, by outward normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxFace {
    Bottom,
    Top,
    NegX,
    PosX,
    /// Front of the player.
    NegZ,
    /// Back of the player.
    PosZ,
}

impl BoxFace {
    pub fn from_normal(n: Vec3) -> Self {
        let a = n.abs();
        if a.y >= a.x && a.y >= a.z {
            if n.y < 0.0 { Self::Bottom } else { Self::Top }
        } else if a.x >= a.z {
            if n.x < 0.0 { Self::NegX } else { Self::PosX }
        } else if n.z < 0.0 {
            Self::NegZ
        } else {
            Self::PosZ
        }
    }

    /// Position of a corner inside the face image, `(0, 0)` top-left, as seen from outside
    /// with +Y up (+Z up for the caps).
    fn face_coords(self, corner: u32) -> [f32; 2] {
        let x = ((corner >> 1) & 1) as f32;
        let y = ((corner >> 2) & 1) as f32;
        let z = (corner & 1) as f32;
        match self {
            Self::Bottom => [x, 1.0 - z],
            Self::Top => [1.0 - x, 1.0 - z],
            Self::NegX => [z, 1.0 - y],
            Self::PosX => [1.0 - z, 1.0 - y],
            Self::NegZ => [1.0 - x, 1.0 - y],
            Self::PosZ => [x, 1.0 - y],
        }
    }

    /// Face rectangle `[x, y, w, h]` in skin pixels. The player's right side (+X) is the first
    /// column of the net, matching vanilla ModelBox.
    fn skin_rect(self, uv: [u32; 2], size: [u32; 3]) -> [u32; 4] {
        let [u, v] = uv;
        let [w, h, d] = size;
        match self {
            Self::Top => [u + d, v, w, d],
            Self::Bottom => [u + d + w, v, w, d],
            Self::PosX => [u, v + d, d, h],
            Self::NegZ => [u + d, v + d, w, h],
            Self::NegX => [u + d + w, v + d, d, h],
            Self::PosZ => [u + d + w + d, v + d, w, h],
        }
    }
}

pub(crate) fn triangle_normal(positions: &[Vec3], tri: &Triangle) -> Vec3 {
    let a = positions[tri[0] as usize];
    let b = positions[tri[1] as usize];
    let c = positions[tri[2] as usize];
    (b - a).cross(c - a)
}

/// Per-face-corner UVs for the material strategies.
pub fn face_uvs(
    model: &PlayerModelDef,
    part: &BodyPartDef,
    atlas: &TextureAtlas,
    strategy: ColoringStrategy,
) -> Vec<[[f32; 2]; 3]> {
    let local: Vec<Vec3> = part.vertices.iter().copied().map(Vec3::from_array).collect();
    part.faces
        .iter()
        .map(|tri| {
            let face = BoxFace::from_normal(triangle_normal(&local, tri));
            tri.map(|corner| {
                let st = face.face_coords(corner);
                match strategy {
                    ColoringStrategy::SkinRegions => {
                        region_uv(model.skin_width_px, &part.skin, atlas, face, st)
                    }
                    _ => st,
                }
            })
        })
        .collect()
}

fn region_uv(
    skin_width_px: u32,
    skin: &SkinBox,
    atlas: &TextureAtlas,
    face: BoxFace,
    st: [f32; 2],
) -> [f32; 2] {
    // HD skins keep the layout, so work in layout pixels rather than atlas pixels.
    let units_u = skin_width_px as f32;
    let units_v = units_u * atlas.height() as f32 / atlas.width().max(1) as f32;

    let (uv, face, s) = match skin.legacy_mirror_of {
        Some(mirror) if atlas.is_legacy() => {
            let face = match face {
                BoxFace::PosX => BoxFace::NegX,
                BoxFace::NegX => BoxFace::PosX,
                other => other,
            };
            (mirror, face, 1.0 - st[0])
        }
        _ => (skin.uv, face, st[0]),
    };

    let [x, y, w, h] = face.skin_rect(uv, skin.size);
    [
        (x as f32 + s * w as f32) / units_u,
        (y as f32 + st[1] * h as f32) / units_v,
    ]
}
