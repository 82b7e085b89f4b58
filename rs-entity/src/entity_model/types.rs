use bevy::math::Vec3;

pub const PRISM_VERTEX_COUNT: usize = 8;
pub const PRISM_FACE_COUNT: usize = 12;

/// Indices into a part's vertex table.
pub type Triangle = [u32; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPartKind {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

/// Skin layout of one box, using vanilla ModelBox rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinBox {
    /// Texture offset in skin pixels (u, v) on a 64-wide atlas.
    pub uv: [u32; 2],
    /// Box size in skin pixels (w, h, d).
    pub size: [u32; 3],
    /// Offset to sample, mirrored, on legacy 64x32 atlases that lack this region.
    pub legacy_mirror_of: Option<[u32; 2]>,
}

#[derive(Debug, Clone, Copy)]
pub struct BodyPartDef {
    pub name: &'static str,
    pub kind: BodyPartKind,
    /// Corner `i` sits at max y if bit 2 of `i` is set, max x for bit 1, max z for bit 0.
    pub vertices: [[f32; 3]; PRISM_VERTEX_COUNT],
    /// Wound counter-clockwise seen from outside.
    pub faces: &'static [Triangle; PRISM_FACE_COUNT],
    /// Translation from part space into the assembled standing pose.
    pub offset: [f32; 3],
    pub skin: SkinBox,
}

impl BodyPartDef {
    pub fn local_min(&self) -> Vec3 {
        Vec3::from_array(self.vertices[0])
    }

    pub fn local_max(&self) -> Vec3 {
        Vec3::from_array(self.vertices[PRISM_VERTEX_COUNT - 1])
    }

    pub fn offset(&self) -> Vec3 {
        Vec3::from_array(self.offset)
    }

    pub fn assembled_min(&self) -> Vec3 {
        self.local_min() + self.offset()
    }

    pub fn assembled_max(&self) -> Vec3 {
        self.local_max() + self.offset()
    }

    pub fn assembled_vertices(&self) -> [Vec3; PRISM_VERTEX_COUNT] {
        let offset = self.offset();
        self.vertices.map(|v| Vec3::from_array(v) + offset)
    }

    pub fn centroid(&self) -> Vec3 {
        (self.assembled_min() + self.assembled_max()) * 0.5
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerModelDef {
    /// Atlas width the [`SkinBox`] offsets are expressed against.
    pub skin_width_px: u32,
    pub parts: &'static [BodyPartDef],
}
