//! Player model definitions.
//!
//! Key constraints for this project:
//! - The six body parts are hardcoded Rust static data (one rectangular prism each).
//! - Only the skin atlas is loaded at runtime; it is applied by a [`ColoringStrategy`].

mod coloring;
mod mesh;
mod player;
mod textures;
mod types;

#[cfg(test)]
mod tests;

pub use coloring::*;
pub use mesh::*;
pub use player::*;
pub use textures::*;
pub use types::*;

// Small DSL macros to make defining the part tables less painful.

/// The eight corners of an axis-aligned prism, in [`BodyPartDef::vertices`] order.
#[macro_export]
macro_rules! prism {
    (
        from: ($x0:expr, $y0:expr, $z0:expr),
        to: ($x1:expr, $y1:expr, $z1:expr) $(,)?
    ) => {
        [
            [$x0 as f32, $y0 as f32, $z0 as f32],
            [$x0 as f32, $y0 as f32, $z1 as f32],
            [$x1 as f32, $y0 as f32, $z0 as f32],
            [$x1 as f32, $y0 as f32, $z1 as f32],
            [$x0 as f32, $y1 as f32, $z0 as f32],
            [$x0 as f32, $y1 as f32, $z1 as f32],
            [$x1 as f32, $y1 as f32, $z0 as f32],
            [$x1 as f32, $y1 as f32, $z1 as f32],
        ]
    };
}

#[macro_export]
macro_rules! skin_box {
    (
        uv: ($u:expr, $v:expr),
        size: ($w:expr, $h:expr, $d:expr) $(,)?
    ) => {
        $crate::entity_model::SkinBox {
            uv: [$u as u32, $v as u32],
            size: [$w as u32, $h as u32, $d as u32],
            legacy_mirror_of: None,
        }
    };
    (
        uv: ($u:expr, $v:expr),
        size: ($w:expr, $h:expr, $d:expr),
        legacy_mirror_of: ($lu:expr, $lv:expr) $(,)?
    ) => {
        $crate::entity_model::SkinBox {
            uv: [$u as u32, $v as u32],
            size: [$w as u32, $h as u32, $d as u32],
            legacy_mirror_of: Some([$lu as u32, $lv as u32]),
        }
    };
}

#[macro_export]
macro_rules! body_part {
    (
        name: $name:expr,
        kind: $kind:expr,
        from: ($x0:expr, $y0:expr, $z0:expr),
        to: ($x1:expr, $y1:expr, $z1:expr),
        offset: ($ox:expr, $oy:expr, $oz:expr),
        skin: $skin:expr $(,)?
    ) => {
        $crate::entity_model::BodyPartDef {
            name: $name,
            kind: $kind,
            vertices: $crate::prism! { from: ($x0, $y0, $z0), to: ($x1, $y1, $z1) },
            faces: &$crate::entity_model::PRISM_FACES,
            offset: [$ox as f32, $oy as f32, $oz as f32],
            skin: $skin,
        }
    };
}
