use super::{BodyPartKind, PlayerModelDef, Triangle};
use crate::{body_part, skin_box};

// Part indices for `PLAYER_MODEL`.
pub const PLAYER_HEAD: usize = 0;
pub const PLAYER_TORSO: usize = 1;
pub const PLAYER_LEFT_ARM: usize = 2;
pub const PLAYER_RIGHT_ARM: usize = 3;
pub const PLAYER_LEFT_LEG: usize = 4;
pub const PLAYER_RIGHT_LEG: usize = 5;

/// Shared by every part: bottom, top, -X, +X, -Z, +Z, two triangles each.
pub const PRISM_FACES: [Triangle; 12] = [
    [0, 3, 1],
    [0, 2, 3],
    [4, 5, 7],
    [4, 7, 6],
    [0, 1, 5],
    [0, 5, 4],
    [2, 6, 7],
    [2, 7, 3],
    [0, 4, 6],
    [0, 6, 2],
    [1, 3, 7],
    [1, 7, 5],
];

/// Standing player, feet on Y=0, facing -Z. The player's left is -X.
pub static PLAYER_MODEL: PlayerModelDef = PlayerModelDef {
    skin_width_px: 64,
    parts: &[
        // Head sits on the torso: local bottom 0.5 + offset 1.5 = torso top.
        body_part! {
            name: "head",
            kind: BodyPartKind::Head,
            from: (-0.25, 0.5, -0.25),
            to: (0.25, 1.0, 0.25),
            offset: (0.0, 1.5, 0.0),
            skin: skin_box! { uv: (0, 0), size: (8, 8, 8) },
        },
        body_part! {
            name: "torso",
            kind: BodyPartKind::Torso,
            from: (-0.375, 0.0, -0.1875),
            to: (0.375, 1.0, 0.1875),
            offset: (0.0, 1.0, 0.0),
            skin: skin_box! { uv: (16, 16), size: (8, 12, 4) },
        },
        body_part! {
            name: "left_arm",
            kind: BodyPartKind::LeftArm,
            from: (0.0, 0.0, -0.125),
            to: (0.125, 1.0, 0.125),
            offset: (-0.5, 1.0, 0.0),
            skin: skin_box! { uv: (32, 48), size: (4, 12, 4), legacy_mirror_of: (40, 16) },
        },
        body_part! {
            name: "right_arm",
            kind: BodyPartKind::RightArm,
            from: (0.0, 0.0, -0.125),
            to: (0.125, 1.0, 0.125),
            offset: (0.375, 1.0, 0.0),
            skin: skin_box! { uv: (40, 16), size: (4, 12, 4) },
        },
        body_part! {
            name: "left_leg",
            kind: BodyPartKind::LeftLeg,
            from: (-0.125, 0.0, -0.125),
            to: (0.125, 1.0, 0.125),
            offset: (-0.1875, 0.0, 0.0),
            skin: skin_box! { uv: (16, 48), size: (4, 12, 4), legacy_mirror_of: (0, 16) },
        },
        body_part! {
            name: "right_leg",
            kind: BodyPartKind::RightLeg,
            from: (-0.125, 0.0, -0.125),
            to: (0.125, 1.0, 0.125),
            offset: (0.1875, 0.0, 0.0),
            skin: skin_box! { uv: (0, 16), size: (4, 12, 4) },
        },
    ],
};
