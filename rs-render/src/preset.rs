use std::f32::consts::PI;

use bevy::prelude::*;

use crate::camera::{CameraConfig, CameraPose};
use crate::lighting::{LightConfig, LightKind};
use crate::{DEFAULT_HEIGHT, DEFAULT_WIDTH, RenderSettings};

/// Point the cameras aim at: the middle of the standing figure.
const FIGURE_CENTER: Vec3 = Vec3::new(0.0, 1.25, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderPreset {
    /// Fixed front camera, directional light.
    #[default]
    VertexColor,
    /// Orbiting camera, spot light from the eye.
    Textured,
}

impl RenderPreset {
    pub const ALL: [Self; 2] = [Self::VertexColor, Self::Textured];

    pub const fn label(self) -> &'static str {
        match self {
            Self::VertexColor => "Vertex color",
            Self::Textured => "Textured",
        }
    }

    pub const fn as_options_value(self) -> &'static str {
        match self {
            Self::VertexColor => "vertex-color",
            Self::Textured => "textured",
        }
    }

    pub fn from_options_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vertex-color" | "vertex_color" | "vertexcolor" => Some(Self::VertexColor),
            "textured" | "material" => Some(Self::Textured),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PresetParams {
    camera: CameraConfig,
    light_kind: LightKind,
    intensity: f32,
    ambient: f32,
}

fn preset_params(preset: RenderPreset) -> PresetParams {
    match preset {
        RenderPreset::VertexColor => PresetParams {
            camera: CameraConfig {
                yfov: 45f32.to_radians(),
                znear: 0.05,
                zfar: 100.0,
                pose: CameraPose::Fixed {
                    eye: Vec3::new(0.0, FIGURE_CENTER.y, -5.0),
                    target: FIGURE_CENTER,
                    up: Vec3::Y,
                },
            },
            light_kind: LightKind::Directional {
                direction: Vec3::Z,
            },
            intensity: 1.0,
            ambient: 0.3,
        },
        RenderPreset::Textured => {
            let pose = CameraPose::Orbit {
                target: FIGURE_CENTER,
                distance: 4.5,
                yaw: 30f32.to_radians(),
                pitch: 15f32.to_radians(),
            };
            let eye = pose.eye();
            PresetParams {
                camera: CameraConfig {
                    yfov: PI / 3.0,
                    znear: 0.05,
                    zfar: 100.0,
                    pose,
                },
                light_kind: LightKind::Spot {
                    position: eye,
                    direction: FIGURE_CENTER - eye,
                    inner_cone: PI / 16.0,
                    outer_cone: PI / 6.0,
                },
                intensity: 2.0,
                ambient: 0.25,
            }
        }
    }
}

/// Fresh settings for `preset` at the default 512x512 resolution.
pub fn preset_settings(preset: RenderPreset) -> RenderSettings {
    let params = preset_params(preset);
    RenderSettings {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        camera: params.camera,
        light: LightConfig {
            kind: params.light_kind,
            color: Vec3::ONE,
            intensity: params.intensity,
        },
        ambient: params.ambient,
        background: [0, 0, 0, 0],
        unlit: true,
    }
}
