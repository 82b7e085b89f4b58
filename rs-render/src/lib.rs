//! Offscreen bevy render of the assembled player model.
//!
//! A render is: settings -> [`Scene`] (camera and light built on the spot) -> a headless bevy
//! app drawing into an image -> the captured RGBA frame.

use rs_entity::PlayerModel;
use tracing::info;

mod camera;
mod error;
mod lighting;
mod offscreen;
mod preset;
mod scene;


pub use camera::{CameraConfig, CameraPose};
pub use error::RenderError;
pub use lighting::{AMBIENT_PER_UNIT, LUMENS_PER_UNIT, LUX_PER_UNIT, LightConfig, LightKind};
pub use offscreen::{MAX_DIMENSION, OffscreenRenderer, RenderOutput, part_to_mesh};
pub use preset::{RenderPreset, preset_settings};
pub use scene::Scene;

pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 512;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub ambient: f32,
    pub background: [u8; 4],
    /// Unlit materials show their albedo unchanged; the light and ambient only affect lit ones.
    pub unlit: bool,
}

impl RenderSettings {
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        preset_settings(RenderPreset::default())
    }
}

/// Checks the scene before any GPU work, then renders it once.
pub fn render_player(
    model: &PlayerModel,
    settings: &RenderSettings,
) -> Result<RenderOutput, RenderError> {
    let scene = Scene::new(model, settings);
    scene.validate()?;
    let mut renderer = OffscreenRenderer::new(settings.width, settings.height)?;
    let output = renderer.render(&scene)?;
    info!(
        width = output.width(),
        height = output.height(),
        parts = model.parts.len(),
        unlit = settings.unlit,
        "rendered player"
    );
    Ok(output)
}
