use rs_entity::{PartColoring, PlayerModel};

use crate::RenderSettings;
use crate::camera::CameraConfig;
use crate::error::RenderError;
use crate::lighting::LightConfig;

/// Everything one render pass needs. Built per call, never cached.
pub struct Scene<'a> {
    pub model: &'a PlayerModel,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub ambient: f32,
    pub background: [u8; 4],
    pub unlit: bool,
}

impl<'a> Scene<'a> {
    pub fn new(model: &'a PlayerModel, settings: &RenderSettings) -> Self {
        Self {
            model,
            camera: settings.camera,
            light: settings.light,
            ambient: settings.ambient,
            background: settings.background,
            unlit: settings.unlit,
        }
    }

    /// Every UV-mapped part needs the model's material.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.model.material.is_some() {
            return Ok(());
        }
        match self
            .model
            .parts
            .iter()
            .find(|p| matches!(p.coloring, PartColoring::Textured { .. }))
        {
            Some(part) => Err(RenderError::MissingMaterial { part: part.name }),
            None => Ok(()),
        }
    }
}
