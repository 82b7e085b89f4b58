use bevy::prelude::*;

/// Illuminance of a directional light at intensity 1.
pub const LUX_PER_UNIT: f32 = 2_000.0;
/// Luminous power of a point or spot light at intensity 1.
pub const LUMENS_PER_UNIT: f32 = 500_000.0;
/// Ambient brightness at ambient 1.
pub const AMBIENT_PER_UNIT: f32 = 1_000.0;

const LIGHT_RANGE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// `direction` is the way the light travels.
    Directional { direction: Vec3 },
    Point { position: Vec3 },
    /// Cone angles are half-angles in radians.
    Spot {
        position: Vec3,
        direction: Vec3,
        inner_cone: f32,
        outer_cone: f32,
    },
}

/// The scene's single light. Only lit materials respond to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    pub kind: LightKind,
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
}

impl LightConfig {
    pub fn bevy_color(&self) -> Color {
        Color::linear_rgb(self.color.x, self.color.y, self.color.z)
    }

    pub(crate) fn spawn(&self, world: &mut World, tag: impl Bundle) -> Entity {
        let color = self.bevy_color();
        match self.kind {
            LightKind::Directional { direction } => world
                .spawn((
                    DirectionalLight {
                        color,
                        illuminance: self.intensity * LUX_PER_UNIT,
                        shadows_enabled: false,
                        ..default()
                    },
                    Transform::default().looking_to(direction, Vec3::Y),
                    tag,
                ))
                .id(),
            LightKind::Point { position } => world
                .spawn((
                    PointLight {
                        color,
                        intensity: self.intensity * LUMENS_PER_UNIT,
                        range: LIGHT_RANGE,
                        shadows_enabled: false,
                        ..default()
                    },
                    Transform::from_translation(position),
                    tag,
                ))
                .id(),
            LightKind::Spot {
                position,
                direction,
                inner_cone,
                outer_cone,
            } => world
                .spawn((
                    SpotLight {
                        color,
                        intensity: self.intensity * LUMENS_PER_UNIT,
                        range: LIGHT_RANGE,
                        inner_angle: inner_cone,
                        outer_angle: outer_cone,
                        shadows_enabled: false,
                        ..default()
                    },
                    Transform::from_translation(position).looking_to(direction, Vec3::Y),
                    tag,
                ))
                .id(),
        }
    }
}

pub(crate) fn ambient_light(ambient: f32) -> AmbientLight {
    AmbientLight {
        color: Color::WHITE,
        brightness: ambient * AMBIENT_PER_UNIT,
        affects_lightmapped_meshes: true,
    }
}
