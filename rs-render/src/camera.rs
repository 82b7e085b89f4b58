use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraPose {
    Fixed { eye: Vec3, target: Vec3, up: Vec3 },
    /// Yaw 0 / pitch 0 puts the eye straight in front of the player (on -Z of the target).
    Orbit {
        target: Vec3,
        distance: f32,
        yaw: f32,
        pitch: f32,
    },
}

impl CameraPose {
    pub fn eye(&self) -> Vec3 {
        match *self {
            CameraPose::Fixed { eye, .. } => eye,
            CameraPose::Orbit {
                target,
                distance,
                yaw,
                pitch,
            } => {
                let dir = Vec3::new(
                    yaw.sin() * pitch.cos(),
                    pitch.sin(),
                    -yaw.cos() * pitch.cos(),
                );
                target + dir * distance
            }
        }
    }

    pub fn target(&self) -> Vec3 {
        match *self {
            CameraPose::Fixed { target, .. } | CameraPose::Orbit { target, .. } => target,
        }
    }

    fn up(&self) -> Vec3 {
        match *self {
            CameraPose::Fixed { up, .. } => up,
            CameraPose::Orbit { .. } => Vec3::Y,
        }
    }
}

/// Perspective camera description; turned into camera components per render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in radians.
    pub yfov: f32,
    pub znear: f32,
    pub zfar: f32,
    pub pose: CameraPose,
}

impl CameraConfig {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.pose.eye()).looking_at(self.pose.target(), self.pose.up())
    }

    pub fn projection(&self, aspect_ratio: f32) -> Projection {
        Projection::Perspective(PerspectiveProjection {
            fov: self.yfov,
            aspect_ratio,
            near: self.znear,
            far: self.zfar,
        })
    }
}
