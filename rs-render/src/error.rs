use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum RenderError {
    InvalidResolution {
        width: u32,
        height: u32,
    },
    /// A part is UV-mapped but the model carries no material.
    MissingMaterial {
        part: &'static str,
    },
    /// The offscreen frame never came back from the GPU.
    CaptureTimedOut {
        frames: u32,
    },
    /// The captured frame could not be read as RGBA8.
    UnreadableCapture {
        detail: String,
    },
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidResolution { width, height } => {
                write!(f, "invalid render resolution {width}x{height}")
            }
            RenderError::MissingMaterial { part } => {
                write!(f, "part {part} is textured but the model has no material")
            }
            RenderError::CaptureTimedOut { frames } => {
                write!(f, "no frame captured after {frames} updates")
            }
            RenderError::UnreadableCapture { detail } => {
                write!(f, "captured frame is unreadable: {detail}")
            }
            RenderError::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}
