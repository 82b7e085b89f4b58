use std::path::{Path, PathBuf};

pub mod atlas;
pub use atlas::{RGB_CHANNELS, TextureAtlas};

/// How the rendered image is named next to the downloaded skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFileName {
    /// `{username}_render.png`
    #[default]
    Suffixed,
    /// `{username}.png`
    Plain,
}

impl RenderFileName {
    pub fn file_name(self, username: &str) -> String {
        match self {
            Self::Suffixed => format!("{username}_render.png"),
            Self::Plain => format!("{username}.png"),
        }
    }
}

pub fn skin_file_name(username: &str) -> String {
    format!("{username}_skin.png")
}

pub fn skin_output_path(dir: &Path, username: &str) -> PathBuf {
    dir.join(skin_file_name(username))
}

pub fn render_output_path(dir: &Path, username: &str, naming: RenderFileName) -> PathBuf {
    dir.join(naming.file_name(username))
}
