use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rs_entity::ColoringStrategy;
use rs_net::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, Endpoints};
use rs_render::{DEFAULT_HEIGHT, DEFAULT_WIDTH, RenderPreset, RenderSettings, preset_settings};
use rs_utils::RenderFileName;
use serde::Deserialize;
use tracing::debug;

use crate::cli::Cli;

pub const DEFAULT_USERNAME: &str = "rajankpaul";
pub const MAX_USERNAME_LEN: usize = 16;

/// Mojang names: 1 to 16 ASCII letters, digits or underscores. They end up in URLs and file
/// names, so nothing else gets through.
pub fn is_valid_username(name: &str) -> bool {
    (1..=MAX_USERNAME_LEN).contains(&name.len()) && rs_net::is_username_charset(name)
}

/// The two end-to-end flavours: per-vertex colors with a fixed front camera, or the skin as a
/// material under an orbiting spot-lit camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PipelineVariant {
    #[default]
    VertexColor,
    Textured,
}

impl PipelineVariant {
    pub const ALL: [Self; 2] = [Self::VertexColor, Self::Textured];

    pub const fn preset(self) -> RenderPreset {
        match self {
            Self::VertexColor => RenderPreset::VertexColor,
            Self::Textured => RenderPreset::Textured,
        }
    }

    pub const fn label(self) -> &'static str {
        self.preset().label()
    }

    pub const fn as_options_value(self) -> &'static str {
        self.preset().as_options_value()
    }

    pub fn from_options_value(value: &str) -> Option<Self> {
        RenderPreset::from_options_value(value).map(|preset| match preset {
            RenderPreset::VertexColor => Self::VertexColor,
            RenderPreset::Textured => Self::Textured,
        })
    }

    /// Coloring used when none is configured.
    pub const fn default_coloring(self) -> ColoringStrategy {
        match self {
            Self::VertexColor => ColoringStrategy::TiledVertexColors,
            Self::Textured => ColoringStrategy::SharedMaterial,
        }
    }

    pub const fn render_file_name(self) -> RenderFileName {
        match self {
            Self::VertexColor => RenderFileName::Suffixed,
            Self::Textured => RenderFileName::Plain,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
    InvalidValue {
        key: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid config {}: {source}", path.display()),
            ConfigError::Parse { path: None, source } => write!(f, "invalid config: {source}"),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value {value:?} for {key}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

/// On-disk shape of the optional toml file. Every key may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub username: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub variant: Option<String>,
    pub coloring: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub save_skin: Option<bool>,
    pub background: Option<[u8; 4]>,
    pub lit: Option<bool>,
    pub endpoints: EndpointsFile,
    pub http: HttpFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointsFile {
    pub api_base: Option<String>,
    pub session_base: Option<String>,
    pub textures_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpFile {
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub username: String,
    pub output_dir: PathBuf,
    pub variant: PipelineVariant,
    /// `None` means the variant's default.
    pub coloring: Option<ColoringStrategy>,
    pub width: u32,
    pub height: u32,
    pub save_skin: bool,
    pub background: [u8; 4],
    /// Shade the figure with the preset light instead of showing raw albedo.
    pub lit: bool,
    pub endpoints: Endpoints,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            output_dir: PathBuf::from("."),
            variant: PipelineVariant::default(),
            coloring: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            save_skin: true,
            background: [0, 0, 0, 0],
            lit: false,
            endpoints: Endpoints::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RunConfig {
    /// Defaults, then the `--config` file if given, then command-line flags.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = &cli.config {
            config.apply_file(FileConfig::read(path)?)?;
            debug!(path = %path.display(), "loaded config file");
        }
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_username(&self.username) {
            return Err(ConfigError::InvalidValue {
                key: "username",
                value: self.username.clone(),
            });
        }
        Ok(())
    }

    pub fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        if let Some(username) = file.username {
            self.username = username;
        }
        if let Some(dir) = file.output_dir {
            self.output_dir = dir;
        }
        if let Some(value) = file.variant {
            self.variant = PipelineVariant::from_options_value(&value).ok_or(
                ConfigError::InvalidValue {
                    key: "variant",
                    value,
                },
            )?;
        }
        if let Some(value) = file.coloring {
            self.coloring = Some(ColoringStrategy::from_options_value(&value).ok_or(
                ConfigError::InvalidValue {
                    key: "coloring",
                    value,
                },
            )?);
        }
        if let Some(width) = file.width {
            self.width = width;
        }
        if let Some(height) = file.height {
            self.height = height;
        }
        if let Some(save_skin) = file.save_skin {
            self.save_skin = save_skin;
        }
        if let Some(background) = file.background {
            self.background = background;
        }
        if let Some(lit) = file.lit {
            self.lit = lit;
        }

        let endpoints = file.endpoints;
        if let Some(base) = endpoints.api_base {
            self.endpoints.api_base = base;
        }
        if let Some(base) = endpoints.session_base {
            self.endpoints.session_base = base;
        }
        if let Some(base) = endpoints.textures_base {
            self.endpoints.textures_base = base;
        }

        if let Some(user_agent) = file.http.user_agent {
            self.user_agent = user_agent;
        }
        if let Some(secs) = file.http.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        Ok(())
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(username) = &cli.username {
            self.username.clone_from(username);
        }
        if let Some(variant) = cli.variant {
            self.variant = variant;
        }
        if let Some(coloring) = cli.coloring {
            self.coloring = Some(coloring);
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir.clone_from(dir);
        }
        if let Some(size) = cli.size {
            self.width = size;
            self.height = size;
        }
        if cli.no_skin_file {
            self.save_skin = false;
        }
        if cli.lit {
            self.lit = true;
        }
    }

    pub fn coloring(&self) -> ColoringStrategy {
        self.coloring
            .unwrap_or_else(|| self.variant.default_coloring())
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            background: self.background,
            unlit: !self.lit,
            ..preset_settings(self.variant.preset()).with_size(self.width, self.height)
        }
    }

    pub fn skin_path(&self) -> PathBuf {
        rs_utils::skin_output_path(&self.output_dir, &self.username)
    }

    pub fn render_path(&self) -> PathBuf {
        rs_utils::render_output_path(
            &self.output_dir,
            &self.username,
            self.variant.render_file_name(),
        )
    }
}
