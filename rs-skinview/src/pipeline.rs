use std::fmt;
use std::path::PathBuf;

use rs_entity::assemble_player;
use rs_net::{ProfileLookup, TextureFetch, find_skin_location};
use rs_render::{RenderError, render_player};
use tracing::info;

use crate::config::{ConfigError, RunConfig};
use crate::timing::StageTimer;

#[derive(Debug)]
pub enum PipelineError {
    Net(rs_net::Error),
    Render(RenderError),
    Config(ConfigError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Writing the downloaded skin.
    SkinWrite {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Net(err) => write!(f, "{err}"),
            PipelineError::Render(err) => write!(f, "{err}"),
            PipelineError::Config(err) => write!(f, "{err}"),
            PipelineError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            PipelineError::SkinWrite { path, source } => {
                write!(f, "failed to write skin {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Net(err) => Some(err),
            PipelineError::Render(err) => Some(err),
            PipelineError::Config(err) => Some(err),
            PipelineError::Io { source, .. } => Some(source),
            PipelineError::SkinWrite { source, .. } => Some(source),
        }
    }
}

impl From<rs_net::Error> for PipelineError {
    fn from(err: rs_net::Error) -> Self {
        PipelineError::Net(err)
    }
}

impl From<RenderError> for PipelineError {
    fn from(err: RenderError) -> Self {
        PipelineError::Render(err)
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Config(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub skin_path: Option<PathBuf>,
    pub render_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Resolve, download, assemble, render and write. `Ok(None)` when the player has no skin to
/// show; nothing is written in that case.
pub fn run<L, F>(
    lookup: &L,
    fetch: &F,
    config: &RunConfig,
) -> Result<Option<PipelineOutput>, PipelineError>
where
    L: ProfileLookup + ?Sized,
    F: TextureFetch + ?Sized,
{
    let timer = StageTimer::start();
    let Some(location) = find_skin_location(lookup, &config.username)? else {
        return Ok(None);
    };
    timer.finish("resolve");

    let timer = StageTimer::start();
    let atlas = fetch.fetch_texture(&location)?;
    timer.finish("download");

    std::fs::create_dir_all(&config.output_dir).map_err(|source| PipelineError::Io {
        path: config.output_dir.clone(),
        source,
    })?;

    let skin_path = if config.save_skin {
        let path = config.skin_path();
        atlas
            .save_rgb(&path)
            .map_err(|source| PipelineError::SkinWrite {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "saved skin");
        Some(path)
    } else {
        None
    };

    let timer = StageTimer::start();
    let coloring = config.coloring();
    let model = assemble_player(&atlas, coloring);
    timer.finish("assemble");

    let timer = StageTimer::start();
    let output = render_player(&model, &config.render_settings())?;
    timer.finish("render");

    let render_path = config.render_path();
    output.save(&render_path)?;
    info!(
        variant = config.variant.label(),
        coloring = coloring.label(),
        path = %render_path.display(),
        "saved render"
    );

    Ok(Some(PipelineOutput {
        skin_path,
        render_path,
        width: output.width(),
        height: output.height(),
    }))
}
