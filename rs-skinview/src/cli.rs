use std::path::PathBuf;

use clap::Parser;
use rs_entity::ColoringStrategy;

use crate::config::PipelineVariant;

/// Fetch a Minecraft player's skin and render it onto a humanoid figure.
#[derive(Parser, Debug, Default)]
#[command(name = "rs-skinview", version, about, long_about = None)]
pub struct Cli {
    /// Player name to look up [default: rajankpaul].
    pub username: Option<String>,

    /// Optional toml file; command-line flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// vertex-color or textured.
    #[arg(long, value_parser = parse_variant)]
    pub variant: Option<PipelineVariant>,

    /// tiled, shared-material or skin-regions. Defaults per variant.
    #[arg(long, value_parser = parse_coloring)]
    pub coloring: Option<ColoringStrategy>,

    /// Directory the skin and render are written to [default: .].
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Square render size in pixels.
    #[arg(long)]
    pub size: Option<u32>,

    /// Skip writing `{username}_skin.png`.
    #[arg(long)]
    pub no_skin_file: bool,

    /// Shade the figure with the preset light.
    #[arg(long)]
    pub lit: bool,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_variant(value: &str) -> Result<PipelineVariant, String> {
    PipelineVariant::from_options_value(value).ok_or_else(|| {
        let known: Vec<_> = PipelineVariant::ALL
            .iter()
            .map(|v| v.as_options_value())
            .collect();
        format!("expected one of {}", known.join(", "))
    })
}

fn parse_coloring(value: &str) -> Result<ColoringStrategy, String> {
    ColoringStrategy::from_options_value(value).ok_or_else(|| {
        let known: Vec<_> = ColoringStrategy::ALL
            .iter()
            .map(|c| c.as_options_value())
            .collect();
        format!("expected one of {}", known.join(", "))
    })
}
