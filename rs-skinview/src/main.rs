mod cli;
mod config;
mod pipeline;
mod timing;


use std::process::ExitCode;

use clap::Parser;
use rs_net::{MojangClient, ReqwestTransport};
use tracing::{Level, error, info};

use cli::Cli;
use config::RunConfig;
use pipeline::PipelineError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .without_time()
        .compact()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), PipelineError> {
    let config = RunConfig::resolve(cli)?;
    info!(
        username = %config.username,
        variant = config.variant.label(),
        "starting rs-skinview"
    );

    let transport = ReqwestTransport::new(&config.user_agent, config.timeout)?;
    let client = MojangClient::with_transport(transport).with_endpoints(config.endpoints.clone());

    match pipeline::run(&client, &client, &config)? {
        Some(output) => info!(
            path = %output.render_path.display(),
            width = output.width,
            height = output.height,
            "done"
        ),
        None => info!(username = %config.username, "no skin found"),
    }
    Ok(())
}
