use clap::Parser;
use docmirror_fetch::ReqwestClient;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

mod cli;
mod config;
mod error;
mod logging;
mod manifest;
mod mirror;
#[cfg(test)]
mod testing;

use cli::{Cli, Mode};
use config::Config;
use error::{AppError, Result};
use mirror::Mirror;

fn main() {
    if let Err(e) = bootstrap() {
        eprintln!("{}", failure_line(&e));
        std::process::exit(1);
    }
}

/// The single line printed for a run-level failure.
fn failure_line(error: &AppError) -> String {
    format!("Error: {error}")
}

#[tokio::main]
async fn bootstrap() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.log_file.as_deref())?;

    let config = Config::load(cli.config.as_deref(), &cli.overrides)?;
    debug!("{:?}", config);

    let client = ReqwestClient::new(&config.user_agent, config.request_timeout())?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, aborting outstanding downloads");
                cancel.cancel();
            }
        }
    });

    let mirror = Mirror::new(config, client);
    match cli.mode() {
        Mode::Init => mirror.init(&cancel).await?,
        Mode::Update => mirror.update(&cancel).await?,
    };

    Ok(())
}
