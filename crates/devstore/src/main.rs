mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use devstore_config::{Config, LogConfig};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Completions must work even with a broken config file.
    let cfg = match cli.command {
        Command::Completions(_) => Config::default(),
        _ => load_config(&cli.global)?,
    };

    init_tracing(cli.global.verbose, &cfg.log);
    tracing::debug!(command = ?cli.command, "dispatching command");
    commands::dispatch(cli.command, &cli.global, &cfg).await
}

fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let cfg = match global.config {
        Some(ref path) => devstore_config::load_config_from(path)?,
        None => devstore_config::load_config()?,
    };
    Ok(cfg)
}

/// Install the global subscriber. `RUST_LOG` wins over `-v`, which wins
/// over `log.level` from the config.
fn init_tracing(verbosity: u8, log: &LogConfig) {
    let filter = match verbosity {
        0 => log.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr);

    if log.is_json() {
        builder.json().init();
    } else {
        builder.init();
    }
}
