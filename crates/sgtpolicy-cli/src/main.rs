mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sgtpolicy_api::DnacClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "sgtpolicy", &mut std::io::stdout());
            Ok(())
        }

        // All other commands require a controller connection
        cmd => {
            let client_config = config::build_client_config(&cli.global)?;
            let client = DnacClient::new(client_config)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &client, &cli.global).await
        }
    }
}
