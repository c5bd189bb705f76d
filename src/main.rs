use std::io::IsTerminal;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use tosker::adapter::inbound::cli::command::{Cli, ColorChoice};
use tosker::adapter::inbound::cli::output::{Console, OutputConfig};
use tosker::adapter::inbound::cli::run;
use tosker::error::{Error, PhaseError};
use tosker::infrastructure::config::settings::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    let console = Arc::new(Console::new(OutputConfig::new(cli.json, cli.quiet)));

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            console.error(&format!("failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    config
        .logging
        .clone()
        .with_verbosity(cli.verbose)
        .with_ansi(cli.color.ansi(std::io::stderr().is_terminal()))
        .init();
    info!(file = %cli.file.display(), "tosker starting");

    if let Err(e) = run::execute(&cli, &config, console.clone()).await {
        error!(error = %e, "Fatal error");
        // Node failures were already printed under their marker.
        if !matches!(e, Error::Phase(PhaseError::Node { .. })) {
            console.error(&e.to_string());
        }
        std::process::exit(1);
    }
}
