//! CLI entry point for pixelcode.

mod cli;
mod commands;
mod config;
mod output;

use clap::Parser;
use pixelcode_observability::ObservabilityConfig;

use crate::cli::Cli;

const VERBOSE_FILTER: &str = "warn,pixelcode_llms=debug,pixelcode_cli=debug";

/// Load the nearest `.env` from the working directory or its parents.
/// Values already present in the environment win.
fn load_env_file() {
    let Ok(mut dir) = std::env::current_dir() else {
        return;
    };
    for _ in 0..32 {
        let env_file = dir.join(".env");
        if env_file.exists() {
            let _ = dotenvy::from_path(&env_file);
            return;
        }
        if !dir.pop() {
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    load_env_file();
    let cli = Cli::parse();
    output::init(cli.output);

    let mut observability =
        ObservabilityConfig::from_env().with_version(env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        observability = observability.with_log_level(VERBOSE_FILTER);
    }
    if let Err(e) = pixelcode_observability::init(observability) {
        output::warning(&e.to_string());
    }

    let result = commands::handle(cli).await;
    pixelcode_observability::shutdown();

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
