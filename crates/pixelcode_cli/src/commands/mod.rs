//! Command dispatch.

pub mod generate;
pub mod input;
pub mod models;
pub mod refine;

use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;

pub async fn handle(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env()?;
    let mock = cli.mock || config.mock;
    match cli.command {
        Command::Generate(args) => generate::handle(args, &config, mock).await,
        Command::Refine(args) => refine::handle(args, &config, mock).await,
        Command::Models => models::handle(),
    }
}
