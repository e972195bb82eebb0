mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    match cli.command {
        Command::Inspect { file, tree } => commands::inspect::run(file, tree).await,
        Command::Transcode { file, output } => commands::transcode::run(file, output).await,
        Command::Upload { file } => commands::upload::run(file).await,
        Command::Sample { file } => commands::sample::run(file).await,
    }
}
