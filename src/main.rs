use anyhow::Result;
use clap::Parser;

use chat_gateway::{
    cli::{handle_command, Cli, Commands},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up GOOGLE_API_KEY and friends from a local .env, if any
    let dotenv = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment variables from {}", path.display());
    }

    // Serving is the default
    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });
    handle_command(command, cli.config.as_deref()).await
}
