use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::{
    app::{init_config, load_config, Config},
    client::{print_models, run_chat, GatewayClient},
    gateway::Gateway,
    models::{GeminiProvider, HealthState, Provider},
    server,
};

use super::Commands;

/// Handle CLI subcommands; configuration is loaded once here, except for `init`
pub async fn handle_command(command: Commands, config_path: Option<&Path>) -> Result<()> {
    if let Commands::Init = command {
        let path = init_config(config_path)?;
        println!("Configuration at: {}", path.display());
        return Ok(());
    }

    let config = load_config(config_path)?;
    match command {
        Commands::Serve { host, port } => serve(config, host, port).await,
        Commands::Chat { url, model } => {
            let client = gateway_client(url, &config)?;
            let stdin = BufReader::new(tokio::io::stdin());
            run_chat(&client, model, stdin, &mut io::stdout()).await?;
            Ok(())
        }
        Commands::Models { url } => {
            let models = gateway_client(url, &config)?.models().await?;
            print_models(&mut io::stdout(), &models)?;
            Ok(())
        }
        Commands::Health { url } => show_health(&gateway_client(url, &config)?).await,
        Commands::Version => {
            show_version();
            Ok(())
        }
        Commands::Init => Ok(()),
    }
}

fn gateway_client(url: Option<String>, config: &Config) -> Result<GatewayClient> {
    let url = url.unwrap_or_else(|| config.client.gateway_url.clone());
    Ok(GatewayClient::new(&url)?)
}

/// Start the gateway server
pub async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let provider = GeminiProvider::new(&config.upstream)?;
    if provider.is_configured() {
        info!("Using {} provider at {}", provider.name(), config.upstream.base_url);
    } else {
        warn!("GOOGLE_API_KEY is not set; the gateway will report degraded health");
    }

    let gateway = Arc::new(Gateway::from_config(&config, Arc::new(provider))?);
    server::run(&config.bind_address(), gateway).await
}

async fn show_health(client: &GatewayClient) -> Result<()> {
    let health = client.health().await?;
    let status = match health.status {
        HealthState::Healthy => "[OK] healthy".green(),
        HealthState::Degraded => "[WARNING] degraded".yellow(),
    };

    let mut out = io::stdout();
    writeln!(out, "Gateway {}: {}", client.base_url(), status)?;
    writeln!(out, "  Default model: {}", health.model)?;
    writeln!(out, "  Models: {}", health.available_models.join(", "))?;
    writeln!(out, "  Version: {}", health.version)?;
    writeln!(out, "  Checked at: {}", health.timestamp.to_rfc3339())?;
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("chat-gateway v{}", env!("CARGO_PKG_VERSION"));
    println!("   A stateless chat relay in front of a hosted LLM API");
}
