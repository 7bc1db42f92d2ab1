use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chat-gateway")]
#[command(version)]
#[command(about = "A stateless chat relay in front of a hosted LLM API", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the gateway HTTP server (default)
    Serve {
        /// Address to bind (overrides configuration)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat with a running gateway from the terminal
    Chat {
        /// Gateway URL (overrides configuration)
        #[arg(long, env = "GATEWAY_URL")]
        url: Option<String>,

        /// Model to use instead of the gateway default
        #[arg(short, long)]
        model: Option<String>,
    },
    /// List the models a running gateway supports
    Models {
        /// Gateway URL (overrides configuration)
        #[arg(long, env = "GATEWAY_URL")]
        url: Option<String>,
    },
    /// Show the status of a running gateway
    Health {
        /// Gateway URL (overrides configuration)
        #[arg(long, env = "GATEWAY_URL")]
        url: Option<String>,
    },
    /// Write a default configuration file
    Init,
    /// Show version information
    Version,
}
