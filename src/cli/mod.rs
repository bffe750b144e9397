pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "ucsb-api")]
#[command(about = "UCSB API - role-gated CRUD service for the UCSB course resources")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Port to bind (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,

    #[command(about = "Mint a bearer token signed with JWT_SECRET")]
    Token {
        #[arg(long, help = "Subject email for the token")]
        email: String,
        #[arg(long, help = "Grant ROLE_ADMIN in addition to ROLE_USER")]
        admin: bool,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Check a running server's /health endpoint")]
    Ping {
        #[arg(long, default_value = "http://127.0.0.1:8080", help = "Server base URL")]
        url: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Token { email, admin, hours } => {
            commands::token::handle(&email, admin, hours, output_format)
        }
        Commands::Ping { url } => commands::ping::handle(&url, output_format).await,
    }
}
