//! API Gateway - HTTP REST API for the customer portal.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "Customer portal authentication gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server, applying pending migrations when
    /// `DATABASE_URL` is set
    Serve {
        /// Bind address, defaults to GATEWAY_HOST or 0.0.0.0
        #[arg(long)]
        host: Option<String>,
        /// Bind port, defaults to GATEWAY_PORT or 8080
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            gateway_lib::run(host, port).await?;
        }
    }

    Ok(())
}
