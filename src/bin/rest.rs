// Postbox - REST store server
// Run with: cargo run --bin postbox-rest

//! # Postbox REST Store Binary
//!
//! Starts the REST API that owns the users and messages. By default it
//! listens on port 3000 and starts with the demo dataset loaded.

use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use postbox::RestServerBuilder;

#[derive(Parser)]
#[command(name = "postbox-rest")]
#[command(about = "Postbox REST store - users and messages over HTTP")]
#[command(version)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "POSTBOX_REST_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "POSTBOX_REST_PORT", default_value_t = 3000)]
    port: u16,

    /// Disable permissive CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Start with no users or messages
    #[arg(long)]
    empty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!("Starting Postbox REST store...");

    RestServerBuilder::new()
        .with_host(cli.host)
        .with_port(cli.port)
        .with_cors(!cli.no_cors)
        .with_seed_data(!cli.empty)
        .build()
        .run()
        .await
}
