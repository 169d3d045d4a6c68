// Postbox - GraphQL gateway
// Run with: cargo run --bin postbox-gateway

//! # Postbox GraphQL Gateway Binary
//!
//! Starts the GraphQL server. Every query is answered by calling the REST
//! store at `--store-url`, so start `postbox-rest` first.

use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use postbox::GraphQLServerBuilder;

#[derive(Parser)]
#[command(name = "postbox-gateway")]
#[command(about = "Postbox GraphQL gateway - queries the REST store over HTTP")]
#[command(version)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "POSTBOX_GRAPHQL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "POSTBOX_GRAPHQL_PORT", default_value_t = 4000)]
    port: u16,

    /// Base URL of the REST store
    #[arg(long, env = "POSTBOX_STORE_URL", default_value = "http://localhost:3000")]
    store_url: Url,

    /// Disable permissive CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!("Starting Postbox GraphQL gateway...");

    GraphQLServerBuilder::new()
        .with_host(cli.host)
        .with_port(cli.port)
        .with_cors(!cli.no_cors)
        .with_store_url(cli.store_url)
        .build_and_run()
        .await
}
