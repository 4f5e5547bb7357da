use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use feedlens::config::Config;
use feedlens::server;

#[derive(Parser, Debug)]
#[command(
    name = "feedlens",
    about = "RSS/Atom feed proxy with article parsing and thumbnail resolution"
)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Upstream fetch timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Cache-Control max-age (seconds) on successful responses
    #[arg(long, default_value_t = 300)]
    cache_max_age: u32,

    /// Allow fetching feeds from localhost and private networks
    #[arg(long)]
    allow_private_networks: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = Config {
        bind: args.bind,
        fetch_timeout: Duration::from_secs(args.timeout),
        cache_max_age: args.cache_max_age,
        allow_private_networks: args.allow_private_networks,
        ..Config::default()
    };

    server::run(config).await
}
