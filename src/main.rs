use anyhow::Context;
use clap::Parser;
use readability_cache::{
    api, config,
    extractor::HttpExtractor,
    logging,
    reader::ReaderService,
    store::{RedisStore, StoreKeys},
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(
    name = "readability-cache",
    about = "Serve readable articles through a Redis-backed cache"
)]
struct Args {
    /// Port to listen on; overrides SERVER_PORT.
    #[arg(long)]
    port: Option<u16>,
    /// Redis connection URL; overrides REDIS_URL.
    #[arg(long)]
    redis_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing();

    let mut config = config::load_config().context("Failed to load config from environment")?;
    if let Some(port) = args.port {
        config.server_port = Some(port);
    }
    if let Some(redis_url) = args.redis_url {
        config.redis_url = redis_url;
    }
    let config = config::init_config(config)?;

    let store = RedisStore::connect(&config.redis_url)
        .await
        .context("Failed to connect to Redis")?
        .with_keys(StoreKeys::with_prefix(config.cache_key_prefix.clone()))
        .with_ttl(config.article_ttl);
    let extractor = HttpExtractor::new().context("Failed to build HTTP client")?;
    let service = ReaderService::new(Arc::new(store), Arc::new(extractor))
        .with_extract_timeout(config.extract_timeout);
    let app = api::create_router(Arc::new(service));

    let (listener, port) = bind_listener(config.server_port).await?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn bind_listener(fixed_port: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    if let Some(port) = fixed_port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 8080..=8099;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 8080-8099",
    ))
}
