use backend::store::{
    MemorySessionRepository, MemoryTaskRepository, RedisSessionRepository, RedisTaskRepository,
};
use backend::{routes, AppState, Config, StorageBackend};
use redis::Client;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let state = match config.storage_backend {
        StorageBackend::Redis => {
            let client = Arc::new(Client::open(config.redis_url.as_str())?);
            info!("Redis URL: {}", config.redis_url);
            AppState {
                tasks: Arc::new(RedisTaskRepository::new(client.clone())),
                sessions: Arc::new(RedisSessionRepository::new(
                    client,
                    config.session_ttl_secs,
                )),
                session_ttl_secs: config.session_ttl_secs,
            }
        }
        StorageBackend::Memory => AppState {
            tasks: Arc::new(MemoryTaskRepository::new()),
            sessions: Arc::new(MemorySessionRepository::new(config.session_ttl_secs)),
            session_ttl_secs: config.session_ttl_secs,
        },
    };

    let app = routes::app(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
