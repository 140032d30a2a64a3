use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use alumni_console::{
    AppState,
    client::HttpAnalyticsClient,
    config::Config,
    router::create_router,
    session::{SessionStore, slot_store_from_config},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env()?;

    // 恢复上次的会话
    let slots = slot_store_from_config(&config)?;
    let session = Arc::new(SessionStore::new(slots));
    match session.load().await {
        Some(restored) => tracing::info!(
            "Restored session for {} ({})",
            restored.user.email,
            restored.user.role
        ),
        None => tracing::info!("No saved session, starting signed out"),
    }

    let api = Arc::new(HttpAnalyticsClient::new(
        &config.api_base_url,
        config.http_timeout(),
    )?);
    tracing::info!("Using analytics API at {}", config.api_base_url);

    let state = AppState::new(config.clone(), session, api.clone(), api);
    let app = create_router(state);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to loopback");
            IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
        }),
        config.server_port,
    );
    tracing::info!("Console listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
