use anyhow::Context;
use portico_config::PorticoConfig;
use portico_server::{Services, router};

pub async fn handle(
    mut config: PorticoConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let clerk = config
        .require_clerk()
        .context("set CLERK_SECRET_KEY or PORTICO_CLERK__SECRET_KEY")?;
    if clerk.webhook_secret().is_none() {
        tracing::warn!("no webhook signing secret configured; deliveries will be rejected");
    }

    let app = router(&config, Services::clerk(clerk)).context("failed to build router")?;

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "portico listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
