use anyhow::Context as _;
use tracing::info;

use nexza_console::bootstrap::build_state;
use nexza_console::config::ConsoleConfig;
use nexza_console::router::build_router;
use nexza_core::config::Config;
use nexza_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ConsoleConfig::from_env().context("load console configuration")?;
    let state = build_state(&config).await?;

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.console_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("console service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
