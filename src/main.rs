use std::sync::Arc;

use movierank::{AppState, config::Config, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movierank=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::from_config(&config).await?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
