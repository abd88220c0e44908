mod app;

use anyhow::{Context, Result};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let (config, source) = app::settings::resolve(explicit)?;
    tracing::info!("configuration: {source:?}");

    let state = app::AppState::new(&config)?;
    tracing::info!(
        "serving images from {} under /{}",
        state.catalog.image_root().display(),
        config.public_prefix
    );

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("cannot bind {}", config.bind_address))?;
    tracing::info!("backend listening on http://{}", config.bind_address);

    axum::serve(listener, app::router(state))
        .await
        .context("server stopped unexpectedly")?;
    Ok(())
}
