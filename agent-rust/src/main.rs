use glimpse_agent::{server, AppState, BoxedError, Generator, GlimpseConfig, Session};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), BoxedError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GlimpseConfig::from_env()?;

    let generator = Generator::new(Arc::new(config.model_factory()))
        .with_entry_point(config.preview.entry_point.clone());
    let session = Session::new(config.preview.clone())?;
    let app = server::router(AppState::new(generator, session), config.app_origin.clone());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "Glimpse listening");

    axum::serve(listener, app).await?;

    Ok(())
}
