// Service entry point: tracing, state, listener and graceful shutdown

use axum::{serve, Router};
use tokio::net::TcpListener;

use suggested_topics::config::state::AppState;
use suggested_topics::core::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let state: &'static AppState = AppState::instance();
    AppState::init_services().await?;

    let app: Router = server::create_app(state.clone());
    let listener: TcpListener = server::setup_listener(&state.environment).await?;

    tracing::info!("Server listening on: {}", listener.local_addr()?);

    serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    Ok(())
}
