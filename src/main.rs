//! Countdown - A state-managed countdown timer
//! 
//! This is the main entry point for the countdown server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown::{
    api::create_router,
    config::Config,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={:?}, theme={:?}",
          config.host, config.port, config.duration, config.theme());

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.theme(),
        config.on_finish.clone(),
    ));

    if let Some(input) = config.duration_input() {
        let result = state.set_duration(&input).map_err(anyhow::Error::msg)?;
        if !result.transition.is_applied() {
            tracing::warn!("Ignoring startup duration {}", input);
        }
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/duration - Set the countdown duration");
    info!("  POST /timer/start    - Start or resume the countdown");
    info!("  POST /timer/pause    - Pause the countdown");
    info!("  POST /timer/reset    - Restore the configured duration");
    info!("  POST /timer/clear    - Clear the configured duration");
    info!("  POST /theme/toggle   - Toggle light/dark theme");
    info!("  GET  /status         - Check current timer and theme");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            result?;
            info!("Shutdown signal received");
        }
    }

    state.shutdown().map_err(anyhow::Error::msg)?;
    info!("Server shutdown complete");
    Ok(())
}
