//! Pomodoro Server - A state-managed HTTP server running a Pomodoro timer
//! 
//! This is the main entry point for the pomodoro-server application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_server::{
    config::Config,
    state::AppState,
    api::create_router,
    services::CommandAlarm,
    tasks::{ticker_task, IntervalTicker},
    utils::{format_clock, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_server={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-server v{}", env!("CARGO_PKG_VERSION"));

    let timer = config.initial_timer();
    info!("Configuration: host={}, port={}, focus={}, break={}, step={}s",
          config.host, config.port,
          format_clock(timer.focus.max), format_clock(timer.break_.max), config.step);

    let alarm = CommandAlarm::new(config.alarm_command.clone());
    match alarm.active_command() {
        Some(command) => info!("Alarm command: {}", command),
        None => info!("No alarm command configured, alarms will only be logged"),
    }

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), timer, config.step));

    // Start the ticker background task
    let ticker_state = Arc::clone(&state);
    let source = IntervalTicker::new(config.tick_period());
    tokio::spawn(async move {
        ticker_task(ticker_state, source, alarm).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start                    - Start or resume the timer");
    info!("  POST /pause                    - Pause the timer");
    info!("  POST /toggle                   - Play/pause");
    info!("  POST /stop                     - Stop and reset to focus");
    info!("  POST /duration/:mode           - Change focus/break length by {{\"delta\": secs}}");
    info!("  POST /duration/:mode/increase  - Lengthen focus/break by one step");
    info!("  POST /duration/:mode/decrease  - Shorten focus/break by one step");
    info!("  GET  /status                   - Current timer and server status");
    info!("  GET  /health                   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
