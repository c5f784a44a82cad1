//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, warn};

use crate::{
    state::{AppState, Direction, Mode, TimerState},
    utils::format_clock,
};
use super::responses::{ApiResponse, DurationChange, HealthResponse, StatusResponse, TimerView};

/// Turn the result of a timer transition into a response
fn respond(
    result: Result<TimerState, String>,
    action: &str,
    message: impl FnOnce(&TimerState) -> String,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(timer) => Ok(Json(ApiResponse::new(message(&timer), &timer))),
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn length_message(timer: &TimerState, mode: Mode) -> String {
    format!("{} length set to {}", mode.as_str(), format_clock(timer.countdown(mode).max))
}

fn parse_mode(name: &str) -> Result<Mode, StatusCode> {
    Mode::from_name(name).ok_or_else(|| {
        warn!("Unknown timer mode requested: {}", name);
        StatusCode::NOT_FOUND
    })
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.start(), "start", |timer| {
        format!("Timer running in {} mode", timer.mode.as_str())
    })
}

/// Handle POST /pause - Pause the countdown, keeping progress
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.pause(), "pause", |_| "Timer paused".to_string())
}

/// Handle POST /toggle - Play/pause
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.toggle(), "toggle", |timer| {
        let message = if timer.running { "Timer running" } else { "Timer paused" };
        message.to_string()
    })
}

/// Handle POST /stop - Stop and reset to a fresh focus interval
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond(state.stop(), "stop", |_| "Timer stopped and reset".to_string())
}

/// Handle POST /duration/:mode - Change a mode's length by an arbitrary delta
pub async fn change_duration_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
    Json(change): Json<DurationChange>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mode = parse_mode(&mode)?;
    respond(state.change_max(mode, change.delta), "adjust", |timer| length_message(timer, mode))
}

/// Handle POST /duration/:mode/increase - Lengthen a mode by one step
pub async fn increase_duration_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mode = parse_mode(&mode)?;
    respond(state.step_max(mode, Direction::Increase), "adjust", |timer| length_message(timer, mode))
}

/// Handle POST /duration/:mode/decrease - Shorten a mode by one step
pub async fn decrease_duration_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let mode = parse_mode(&mode)?;
    respond(state.step_max(mode, Direction::Decrease), "adjust", |timer| length_message(timer, mode))
}

/// Handle GET /status - Return the timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: TimerView::from(&timer),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
