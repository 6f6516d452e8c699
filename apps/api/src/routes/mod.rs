pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(handlers::handle_index))
        .route("/start", post(handlers::handle_start))
        .route("/interview/:session_id", get(handlers::handle_interview))
        .route("/answer/:session_id", post(handlers::handle_answer))
        .route("/result/:session_id", get(handlers::handle_result))
        .with_state(state)
}
