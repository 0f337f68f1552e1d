pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router(state: &AppState) -> Router<AppState> {
    handlers::write_routes(state.config.upload_max_bytes)
}
