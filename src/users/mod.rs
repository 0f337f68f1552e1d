use axum::{
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};

use crate::{auth::extractors::require_auth, state::AppState};

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod validation;

pub fn router(state: &AppState) -> Router<AppState> {
    let mut list = get(handlers::list_users);
    let mut single = get(handlers::get_user);
    if state.config.protect_user_list {
        list = gated(list, state);
        single = gated(single, state);
    }

    Router::new()
        .route("/users", list)
        .route("/users", post(handlers::create_user))
        .route("/users/:user_id", single)
}

fn gated(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
