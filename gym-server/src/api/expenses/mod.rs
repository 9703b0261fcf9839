//! Expense API module (egresos)

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/expenses", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/daily", get(handler::daily))
        .route("/sync-with-cut", post(handler::sync_with_cut))
        .route("/{id}", put(handler::update))
        .route("/{id}", delete(handler::delete))
}
