use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all docstore endpoints.
pub fn build_router(state: AppState, max_body_size: usize) -> Router {
    Router::new()
        .route("/", get(handler::list_collections))
        .route(
            "/:collection",
            get(handler::list_entries).post(handler::create_entry),
        )
        .route("/:collection/", get(handler::list_entries))
        .route(
            "/:collection/:id",
            get(handler::get_entry).delete(handler::delete_entry),
        )
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
