use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use storage::Database;

use super::handlers::{
    create_series, delete_series, get_series, get_series_events, list_series, restore_series,
    update_series,
};
use crate::middleware::auth::{require_auth, ApiKeys};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_series))
        .route("/:id", put(update_series))
        .route("/:id", delete(delete_series))
        .route("/:id/restore", post(restore_series))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_series))
        .route("/:id", get(get_series))
        .route("/:id/events", get(get_series_events))
        .merge(protected)
}
