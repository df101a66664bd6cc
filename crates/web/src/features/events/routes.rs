use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use storage::Database;

use super::handlers::{
    create_event, delete_event, get_event, get_event_results, get_event_standings,
    recompute_event, restore_event, update_event,
};
use crate::middleware::auth::{require_auth, ApiKeys};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_event))
        .route("/:id", put(update_event))
        .route("/:id", delete(delete_event))
        .route("/:id/restore", post(restore_event))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:id", get(get_event))
        .route("/:id/results", get(get_event_results))
        .route("/:id/standings", get(get_event_standings))
        .merge(protected)
}

/// Maintenance endpoints, all behind the API key
pub fn admin_routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/events/:id/recompute", post(recompute_event))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
