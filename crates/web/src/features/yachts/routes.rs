use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use storage::Database;

use super::handlers::{
    create_yacht, delete_yacht, get_yacht, get_yacht_results, list_yachts, restore_yacht,
    update_yacht,
};
use crate::middleware::auth::{require_auth, ApiKeys};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_yacht))
        .route("/:slug", put(update_yacht))
        .route("/:slug", delete(delete_yacht))
        .route("/:slug/restore", post(restore_yacht))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_yachts))
        .route("/:slug", get(get_yacht))
        .route("/:slug/results", get(get_yacht_results))
        .merge(protected)
}
