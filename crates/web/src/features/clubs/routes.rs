use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use storage::Database;

use super::handlers::{create_club, delete_club, get_club, list_clubs, restore_club, update_club};
use crate::middleware::auth::{require_auth, ApiKeys};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_club))
        .route("/:slug", put(update_club))
        .route("/:slug", delete(delete_club))
        .route("/:slug/restore", post(restore_club))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_clubs))
        .route("/:slug", get(get_club))
        .merge(protected)
}
