use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use storage::Database;

use super::handlers::{create_result, delete_result, get_result, update_result};
use crate::middleware::auth::{require_auth, ApiKeys};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_result))
        .route("/:id", put(update_result))
        .route("/:id", delete(delete_result))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new().route("/:id", get(get_result)).merge(protected)
}
