use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use storage::Database;

use super::handlers::{
    create_spinnaker, delete_spinnaker, get_spinnaker, list_spinnakers, update_spinnaker,
};
use crate::middleware::auth::{require_auth, ApiKeys};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_spinnaker))
        .route("/:id", put(update_spinnaker))
        .route("/:id", delete(delete_spinnaker))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_spinnakers))
        .route("/:id", get(get_spinnaker))
        .merge(protected)
}
