use axum::{routing::post, Router};
use storage::Database;

use super::handlers::compute_corrected_time;

pub fn routes() -> Router<Database> {
    Router::new().route("/compute", post(compute_corrected_time))
}
