use axum::Json;
use storage::dto::handicap::{ComputeCorrectedTimeRequest, ComputeCorrectedTimeResponse};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/handicap/compute",
    request_body = ComputeCorrectedTimeRequest,
    responses(
        (status = 200, description = "Corrected time computed", body = ComputeCorrectedTimeResponse),
        (status = 422, description = "Missing input or rating outside the formula's domain")
    ),
    tag = "handicap"
)]
pub async fn compute_corrected_time(
    Json(req): Json<ComputeCorrectedTimeRequest>,
) -> Result<Json<ComputeCorrectedTimeResponse>, WebError> {
    let response = services::compute(&req)?;

    Ok(Json(response))
}
