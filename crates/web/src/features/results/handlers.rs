use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::result::{CreateResultRequest, UpdateResultRequest},
    models::RaceResult,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/results/{id}",
    params(
        ("id" = Uuid, Path, description = "Result ID")
    ),
    responses(
        (status = 200, description = "Result found", body = RaceResult),
        (status = 404, description = "Result not found")
    ),
    tag = "results"
)]
pub async fn get_result(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let result = services::get_result(db.pool(), id).await?;
    Ok(Json(result).into_response())
}

#[utoipa::path(
    post,
    path = "/api/results",
    request_body = CreateResultRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Result recorded with its posted time", body = RaceResult),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Yacht already has a result in this event"),
        (status = 422, description = "Corrected time cannot be computed")
    ),
    tag = "results"
)]
pub async fn create_result(
    State(db): State<Database>,
    Json(req): Json<CreateResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let result = services::create_result(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(result)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/results/{id}",
    params(
        ("id" = Uuid, Path, description = "Result ID")
    ),
    request_body = UpdateResultRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Result updated with a fresh posted time", body = RaceResult),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Result not found"),
        (status = 422, description = "Corrected time cannot be computed")
    ),
    tag = "results"
)]
pub async fn update_result(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateResultRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let result = services::update_result(db.pool(), id, &req).await?;

    Ok(Json(result).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/results/{id}",
    params(
        ("id" = Uuid, Path, description = "Result ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Result deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Result not found")
    ),
    tag = "results"
)]
pub async fn delete_result(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_result(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
