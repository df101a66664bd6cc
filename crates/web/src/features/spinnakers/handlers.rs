use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::spinnaker::{CreateSpinnakerRequest, UpdateSpinnakerRequest},
    models::Spinnaker,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/spinnakers",
    responses(
        (status = 200, description = "All spinnaker classes with their adjustment", body = Vec<Spinnaker>)
    ),
    tag = "spinnakers"
)]
pub async fn list_spinnakers(State(db): State<Database>) -> Result<Json<Vec<Spinnaker>>, WebError> {
    let spinnakers = services::list_spinnakers(db.pool()).await?;
    Ok(Json(spinnakers))
}

#[utoipa::path(
    get,
    path = "/api/spinnakers/{id}",
    params(
        ("id" = Uuid, Path, description = "Spinnaker ID")
    ),
    responses(
        (status = 200, description = "Spinnaker found", body = Spinnaker),
        (status = 404, description = "Spinnaker not found")
    ),
    tag = "spinnakers"
)]
pub async fn get_spinnaker(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let spinnaker = services::get_spinnaker(db.pool(), id).await?;
    Ok(Json(spinnaker).into_response())
}

#[utoipa::path(
    post,
    path = "/api/spinnakers",
    request_body = CreateSpinnakerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Spinnaker class created", body = Spinnaker),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Spinnaker class already exists")
    ),
    tag = "spinnakers"
)]
pub async fn create_spinnaker(
    State(db): State<Database>,
    Json(req): Json<CreateSpinnakerRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let spinnaker = services::create_spinnaker(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(spinnaker)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/spinnakers/{id}",
    params(
        ("id" = Uuid, Path, description = "Spinnaker ID")
    ),
    request_body = UpdateSpinnakerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Spinnaker updated", body = Spinnaker),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Spinnaker not found")
    ),
    tag = "spinnakers"
)]
pub async fn update_spinnaker(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSpinnakerRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let spinnaker = services::update_spinnaker(db.pool(), id, &req).await?;

    Ok(Json(spinnaker).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/spinnakers/{id}",
    params(
        ("id" = Uuid, Path, description = "Spinnaker ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Spinnaker deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Spinnaker not found")
    ),
    tag = "spinnakers"
)]
pub async fn delete_spinnaker(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_spinnaker(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
