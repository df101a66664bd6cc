use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::yacht::{CreateYachtRequest, UpdateYachtRequest, YachtFilter, YachtResponse},
    models::RaceResult,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/yachts",
    params(YachtFilter),
    responses(
        (status = 200, description = "List yachts", body = Vec<YachtResponse>)
    ),
    tag = "yachts"
)]
pub async fn list_yachts(
    State(db): State<Database>,
    Query(filter): Query<YachtFilter>,
) -> Result<Json<Vec<YachtResponse>>, WebError> {
    let yachts = services::list_yachts(db.pool(), &filter).await?;

    Ok(Json(yachts.into_iter().map(YachtResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/yachts/{slug}",
    params(
        ("slug" = String, Path, description = "Yacht slug")
    ),
    responses(
        (status = 200, description = "Yacht found", body = YachtResponse),
        (status = 404, description = "Yacht not found")
    ),
    tag = "yachts"
)]
pub async fn get_yacht(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let yacht = services::get_yacht_by_slug(db.pool(), &slug).await?;

    Ok(Json(YachtResponse::from(yacht)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/yachts/{slug}/results",
    params(
        ("slug" = String, Path, description = "Yacht slug")
    ),
    responses(
        (status = 200, description = "Results recorded for the yacht", body = Vec<RaceResult>),
        (status = 404, description = "Yacht not found")
    ),
    tag = "yachts"
)]
pub async fn get_yacht_results(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let results = services::get_yacht_results(db.pool(), &slug).await?;

    Ok(Json(results).into_response())
}

#[utoipa::path(
    post,
    path = "/api/yachts",
    request_body = CreateYachtRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Yacht registered", body = YachtResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Name, slug or sail number already exists")
    ),
    tag = "yachts"
)]
pub async fn create_yacht(
    State(db): State<Database>,
    Json(req): Json<CreateYachtRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let yacht = services::create_yacht(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(YachtResponse::from(yacht))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/yachts/{slug}",
    params(
        ("slug" = String, Path, description = "Yacht slug")
    ),
    request_body = UpdateYachtRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Yacht updated", body = YachtResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Yacht not found")
    ),
    tag = "yachts"
)]
pub async fn update_yacht(
    State(db): State<Database>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateYachtRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let yacht = services::update_yacht(db.pool(), &slug, &req).await?;

    Ok(Json(YachtResponse::from(yacht)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/yachts/{slug}",
    params(
        ("slug" = String, Path, description = "Yacht slug")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Yacht deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Yacht not found")
    ),
    tag = "yachts"
)]
pub async fn delete_yacht(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    services::delete_yacht(db.pool(), &slug).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/yachts/{slug}/restore",
    params(
        ("slug" = String, Path, description = "Yacht slug")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Yacht restored", body = YachtResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Yacht not found")
    ),
    tag = "yachts"
)]
pub async fn restore_yacht(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let yacht = services::restore_yacht(db.pool(), &slug).await?;

    Ok(Json(YachtResponse::from(yacht)).into_response())
}
