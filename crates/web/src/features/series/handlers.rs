use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::series::{CreateSeriesRequest, SeriesFilter, UpdateSeriesRequest},
    models::{Event, Series},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/series",
    params(SeriesFilter),
    responses(
        (status = 200, description = "List racing series", body = Vec<Series>)
    ),
    tag = "series"
)]
pub async fn list_series(
    State(db): State<Database>,
    Query(filter): Query<SeriesFilter>,
) -> Result<Json<Vec<Series>>, WebError> {
    let series = services::list_series(db.pool(), &filter).await?;
    Ok(Json(series))
}

#[utoipa::path(
    get,
    path = "/api/series/{id}",
    params(
        ("id" = Uuid, Path, description = "Series ID")
    ),
    responses(
        (status = 200, description = "Series found", body = Series),
        (status = 404, description = "Series not found")
    ),
    tag = "series"
)]
pub async fn get_series(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let series = services::get_series(db.pool(), id).await?;
    Ok(Json(series).into_response())
}

#[utoipa::path(
    get,
    path = "/api/series/{id}/events",
    params(
        ("id" = Uuid, Path, description = "Series ID")
    ),
    responses(
        (status = 200, description = "Events of the series", body = Vec<Event>),
        (status = 404, description = "Series not found")
    ),
    tag = "series"
)]
pub async fn get_series_events(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let events = services::get_series_events(db.pool(), id).await?;
    Ok(Json(events).into_response())
}

#[utoipa::path(
    post,
    path = "/api/series",
    request_body = CreateSeriesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Series created", body = Series),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Series name already exists")
    ),
    tag = "series"
)]
pub async fn create_series(
    State(db): State<Database>,
    Json(req): Json<CreateSeriesRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let series = services::create_series(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(series)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/series/{id}",
    params(
        ("id" = Uuid, Path, description = "Series ID")
    ),
    request_body = UpdateSeriesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Series updated", body = Series),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Series not found")
    ),
    tag = "series"
)]
pub async fn update_series(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSeriesRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let series = services::update_series(db.pool(), id, &req).await?;

    Ok(Json(series).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/series/{id}",
    params(
        ("id" = Uuid, Path, description = "Series ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Series deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Series not found")
    ),
    tag = "series"
)]
pub async fn delete_series(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_series(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/series/{id}/restore",
    params(
        ("id" = Uuid, Path, description = "Series ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Series restored", body = Series),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Series not found")
    ),
    tag = "series"
)]
pub async fn restore_series(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let series = services::restore_series(db.pool(), id).await?;

    Ok(Json(series).into_response())
}
