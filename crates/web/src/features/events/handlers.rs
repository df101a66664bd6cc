use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        event::{CreateEventRequest, StandingsFilter, UpdateEventRequest},
        result::{EventResultEntry, RecomputeResponse, StandingEntry},
    },
    models::Event,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let event = services::get_event(db.pool(), id).await?;
    Ok(Json(event).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/results",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Results of the event", body = Vec<EventResultEntry>),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event_results(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let results = services::get_event_results(db.pool(), id).await?;
    Ok(Json(results).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/standings",
    params(
        ("id" = Uuid, Path, description = "Event ID"),
        StandingsFilter
    ),
    responses(
        (status = 200, description = "Results ranked by posted time", body = Vec<StandingEntry>),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event_standings(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Query(filter): Query<StandingsFilter>,
) -> Result<Response, WebError> {
    let standings = services::get_event_standings(db.pool(), id, filter.yacht_class).await?;
    Ok(Json(standings).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Series does not exist")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(db): State<Database>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let event = services::create_event(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(event)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let event = services::update_event(db.pool(), id, &req).await?;

    Ok(Json(event).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_event(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/restore",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event restored", body = Event),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn restore_event(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let event = services::restore_event(db.pool(), id).await?;

    Ok(Json(event).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/events/{id}/recompute",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Posted times recomputed", body = RecomputeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found"),
        (status = 422, description = "A result cannot be corrected")
    ),
    tag = "admin"
)]
pub async fn recompute_event(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let response = services::recompute_event(db.pool(), id).await?;

    Ok(Json(response).into_response())
}
