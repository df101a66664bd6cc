use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::club::{CreateYachtClubRequest, UpdateYachtClubRequest, YachtClubResponse},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/clubs",
    responses(
        (status = 200, description = "List all yacht clubs", body = Vec<YachtClubResponse>)
    ),
    tag = "clubs"
)]
pub async fn list_clubs(
    State(db): State<Database>,
) -> Result<Json<Vec<YachtClubResponse>>, WebError> {
    let clubs = services::list_clubs(db.pool()).await?;

    Ok(Json(clubs.into_iter().map(YachtClubResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/clubs/{slug}",
    params(
        ("slug" = String, Path, description = "Yacht club slug")
    ),
    responses(
        (status = 200, description = "Yacht club found", body = YachtClubResponse),
        (status = 404, description = "Yacht club not found")
    ),
    tag = "clubs"
)]
pub async fn get_club(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let club = services::get_club_by_slug(db.pool(), &slug).await?;

    Ok(Json(YachtClubResponse::from(club)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/clubs",
    request_body = CreateYachtClubRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Yacht club registered", body = YachtClubResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Name or slug already exists")
    ),
    tag = "clubs"
)]
pub async fn create_club(
    State(db): State<Database>,
    Json(req): Json<CreateYachtClubRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let club = services::create_club(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(YachtClubResponse::from(club))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/clubs/{slug}",
    params(
        ("slug" = String, Path, description = "Yacht club slug")
    ),
    request_body = UpdateYachtClubRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Yacht club updated", body = YachtClubResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Yacht club not found")
    ),
    tag = "clubs"
)]
pub async fn update_club(
    State(db): State<Database>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateYachtClubRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let club = services::update_club(db.pool(), &slug, &req).await?;

    Ok(Json(YachtClubResponse::from(club)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/clubs/{slug}",
    params(
        ("slug" = String, Path, description = "Yacht club slug")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Yacht club deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Yacht club not found")
    ),
    tag = "clubs"
)]
pub async fn delete_club(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    services::delete_club(db.pool(), &slug).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/clubs/{slug}/restore",
    params(
        ("slug" = String, Path, description = "Yacht club slug")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Yacht club restored", body = YachtClubResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Yacht club not found")
    ),
    tag = "clubs"
)]
pub async fn restore_club(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let club = services::restore_club(db.pool(), &slug).await?;

    Ok(Json(YachtClubResponse::from(club)).into_response())
}
