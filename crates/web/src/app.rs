use std::time::Duration;

use axum::Router;
use storage::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features::{clubs, events, handicap, results, series, spinnakers, yachts};
use crate::middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        clubs::handlers::list_clubs,
        clubs::handlers::get_club,
        clubs::handlers::create_club,
        clubs::handlers::update_club,
        clubs::handlers::delete_club,
        clubs::handlers::restore_club,
        spinnakers::handlers::list_spinnakers,
        spinnakers::handlers::get_spinnaker,
        spinnakers::handlers::create_spinnaker,
        spinnakers::handlers::update_spinnaker,
        spinnakers::handlers::delete_spinnaker,
        yachts::handlers::list_yachts,
        yachts::handlers::get_yacht,
        yachts::handlers::get_yacht_results,
        yachts::handlers::create_yacht,
        yachts::handlers::update_yacht,
        yachts::handlers::delete_yacht,
        yachts::handlers::restore_yacht,
        series::handlers::list_series,
        series::handlers::get_series,
        series::handlers::get_series_events,
        series::handlers::create_series,
        series::handlers::update_series,
        series::handlers::delete_series,
        series::handlers::restore_series,
        events::handlers::get_event,
        events::handlers::get_event_results,
        events::handlers::get_event_standings,
        events::handlers::create_event,
        events::handlers::update_event,
        events::handlers::delete_event,
        events::handlers::restore_event,
        events::handlers::recompute_event,
        results::handlers::get_result,
        results::handlers::create_result,
        results::handlers::update_result,
        results::handlers::delete_result,
        handicap::handlers::compute_corrected_time,
    ),
    components(
        schemas(
            storage::dto::club::CreateYachtClubRequest,
            storage::dto::club::UpdateYachtClubRequest,
            storage::dto::club::YachtClubResponse,
            storage::dto::spinnaker::CreateSpinnakerRequest,
            storage::dto::spinnaker::UpdateSpinnakerRequest,
            storage::dto::yacht::CreateYachtRequest,
            storage::dto::yacht::UpdateYachtRequest,
            storage::dto::yacht::YachtResponse,
            storage::dto::series::CreateSeriesRequest,
            storage::dto::series::UpdateSeriesRequest,
            storage::dto::event::CreateEventRequest,
            storage::dto::event::UpdateEventRequest,
            storage::dto::result::CreateResultRequest,
            storage::dto::result::UpdateResultRequest,
            storage::dto::result::EventResultEntry,
            storage::dto::result::StandingEntry,
            storage::dto::result::RecomputeResponse,
            storage::dto::handicap::ComputeCorrectedTimeRequest,
            storage::dto::handicap::ComputeCorrectedTimeResponse,
            storage::services::corrected_time::ClassStartTimes,
            storage::models::Spinnaker,
            storage::models::Series,
            storage::models::Event,
            storage::models::RaceResult,
            storage::models::YachtClass,
            storage::models::SpinnakerClass,
            storage::models::CompletionStatus,
        )
    ),
    tags(
        (name = "clubs", description = "Yacht club endpoints"),
        (name = "spinnakers", description = "Spinnaker class adjustments"),
        (name = "yachts", description = "Yacht registry endpoints"),
        (name = "series", description = "Racing series endpoints"),
        (name = "events", description = "Race events, results and standings"),
        (name = "results", description = "Result entry with derived posted times"),
        (name = "handicap", description = "Stand-alone PHRF time-on-time calculator"),
        (name = "admin", description = "Maintenance endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

pub fn build_router(db: Database, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .nest("/api/clubs", clubs::routes::routes(api_keys.clone()))
        .nest("/api/spinnakers", spinnakers::routes::routes(api_keys.clone()))
        .nest("/api/yachts", yachts::routes::routes(api_keys.clone()))
        .nest("/api/series", series::routes::routes(api_keys.clone()))
        .nest("/api/events", events::routes::routes(api_keys.clone()))
        .nest("/api/results", results::routes::routes(api_keys.clone()))
        .nest("/api/handicap", handicap::routes::routes())
        .nest("/api/admin", events::routes::admin_routes(api_keys))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(db)
}
