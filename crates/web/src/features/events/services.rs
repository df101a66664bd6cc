use sqlx::PgPool;
use storage::{
    dto::{
        event::{CreateEventRequest, UpdateEventRequest},
        result::{EventResultEntry, RecomputeResponse, StandingEntry},
    },
    error::Result,
    models::{Event, YachtClass},
    repository::{event::EventRepository, result::ResultRepository},
    services::standings::rank_results,
};
use uuid::Uuid;

pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn get_event_results(pool: &PgPool, id: Uuid) -> Result<Vec<EventResultEntry>> {
    let event = EventRepository::new(pool).find_by_id(id).await?;

    ResultRepository::new(pool).list_by_event(event.event_id).await
}

/// Ranked results of one event, optionally for one start group
pub async fn get_event_standings(
    pool: &PgPool,
    id: Uuid,
    yacht_class: Option<YachtClass>,
) -> Result<Vec<StandingEntry>> {
    let entries = get_event_results(pool, id).await?;

    Ok(rank_results(entries, yacht_class))
}

pub async fn create_event(pool: &PgPool, request: &CreateEventRequest) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.create(request).await
}

pub async fn update_event(pool: &PgPool, id: Uuid, request: &UpdateEventRequest) -> Result<Event> {
    let repo = EventRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    let event = repo.update(&existing, request).await?;

    if request.changes_start_times() {
        tracing::info!(
            event_id = %event.event_id,
            "Start times changed; stored posted times are stale until the event is recomputed"
        );
    }

    Ok(event)
}

pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = EventRepository::new(pool);
    repo.soft_delete(id).await
}

pub async fn restore_event(pool: &PgPool, id: Uuid) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.restore(id).await
}

/// Re-run the corrected time computation for every result of the event
pub async fn recompute_event(pool: &PgPool, id: Uuid) -> Result<RecomputeResponse> {
    let event = EventRepository::new(pool).find_by_id(id).await?;
    let recomputed_count = ResultRepository::new(pool)
        .recompute_event(event.event_id)
        .await?;

    tracing::info!(event_id = %event.event_id, recomputed_count, "Recomputed event results");

    Ok(RecomputeResponse {
        event_id: event.event_id,
        recomputed_count,
    })
}
