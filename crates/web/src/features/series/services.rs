use sqlx::PgPool;
use storage::{
    dto::series::{CreateSeriesRequest, SeriesFilter, UpdateSeriesRequest},
    error::Result,
    models::{Event, Series},
    repository::{event::EventRepository, series::SeriesRepository},
};
use uuid::Uuid;

pub async fn list_series(pool: &PgPool, filter: &SeriesFilter) -> Result<Vec<Series>> {
    let repo = SeriesRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_series(pool: &PgPool, id: Uuid) -> Result<Series> {
    let repo = SeriesRepository::new(pool);
    repo.find_by_id(id).await
}

/// Events of one series, oldest first. 404 when the series itself is gone.
pub async fn get_series_events(pool: &PgPool, id: Uuid) -> Result<Vec<Event>> {
    let series = SeriesRepository::new(pool).find_by_id(id).await?;

    EventRepository::new(pool).list_by_series(series.series_id).await
}

pub async fn create_series(pool: &PgPool, request: &CreateSeriesRequest) -> Result<Series> {
    let repo = SeriesRepository::new(pool);
    repo.create(request).await
}

pub async fn update_series(pool: &PgPool, id: Uuid, request: &UpdateSeriesRequest) -> Result<Series> {
    let repo = SeriesRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, request).await
}

pub async fn delete_series(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = SeriesRepository::new(pool);
    repo.soft_delete(id).await
}

pub async fn restore_series(pool: &PgPool, id: Uuid) -> Result<Series> {
    let repo = SeriesRepository::new(pool);
    repo.restore(id).await
}
