use sqlx::PgPool;
use storage::{
    dto::result::{CreateResultRequest, UpdateResultRequest},
    error::Result,
    models::RaceResult,
    repository::result::ResultRepository,
};
use uuid::Uuid;

pub async fn get_result(pool: &PgPool, id: Uuid) -> Result<RaceResult> {
    let repo = ResultRepository::new(pool);
    repo.find_by_id(id).await
}

/// Record a result; the posted time is derived before the row is written
pub async fn create_result(pool: &PgPool, request: &CreateResultRequest) -> Result<RaceResult> {
    let repo = ResultRepository::new(pool);
    repo.create(request).await
}

pub async fn update_result(pool: &PgPool, id: Uuid, request: &UpdateResultRequest) -> Result<RaceResult> {
    let repo = ResultRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(&existing, request).await
}

pub async fn delete_result(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = ResultRepository::new(pool);
    repo.delete(id).await
}
