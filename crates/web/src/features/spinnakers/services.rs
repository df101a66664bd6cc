use sqlx::PgPool;
use storage::{
    dto::spinnaker::{CreateSpinnakerRequest, UpdateSpinnakerRequest},
    error::Result,
    models::Spinnaker,
    repository::spinnaker::SpinnakerRepository,
};
use uuid::Uuid;

pub async fn list_spinnakers(pool: &PgPool) -> Result<Vec<Spinnaker>> {
    let repo = SpinnakerRepository::new(pool);
    repo.list().await
}

pub async fn get_spinnaker(pool: &PgPool, id: Uuid) -> Result<Spinnaker> {
    let repo = SpinnakerRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn create_spinnaker(pool: &PgPool, request: &CreateSpinnakerRequest) -> Result<Spinnaker> {
    let repo = SpinnakerRepository::new(pool);
    repo.create(request).await
}

/// Changing an adjustment does not touch stored posted times; the admin
/// recompute endpoint refreshes an event afterwards.
pub async fn update_spinnaker(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateSpinnakerRequest,
) -> Result<Spinnaker> {
    let repo = SpinnakerRepository::new(pool);
    repo.update(id, request).await
}

pub async fn delete_spinnaker(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = SpinnakerRepository::new(pool);
    repo.delete(id).await
}
