use sqlx::PgPool;
use storage::{
    dto::yacht::{CreateYachtRequest, UpdateYachtRequest, YachtFilter},
    error::Result,
    models::{RaceResult, Yacht},
    repository::{result::ResultRepository, yacht::YachtRepository},
};

/// List yachts, optionally only active ones or one class
pub async fn list_yachts(pool: &PgPool, filter: &YachtFilter) -> Result<Vec<Yacht>> {
    let repo = YachtRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_yacht_by_slug(pool: &PgPool, slug: &str) -> Result<Yacht> {
    let repo = YachtRepository::new(pool);
    repo.find_by_slug(slug).await
}

/// Every result recorded for the yacht, newest first
pub async fn get_yacht_results(pool: &PgPool, slug: &str) -> Result<Vec<RaceResult>> {
    let yacht = YachtRepository::new(pool).find_by_slug(slug).await?;

    ResultRepository::new(pool).list_by_yacht(yacht.yacht_id).await
}

pub async fn create_yacht(pool: &PgPool, request: &CreateYachtRequest) -> Result<Yacht> {
    let repo = YachtRepository::new(pool);
    repo.create(request).await
}

pub async fn update_yacht(pool: &PgPool, slug: &str, request: &UpdateYachtRequest) -> Result<Yacht> {
    let repo = YachtRepository::new(pool);

    let existing = repo.find_by_slug(slug).await?;
    repo.update(&existing, request).await
}

pub async fn delete_yacht(pool: &PgPool, slug: &str) -> Result<()> {
    let repo = YachtRepository::new(pool);
    let yacht = repo.find_by_slug(slug).await?;
    repo.soft_delete(yacht.yacht_id).await
}

pub async fn restore_yacht(pool: &PgPool, slug: &str) -> Result<Yacht> {
    let repo = YachtRepository::new(pool);
    repo.restore(slug).await
}
