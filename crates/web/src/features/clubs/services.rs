use sqlx::PgPool;
use storage::{
    dto::club::{CreateYachtClubRequest, UpdateYachtClubRequest},
    error::Result,
    models::YachtClub,
    repository::club::YachtClubRepository,
};

/// List all yacht clubs
pub async fn list_clubs(pool: &PgPool) -> Result<Vec<YachtClub>> {
    let repo = YachtClubRepository::new(pool);
    repo.list().await
}

/// Get yacht club by slug
pub async fn get_club_by_slug(pool: &PgPool, slug: &str) -> Result<YachtClub> {
    let repo = YachtClubRepository::new(pool);
    repo.find_by_slug(slug).await
}

/// Register a new yacht club
pub async fn create_club(pool: &PgPool, request: &CreateYachtClubRequest) -> Result<YachtClub> {
    let repo = YachtClubRepository::new(pool);
    repo.create(request).await
}

/// Update a yacht club
pub async fn update_club(
    pool: &PgPool,
    slug: &str,
    request: &UpdateYachtClubRequest,
) -> Result<YachtClub> {
    let repo = YachtClubRepository::new(pool);

    let existing = repo.find_by_slug(slug).await?;
    repo.update(&existing, request).await
}

/// Soft delete a yacht club
pub async fn delete_club(pool: &PgPool, slug: &str) -> Result<()> {
    let repo = YachtClubRepository::new(pool);
    let club = repo.find_by_slug(slug).await?;
    repo.soft_delete(club.yacht_club_id).await
}

/// Undo a soft delete
pub async fn restore_club(pool: &PgPool, slug: &str) -> Result<YachtClub> {
    let repo = YachtClubRepository::new(pool);
    repo.restore(slug).await
}
