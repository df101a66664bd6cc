use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::generate_unique_slug;
use crate::dto::club::{CreateYachtClubRequest, UpdateYachtClubRequest};
use crate::error::{Result, StorageError};
use crate::models::YachtClub;

const CLUB_COLUMNS: &str = "yacht_club_id, name, slug, city, street_name, street_number, postal_code, \
     contact_first_name, contact_last_name, email, is_deleted, created_at, updated_at";

/// Repository for YachtClub database operations
pub struct YachtClubRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> YachtClubRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List clubs that have not been soft deleted
    pub async fn list(&self) -> Result<Vec<YachtClub>> {
        let sql = format!(
            "SELECT {} FROM yacht_clubs WHERE is_deleted = FALSE ORDER BY name",
            CLUB_COLUMNS
        );
        let clubs = sqlx::query_as::<_, YachtClub>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(clubs)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<YachtClub> {
        let sql = format!(
            "SELECT {} FROM yacht_clubs WHERE slug = $1 AND is_deleted = FALSE",
            CLUB_COLUMNS
        );
        let club = sqlx::query_as::<_, YachtClub>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(club)
    }

    pub async fn find_by_name_tx(tx: &mut PgConnection, name: &str) -> Result<YachtClub> {
        let sql = format!(
            "SELECT {} FROM yacht_clubs WHERE name = $1 AND is_deleted = FALSE",
            CLUB_COLUMNS
        );
        let club = sqlx::query_as::<_, YachtClub>(&sql)
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(club)
    }

    pub async fn create(&self, req: &CreateYachtClubRequest) -> Result<YachtClub> {
        let mut tx = self.pool.begin().await?;
        let club = Self::create_tx(&mut tx, req).await?;
        tx.commit().await?;

        Ok(club)
    }

    /// Slug generation and insert on the caller's connection
    pub async fn create_tx(tx: &mut PgConnection, req: &CreateYachtClubRequest) -> Result<YachtClub> {
        let slug = match &req.slug {
            Some(slug) => slug.clone(),
            None => generate_unique_slug(tx, "yacht_clubs", &req.name, "club").await?,
        };

        let sql = format!(
            r#"
            INSERT INTO yacht_clubs (
                name, slug, city, street_name, street_number, postal_code,
                contact_first_name, contact_last_name, email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CLUB_COLUMNS
        );
        let club = sqlx::query_as::<_, YachtClub>(&sql)
            .bind(&req.name)
            .bind(&slug)
            .bind(&req.city)
            .bind(&req.street_name)
            .bind(&req.street_number)
            .bind(&req.postal_code)
            .bind(&req.contact_first_name)
            .bind(&req.contact_last_name)
            .bind(&req.email)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                StorageError::from(e).with_constraint_message(
                    "Club name or slug already exists",
                    "Referenced record does not exist",
                )
            })?;

        Ok(club)
    }

    pub async fn update(&self, existing: &YachtClub, req: &UpdateYachtClubRequest) -> Result<YachtClub> {
        let sql = format!(
            r#"
            UPDATE yacht_clubs
            SET name = $2,
                city = $3,
                street_name = $4,
                street_number = $5,
                postal_code = $6,
                contact_first_name = $7,
                contact_last_name = $8,
                email = $9
            WHERE yacht_club_id = $1
            RETURNING {}
            "#,
            CLUB_COLUMNS
        );
        let club = sqlx::query_as::<_, YachtClub>(&sql)
            .bind(existing.yacht_club_id)
            .bind(req.name.as_ref().unwrap_or(&existing.name))
            .bind(req.city.as_ref().or(existing.city.as_ref()))
            .bind(req.street_name.as_ref().or(existing.street_name.as_ref()))
            .bind(req.street_number.as_ref().or(existing.street_number.as_ref()))
            .bind(req.postal_code.as_ref().or(existing.postal_code.as_ref()))
            .bind(
                req.contact_first_name
                    .as_ref()
                    .or(existing.contact_first_name.as_ref()),
            )
            .bind(
                req.contact_last_name
                    .as_ref()
                    .or(existing.contact_last_name.as_ref()),
            )
            .bind(req.email.as_ref().or(existing.email.as_ref()))
            .fetch_optional(self.pool)
            .await
            .map_err(|e| {
                StorageError::from(e).with_constraint_message(
                    "Club name already exists",
                    "Referenced record does not exist",
                )
            })?
            .ok_or(StorageError::NotFound)?;

        Ok(club)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE yacht_clubs SET is_deleted = TRUE WHERE yacht_club_id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn restore(&self, slug: &str) -> Result<YachtClub> {
        let sql = format!(
            "UPDATE yacht_clubs SET is_deleted = FALSE WHERE slug = $1 RETURNING {}",
            CLUB_COLUMNS
        );
        let club = sqlx::query_as::<_, YachtClub>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(club)
    }
}
