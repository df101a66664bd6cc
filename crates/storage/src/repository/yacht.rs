use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::generate_unique_slug;
use crate::dto::patch::patch;
use crate::dto::yacht::{CreateYachtRequest, UpdateYachtRequest, YachtFilter};
use crate::error::{Result, StorageError};
use crate::models::Yacht;

const YACHT_COLUMNS: &str = "yacht_id, name, slug, skipper_id, sail_number, yacht_type, yacht_class, \
     yacht_club_id, phrf_rating, spinnaker_id, is_active, is_deleted, created_at, updated_at";

const DUPLICATE_YACHT: &str = "Yacht name, slug or sail number already exists";
const UNKNOWN_REFERENCE: &str = "Referenced yacht club or spinnaker class does not exist";

/// Repository for Yacht database operations
///
/// Every write recomputes `is_active` from the rating and racing class.
pub struct YachtRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> YachtRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List yachts, optionally only active ones or one racing class
    pub async fn list(&self, filter: &YachtFilter) -> Result<Vec<Yacht>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM yachts
            WHERE is_deleted = FALSE
              AND ($1 = FALSE OR is_active = TRUE)
              AND ($2::yacht_class IS NULL OR yacht_class = $2)
            ORDER BY name
            "#,
            YACHT_COLUMNS
        );
        let yachts = sqlx::query_as::<_, Yacht>(&sql)
            .bind(filter.active_only.unwrap_or(false))
            .bind(filter.yacht_class)
            .fetch_all(self.pool)
            .await?;

        Ok(yachts)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Yacht> {
        let sql = format!(
            "SELECT {} FROM yachts WHERE yacht_id = $1 AND is_deleted = FALSE",
            YACHT_COLUMNS
        );
        let yacht = sqlx::query_as::<_, Yacht>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(yacht)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Yacht> {
        let sql = format!(
            "SELECT {} FROM yachts WHERE slug = $1 AND is_deleted = FALSE",
            YACHT_COLUMNS
        );
        let yacht = sqlx::query_as::<_, Yacht>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(yacht)
    }

    pub async fn find_by_name_tx(tx: &mut PgConnection, name: &str) -> Result<Yacht> {
        let sql = format!(
            "SELECT {} FROM yachts WHERE name = $1 AND is_deleted = FALSE",
            YACHT_COLUMNS
        );
        let yacht = sqlx::query_as::<_, Yacht>(&sql)
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(yacht)
    }

    pub async fn create(&self, req: &CreateYachtRequest) -> Result<Yacht> {
        let mut tx = self.pool.begin().await?;
        let yacht = Self::create_tx(&mut tx, req).await?;
        tx.commit().await?;

        Ok(yacht)
    }

    pub async fn create_tx(tx: &mut PgConnection, req: &CreateYachtRequest) -> Result<Yacht> {
        let slug = match &req.slug {
            Some(slug) => slug.clone(),
            None => generate_unique_slug(tx, "yachts", &req.name, "yacht").await?,
        };
        let is_active = Yacht::derive_active(req.phrf_rating, req.yacht_class);

        let sql = format!(
            r#"
            INSERT INTO yachts (
                name, slug, skipper_id, sail_number, yacht_type, yacht_class,
                yacht_club_id, phrf_rating, spinnaker_id, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            YACHT_COLUMNS
        );
        let yacht = sqlx::query_as::<_, Yacht>(&sql)
            .bind(&req.name)
            .bind(&slug)
            .bind(req.skipper_id)
            .bind(&req.sail_number)
            .bind(&req.yacht_type)
            .bind(req.yacht_class)
            .bind(req.yacht_club_id)
            .bind(req.phrf_rating)
            .bind(req.spinnaker_id)
            .bind(is_active)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StorageError::from(e).with_constraint_message(DUPLICATE_YACHT, UNKNOWN_REFERENCE))?;

        tracing::debug!(yacht = %yacht.slug, is_active, "Yacht registered");

        Ok(yacht)
    }

    /// Update an existing yacht; omitted fields keep their current value
    pub async fn update(&self, existing: &Yacht, req: &UpdateYachtRequest) -> Result<Yacht> {
        let (phrf_rating, yacht_class) = req.handicap_after(existing);
        let is_active = Yacht::derive_active(phrf_rating, yacht_class);

        let sql = format!(
            r#"
            UPDATE yachts
            SET name = $2,
                skipper_id = $3,
                sail_number = $4,
                yacht_type = $5,
                yacht_class = $6,
                yacht_club_id = $7,
                phrf_rating = $8,
                spinnaker_id = $9,
                is_active = $10
            WHERE yacht_id = $1
            RETURNING {}
            "#,
            YACHT_COLUMNS
        );
        let yacht = sqlx::query_as::<_, Yacht>(&sql)
            .bind(existing.yacht_id)
            .bind(req.name.as_ref().unwrap_or(&existing.name))
            .bind(req.skipper_id.or(existing.skipper_id))
            .bind(req.sail_number.as_ref().or(existing.sail_number.as_ref()))
            .bind(req.yacht_type.as_ref().or(existing.yacht_type.as_ref()))
            .bind(yacht_class)
            .bind(req.yacht_club_id.or(existing.yacht_club_id))
            .bind(phrf_rating)
            .bind(patch(req.spinnaker_id, existing.spinnaker_id))
            .bind(is_active)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| StorageError::from(e).with_constraint_message(DUPLICATE_YACHT, UNKNOWN_REFERENCE))?
            .ok_or(StorageError::NotFound)?;

        if yacht.is_active != existing.is_active {
            tracing::info!(yacht = %yacht.slug, is_active, "Yacht racing status changed");
        }

        Ok(yacht)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE yachts SET is_deleted = TRUE WHERE yacht_id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn restore(&self, slug: &str) -> Result<Yacht> {
        let sql = format!(
            "UPDATE yachts SET is_deleted = FALSE WHERE slug = $1 RETURNING {}",
            YACHT_COLUMNS
        );
        let yacht = sqlx::query_as::<_, Yacht>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(yacht)
    }
}
