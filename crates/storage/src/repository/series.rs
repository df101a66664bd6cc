use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::series::{CreateSeriesRequest, SeriesFilter, UpdateSeriesRequest};
use crate::error::{Result, StorageError};
use crate::models::Series;

const SERIES_COLUMNS: &str = "series_id, name, year, is_current, notes, is_deleted, created_at, updated_at";

pub struct SeriesRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SeriesRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List series, optionally for one year or the current season only
    pub async fn list(&self, filter: &SeriesFilter) -> Result<Vec<Series>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM series
            WHERE is_deleted = FALSE
              AND ($1::INTEGER IS NULL OR year = $1)
              AND ($2 = FALSE OR is_current = TRUE)
            ORDER BY name
            "#,
            SERIES_COLUMNS
        );
        let series = sqlx::query_as::<_, Series>(&sql)
            .bind(filter.year)
            .bind(filter.current_only.unwrap_or(false))
            .fetch_all(self.pool)
            .await?;

        Ok(series)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Series> {
        let sql = format!(
            "SELECT {} FROM series WHERE series_id = $1 AND is_deleted = FALSE",
            SERIES_COLUMNS
        );
        let series = sqlx::query_as::<_, Series>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(series)
    }

    pub async fn find_by_name_tx(tx: &mut PgConnection, name: &str) -> Result<Series> {
        let sql = format!(
            "SELECT {} FROM series WHERE name = $1 AND is_deleted = FALSE",
            SERIES_COLUMNS
        );
        let series = sqlx::query_as::<_, Series>(&sql)
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(series)
    }

    pub async fn create(&self, req: &CreateSeriesRequest) -> Result<Series> {
        let mut conn = self.pool.acquire().await?;
        Self::create_tx(&mut conn, req).await
    }

    pub async fn create_tx(tx: &mut PgConnection, req: &CreateSeriesRequest) -> Result<Series> {
        let sql = format!(
            r#"
            INSERT INTO series (name, year, is_current, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            SERIES_COLUMNS
        );
        let series = sqlx::query_as::<_, Series>(&sql)
            .bind(&req.name)
            .bind(req.year)
            .bind(req.is_current)
            .bind(&req.notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                StorageError::from(e)
                    .with_constraint_message("Series name already exists", "Referenced record does not exist")
            })?;

        Ok(series)
    }

    pub async fn update(&self, existing: &Series, req: &UpdateSeriesRequest) -> Result<Series> {
        let sql = format!(
            r#"
            UPDATE series
            SET name = $2,
                year = $3,
                is_current = $4,
                notes = $5
            WHERE series_id = $1
            RETURNING {}
            "#,
            SERIES_COLUMNS
        );
        let series = sqlx::query_as::<_, Series>(&sql)
            .bind(existing.series_id)
            .bind(req.name.as_ref().unwrap_or(&existing.name))
            .bind(req.year.or(existing.year))
            .bind(req.is_current.unwrap_or(existing.is_current))
            .bind(req.notes.as_ref().unwrap_or(&existing.notes))
            .fetch_optional(self.pool)
            .await
            .map_err(|e| {
                StorageError::from(e)
                    .with_constraint_message("Series name already exists", "Referenced record does not exist")
            })?
            .ok_or(StorageError::NotFound)?;

        Ok(series)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE series SET is_deleted = TRUE WHERE series_id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn restore(&self, id: Uuid) -> Result<Series> {
        let sql = format!(
            "UPDATE series SET is_deleted = FALSE WHERE series_id = $1 RETURNING {}",
            SERIES_COLUMNS
        );
        let series = sqlx::query_as::<_, Series>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(series)
    }
}
