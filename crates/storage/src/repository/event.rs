use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::event::{CreateEventRequest, UpdateEventRequest};
use crate::error::{Result, StorageError};
use crate::models::Event;

const EVENT_COLUMNS: &str = "event_id, series_id, event_date, first_flag_a, first_flag_b, first_flag_c, \
     start_a, start_b, start_c, start_j, notes, is_deleted, created_at, updated_at";

pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_series(&self, series_id: Uuid) -> Result<Vec<Event>> {
        let mut conn = self.pool.acquire().await?;
        Self::list_by_series_tx(&mut conn, series_id).await
    }

    pub async fn list_by_series_tx(tx: &mut PgConnection, series_id: Uuid) -> Result<Vec<Event>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM events
            WHERE series_id = $1 AND is_deleted = FALSE
            ORDER BY event_date
            "#,
            EVENT_COLUMNS
        );
        let events = sqlx::query_as::<_, Event>(&sql)
            .bind(series_id)
            .fetch_all(&mut *tx)
            .await?;

        Ok(events)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Event> {
        let sql = format!(
            "SELECT {} FROM events WHERE event_id = $1 AND is_deleted = FALSE",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn create(&self, req: &CreateEventRequest) -> Result<Event> {
        let mut conn = self.pool.acquire().await?;
        Self::create_tx(&mut conn, req).await
    }

    pub async fn create_tx(tx: &mut PgConnection, req: &CreateEventRequest) -> Result<Event> {
        let sql = format!(
            r#"
            INSERT INTO events (
                series_id, event_date, first_flag_a, first_flag_b, first_flag_c,
                start_a, start_b, start_c, start_j, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(req.series_id)
            .bind(req.event_date)
            .bind(req.first_flag_a)
            .bind(req.first_flag_b)
            .bind(req.first_flag_c)
            .bind(req.start_a)
            .bind(req.start_b)
            .bind(req.start_c)
            .bind(req.start_j)
            .bind(&req.notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                StorageError::from(e)
                    .with_constraint_message("Event already exists", "Series does not exist")
            })?;

        Ok(event)
    }

    /// Update an event. Results are not touched here; see
    /// [`crate::repository::result::ResultRepository::recompute_event`].
    pub async fn update(&self, existing: &Event, req: &UpdateEventRequest) -> Result<Event> {
        let sql = format!(
            r#"
            UPDATE events
            SET event_date = $2,
                first_flag_a = $3,
                first_flag_b = $4,
                first_flag_c = $5,
                start_a = $6,
                start_b = $7,
                start_c = $8,
                start_j = $9,
                notes = $10
            WHERE event_id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(existing.event_id)
            .bind(req.event_date.unwrap_or(existing.event_date))
            .bind(req.first_flag_a.or(existing.first_flag_a))
            .bind(req.first_flag_b.or(existing.first_flag_b))
            .bind(req.first_flag_c.or(existing.first_flag_c))
            .bind(req.start_a.or(existing.start_a))
            .bind(req.start_b.or(existing.start_b))
            .bind(req.start_c.or(existing.start_c))
            .bind(req.start_j.or(existing.start_j))
            .bind(req.notes.as_ref().or(existing.notes.as_ref()))
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE events SET is_deleted = TRUE WHERE event_id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn restore(&self, id: Uuid) -> Result<Event> {
        let sql = format!(
            "UPDATE events SET is_deleted = FALSE WHERE event_id = $1 RETURNING {}",
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(event)
    }
}
