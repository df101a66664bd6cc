use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::spinnaker::{CreateSpinnakerRequest, UpdateSpinnakerRequest};
use crate::error::{Result, StorageError};
use crate::models::{Spinnaker, SpinnakerClass};

const SPINNAKER_COLUMNS: &str = "spinnaker_id, class_name, adjustment_value, created_at, updated_at";

pub struct SpinnakerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SpinnakerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Spinnaker>> {
        let sql = format!("SELECT {} FROM spinnakers ORDER BY class_name", SPINNAKER_COLUMNS);
        let spinnakers = sqlx::query_as::<_, Spinnaker>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(spinnakers)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Spinnaker> {
        let sql = format!("SELECT {} FROM spinnakers WHERE spinnaker_id = $1", SPINNAKER_COLUMNS);
        let spinnaker = sqlx::query_as::<_, Spinnaker>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(spinnaker)
    }

    pub async fn find_by_class_tx(tx: &mut PgConnection, class_name: SpinnakerClass) -> Result<Spinnaker> {
        let sql = format!("SELECT {} FROM spinnakers WHERE class_name = $1", SPINNAKER_COLUMNS);
        let spinnaker = sqlx::query_as::<_, Spinnaker>(&sql)
            .bind(class_name)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(spinnaker)
    }

    pub async fn create(&self, req: &CreateSpinnakerRequest) -> Result<Spinnaker> {
        let mut conn = self.pool.acquire().await?;
        Self::create_tx(&mut conn, req).await
    }

    pub async fn create_tx(tx: &mut PgConnection, req: &CreateSpinnakerRequest) -> Result<Spinnaker> {
        let sql = format!(
            "INSERT INTO spinnakers (class_name, adjustment_value) VALUES ($1, $2) RETURNING {}",
            SPINNAKER_COLUMNS
        );
        let spinnaker = sqlx::query_as::<_, Spinnaker>(&sql)
            .bind(req.class_name)
            .bind(req.adjustment_value)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                StorageError::from(e).with_constraint_message(
                    "Spinnaker class already exists",
                    "Referenced record does not exist",
                )
            })?;

        Ok(spinnaker)
    }

    pub async fn update(&self, id: Uuid, req: &UpdateSpinnakerRequest) -> Result<Spinnaker> {
        let mut conn = self.pool.acquire().await?;
        Self::update_tx(&mut conn, id, req).await
    }

    /// Stored posted times of yachts in this class are not rewritten here
    pub async fn update_tx(
        tx: &mut PgConnection,
        id: Uuid,
        req: &UpdateSpinnakerRequest,
    ) -> Result<Spinnaker> {
        let sql = format!(
            "UPDATE spinnakers SET adjustment_value = $2 WHERE spinnaker_id = $1 RETURNING {}",
            SPINNAKER_COLUMNS
        );
        let spinnaker = sqlx::query_as::<_, Spinnaker>(&sql)
            .bind(id)
            .bind(req.adjustment_value)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(spinnaker)
    }

    /// Yachts of this class keep racing without a spinnaker class (`ON DELETE SET NULL`)
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM spinnakers WHERE spinnaker_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
