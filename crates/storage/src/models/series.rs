use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A named, year-scoped collection of racing events.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Series {
    pub series_id: Uuid,
    pub name: String,
    pub year: Option<i32>,
    pub is_current: bool,
    pub notes: String,
    pub is_deleted: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}
