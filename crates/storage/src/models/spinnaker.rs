use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::SpinnakerClass;

/// Spinnaker class with the PHRF adjustment applied when a yacht of this
/// class flies its spinnaker in a race.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Spinnaker {
    pub spinnaker_id: Uuid,
    pub class_name: SpinnakerClass,
    pub adjustment_value: i32,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}
