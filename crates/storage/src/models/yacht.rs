use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::YachtClass;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Yacht {
    pub yacht_id: Uuid,
    pub name: String,
    pub slug: String,
    pub skipper_id: Option<Uuid>,
    pub sail_number: Option<String>,
    pub yacht_type: Option<String>,
    pub yacht_class: Option<YachtClass>,
    pub yacht_club_id: Option<Uuid>,
    pub phrf_rating: Option<Decimal>,
    pub spinnaker_id: Option<Uuid>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Yacht {
    /// A yacht may race only once it has both a rating and a racing class.
    /// Recomputed on every save, never taken from the caller.
    pub fn derive_active(phrf_rating: Option<Decimal>, yacht_class: Option<YachtClass>) -> bool {
        phrf_rating.is_some() && yacht_class.is_some()
    }
}

/// The handicap-relevant slice of a yacht, joined with its spinnaker class.
#[derive(Debug, Clone, FromRow)]
pub struct YachtHandicap {
    pub yacht_id: Uuid,
    pub is_active: bool,
    pub yacht_class: Option<YachtClass>,
    pub phrf_rating: Option<Decimal>,
    pub spinnaker_adjustment: Option<i32>,
}
