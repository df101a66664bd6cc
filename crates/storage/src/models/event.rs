use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::corrected_time::ClassStartTimes;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub event_id: Uuid,
    pub series_id: Uuid,
    pub event_date: NaiveDate,
    pub first_flag_a: Option<NaiveTime>,
    pub first_flag_b: Option<NaiveTime>,
    pub first_flag_c: Option<NaiveTime>,
    pub start_a: Option<NaiveTime>,
    pub start_b: Option<NaiveTime>,
    pub start_c: Option<NaiveTime>,
    pub start_j: Option<NaiveTime>,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Event {
    pub fn class_starts(&self) -> ClassStartTimes {
        ClassStartTimes {
            a: self.start_a,
            b: self.start_b,
            c: self.start_c,
            j: self.start_j,
        }
    }
}
