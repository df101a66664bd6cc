use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::CompletionStatus;

/// One yacht's result in one event.
///
/// `posted_time` is the corrected time derived by the save hook in
/// [`crate::repository::result::ResultRepository`]; callers never write it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RaceResult {
    pub result_id: Uuid,
    pub event_id: Uuid,
    pub yacht_id: Uuid,
    pub completion_status: CompletionStatus,
    pub finish_time: Option<NaiveTime>,
    pub order_over_line: Option<i32>,
    pub time_penalty: Option<NaiveTime>,
    pub posted_time: Option<NaiveTime>,
    pub used_spinnaker: bool,
    pub notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}
