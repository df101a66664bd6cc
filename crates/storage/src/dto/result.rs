use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::patch::nullable;
use crate::models::{CompletionStatus, YachtClass};

/// Request payload for recording a result.
///
/// There is no `posted_time` field: the corrected time is always derived
/// when the result is saved.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateResultRequest {
    pub event_id: Uuid,
    pub yacht_id: Uuid,

    #[serde(default)]
    pub completion_status: CompletionStatus,

    /// Format: HH:MM:SS
    pub finish_time: Option<NaiveTime>,

    #[validate(range(min = 1))]
    pub order_over_line: Option<i32>,

    /// Format: HH:MM:SS
    pub time_penalty: Option<NaiveTime>,

    #[serde(default)]
    pub used_spinnaker: bool,

    #[validate(length(max = 100))]
    pub notes: Option<String>,
}

/// Omitted fields keep their stored value. `finish_time` and
/// `time_penalty` are cleared by an explicit `null`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateResultRequest {
    pub completion_status: Option<CompletionStatus>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "11:02:45")]
    pub finish_time: Option<Option<NaiveTime>>,

    #[validate(range(min = 1))]
    pub order_over_line: Option<i32>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "00:02:00")]
    pub time_penalty: Option<Option<NaiveTime>>,

    pub used_spinnaker: Option<bool>,

    #[validate(length(max = 100))]
    pub notes: Option<String>,
}

/// A result joined with the yacht it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventResultEntry {
    pub result_id: Uuid,
    pub yacht_id: Uuid,
    pub yacht_name: String,
    pub yacht_slug: String,
    pub sail_number: Option<String>,
    pub yacht_class: Option<YachtClass>,
    pub completion_status: CompletionStatus,
    pub finish_time: Option<NaiveTime>,
    pub order_over_line: Option<i32>,
    pub time_penalty: Option<NaiveTime>,
    pub used_spinnaker: bool,
    pub posted_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StandingEntry {
    /// `None` for entries without a posted time
    pub rank: Option<u32>,
    pub entry: EventResultEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecomputeResponse {
    pub event_id: Uuid,
    pub recomputed_count: u64,
}
