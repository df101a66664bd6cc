use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CompletionStatus, YachtClass};
use crate::services::corrected_time::{ClassStartTimes, CorrectionInput, penalty_duration};

/// Stand-alone corrected time computation, without any stored records.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComputeCorrectedTimeRequest {
    #[serde(default)]
    pub completion_status: CompletionStatus,

    #[serde(default = "default_yacht_active")]
    pub yacht_active: bool,

    pub yacht_class: Option<YachtClass>,
    pub phrf_rating: Option<Decimal>,

    #[serde(default)]
    pub used_spinnaker: bool,

    pub spinnaker_adjustment: Option<i32>,

    #[serde(default)]
    pub class_start_times: ClassStartTimes,

    /// Format: HH:MM:SS
    pub finish_time: Option<NaiveTime>,

    /// Format: HH:MM:SS
    pub time_penalty: Option<NaiveTime>,
}

impl From<&ComputeCorrectedTimeRequest> for CorrectionInput {
    fn from(req: &ComputeCorrectedTimeRequest) -> Self {
        CorrectionInput {
            completion_status: req.completion_status,
            yacht_active: req.yacht_active,
            yacht_class: req.yacht_class,
            phrf_rating: req.phrf_rating,
            used_spinnaker: req.used_spinnaker,
            spinnaker_adjustment: req.spinnaker_adjustment,
            class_start_times: req.class_start_times,
            finish_time: req.finish_time,
            time_penalty: req.time_penalty.map(penalty_duration),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComputeCorrectedTimeResponse {
    /// `None` when the entry does not qualify (not completed or inactive yacht)
    pub posted_time: Option<NaiveTime>,
    pub effective_rating: Option<Decimal>,
    pub time_correction_factor: Option<Decimal>,
}

fn default_yacht_active() -> bool {
    true
}
