use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::YachtClass;

/// Request payload for scheduling an event. Start times are per racing
/// class; class A1 sails on the A start.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    pub series_id: Uuid,
    pub event_date: NaiveDate,
    pub first_flag_a: Option<NaiveTime>,
    pub first_flag_b: Option<NaiveTime>,
    pub first_flag_c: Option<NaiveTime>,
    pub start_a: Option<NaiveTime>,
    pub start_b: Option<NaiveTime>,
    pub start_c: Option<NaiveTime>,
    pub start_j: Option<NaiveTime>,

    #[validate(length(max = 200))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    pub event_date: Option<NaiveDate>,
    pub first_flag_a: Option<NaiveTime>,
    pub first_flag_b: Option<NaiveTime>,
    pub first_flag_c: Option<NaiveTime>,
    pub start_a: Option<NaiveTime>,
    pub start_b: Option<NaiveTime>,
    pub start_c: Option<NaiveTime>,
    pub start_j: Option<NaiveTime>,

    #[validate(length(max = 200))]
    pub notes: Option<String>,
}

impl UpdateEventRequest {
    /// Posted times depend on start times, so changing one means the
    /// event's results must be recomputed.
    pub fn changes_start_times(&self) -> bool {
        self.start_a.is_some() || self.start_b.is_some() || self.start_c.is_some() || self.start_j.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StandingsFilter {
    /// Restrict to one start group (A and A1 rank together)
    pub yacht_class: Option<YachtClass>,
}
