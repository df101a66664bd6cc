//! PHRF time-on-time correction.
//!
//! Corrected time = elapsed time × 650 / (520 + effective rating), where the
//! effective rating is the yacht's PHRF rating minus its spinnaker class
//! adjustment when a spinnaker was flown. Fractional seconds are truncated.

use chrono::{NaiveTime, TimeDelta, Timelike};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{CompletionStatus, YachtClass};

const FACTOR_NUMERATOR: i64 = 650;
const FACTOR_BASE: i64 = 520;
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectionError {
    /// A value needed to correct a completed, active entry is missing or unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The handicap configuration cannot produce a valid corrected time.
    #[error("Invalid handicap: {0}")]
    Domain(String),
}

pub type CorrectionResult<T> = std::result::Result<T, CorrectionError>;

/// Start signal of each class in an event. `A1` sails on the `A` start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassStartTimes {
    pub a: Option<NaiveTime>,
    pub b: Option<NaiveTime>,
    pub c: Option<NaiveTime>,
    pub j: Option<NaiveTime>,
}

impl ClassStartTimes {
    pub fn start_for(&self, class: YachtClass) -> Option<NaiveTime> {
        match class {
            YachtClass::A | YachtClass::A1 => self.a,
            YachtClass::B => self.b,
            YachtClass::C => self.c,
            YachtClass::J => self.j,
        }
    }
}

/// Everything the correction needs about one result, its yacht and its event.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionInput {
    pub completion_status: CompletionStatus,
    pub yacht_active: bool,
    pub yacht_class: Option<YachtClass>,
    pub phrf_rating: Option<Decimal>,
    pub used_spinnaker: bool,
    pub spinnaker_adjustment: Option<i32>,
    pub class_start_times: ClassStartTimes,
    pub finish_time: Option<NaiveTime>,
    pub time_penalty: Option<TimeDelta>,
}

/// Computes the corrected (posted) time of a result.
///
/// Returns `Ok(None)` when the result does not qualify for a corrected time:
/// the yacht did not complete the race, or the yacht is not active.
pub fn compute_corrected_time(input: &CorrectionInput) -> CorrectionResult<Option<NaiveTime>> {
    if input.completion_status != CompletionStatus::Completed || !input.yacht_active {
        return Ok(None);
    }

    let class = input
        .yacht_class
        .ok_or_else(|| CorrectionError::InvalidInput("yacht has no racing class".to_string()))?;
    let start = input.class_start_times.start_for(class).ok_or_else(|| {
        CorrectionError::InvalidInput(format!("event has no start time for class {}", class))
    })?;
    let finish = input
        .finish_time
        .ok_or_else(|| CorrectionError::InvalidInput("finish time is required".to_string()))?;
    let rating = input
        .phrf_rating
        .ok_or_else(|| CorrectionError::InvalidInput("yacht has no PHRF rating".to_string()))?;

    let effective =
        effective_rating(rating, input.used_spinnaker, input.spinnaker_adjustment)?;

    let penalty = match input.time_penalty {
        Some(penalty) if penalty < TimeDelta::zero() => {
            return Err(CorrectionError::InvalidInput(
                "time penalty cannot be negative".to_string(),
            ));
        }
        Some(penalty) => penalty.num_seconds(),
        None => 0,
    };

    let elapsed = seconds_since_midnight(finish) - seconds_since_midnight(start) + penalty;
    if elapsed < 0 {
        return Err(CorrectionError::InvalidInput(format!(
            "finish time {} precedes class {} start {}",
            finish, class, start
        )));
    }

    let corrected = corrected_seconds(elapsed, effective)?;

    to_time_of_day(corrected).map(Some)
}

/// Rating after the spinnaker adjustment, when a spinnaker was used.
pub fn effective_rating(
    phrf_rating: Decimal,
    used_spinnaker: bool,
    spinnaker_adjustment: Option<i32>,
) -> CorrectionResult<Decimal> {
    if !used_spinnaker {
        return Ok(phrf_rating);
    }

    let adjustment = spinnaker_adjustment.ok_or_else(|| {
        CorrectionError::InvalidInput(
            "spinnaker used but yacht has no spinnaker class".to_string(),
        )
    })?;

    phrf_rating
        .checked_sub(Decimal::from(adjustment))
        .ok_or_else(|| CorrectionError::Domain("effective rating overflows".to_string()))
}

/// `650 / (520 + effective_rating)`.
pub fn time_correction_factor(effective_rating: Decimal) -> CorrectionResult<Decimal> {
    let denominator = factor_denominator(effective_rating)?;

    Decimal::from(FACTOR_NUMERATOR)
        .checked_div(denominator)
        .ok_or_else(|| CorrectionError::Domain("correction factor overflows".to_string()))
}

/// Elapsed seconds scaled by the correction factor, before truncation.
///
/// Multiplies before dividing so that exact results stay exact.
pub fn corrected_seconds(elapsed_seconds: i64, effective_rating: Decimal) -> CorrectionResult<Decimal> {
    let denominator = factor_denominator(effective_rating)?;

    Decimal::from(elapsed_seconds)
        .checked_mul(Decimal::from(FACTOR_NUMERATOR))
        .and_then(|scaled| scaled.checked_div(denominator))
        .ok_or_else(|| CorrectionError::Domain("corrected time overflows".to_string()))
}

fn factor_denominator(effective_rating: Decimal) -> CorrectionResult<Decimal> {
    let denominator = Decimal::from(FACTOR_BASE)
        .checked_add(effective_rating)
        .ok_or_else(|| CorrectionError::Domain("effective rating overflows".to_string()))?;

    if denominator <= Decimal::ZERO {
        return Err(CorrectionError::Domain(format!(
            "{} + {} must be positive",
            FACTOR_BASE, effective_rating
        )));
    }

    Ok(denominator)
}

pub fn seconds_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

/// Reads a penalty stored as an `HH:MM:SS` time-of-day as a duration.
pub fn penalty_duration(penalty: NaiveTime) -> TimeDelta {
    TimeDelta::seconds(seconds_since_midnight(penalty))
}

/// Truncates toward zero and renders the duration as a time-of-day.
fn to_time_of_day(seconds: Decimal) -> CorrectionResult<NaiveTime> {
    let whole = seconds
        .trunc()
        .to_i64()
        .ok_or_else(|| CorrectionError::Domain("corrected time overflows".to_string()))?;

    if !(0..SECONDS_PER_DAY).contains(&whole) {
        return Err(CorrectionError::Domain(format!(
            "corrected time of {} seconds does not fit in a day",
            whole
        )));
    }

    NaiveTime::from_num_seconds_from_midnight_opt(whole as u32, 0).ok_or_else(|| {
        CorrectionError::Domain(format!("corrected time of {} seconds is not a time of day", whole))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn starts() -> ClassStartTimes {
        ClassStartTimes {
            a: Some(hms(10, 0, 0)),
            b: Some(hms(10, 5, 0)),
            c: Some(hms(10, 10, 0)),
            j: Some(hms(10, 15, 0)),
        }
    }

    fn completed_entry() -> CorrectionInput {
        CorrectionInput {
            completion_status: CompletionStatus::Completed,
            yacht_active: true,
            yacht_class: Some(YachtClass::A),
            phrf_rating: Some(Decimal::from(150)),
            used_spinnaker: false,
            spinnaker_adjustment: None,
            class_start_times: starts(),
            finish_time: Some(hms(11, 0, 0)),
            time_penalty: None,
        }
    }

    #[test]
    fn test_one_hour_at_rating_150() {
        // 3600 * 650 / 670 = 3492.537..., truncated to 00:58:12
        let corrected = compute_corrected_time(&completed_entry()).unwrap();
        assert_eq!(corrected, Some(hms(0, 58, 12)));
    }

    #[test]
    fn test_truncates_fractional_seconds() {
        let exact = corrected_seconds(3600, Decimal::from(150)).unwrap();
        assert!(exact > Decimal::from(3492) && exact < Decimal::from(3493));
        assert!(exact.fract() > Decimal::new(5, 1));

        // Rounding would give 00:58:13
        let corrected = compute_corrected_time(&completed_entry()).unwrap().unwrap();
        assert_eq!(corrected.second(), 12);
    }

    #[test]
    fn test_not_completed_has_no_posted_time() {
        for status in [CompletionStatus::DidNotComplete, CompletionStatus::Disqualified] {
            let input = CorrectionInput {
                completion_status: status,
                ..completed_entry()
            };
            assert_eq!(compute_corrected_time(&input), Ok(None));
        }
    }

    #[test]
    fn test_inactive_yacht_has_no_posted_time() {
        let input = CorrectionInput {
            yacht_active: false,
            ..completed_entry()
        };
        assert_eq!(compute_corrected_time(&input), Ok(None));
    }

    #[test]
    fn test_not_applicable_skips_input_checks() {
        let input = CorrectionInput {
            completion_status: CompletionStatus::DidNotComplete,
            finish_time: None,
            phrf_rating: None,
            class_start_times: ClassStartTimes::default(),
            ..completed_entry()
        };
        assert_eq!(compute_corrected_time(&input), Ok(None));
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let input = CorrectionInput {
            used_spinnaker: true,
            spinnaker_adjustment: Some(12),
            time_penalty: Some(TimeDelta::seconds(45)),
            ..completed_entry()
        };
        assert_eq!(compute_corrected_time(&input), compute_corrected_time(&input));
    }

    #[test]
    fn test_spinnaker_lowers_rating_and_raises_corrected_time() {
        let rating = effective_rating(Decimal::from(150), true, Some(18)).unwrap();
        assert_eq!(rating, Decimal::from(132));

        let with = time_correction_factor(rating).unwrap();
        let without = time_correction_factor(Decimal::from(150)).unwrap();
        assert!(with > without);

        let input = CorrectionInput {
            used_spinnaker: true,
            spinnaker_adjustment: Some(18),
            ..completed_entry()
        };
        // 3600 * 650 / 652 = 3588.95...
        assert_eq!(compute_corrected_time(&input), Ok(Some(hms(0, 59, 48))));
    }

    #[test]
    fn test_spinnaker_adjustment_ignored_without_spinnaker() {
        let rating = effective_rating(Decimal::from(150), false, Some(18)).unwrap();
        assert_eq!(rating, Decimal::from(150));
    }

    #[test]
    fn test_spinnaker_without_class_is_invalid_input() {
        let input = CorrectionInput {
            used_spinnaker: true,
            spinnaker_adjustment: None,
            ..completed_entry()
        };
        assert!(matches!(
            compute_corrected_time(&input),
            Err(CorrectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_penalty_adds_penalty_times_factor() {
        let factor = time_correction_factor(Decimal::from(150)).unwrap();
        let base = corrected_seconds(3600, Decimal::from(150)).unwrap();
        let penalized = corrected_seconds(3660, Decimal::from(150)).unwrap();

        let difference = penalized - base;
        let expected = Decimal::from(60) * factor;
        assert!((difference - expected).abs() < Decimal::new(1, 20));
    }

    #[test]
    fn test_penalty_exact_at_rating_zero() {
        // factor 650 / 520 = 1.25 exactly
        let base = corrected_seconds(3600, Decimal::ZERO).unwrap();
        let penalized = corrected_seconds(3660, Decimal::ZERO).unwrap();
        assert_eq!(penalized - base, Decimal::from(75));

        let input = CorrectionInput {
            phrf_rating: Some(Decimal::ZERO),
            time_penalty: Some(TimeDelta::seconds(60)),
            ..completed_entry()
        };
        // 3660 * 1.25 = 4575 s
        assert_eq!(compute_corrected_time(&input), Ok(Some(hms(1, 16, 15))));
    }

    #[test]
    fn test_penalty_read_from_time_of_day() {
        assert_eq!(penalty_duration(hms(0, 1, 30)), TimeDelta::seconds(90));

        let input = CorrectionInput {
            time_penalty: Some(penalty_duration(hms(0, 1, 0))),
            ..completed_entry()
        };
        // 3660 * 650 / 670 = 3550.74...
        assert_eq!(compute_corrected_time(&input), Ok(Some(hms(0, 59, 10))));
    }

    #[test]
    fn test_rating_130_leaves_elapsed_unchanged() {
        assert_eq!(time_correction_factor(Decimal::from(130)).unwrap(), Decimal::ONE);

        let input = CorrectionInput {
            phrf_rating: Some(Decimal::from(130)),
            ..completed_entry()
        };
        assert_eq!(compute_corrected_time(&input), Ok(Some(hms(1, 0, 0))));
    }

    #[test]
    fn test_decimal_rating_not_truncated() {
        // 3600 * 650 / 650.5 = 3597.23...; truncating the rating to 130 would give 01:00:00
        let input = CorrectionInput {
            phrf_rating: Some(Decimal::new(1305, 1)),
            ..completed_entry()
        };
        assert_eq!(compute_corrected_time(&input), Ok(Some(hms(0, 59, 57))));
    }

    #[test]
    fn test_a_and_a1_share_start() {
        let starts = starts();
        assert_eq!(starts.start_for(YachtClass::A), starts.start_for(YachtClass::A1));

        let a = compute_corrected_time(&completed_entry()).unwrap();
        let a1 = compute_corrected_time(&CorrectionInput {
            yacht_class: Some(YachtClass::A1),
            ..completed_entry()
        })
        .unwrap();
        assert_eq!(a, a1);
    }

    #[test]
    fn test_each_class_uses_own_start() {
        let starts = starts();
        assert_eq!(starts.start_for(YachtClass::B), Some(hms(10, 5, 0)));
        assert_eq!(starts.start_for(YachtClass::C), Some(hms(10, 10, 0)));
        assert_eq!(starts.start_for(YachtClass::J), Some(hms(10, 15, 0)));

        let input = CorrectionInput {
            yacht_class: Some(YachtClass::J),
            phrf_rating: Some(Decimal::from(130)),
            ..completed_entry()
        };
        assert_eq!(compute_corrected_time(&input), Ok(Some(hms(0, 45, 0))));
    }

    #[test]
    fn test_missing_class_start_is_invalid_input() {
        let input = CorrectionInput {
            yacht_class: Some(YachtClass::C),
            class_start_times: ClassStartTimes {
                c: None,
                ..starts()
            },
            ..completed_entry()
        };
        assert!(matches!(
            compute_corrected_time(&input),
            Err(CorrectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_inputs_are_invalid_input() {
        let cases = [
            CorrectionInput {
                finish_time: None,
                ..completed_entry()
            },
            CorrectionInput {
                phrf_rating: None,
                ..completed_entry()
            },
            CorrectionInput {
                yacht_class: None,
                ..completed_entry()
            },
        ];

        for input in cases {
            assert!(matches!(
                compute_corrected_time(&input),
                Err(CorrectionError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_finish_before_start_is_invalid_input() {
        let input = CorrectionInput {
            finish_time: Some(hms(9, 59, 59)),
            ..completed_entry()
        };
        assert!(matches!(
            compute_corrected_time(&input),
            Err(CorrectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_positive_denominator_is_domain_error() {
        assert!(matches!(
            time_correction_factor(Decimal::from(-520)),
            Err(CorrectionError::Domain(_))
        ));
        assert!(matches!(
            corrected_seconds(3600, Decimal::from(-600)),
            Err(CorrectionError::Domain(_))
        ));

        let input = CorrectionInput {
            phrf_rating: Some(Decimal::from(-500)),
            used_spinnaker: true,
            spinnaker_adjustment: Some(20),
            ..completed_entry()
        };
        assert!(matches!(
            compute_corrected_time(&input),
            Err(CorrectionError::Domain(_))
        ));
    }

    #[test]
    fn test_negative_rating_allowed_while_denominator_positive() {
        let input = CorrectionInput {
            phrf_rating: Some(Decimal::from(-195)),
            ..completed_entry()
        };
        // 3600 * 650 / 325 = 7200 s
        assert_eq!(compute_corrected_time(&input), Ok(Some(hms(2, 0, 0))));
    }

    #[test]
    fn test_corrected_time_past_midnight_is_domain_error() {
        let input = CorrectionInput {
            phrf_rating: Some(Decimal::from(-515)),
            finish_time: Some(hms(23, 0, 0)),
            ..completed_entry()
        };
        assert!(matches!(
            compute_corrected_time(&input),
            Err(CorrectionError::Domain(_))
        ));
    }
}
