use storage::{
    dto::handicap::{ComputeCorrectedTimeRequest, ComputeCorrectedTimeResponse},
    services::corrected_time::{
        compute_corrected_time, effective_rating, time_correction_factor, CorrectionInput,
        CorrectionResult,
    },
};

/// Corrected time for an entry described entirely by the request.
///
/// The rating and factor are only reported when a posted time is produced.
pub fn compute(request: &ComputeCorrectedTimeRequest) -> CorrectionResult<ComputeCorrectedTimeResponse> {
    let input = CorrectionInput::from(request);
    let posted_time = compute_corrected_time(&input)?;

    let (effective, factor) = match (posted_time, input.phrf_rating) {
        (Some(_), Some(rating)) => {
            let effective =
                effective_rating(rating, input.used_spinnaker, input.spinnaker_adjustment)?;
            (Some(effective), Some(time_correction_factor(effective)?))
        }
        _ => (None, None),
    };

    Ok(ComputeCorrectedTimeResponse {
        posted_time,
        effective_rating: effective,
        time_correction_factor: factor,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use storage::{
        models::{CompletionStatus, YachtClass},
        services::corrected_time::{ClassStartTimes, CorrectionError},
    };

    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn class_a_request() -> ComputeCorrectedTimeRequest {
        ComputeCorrectedTimeRequest {
            completion_status: CompletionStatus::Completed,
            yacht_active: true,
            yacht_class: Some(YachtClass::A),
            phrf_rating: Some(Decimal::from(150)),
            used_spinnaker: false,
            spinnaker_adjustment: None,
            class_start_times: ClassStartTimes {
                a: Some(hms(18, 0, 0)),
                ..ClassStartTimes::default()
            },
            finish_time: Some(hms(19, 0, 0)),
            time_penalty: None,
        }
    }

    #[test]
    fn test_compute_reports_rating_and_factor() {
        let response = compute(&class_a_request()).unwrap();

        assert_eq!(response.posted_time, Some(hms(0, 58, 12)));
        assert_eq!(response.effective_rating, Some(Decimal::from(150)));
        let factor = response.time_correction_factor.unwrap();
        assert_eq!(factor.round_dp(4), Decimal::new(9701, 4));
    }

    #[test]
    fn test_compute_not_applicable_has_no_factor() {
        let mut request = class_a_request();
        request.completion_status = CompletionStatus::DidNotComplete;

        let response = compute(&request).unwrap();
        assert_eq!(response.posted_time, None);
        assert_eq!(response.effective_rating, None);
        assert_eq!(response.time_correction_factor, None);
    }

    #[test]
    fn test_compute_spinnaker_adjusts_rating() {
        let mut request = class_a_request();
        request.used_spinnaker = true;
        request.spinnaker_adjustment = Some(6);

        let response = compute(&request).unwrap();
        assert_eq!(response.effective_rating, Some(Decimal::from(144)));
        assert_eq!(response.posted_time, Some(hms(0, 58, 44)));
    }

    #[test]
    fn test_compute_propagates_domain_error() {
        let mut request = class_a_request();
        request.phrf_rating = Some(Decimal::from(-520));

        assert!(matches!(compute(&request), Err(CorrectionError::Domain(_))));
    }
}
