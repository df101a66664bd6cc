use std::collections::{HashMap, HashSet};

use storage::dto::club::CreateYachtClubRequest;
use storage::dto::series::CreateSeriesRequest;
use storage::dto::spinnaker::CreateSpinnakerRequest;
use storage::dto::yacht::CreateYachtRequest;
use storage::models::{SpinnakerClass, Yacht};
use storage::services::corrected_time::{compute_corrected_time, penalty_duration, CorrectionInput};
use tracing::warn;
use validator::Validate;

use super::FORMAT_VERSION;
use super::models::{CanonicalFixture, EventData, SeriesData, YachtData};
use crate::{ImporterError, Result};

pub struct CanonicalValidator;

impl CanonicalValidator {
    pub fn validate(fixture: &CanonicalFixture) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if fixture.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                fixture.format_version, FORMAT_VERSION
            ));
        }

        let mut club_names = HashSet::new();
        for club in &fixture.clubs {
            if let Err(e) = CreateYachtClubRequest::from(club).validate() {
                report.errors.push(format!("Club '{}': {}", club.name, e));
            }
            if !club_names.insert(club.name.as_str()) {
                report.errors.push(format!("Duplicate club name: '{}'", club.name));
            }
        }

        let mut adjustments = HashMap::new();
        for spinnaker in &fixture.spinnakers {
            let request = CreateSpinnakerRequest {
                class_name: spinnaker.class_name,
                adjustment_value: spinnaker.adjustment_value,
            };
            if let Err(e) = request.validate() {
                report
                    .errors
                    .push(format!("Spinnaker {}: {}", spinnaker.class_name, e));
            }
            if adjustments
                .insert(spinnaker.class_name, spinnaker.adjustment_value)
                .is_some()
            {
                report.errors.push(format!(
                    "Duplicate spinnaker class: {}",
                    spinnaker.class_name
                ));
            }
        }

        let mut yachts = HashMap::new();
        let mut sail_numbers = HashSet::new();
        for yacht in &fixture.yachts {
            Self::validate_yacht(yacht, &club_names, &adjustments, &mut report);

            if yachts.insert(yacht.name.as_str(), yacht).is_some() {
                report.errors.push(format!("Duplicate yacht name: '{}'", yacht.name));
            }
            if let Some(sail_number) = &yacht.sail_number {
                if !sail_numbers.insert(sail_number.as_str()) {
                    report
                        .errors
                        .push(format!("Duplicate sail number: '{}'", sail_number));
                }
            }
        }

        let mut series_names = HashSet::new();
        for series in &fixture.series {
            if !series_names.insert(series.name.as_str()) {
                report
                    .errors
                    .push(format!("Duplicate series name: '{}'", series.name));
            }
            Self::validate_series(series, &yachts, &adjustments, &mut report);
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }

    fn validate_yacht(
        yacht: &YachtData,
        club_names: &HashSet<&str>,
        adjustments: &HashMap<SpinnakerClass, i32>,
        report: &mut ValidationReport,
    ) {
        let request = CreateYachtRequest {
            name: yacht.name.clone(),
            slug: yacht.slug.clone(),
            skipper_id: None,
            sail_number: yacht.sail_number.clone(),
            yacht_type: yacht.yacht_type.clone(),
            yacht_class: yacht.yacht_class,
            yacht_club_id: None,
            phrf_rating: yacht.phrf_rating,
            spinnaker_id: None,
        };
        if let Err(e) = request.validate() {
            report.errors.push(format!("Yacht '{}': {}", yacht.name, e));
        }

        if let Some(club) = &yacht.club {
            if !club_names.contains(club.as_str()) {
                report.warnings.push(format!(
                    "Yacht '{}' references club '{}' which is not in the file; it must already exist",
                    yacht.name, club
                ));
            }
        }
        if let Some(class_name) = yacht.spinnaker {
            if !adjustments.contains_key(&class_name) {
                report.warnings.push(format!(
                    "Yacht '{}' references spinnaker {} which is not in the file; it must already exist",
                    yacht.name, class_name
                ));
            }
        }
        if !Yacht::derive_active(yacht.phrf_rating, yacht.yacht_class) {
            report.warnings.push(format!(
                "Yacht '{}' has no rating or racing class; its results get no posted time",
                yacht.name
            ));
        }
    }

    fn validate_series(
        series: &SeriesData,
        yachts: &HashMap<&str, &YachtData>,
        adjustments: &HashMap<SpinnakerClass, i32>,
        report: &mut ValidationReport,
    ) {
        if let Err(e) = CreateSeriesRequest::from(series).validate() {
            report.errors.push(format!("Series '{}': {}", series.name, e));
        }
        if series.events.is_empty() {
            report
                .warnings
                .push(format!("Series '{}' has no events", series.name));
        }

        let mut dates = HashSet::new();
        for event in &series.events {
            let label = format!("{} {}", series.name, event.event_date);
            if !dates.insert(event.event_date) {
                report.errors.push(format!("Duplicate event: '{}'", label));
            }
            if event.notes.as_ref().is_some_and(|notes| notes.chars().count() > 200) {
                report
                    .errors
                    .push(format!("Event '{}': notes exceed 200 characters", label));
            }
            Self::validate_results(&label, event, yachts, adjustments, report);
        }
    }

    fn validate_results(
        label: &str,
        event: &EventData,
        yachts: &HashMap<&str, &YachtData>,
        adjustments: &HashMap<SpinnakerClass, i32>,
        report: &mut ValidationReport,
    ) {
        let mut entrants = HashSet::new();

        for result in &event.results {
            if !entrants.insert(result.yacht.as_str()) {
                report.errors.push(format!(
                    "Event '{}': yacht '{}' has more than one result",
                    label, result.yacht
                ));
            }
            if result.order_over_line.is_some_and(|order| order < 1) {
                report.errors.push(format!(
                    "Event '{}', yacht '{}': order over line must be >= 1",
                    label, result.yacht
                ));
            }

            let Some(yacht) = yachts.get(result.yacht.as_str()) else {
                report.warnings.push(format!(
                    "Event '{}': yacht '{}' is not in the file; it must already exist",
                    label, result.yacht
                ));
                continue;
            };

            // Only dry-run when every input is known from the file.
            let spinnaker_adjustment = match yacht.spinnaker {
                Some(class_name) => match adjustments.get(&class_name) {
                    Some(adjustment) => Some(*adjustment),
                    None => continue,
                },
                None => None,
            };
            let input = CorrectionInput {
                completion_status: result.completion_status,
                yacht_active: Yacht::derive_active(yacht.phrf_rating, yacht.yacht_class),
                yacht_class: yacht.yacht_class,
                phrf_rating: yacht.phrf_rating,
                used_spinnaker: result.used_spinnaker,
                spinnaker_adjustment,
                class_start_times: event.class_starts(),
                finish_time: result.finish_time,
                time_penalty: result.time_penalty.map(penalty_duration),
            };
            if let Err(e) = compute_corrected_time(&input) {
                report.errors.push(format!(
                    "Event '{}', yacht '{}': {}",
                    label, result.yacht, e
                ));
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}
