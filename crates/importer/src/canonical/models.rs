use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storage::dto::club::CreateYachtClubRequest;
use storage::dto::series::CreateSeriesRequest;
use storage::models::{CompletionStatus, SpinnakerClass, YachtClass};
use storage::services::corrected_time::ClassStartTimes;

/// A racing fixture: clubs, spinnaker classes, yachts and a number of series
/// with their events and results. Entities reference each other by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalFixture {
    pub format_version: String,
    #[serde(default)]
    pub clubs: Vec<ClubData>,
    #[serde(default)]
    pub spinnakers: Vec<SpinnakerData>,
    #[serde(default)]
    pub yachts: Vec<YachtData>,
    #[serde(default)]
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&ClubData> for CreateYachtClubRequest {
    fn from(club: &ClubData) -> Self {
        CreateYachtClubRequest {
            name: club.name.clone(),
            slug: club.slug.clone(),
            city: club.city.clone(),
            street_name: club.street_name.clone(),
            street_number: club.street_number.clone(),
            postal_code: club.postal_code.clone(),
            contact_first_name: club.contact_first_name.clone(),
            contact_last_name: club.contact_last_name.clone(),
            email: club.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinnakerData {
    pub class_name: SpinnakerClass,
    pub adjustment_value: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YachtData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sail_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yacht_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yacht_class: Option<YachtClass>,
    /// Club name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrf_rating: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spinnaker: Option<SpinnakerClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default = "default_is_current")]
    pub is_current: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub events: Vec<EventData>,
}

impl From<&SeriesData> for CreateSeriesRequest {
    fn from(series: &SeriesData) -> Self {
        CreateSeriesRequest {
            name: series.name.clone(),
            year: series.year,
            is_current: series.is_current,
            notes: series.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    pub event_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_flag_a: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_flag_b: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_flag_c: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_a: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_b: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_c: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_j: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub results: Vec<ResultData>,
}

impl EventData {
    pub fn class_starts(&self) -> ClassStartTimes {
        ClassStartTimes {
            a: self.start_a,
            b: self.start_b,
            c: self.start_c,
            j: self.start_j,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultData {
    /// Yacht name
    pub yacht: String,
    #[serde(default)]
    pub completion_status: CompletionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_over_line: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_penalty: Option<NaiveTime>,
    #[serde(default)]
    pub used_spinnaker: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_is_current() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_fixture() {
        let fixture: CanonicalFixture = serde_json::from_str(
            r#"{
                "format_version": "1.0.0",
                "yachts": [
                    { "name": "Blue Heron", "yacht_class": "A1", "phrf_rating": "162.5", "spinnaker": "S2" }
                ],
                "series": [
                    {
                        "name": "Wednesday Nights",
                        "events": [
                            {
                                "event_date": "2022-06-01",
                                "start_a": "18:30:00",
                                "results": [
                                    { "yacht": "Blue Heron", "finish_time": "19:41:07", "used_spinnaker": true },
                                    { "yacht": "Other", "completion_status": "DNC" }
                                ]
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert!(fixture.clubs.is_empty());
        assert_eq!(fixture.yachts[0].yacht_class, Some(YachtClass::A1));
        assert_eq!(fixture.yachts[0].phrf_rating, Some(Decimal::new(1625, 1)));

        let series = &fixture.series[0];
        assert!(series.is_current);
        let event = &series.events[0];
        assert_eq!(event.class_starts().start_for(YachtClass::A1), event.start_a);
        assert_eq!(event.results[0].completion_status, CompletionStatus::Completed);
        assert_eq!(event.results[1].completion_status, CompletionStatus::DidNotComplete);
    }
}
