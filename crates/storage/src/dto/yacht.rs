use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::patch::{nullable, patch};
use super::validation::validate_slug;
use crate::models::{Yacht, YachtClass};

/// Request payload for registering a yacht
///
/// `is_active` is not accepted: it is derived from `phrf_rating` and
/// `yacht_class` on every save.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateYachtRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    /// Derived from the name when omitted
    #[validate(length(min = 1, max = 120))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    pub skipper_id: Option<Uuid>,

    #[validate(length(min = 1, max = 25))]
    pub sail_number: Option<String>,

    #[validate(length(max = 50))]
    pub yacht_type: Option<String>,

    pub yacht_class: Option<YachtClass>,

    pub yacht_club_id: Option<Uuid>,

    #[validate(custom(function = "validate_phrf_rating"))]
    pub phrf_rating: Option<Decimal>,

    pub spinnaker_id: Option<Uuid>,
}

/// Omitted fields keep their stored value. `yacht_class`, `phrf_rating`
/// and `spinnaker_id` are cleared by an explicit `null`; clearing either
/// of the first two takes the yacht out of racing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_rating_change"))]
pub struct UpdateYachtRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub skipper_id: Option<Uuid>,

    #[validate(length(min = 1, max = 25))]
    pub sail_number: Option<String>,

    #[validate(length(max = 50))]
    pub yacht_type: Option<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<YachtClass>)]
    pub yacht_class: Option<Option<YachtClass>>,

    pub yacht_club_id: Option<Uuid>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "150")]
    pub phrf_rating: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub spinnaker_id: Option<Option<Uuid>>,
}

impl UpdateYachtRequest {
    /// Rating and racing class once this update is applied to `existing`
    pub fn handicap_after(&self, existing: &Yacht) -> (Option<Decimal>, Option<YachtClass>) {
        (
            patch(self.phrf_rating, existing.phrf_rating),
            patch(self.yacht_class, existing.yacht_class),
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YachtFilter {
    /// Only yachts with a rating and a racing class
    pub active_only: Option<bool>,
    pub yacht_class: Option<YachtClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct YachtResponse {
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
    pub created_at: NaiveDateTime,
}

impl From<Yacht> for YachtResponse {
    fn from(yacht: Yacht) -> Self {
        Self {
            yacht_id: yacht.yacht_id,
            name: yacht.name,
            slug: yacht.slug,
            skipper_id: yacht.skipper_id,
            sail_number: yacht.sail_number,
            yacht_type: yacht.yacht_type,
            yacht_class: yacht.yacht_class,
            yacht_club_id: yacht.yacht_club_id,
            phrf_rating: yacht.phrf_rating,
            spinnaker_id: yacht.spinnaker_id,
            is_active: yacht.is_active,
            created_at: yacht.created_at,
        }
    }
}

/// Ratings are stored as NUMERIC(4, 1).
fn validate_phrf_rating(rating: &Decimal) -> Result<(), validator::ValidationError> {
    let limit = Decimal::new(9999, 1);

    if rating.scale() <= 1 && rating.abs() <= limit {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_phrf_rating"))
    }
}

fn validate_rating_change(req: &UpdateYachtRequest) -> Result<(), validator::ValidationError> {
    match req.phrf_rating {
        Some(Some(rating)) => validate_phrf_rating(&rating),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateYachtRequest {
        CreateYachtRequest {
            name: "Blue Note".to_string(),
            slug: None,
            skipper_id: None,
            sail_number: Some("CAN 4211".to_string()),
            yacht_type: Some("J/24".to_string()),
            yacht_class: Some(YachtClass::J),
            yacht_club_id: None,
            phrf_rating: Some(Decimal::from(171)),
            spinnaker_id: None,
        }
    }

    #[test]
    fn test_valid_yacht() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_rating_must_fit_column() {
        let too_precise = CreateYachtRequest {
            phrf_rating: Some(Decimal::new(15025, 2)),
            ..request()
        };
        assert!(too_precise.validate().is_err());

        let too_large = CreateYachtRequest {
            phrf_rating: Some(Decimal::from(1000)),
            ..request()
        };
        assert!(too_large.validate().is_err());

        let negative = CreateYachtRequest {
            phrf_rating: Some(Decimal::new(-305, 1)),
            ..request()
        };
        assert!(negative.validate().is_ok());
    }

    fn stored_yacht() -> Yacht {
        let timestamp = chrono::NaiveDate::from_ymd_opt(2022, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Yacht {
            yacht_id: Uuid::new_v4(),
            name: "Blue Note".to_string(),
            slug: "blue-note".to_string(),
            skipper_id: None,
            sail_number: Some("CAN 4211".to_string()),
            yacht_type: Some("J/24".to_string()),
            yacht_class: Some(YachtClass::J),
            yacht_club_id: None,
            phrf_rating: Some(Decimal::from(171)),
            spinnaker_id: Some(Uuid::new_v4()),
            is_active: true,
            is_deleted: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    #[test]
    fn test_update_keeps_omitted_handicap() {
        let req: UpdateYachtRequest = serde_json::from_str(r#"{"yacht_type": "J/24 mod"}"#).unwrap();
        let (rating, class) = req.handicap_after(&stored_yacht());

        assert_eq!(rating, Some(Decimal::from(171)));
        assert_eq!(class, Some(YachtClass::J));
        assert_eq!(req.spinnaker_id, None);
    }

    #[test]
    fn test_update_null_class_deactivates() {
        let req: UpdateYachtRequest =
            serde_json::from_str(r#"{"yacht_class": null, "spinnaker_id": null}"#).unwrap();
        let (rating, class) = req.handicap_after(&stored_yacht());

        assert_eq!(class, None);
        assert!(!Yacht::derive_active(rating, class));
        assert_eq!(patch(req.spinnaker_id, stored_yacht().spinnaker_id), None);
    }

    #[test]
    fn test_update_rating_is_validated() {
        let req: UpdateYachtRequest = serde_json::from_str(r#"{"phrf_rating": "150.25"}"#).unwrap();
        assert!(req.validate().is_err());

        let cleared: UpdateYachtRequest = serde_json::from_str(r#"{"phrf_rating": null}"#).unwrap();
        assert!(cleared.validate().is_ok());
        assert_eq!(cleared.handicap_after(&stored_yacht()).0, None);
    }

    #[test]
    fn test_rejects_unknown_class_code() {
        let json = r#"{"name": "Blue Note", "yacht_class": "Z"}"#;
        assert!(serde_json::from_str::<CreateYachtRequest>(json).is_err());
    }
}
