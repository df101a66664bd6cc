use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validation::{validate_postal_code, validate_slug};
use crate::models::YachtClub;

/// Request payload for registering a yacht club
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateYachtClubRequest {
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

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub street_name: Option<String>,

    #[validate(length(max = 10))]
    pub street_number: Option<String>,

    #[validate(custom(function = "validate_postal_code"))]
    pub postal_code: Option<String>,

    #[validate(length(max = 100))]
    pub contact_first_name: Option<String>,

    #[validate(length(max = 100))]
    pub contact_last_name: Option<String>,

    #[validate(email, length(max = 100))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateYachtClubRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub street_name: Option<String>,

    #[validate(length(max = 10))]
    pub street_number: Option<String>,

    #[validate(custom(function = "validate_postal_code"))]
    pub postal_code: Option<String>,

    #[validate(length(max = 100))]
    pub contact_first_name: Option<String>,

    #[validate(length(max = 100))]
    pub contact_last_name: Option<String>,

    #[validate(email, length(max = 100))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct YachtClubResponse {
    pub yacht_club_id: Uuid,
    pub name: String,
    pub slug: String,
    pub city: Option<String>,
    pub street_name: Option<String>,
    pub street_number: Option<String>,
    pub postal_code: Option<String>,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub email: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<YachtClub> for YachtClubResponse {
    fn from(club: YachtClub) -> Self {
        Self {
            yacht_club_id: club.yacht_club_id,
            name: club.name,
            slug: club.slug,
            city: club.city,
            street_name: club.street_name,
            street_number: club.street_number,
            postal_code: club.postal_code,
            contact_first_name: club.contact_first_name,
            contact_last_name: club.contact_last_name,
            email: club.email,
            created_at: club.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateYachtClubRequest {
        CreateYachtClubRequest {
            name: "Shediac Bay Yacht Club".to_string(),
            slug: None,
            city: Some("Shediac".to_string()),
            street_name: None,
            street_number: None,
            postal_code: Some("E4P 2G8".to_string()),
            contact_first_name: None,
            contact_last_name: None,
            email: Some("commodore@example.org".to_string()),
        }
    }

    #[test]
    fn test_valid_club() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_invalid_postal_code_and_email() {
        let req = CreateYachtClubRequest {
            postal_code: Some("ZZZ".to_string()),
            email: Some("not-an-email".to_string()),
            ..request()
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("postal_code"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_invalid_slug() {
        let req = CreateYachtClubRequest {
            slug: Some("Not A Slug".to_string()),
            ..request()
        };
        assert!(req.validate().is_err());
    }
}
