use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSeriesRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[validate(range(min = 1000, max = 9999, message = "Use a four digit year, e.g. 2022"))]
    pub year: Option<i32>,

    #[serde(default = "default_is_current")]
    pub is_current: bool,

    #[validate(length(max = 500, message = "Maximum 500 characters"))]
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSeriesRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(range(min = 1000, max = 9999, message = "Use a four digit year, e.g. 2022"))]
    pub year: Option<i32>,

    pub is_current: Option<bool>,

    #[validate(length(max = 500, message = "Maximum 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeriesFilter {
    pub year: Option<i32>,
    /// Only series flagged as the current season
    pub current_only: Option<bool>,
}

fn default_is_current() -> bool {
    true
}
