use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::SpinnakerClass;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSpinnakerRequest {
    pub class_name: SpinnakerClass,

    #[validate(range(min = -999, max = 999))]
    pub adjustment_value: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSpinnakerRequest {
    #[validate(range(min = -999, max = 999))]
    pub adjustment_value: i32,
}
