use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Racing class of a yacht. Each class owns a start in an event, except
/// `A1` which starts together with `A`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "yacht_class")]
pub enum YachtClass {
    A,
    A1,
    B,
    C,
    J,
}

impl YachtClass {
    pub fn code(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::A1 => "A1",
            Self::B => "B",
            Self::C => "C",
            Self::J => "J",
        }
    }

    /// The class whose start signal this class sails on.
    pub fn start_group(&self) -> YachtClass {
        match self {
            Self::A | Self::A1 => Self::A,
            other => *other,
        }
    }
}

impl fmt::Display for YachtClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How a yacht's race ended. Only `Completed` results get a posted time.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    sqlx::Type,
)]
#[sqlx(type_name = "completion_status")]
pub enum CompletionStatus {
    #[default]
    #[serde(rename = "CMP")]
    #[sqlx(rename = "CMP")]
    Completed,
    #[serde(rename = "DNC")]
    #[sqlx(rename = "DNC")]
    DidNotComplete,
    #[serde(rename = "DSQ")]
    #[sqlx(rename = "DSQ")]
    Disqualified,
}

impl CompletionStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Completed => "CMP",
            Self::DidNotComplete => "DNC",
            Self::Disqualified => "DSQ",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "spinnaker_class")]
pub enum SpinnakerClass {
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
}

impl SpinnakerClass {
    pub fn code(&self) -> &'static str {
        match self {
            Self::S0 => "S0",
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::S3 => "S3",
            Self::S4 => "S4",
            Self::S5 => "S5",
        }
    }
}

impl fmt::Display for SpinnakerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a1_starts_with_a() {
        assert_eq!(YachtClass::A1.start_group(), YachtClass::A);
        assert_eq!(YachtClass::A.start_group(), YachtClass::A);
        assert_eq!(YachtClass::J.start_group(), YachtClass::J);
    }

    #[test]
    fn test_display_uses_codes() {
        assert_eq!(YachtClass::A1.to_string(), "A1");
        assert_eq!(CompletionStatus::Disqualified.to_string(), "DSQ");
        assert_eq!(SpinnakerClass::S3.to_string(), "S3");
    }

    #[test]
    fn test_completion_status_wire_codes() {
        let json = serde_json::to_string(&CompletionStatus::DidNotComplete).unwrap();
        assert_eq!(json, "\"DNC\"");

        let status: CompletionStatus = serde_json::from_str("\"CMP\"").unwrap();
        assert_eq!(status, CompletionStatus::Completed);
        assert_eq!(CompletionStatus::default(), CompletionStatus::Completed);
    }

    #[test]
    fn test_yacht_class_wire_codes() {
        let class: YachtClass = serde_json::from_str("\"A1\"").unwrap();
        assert_eq!(class, YachtClass::A1);
        assert!(serde_json::from_str::<YachtClass>("\"Z\"").is_err());
    }
}
