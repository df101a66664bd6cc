use serde::{Deserialize, Deserializer};

/// Deserializer for update fields that may be cleared. Paired with
/// `#[serde(default)]`: a missing key stays `None` (keep the stored value)
/// while an explicit `null` becomes `Some(None)` (clear it).
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a clearable update field on top of the stored value
pub fn patch<T>(update: Option<Option<T>>, existing: Option<T>) -> Option<T> {
    update.unwrap_or(existing)
}
