use validator::ValidationError;

use crate::slug::is_valid_slug;

const POSTAL_FIRST: &str = "ABCEGHJKLMNPRSTVXY";
const POSTAL_LETTER: &str = "ABCEGHJKLMNPRSTVWXYZ";

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_slug"))
    }
}

/// Accepts a five digit US ZIP code or a Canadian postal code (`A1A 1A1`,
/// spaces and case ignored).
pub fn validate_postal_code(postal_code: &str) -> Result<(), ValidationError> {
    let normalized: Vec<char> = postal_code
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let is_valid = match normalized.len() {
        5 => normalized.iter().all(|c| c.is_ascii_digit()),
        6 => normalized.iter().enumerate().all(|(i, c)| match i {
            0 => POSTAL_FIRST.contains(*c),
            1 | 3 | 5 => c.is_ascii_digit(),
            _ => POSTAL_LETTER.contains(*c),
        }),
        _ => false,
    };

    if is_valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_postal_code");
        error.message = Some(format!("Invalid postal or zip code: {}", postal_code).into());
        Err(error)
    }
}
