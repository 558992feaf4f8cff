//! Chirp body checks and profanity masking.

use crate::error::ValidationError;

pub const MAX_CHIRP_LENGTH: usize = 140;
const MASK: &str = "****";
const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Validate a chirp body and mask banned words
///
/// Words are split on single spaces and compared case-insensitively, so
/// `Fornax!` (with punctuation attached) is left alone.
pub fn clean_chirp(body: &str) -> Result<String, ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyField("body".to_string()));
    }
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::ChirpTooLong(MAX_CHIRP_LENGTH));
    }

    let cleaned = body
        .split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if BANNED_WORDS.contains(&lowered.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    Ok(cleaned)
}
