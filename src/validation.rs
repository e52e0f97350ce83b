//! Uniqname sanitizing and validation
//!
//! Run on every username a host types before it is resolved against the
//! user directory, so malformed input never reaches the network.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::{ApiError, User};

/// A letter followed by 2-7 letters or digits
static UNIQNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]{2,7}$").expect("uniqname pattern is valid"));

/// Trim surrounding whitespace and lowercase
pub fn sanitize_uniqname(input: &str) -> String {
    input.trim().to_lowercase()
}

pub fn invalid_uniqname_message(uniqname: &str) -> String {
    format!(
        "\"{}\" is not a known user. Check the uniqname and make sure they have logged in at least once.",
        uniqname
    )
}

/// Check the shape of an already sanitized uniqname
pub fn validate_uniqname(uniqname: &str) -> Result<(), ApiError> {
    if UNIQNAME_PATTERN.is_match(uniqname) {
        Ok(())
    } else {
        Err(ApiError::Validation(invalid_uniqname_message(uniqname)))
    }
}

/// Sanitize, validate and look the uniqname up in the user directory
pub fn resolve_uniqname<'a>(input: &str, users: &'a [User]) -> Result<&'a User, ApiError> {
    let uniqname = sanitize_uniqname(input);
    validate_uniqname(&uniqname)?;
    users
        .iter()
        .find(|u| u.username == uniqname)
        .ok_or_else(|| ApiError::Validation(invalid_uniqname_message(&uniqname)))
}
