//! Slugs for public URLs.
//!
//! Menu-side categories get a random suffix mixed into the slug so that two
//! rows with the same display name never share a URL. Gallery categories use
//! the bare name and are recomputed on every save.

use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

pub const SEPARATOR: char = '-';
const TOKEN_LEN: usize = 6;

static NON_ALPHANUMERIC_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// Lowercases `value`, collapses every run of non-alphanumeric characters
/// into a single separator and trims separators from both ends.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    NON_ALPHANUMERIC_RUNS
        .replace_all(&lowered, SEPARATOR.to_string().as_str())
        .trim_matches(SEPARATOR)
        .to_string()
}

/// Slug for `name`, with `token` appended before slugifying when present.
pub fn derive_slug(name: &str, token: Option<&str>) -> String {
    match token {
        Some(token) => slugify(&format!("{name}{SEPARATOR}{token}")),
        None => slugify(name),
    }
}

/// Short random lowercase alphanumeric suffix.
pub fn uniqueness_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(|byte| (byte as char).to_ascii_lowercase())
        .collect()
}

/// Slug for a menu category or subcategory: always suffixed.
pub fn unique_slug(name: &str) -> String {
    derive_slug(name, Some(&uniqueness_token()))
}

pub fn is_slug(value: &str) -> bool {
    !value.is_empty() && slugify(value) == value
}

pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if is_slug(value) {
        Ok(())
    } else {
        Err(ValidationError::new("slug"))
    }
}

/// Form field helper: a missing, null or blank slug means "generate one".
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let slug = Option::<String>::deserialize(deserializer)?;
    Ok(slug.filter(|slug| !slug.trim().is_empty()))
}

/// Names must leave something behind once slugified.
pub fn validate_sluggable(value: &str) -> Result<(), ValidationError> {
    if slugify(value).is_empty() {
        Err(ValidationError::new("sluggable"))
    } else {
        Ok(())
    }
}
