//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every service enforces the same rules on names, codes and
//! search keys.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Trim a required name and reject empty values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text, mapping blank strings to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Lower-case, accent-folded key used for case-insensitive search.
///
/// `"São Paulo"` and `"sao paulo"` map to the same key.
pub(crate) fn search_key(value: &str) -> String {
    value
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate an alphabetic code of a fixed length and return it upper-cased.
pub(crate) fn normalize_code(value: &str, len: usize, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.len() != len || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EngineError::InvalidInput(format!(
            "{label} code must be {len} ASCII letters"
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Normalize an email address and perform a light shape check.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(EngineError::InvalidInput(format!("invalid email: {value}")));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_key_folds_accents_and_spaces() {
        assert_eq!(search_key("  São   Paulo "), "sao paulo");
        assert_eq!(search_key("BARILOCHE"), "bariloche");
    }

    #[test]
    fn code_is_upper_cased_and_length_checked() {
        assert_eq!(normalize_code("usd", 3, "currency").unwrap(), "USD");
        assert!(normalize_code("US", 3, "currency").is_err());
        assert!(normalize_code("U$D", 3, "currency").is_err());
    }

    #[test]
    fn email_is_lower_cased() {
        assert_eq!(normalize_email(" Ana@Example.COM ").unwrap(), "ana@example.com");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("a@b").is_err());
    }
}
