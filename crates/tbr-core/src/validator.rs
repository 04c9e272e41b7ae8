//! Pattern validation
//!
//! Thin wrappers around the `regex` crate. Compile errors never escape as
//! panics: [`validate`] reports them, [`test`] swallows them.

use regex::Regex;

use crate::error::{Error, Result};

/// Maximum total hostname length
const MAX_HOSTNAME_LEN: usize = 253;

/// Maximum length of a single hostname label
const MAX_LABEL_LEN: usize = 63;

/// Outcome of validating a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    valid: bool,
    error: String,
}

impl Validation {
    /// Whether the pattern compiled
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Compiler message, empty when valid
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Split into the `(valid, message)` pair
    pub fn into_parts(self) -> (bool, String) {
        (self.valid, self.error)
    }
}

/// Compile a pattern, mapping failure to [`Error::InvalidPattern`]
pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))
}

/// Check that a pattern compiles
pub fn validate(pattern: &str) -> Validation {
    match Regex::new(pattern) {
        Ok(_) => Validation {
            valid: true,
            error: String::new(),
        },
        Err(e) => Validation {
            valid: false,
            error: e.to_string(),
        },
    }
}

/// Search `sample` for `pattern` anywhere in the string
///
/// Returns `false` for patterns that don't compile.
pub fn test(pattern: &str, sample: &str) -> bool {
    Regex::new(pattern).map_or(false, |re| re.is_match(sample))
}

/// Check whether a string is a syntactically valid hostname
pub fn validate_hostname(hostname: &str) -> bool {
    if hostname.len() > MAX_HOSTNAME_LEN {
        return false;
    }

    hostname.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
