//! Rule records
//!
//! A rule is identified by its literal pattern text. The kind decides which
//! section of the rule file the pattern lives in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Characters that make a bare pattern look like a regex
const REGEX_HINTS: [char; 5] = ['.', '*', '^', '$', '\\'];

/// Rule kind determines matching semantics and file section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Exact hostname, stored under `[BLOCK_HOSTS]`
    Host,
    /// Regex searched anywhere in the hostname, stored under `[BLOCK_RULES]`
    Regex,
}

impl RuleKind {
    /// Section header this kind is stored under
    pub fn section(self) -> &'static str {
        match self {
            Self::Host => "[BLOCK_HOSTS]",
            Self::Regex => "[BLOCK_RULES]",
        }
    }

    /// Guess the kind of a pattern that was found outside any section
    ///
    /// Anything containing `.`, `*`, `^`, `$` or `\` is treated as a regex.
    /// Plain hostnames contain dots too, so this is lossy.
    pub fn guess(pattern: &str) -> Self {
        if pattern.contains(REGEX_HINTS) {
            Self::Regex
        } else {
            Self::Host
        }
    }

    /// Lowercase name used in exports
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "host" | "hosts" => Ok(Self::Host),
            "regex" | "rule" | "rules" => Ok(Self::Regex),
            other => Err(Error::config_value("kind", format!("Unknown rule kind: {other}"))),
        }
    }
}

/// A single bypass rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// Literal pattern text (also the rule's identity)
    pub pattern: String,
    /// Host or regex
    #[serde(rename = "type")]
    pub kind: RuleKind,
    /// Whether the rule is active
    pub enabled: bool,
}

impl Rule {
    /// Create a rule
    pub fn new(pattern: impl Into<String>, kind: RuleKind, enabled: bool) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
            enabled,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.enabled { "ENABLED" } else { "DISABLED" };
        write!(
            f,
            "[{}] {}: {}",
            status,
            self.kind.as_str().to_uppercase(),
            self.pattern
        )
    }
}
