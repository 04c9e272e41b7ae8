//! Conflict detection between enabled rules
//!
//! Overlap is sampled, not proven: each pair of enabled rules is searched
//! against a small probe corpus and the first probe matched by both is
//! reported. Patterns aimed at hosts unlike the probes are never flagged.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rule::Rule;

/// Probe hostnames used by [`ConflictDetector::default`]
pub const DEFAULT_PROBES: [&str; 4] = [
    "test.example.com",
    "api.example.com",
    "www.example.com",
    "subdomain.example.com",
];

/// How two rules relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Both rules match at least one common probe
    PotentialOverlap,
}

impl ConflictKind {
    /// Wire name of the classification
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PotentialOverlap => "potential_overlap",
        }
    }
}

/// A pair of rules that both match a probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Pattern listed first
    pub pattern_a: String,
    /// Pattern listed later
    pub pattern_b: String,
    /// Probe both patterns matched
    pub sample: String,
    /// Classification
    pub kind: ConflictKind,
}

/// Pairwise overlap sampler
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    probes: Vec<String>,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::with_probes(DEFAULT_PROBES)
    }
}

impl ConflictDetector {
    /// Detector with a custom probe corpus
    pub fn with_probes<I, S>(probes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            probes: probes.into_iter().map(Into::into).collect(),
        }
    }

    /// Probe corpus in search order
    pub fn probes(&self) -> &[String] {
        &self.probes
    }

    /// Find overlapping pairs among the enabled rules
    ///
    /// Pairs are visited in listed order (i < j). Host rules are searched as
    /// regexes too. A pair is skipped when either pattern fails to compile.
    pub fn find_conflicts(&self, rules: &[Rule]) -> Vec<Conflict> {
        let compiled: Vec<(&Rule, Option<Regex>)> = rules
            .iter()
            .filter(|rule| rule.enabled)
            .map(|rule| (rule, Regex::new(&rule.pattern).ok()))
            .collect();

        let mut conflicts = Vec::new();
        for (i, (rule_a, regex_a)) in compiled.iter().enumerate() {
            for (rule_b, regex_b) in &compiled[i + 1..] {
                let (Some(regex_a), Some(regex_b)) = (regex_a, regex_b) else {
                    debug!(
                        "Skipping pair {} / {}: pattern does not compile",
                        rule_a.pattern, rule_b.pattern
                    );
                    continue;
                };

                if let Some(sample) = self
                    .probes
                    .iter()
                    .find(|probe| regex_a.is_match(probe) && regex_b.is_match(probe))
                {
                    conflicts.push(Conflict {
                        pattern_a: rule_a.pattern.clone(),
                        pattern_b: rule_b.pattern.clone(),
                        sample: sample.clone(),
                        kind: ConflictKind::PotentialOverlap,
                    });
                }
            }
        }

        conflicts
    }
}
