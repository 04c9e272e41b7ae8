//! Line-level model of the rule file
//!
//! The document keeps every original line so that edits preserve comments,
//! blank lines and ordering. Rules are derived from the lines on demand.

use crate::error::{Error, Result};
use crate::rule::{Rule, RuleKind};
use tracing::debug;

/// Prefix marking a rule line as inactive
pub const DISABLED_MARKER: &str = "#DISABLED";

/// Header line carrying the modification timestamp
pub const LAST_UPDATED_PREFIX: &str = "# Last Updated:";

/// Header line carrying the file format version
pub const VERSION_PREFIX: &str = "# Version:";

/// In-memory copy of a rule file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDocument {
    lines: Vec<String>,
}

/// A line that carries a rule
#[derive(Debug)]
struct RuleLine {
    index: usize,
    rule: Rule,
    in_section: bool,
}

/// Render a rule as it appears in a section
pub fn rule_line(pattern: &str, enabled: bool) -> String {
    if enabled {
        pattern.to_string()
    } else {
        format!("{DISABLED_MARKER} {pattern}")
    }
}

/// Section a header line opens, if any
///
/// Only a line consisting of the header alone counts, so a pattern such as
/// `x[BLOCK_HOSTS]` stays a rule.
pub fn section_of(line: &str) -> Option<RuleKind> {
    let line = line.trim();
    [RuleKind::Host, RuleKind::Regex]
        .into_iter()
        .find(|kind| line == kind.section())
}

/// Check that a pattern survives a write and re-read of the rule file
///
/// Returns the reason when it would be read back as something else.
pub fn unstorable_reason(pattern: &str) -> Option<&'static str> {
    if pattern.trim().is_empty() || pattern.contains(['\n', '\r']) {
        Some("Pattern must be a single non-empty line")
    } else if pattern.trim_start().starts_with('#') {
        Some("Pattern cannot start with '#'")
    } else if section_of(pattern).is_some() {
        Some("Pattern cannot be a section header")
    } else {
        None
    }
}

/// Pattern carried by a disabled line, if the trimmed line is one
///
/// Both `#DISABLED pattern` and bare `#pattern` count. Ordinary comments
/// are written as `# text` and are skipped.
pub fn disabled_pattern(line: &str) -> Option<&str> {
    let pattern = if let Some(rest) = line.strip_prefix(DISABLED_MARKER) {
        rest.trim()
    } else if line.starts_with('#') && !line.starts_with("# ") {
        line[1..].trim()
    } else {
        return None;
    };

    (!pattern.is_empty()).then_some(pattern)
}

impl RuleDocument {
    /// Parse file content into lines
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
        }
    }

    /// Fresh document with both sections empty
    pub fn with_defaults(version: &str, timestamp: &str) -> Self {
        let lines = [
            "# TLS BYPASS RULE FILE".to_string(),
            format!("{VERSION_PREFIX} {version}"),
            format!("{LAST_UPDATED_PREFIX} {timestamp}"),
            "# For authorized security testing only".to_string(),
            String::new(),
            RuleKind::Host.section().to_string(),
            String::new(),
            RuleKind::Regex.section().to_string(),
        ];
        Self {
            lines: lines.into(),
        }
    }

    /// Raw lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All rules in file order
    ///
    /// Lines inside a section take that section's kind, whether enabled or
    /// disabled. Disabled carriers before the first section have their kind
    /// guessed from content.
    pub fn rules(&self) -> Vec<Rule> {
        let rules: Vec<Rule> = self.rule_lines().into_iter().map(|line| line.rule).collect();
        debug!("Parsed {} rules from {} lines", rules.len(), self.lines.len());
        rules
    }

    /// Lines that carry a rule
    ///
    /// Headers, blank lines and `# ` comments never carry a rule.
    fn rule_lines(&self) -> Vec<RuleLine> {
        let mut rules = Vec::new();
        let mut section = None;

        for (index, line) in self.lines.iter().enumerate() {
            let line = line.trim();

            if let Some(kind) = section_of(line) {
                section = Some(kind);
            } else if line.is_empty() {
                continue;
            } else if !line.starts_with('#') {
                if let Some(kind) = section {
                    rules.push(RuleLine {
                        index,
                        rule: Rule::new(line, kind, true),
                        in_section: true,
                    });
                }
            } else if let Some(pattern) = disabled_pattern(line) {
                let kind = section.unwrap_or_else(|| RuleKind::guess(pattern));
                rules.push(RuleLine {
                    index,
                    rule: Rule::new(pattern, kind, false),
                    in_section: section.is_some(),
                });
            }
        }

        rules
    }

    /// Append a rule to the end of its section's line block
    pub fn insert(&mut self, rule: &Rule) -> Result<()> {
        let section = rule.kind.section();
        let header = self
            .lines
            .iter()
            .position(|line| section_of(line) == Some(rule.kind))
            .ok_or(Error::MissingSection { section })?;

        let mut pos = header + 1;
        while pos < self.lines.len() {
            let line = self.lines[pos].trim();
            if line.is_empty() || section_of(line).is_some() {
                break;
            }
            pos += 1;
        }

        self.lines.insert(pos, rule_line(&rule.pattern, rule.enabled));
        Ok(())
    }

    /// Delete every rule line holding the pattern, enabled or disabled
    ///
    /// Returns the number of lines removed.
    pub fn remove(&mut self, pattern: &str) -> usize {
        let doomed: Vec<usize> = self
            .rule_lines()
            .into_iter()
            .filter(|line| line.rule.pattern == pattern)
            .map(|line| line.index)
            .collect();

        for &index in doomed.iter().rev() {
            self.lines.remove(index);
        }
        doomed.len()
    }

    /// Flip the first rule line holding the pattern
    ///
    /// Returns the new enabled state, or `None` when no rule matched. A
    /// disabled carrier above the first section moves into its section when
    /// enabled, since enabled lines only count inside one.
    pub fn toggle(&mut self, pattern: &str) -> Result<Option<bool>> {
        let Some(RuleLine {
            index,
            rule,
            in_section,
        }) = self
            .rule_lines()
            .into_iter()
            .find(|line| line.rule.pattern == pattern)
        else {
            return Ok(None);
        };

        let enabled = !rule.enabled;
        if in_section {
            self.lines[index] = rule_line(&rule.pattern, enabled);
        } else {
            let removed = self.lines.remove(index);
            if let Err(e) = self.insert(&Rule::new(rule.pattern, rule.kind, enabled)) {
                self.lines.insert(index, removed);
                return Err(e);
            }
        }
        Ok(Some(enabled))
    }

    /// Set the last-updated header, inserting it after the version line when absent
    pub fn touch(&mut self, timestamp: &str) {
        let stamp = format!("{LAST_UPDATED_PREFIX} {timestamp}");

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.starts_with(LAST_UPDATED_PREFIX))
        {
            *line = stamp;
            return;
        }

        let pos = self
            .lines
            .iter()
            .position(|line| line.starts_with(VERSION_PREFIX))
            .map_or(0, |i| i + 1);
        self.lines.insert(pos, stamp);
    }

    /// Serialize back to file content
    pub fn render(&self) -> String {
        let mut content = self.lines.join("\n");
        content.push('\n');
        content
    }
}
