//! Export/import of rule sets
//!
//! Supported formats:
//! - `txt`  - section layout of the rule file, disabled rules keep the marker
//! - `json` - metadata envelope plus a flat rule list
//! - `yaml` - same envelope as JSON
//! - `burp` - enabled patterns only, export-only
//!
//! Imports are additive: every rule goes through [`RuleStore::add_rule`],
//! so existing rules are never replaced and duplicates are possible.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::rule::{Rule, RuleKind};
use crate::store::{header_timestamp, rule_line, section_of, RuleStore, DISABLED_MARKER};

/// Serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Plain text with sections
    Txt,
    /// JSON envelope
    Json,
    /// YAML envelope
    Yaml,
    /// Enabled patterns for Burp Suite
    Burp,
}

impl Format {
    /// Every supported format
    pub const ALL: [Format; 4] = [Self::Txt, Self::Json, Self::Yaml, Self::Burp];

    /// Short name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Burp => "burp",
        }
    }

    /// Human readable label
    pub fn description(self) -> &'static str {
        match self {
            Self::Txt => "Plain Text",
            Self::Json => "JSON Format",
            Self::Yaml => "YAML Format",
            Self::Burp => "Burp Suite Format",
        }
    }

    /// File extension for exports
    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt | Self::Burp => "txt",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Whether content in this format can be imported
    pub fn can_import(self) -> bool {
        self != Self::Burp
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "burp" => Ok(Self::Burp),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Envelope metadata for JSON/YAML exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Rule file format version
    pub version: String,
    /// Local export time, ISO 8601 without offset
    pub exported_at: String,
    /// Free text description
    pub description: String,
    /// Usage notice
    pub for_authorized_testing_only: bool,
}

/// Full JSON/YAML export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEnvelope {
    /// Export metadata
    pub metadata: ExportMetadata,
    /// Every rule in file order
    pub rules: Vec<Rule>,
}

/// Import document; only `rules` is required
#[derive(Debug, Deserialize)]
struct ImportEnvelope {
    rules: Vec<ImportedRule>,
}

#[derive(Debug, Deserialize)]
struct ImportedRule {
    #[serde(default)]
    pattern: String,
    #[serde(rename = "type", default = "default_kind")]
    kind: RuleKind,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_kind() -> RuleKind {
    RuleKind::Regex
}

fn default_enabled() -> bool {
    true
}

/// Outcome of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rules added to the store
    pub imported: usize,
    /// Rules rejected as invalid patterns
    pub skipped: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} imported, {} skipped", self.imported, self.skipped)
    }
}

/// Export/import front for a [`RuleStore`]
#[derive(Debug, Clone, Copy)]
pub struct Codec<'a> {
    store: &'a RuleStore,
}

impl<'a> Codec<'a> {
    /// Wrap a store
    pub fn new(store: &'a RuleStore) -> Self {
        Self { store }
    }

    /// Render the store's rules in `format`
    pub fn export(&self, format: Format) -> Result<String> {
        let rules = self.store.list_rules()?;

        match format {
            Format::Txt => Ok(export_txt(&rules)),
            Format::Burp => Ok(export_burp(&rules)),
            Format::Json => Ok(serde_json::to_string_pretty(&self.envelope(rules))?),
            Format::Yaml => Ok(serde_yaml::to_string(&self.envelope(rules))?),
        }
    }

    /// Add the rules found in `content` to the store
    ///
    /// JSON and YAML are parsed completely before anything is added. TXT is
    /// applied line by line, so rules before a failing line stay committed.
    pub fn import(&self, format: Format, content: &str) -> Result<ImportSummary> {
        let summary = match format {
            Format::Txt => self.import_txt(content)?,
            Format::Json => {
                let envelope: ImportEnvelope = serde_json::from_str(content)
                    .map_err(|e| Error::parse_failure("json", e.to_string()))?;
                self.import_rules(envelope.rules)?
            }
            Format::Yaml => {
                let envelope: ImportEnvelope = serde_yaml::from_str(content)
                    .map_err(|e| Error::parse_failure("yaml", e.to_string()))?;
                self.import_rules(envelope.rules)?
            }
            Format::Burp => return Err(Error::UnsupportedFormat(format!("{format} (import)"))),
        };

        info!("Imported {} rules: {}", format, summary);
        Ok(summary)
    }

    fn envelope(&self, rules: Vec<Rule>) -> ExportEnvelope {
        ExportEnvelope {
            metadata: ExportMetadata {
                version: self.store.config().version.clone(),
                exported_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
                description: "TLS Bypass Rules Export".to_string(),
                for_authorized_testing_only: true,
            },
            rules,
        }
    }

    fn import_txt(&self, content: &str) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        let mut section = None;

        for line in content.lines() {
            let line = line.trim();

            if let Some(kind) = section_of(line) {
                section = Some(kind);
                continue;
            }
            let Some(kind) = section else {
                continue;
            };

            let (pattern, enabled) = if let Some(rest) = line.strip_prefix(DISABLED_MARKER) {
                (rest.trim(), false)
            } else if line.starts_with('#') {
                continue;
            } else {
                (line, true)
            };

            if !pattern.is_empty() {
                self.add(pattern, kind, enabled, &mut summary)?;
            }
        }

        Ok(summary)
    }

    fn import_rules(&self, rules: Vec<ImportedRule>) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        for rule in rules.iter().filter(|r| !r.pattern.trim().is_empty()) {
            self.add(&rule.pattern, rule.kind, rule.enabled, &mut summary)?;
        }
        Ok(summary)
    }

    fn add(
        &self,
        pattern: &str,
        kind: RuleKind,
        enabled: bool,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        match self.store.add_rule(pattern, kind, enabled) {
            Ok(()) => summary.imported += 1,
            Err(Error::InvalidPattern { message, .. }) => {
                warn!("Skipping invalid pattern {}: {}", pattern, message);
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

fn export_txt(rules: &[Rule]) -> String {
    let mut lines = vec![
        "# TLS Bypass Rules Export".to_string(),
        format!("# Exported: {}", header_timestamp()),
        "# For authorized testing only".to_string(),
    ];

    for kind in [RuleKind::Host, RuleKind::Regex] {
        lines.push(String::new());
        lines.push(kind.section().to_string());
        lines.extend(
            rules
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| rule_line(&r.pattern, r.enabled)),
        );
    }

    let mut content = lines.join("\n");
    content.push('\n');
    content
}

fn export_burp(rules: &[Rule]) -> String {
    let mut content = String::new();
    content.push_str("# Burp Suite TLS Bypass Rules\n");
    content.push_str(&format!("# Exported: {}\n", header_timestamp()));
    content.push_str("# For authorized testing only\n\n");

    for rule in rules.iter().filter(|r| r.enabled) {
        content.push_str(&rule.pattern);
        content.push('\n');
    }
    content
}

/// Filename for an export taken now, e.g. `tls_rules_export_20250101_120000.json`
pub fn export_filename(format: Format) -> String {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    safe_filename(&format!("tls_rules_export_{stamp}.{}", format.extension()))
}

/// Replace characters that are unsafe in file names and cap the length
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .take(200)
        .collect()
}
