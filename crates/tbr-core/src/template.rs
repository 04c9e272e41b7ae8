//! Guided rule templates
//!
//! A fixed catalog that turns a plain hostname fragment into a regex, for
//! users who would rather not write patterns by hand.

/// Placeholder replaced by the (escaped) user input
const SLOT: &str = "{}";

/// How a template consumes user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    /// Input is regex-escaped and placed into the slot
    Escaped,
    /// Input is ignored, the pattern is fixed
    Fixed,
    /// Input is returned unchanged
    Verbatim,
}

/// A named pattern recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Catalog name, used for lookup
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// When to reach for this template
    pub usage: &'static str,
    /// Example input
    pub input_example: &'static str,
    /// Pattern with at most one `{}` slot
    pub pattern: &'static str,
    /// Pattern produced by the example input
    pub preview: &'static str,
    /// Input handling
    pub substitution: Substitution,
}

static TEMPLATES: [Template; 5] = [
    Template {
        name: "Match all subdomains",
        description: "Match all subdomains of a specific domain",
        usage: "Use when you want to match all subdomains like api.example.com, www.example.com",
        input_example: "example.com",
        pattern: r".*\.{}",
        preview: r".*\.example\.com",
        substitution: Substitution::Escaped,
    },
    Template {
        name: "Match specific prefix",
        description: "Match hosts with a specific prefix pattern",
        usage: "Use when you want to match hosts starting with a specific pattern",
        input_example: "dev.example.com",
        pattern: r"^{}-.*$",
        preview: r"^dev-.*\.example\.com$",
        substitution: Substitution::Escaped,
    },
    Template {
        name: "Match keyword anywhere",
        description: "Match hosts containing a specific keyword",
        usage: "Use when you want to match any host containing a specific word",
        input_example: "staging",
        pattern: r".*{}.*",
        preview: r".*staging.*",
        substitution: Substitution::Escaped,
    },
    Template {
        name: "Match IP-style hostname",
        description: "Match hostnames that look like IP addresses",
        usage: "Use when dealing with services that use IP addresses as hostnames",
        input_example: "",
        pattern: r"^\d+\.\d+\.\d+\.\d+$",
        preview: r"^\d+\.\d+\.\d+\.\d+$",
        substitution: Substitution::Fixed,
    },
    Template {
        name: "Custom regex",
        description: "Enter your own regex pattern",
        usage: "Use when you need a specific pattern not covered by other templates",
        input_example: r".*\.internal\.corp",
        pattern: SLOT,
        preview: r".*\.internal\.corp",
        substitution: Substitution::Verbatim,
    },
];

impl Template {
    /// The full catalog in display order
    pub fn all() -> &'static [Template] {
        &TEMPLATES
    }

    /// Look up a template by exact name
    pub fn find(name: &str) -> Option<&'static Template> {
        TEMPLATES.iter().find(|t| t.name == name)
    }

    /// Whether the template uses the caller's input
    pub fn takes_input(&self) -> bool {
        self.substitution != Substitution::Fixed
    }

    /// Produce a pattern from this template
    pub fn apply(&self, input: &str) -> String {
        match self.substitution {
            Substitution::Fixed => self.pattern.to_string(),
            Substitution::Verbatim => input.to_string(),
            Substitution::Escaped => self.pattern.replacen(SLOT, &regex::escape(input), 1),
        }
    }
}

/// Generate a pattern from the named template
///
/// Returns an empty string for unknown template names.
pub fn generate(name: &str, input: &str) -> String {
    Template::find(name).map(|t| t.apply(input)).unwrap_or_default()
}
