//! Plain-text reports: labeled lists, one entry per line, sections
//! separated by a blank line.

use crate::reconciliation::HashHint;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub heading: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section, printed even when it has no items
    pub fn section(&mut self, heading: impl Into<String>, items: Vec<String>) -> &mut Self {
        self.sections.push(ReportSection {
            heading: heading.into(),
            items,
        });
        self
    }

    /// Add a section only when it has items
    pub fn section_if_any(&mut self, heading: impl Into<String>, items: Vec<String>) -> &mut Self {
        if !items.is_empty() {
            self.section(heading, items);
        }
        self
    }

    /// Append all sections of another report
    pub fn append(&mut self, other: Report) -> &mut Self {
        self.sections.extend(other.sections);
        self
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    /// Find a section by heading
    pub fn get(&self, heading: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", section.heading)?;
            for item in &section.items {
                writeln!(f, "{item}")?;
            }
        }
        Ok(())
    }
}

/// One line per hint: the digest, the name if known, and the side it was seen on
pub fn format_hash_hint(hint: &HashHint) -> String {
    format!(
        "{} ({}, {})",
        hint.hash,
        hint.name.as_deref().unwrap_or("unresolved"),
        hint.origin
    )
}
