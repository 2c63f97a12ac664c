//! Documentation options.
//!
//! The options are read once per render call and never mutated. They are
//! reported on the PDF cover page and in its options section; they do not
//! remove sections from any output.

use serde::{Deserialize, Serialize};

/// Toggles shown to the reader of the generated documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationOptions {
    pub ai_descriptions: bool,
    pub er_diagrams: bool,
    pub data_dictionary: bool,
    pub performance_notes: bool,
    pub security_analysis: bool,
}

impl Default for DocumentationOptions {
    fn default() -> Self {
        Self {
            ai_descriptions: true,
            er_diagrams: true,
            data_dictionary: true,
            performance_notes: true,
            security_analysis: true,
        }
    }
}

/// One option as presented in rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionEntry {
    pub label: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

impl OptionEntry {
    /// "Enabled" or "Disabled"
    pub fn status(&self) -> &'static str {
        if self.enabled { "Enabled" } else { "Disabled" }
    }
}

impl DocumentationOptions {
    /// Options in display order.
    pub fn entries(&self) -> [OptionEntry; 5] {
        [
            OptionEntry {
                label: "AI-Enhanced Descriptions",
                description: "Use AI to generate detailed descriptions",
                enabled: self.ai_descriptions,
            },
            OptionEntry {
                label: "Include ER Diagrams",
                description: "Generate entity relationship diagrams",
                enabled: self.er_diagrams,
            },
            OptionEntry {
                label: "Data Dictionary",
                description: "Include comprehensive column documentation",
                enabled: self.data_dictionary,
            },
            OptionEntry {
                label: "Performance Notes",
                description: "Add performance analysis and recommendations",
                enabled: self.performance_notes,
            },
            OptionEntry {
                label: "Security Analysis",
                description: "Include security considerations and analysis",
                enabled: self.security_analysis,
            },
        ]
    }
}
