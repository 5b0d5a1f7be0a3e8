//! Render configuration

use serde::{Deserialize, Serialize};

use crate::source::BlankLinePolicy;

/// Options common to every render invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Comment lines placed at the top of the generated file.
    ///
    /// When empty, the target emits its default usage hint instead.
    #[serde(default)]
    pub leading_comments: Vec<String>,

    /// Separation between named types in the rendered body.
    #[serde(default = "default_blank_lines")]
    pub blank_lines: BlankLinePolicy,
}

fn default_blank_lines() -> BlankLinePolicy {
    BlankLinePolicy::LeadingAndInterposing
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            leading_comments: Vec::new(),
            blank_lines: default_blank_lines(),
        }
    }
}

impl RenderOptions {
    /// Create options with every field defaulted
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }
}
