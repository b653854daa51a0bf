use crate::error::ConversionResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How rule matchers capture function arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentCapture {
    /// Regex capture up to the next comma or closing parenthesis. Nested calls
    /// inside an argument are mis-captured.
    #[default]
    Greedy,
    /// Parenthesis- and quote-aware scan that also enforces the rule's arity
    Balanced,
}

/// Top-level converter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Emit the per-rule progress trace at info level
    pub debug: bool,
    pub argument_capture: ArgumentCapture,
    pub post_processing: PostProcessingConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessingConfig {
    /// Extra project renames, applied after the built-in ones
    pub identifier_renames: Vec<IdentifierRename>,
}

/// Case-insensitive regex rename applied during post-processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierRename {
    pub pattern: String,
    pub replacement: String,
}

impl IdentifierRename {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub enabled: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ConversionConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> ConversionResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConversionResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_argument_capture(mut self, capture: ArgumentCapture) -> Self {
        self.argument_capture = capture;
        self
    }
}
