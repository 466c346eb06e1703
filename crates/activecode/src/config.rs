//! Widget configuration.
//!
//! Read once, when the widget is constructed. The CLI loads it from a TOML
//! file, the browser frontend from data attributes on the mount element.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::RuntimeAssets;

/// Result panel height used when none is configured.
pub const DEFAULT_OUTPUT_HEIGHT: &str = "400px";

static CSS_LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)(?:px|em|rem|%|vh|vw|vmin|vmax|pt|pc|cm|mm|in|ch|ex)$")
        .unwrap()
});

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("`{0}` is not a CSS length (expected e.g. `400px`, `30em`, `50vh`)")]
    InvalidLength(String),
    #[error("failed to parse configuration")]
    Toml(#[from] toml::de::Error),
}

/// A validated, non-negative CSS length with an explicit unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CssLength(String);

impl CssLength {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CssLength {
    fn default() -> Self {
        Self(DEFAULT_OUTPUT_HEIGHT.to_owned())
    }
}

impl FromStr for CssLength {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if CSS_LENGTH.is_match(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(ConfigError::InvalidLength(value.to_owned()))
        }
    }
}

impl TryFrom<String> for CssLength {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CssLength> for String {
    fn from(length: CssLength) -> Self {
        length.0
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the widget reads at construction time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActiveCodeConfig {
    /// Height of the rendering surface.
    pub output_height: Option<CssLength>,
    /// Interpreter variant selector. Passed through into the document untouched.
    pub python3_interpreter: Option<String>,
    /// Requested editor/output alignment. This widget always stacks vertically,
    /// the value is accepted for compatibility and otherwise ignored.
    pub align_vertical: Option<bool>,
    pub runtime: RuntimeAssets,
}

impl ActiveCodeConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Configured output height, or [`DEFAULT_OUTPUT_HEIGHT`].
    pub fn output_height(&self) -> CssLength {
        self.output_height.clone().unwrap_or_default()
    }
}
