//! Default build options for the livestyle stylesheet pipeline.
//!
//! The pipeline reads these as read-only configuration: which browser
//! versions the generated CSS must support, the default output style, the
//! plugin list, and the output styles the processor understands. When a
//! [`StyleProcessor`] is available its own table replaces the built-in one.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output style used when nothing else is configured.
pub const DEFAULT_CODE_STYLE: &str = "normal";

/// Output styles known without a processor.
pub const FALLBACK_CODE_STYLES: [&str; 2] = ["normal", "minify"];

/// Errors reading a serialized defaults table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse build defaults: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown target environment: {0}")]
    UnknownTarget(String),

    /// `code` names a style that is not in `code_styles`.
    #[error("default code style {code:?} is not one of {available:?}")]
    UnknownCodeStyle { code: String, available: Vec<String> },
}

/// Target environments the pipeline can emit compatible CSS for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Explorer,
    Firefox,
    Chrome,
    Safari,
    Opera,
    Android,
    Ios,
}

impl Target {
    pub const ALL: [Target; 7] = [
        Target::Explorer,
        Target::Firefox,
        Target::Chrome,
        Target::Safari,
        Target::Opera,
        Target::Android,
        Target::Ios,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Explorer => "explorer",
            Target::Firefox => "firefox",
            Target::Chrome => "chrome",
            Target::Safari => "safari",
            Target::Opera => "opera",
            Target::Android => "android",
            Target::Ios => "ios",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownTarget(s.to_string()))
    }
}

/// Build defaults consumed by the stylesheet pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDefaults {
    /// Default output style identifier (e.g. "normal", "minify")
    pub code: String,

    /// Minimum supported version per target environment
    pub support: BTreeMap<Target, f64>,

    /// Plugin identifiers to enable. Empty by default.
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Output style identifiers the processor recognizes
    #[serde(default = "fallback_code_styles")]
    pub code_styles: Vec<String>,
}

fn fallback_code_styles() -> Vec<String> {
    FALLBACK_CODE_STYLES.iter().map(|s| s.to_string()).collect()
}

/// A CSS processing library that ships its own defaults.
pub trait StyleProcessor {
    /// The processor's defaults table. Its `code_styles` is ignored in
    /// favour of [`code_styles`](Self::code_styles).
    fn defaults(&self) -> BuildDefaults;

    /// Names of the output styles the processor implements.
    fn code_styles(&self) -> Vec<String>;
}

impl Default for BuildDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BuildDefaults {
    /// The table used when no processor is available.
    pub fn builtin() -> Self {
        let support = BTreeMap::from([
            (Target::Explorer, 8.0),
            (Target::Firefox, 30.0),
            (Target::Chrome, 35.0),
            (Target::Safari, 6.0),
            (Target::Opera, 22.0),
            (Target::Android, 4.0),
            (Target::Ios, 6.0),
        ]);

        Self {
            code: DEFAULT_CODE_STYLE.to_string(),
            support,
            plugins: Vec::new(),
            code_styles: fallback_code_styles(),
        }
    }

    /// Defaults from `processor` if present, the built-in table otherwise.
    ///
    /// A processor's table replaces the built-ins wholesale; nothing is
    /// merged key by key.
    pub fn resolve(processor: Option<&dyn StyleProcessor>) -> Self {
        match processor {
            Some(processor) => {
                let mut defaults = processor.defaults();
                defaults.code_styles = processor.code_styles();
                tracing::debug!(
                    "using processor defaults ({} code styles)",
                    defaults.code_styles.len()
                );
                defaults
            }
            None => Self::builtin(),
        }
    }

    /// Parse a serialized table and check that `code` is a known style.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let defaults: Self = serde_json::from_str(json)?;
        if !defaults.is_code_style(&defaults.code) {
            return Err(ConfigError::UnknownCodeStyle {
                code: defaults.code,
                available: defaults.code_styles,
            });
        }
        Ok(defaults)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn minimum_version(&self, target: Target) -> Option<f64> {
        self.support.get(&target).copied()
    }

    /// Whether `version` of `target` meets the minimum. Targets missing
    /// from the table are not supported.
    pub fn supports(&self, target: Target, version: f64) -> bool {
        self.minimum_version(target)
            .is_some_and(|minimum| version >= minimum)
    }

    pub fn is_code_style(&self, name: &str) -> bool {
        self.code_styles.iter().any(|s| s == name)
    }
}
