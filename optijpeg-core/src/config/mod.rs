//! Optimization options for jpegoptim runs.
//!
//! This module provides the configuration record handed to the option encoder
//! ([`crate::command::encode`]) and the orchestrator ([`crate::Optimizer`]),
//! along with the strip-mode types and JSON loading.
//!
//! Loading is lenient: unknown keys are ignored, and malformed `max` or `strip`
//! values are logged and replaced by their defaults.

mod builder;

use crate::error::{CoreError, CoreResult};

use serde::Deserialize;
use serde::de::Deserializer;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use builder::OptimizationOptionsBuilder;

/// Prefix every strip flag starts with; the mode name is appended to it.
pub const STRIP_FLAG_PREFIX: &str = "--strip-";

/// Default strip mode used when `strip` is absent or `true`.
pub const DEFAULT_STRIP_MODE: StripMode = StripMode::All;

/// Metadata category removed by jpegoptim's `--strip-<mode>` flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum StripMode {
    /// Strip all markers (`--strip-all`)
    All,
    /// Strip comment markers (`--strip-com`)
    Com,
    /// Strip Exif markers (`--strip-exif`)
    Exif,
    /// Strip IPTC/Photoshop markers (`--strip-iptc`)
    Iptc,
    /// Strip ICC profiles (`--strip-icc`)
    Icc,
    /// Strip XMP markers (`--strip-xmp`)
    Xmp,
    /// Any other mode name, passed through to jpegoptim unchanged.
    Custom(String),
}

impl StripMode {
    /// Name of the mode as it appears after [`STRIP_FLAG_PREFIX`].
    pub fn name(&self) -> &str {
        match self {
            StripMode::All => "all",
            StripMode::Com => "com",
            StripMode::Exif => "exif",
            StripMode::Iptc => "iptc",
            StripMode::Icc => "icc",
            StripMode::Xmp => "xmp",
            StripMode::Custom(name) => name,
        }
    }

    /// Full flag token for this mode, e.g. `--strip-exif`.
    pub fn flag(&self) -> String {
        format!("{STRIP_FLAG_PREFIX}{}", self.name())
    }
}

impl fmt::Display for StripMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StripMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Config("strip mode must not be empty".to_string()));
        }

        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "all" => StripMode::All,
            "com" => StripMode::Com,
            "exif" => StripMode::Exif,
            "iptc" => StripMode::Iptc,
            "icc" => StripMode::Icc,
            "xmp" => StripMode::Xmp,
            _ => StripMode::Custom(trimmed.to_string()),
        })
    }
}

impl TryFrom<String> for StripMode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Resolved strip setting: either no strip flag at all, or one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strip {
    /// `strip: false`; no strip flag is emitted.
    Disabled,
    /// Emit `--strip-<mode>`.
    Mode(StripMode),
}

impl Strip {
    /// The mode to emit, if any.
    pub fn mode(&self) -> Option<&StripMode> {
        match self {
            Strip::Disabled => None,
            Strip::Mode(mode) => Some(mode),
        }
    }
}

impl Default for Strip {
    fn default() -> Self {
        Strip::Mode(DEFAULT_STRIP_MODE)
    }
}

impl From<bool> for Strip {
    /// `true` means the default mode, `false` disables stripping.
    fn from(value: bool) -> Self {
        if value {
            Strip::default()
        } else {
            Strip::Disabled
        }
    }
}

impl From<StripMode> for Strip {
    fn from(mode: StripMode) -> Self {
        Strip::Mode(mode)
    }
}

/// Options controlling a single jpegoptim invocation.
///
/// # Examples
///
/// ```rust
/// use optijpeg_core::config::{OptimizationOptions, Strip, StripMode};
///
/// let options = OptimizationOptions::from_json_str(
///     r#"{ "strip": "exif", "preserve": true, "max": 85, "colour": "blue" }"#,
/// ).unwrap();
///
/// assert_eq!(options.strip, Strip::Mode(StripMode::Exif));
/// assert!(options.preserve_timestamps);
/// assert_eq!(options.max_quality, Some(85));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OptimizationOptions {
    /// Which metadata to strip. Absent, `null` or `true` resolve to `all`.
    #[serde(deserialize_with = "deserialize_strip")]
    pub strip: Strip,

    /// Keep file modification times (`--preserve`).
    #[serde(alias = "preserve", alias = "preserveTimestamps")]
    pub preserve_timestamps: bool,

    /// Maximum quality factor (`--max=<q>`).
    #[serde(
        alias = "max",
        alias = "maxQuality",
        deserialize_with = "deserialize_max_quality"
    )]
    pub max_quality: Option<u64>,

    /// Write the composed command line to the diagnostic channel before running.
    pub debug: bool,
}

impl OptimizationOptions {
    /// Returns a builder starting from the default options.
    pub fn builder() -> OptimizationOptionsBuilder {
        OptimizationOptionsBuilder::new()
    }

    /// Parses options from a JSON object, ignoring unknown keys.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON options file.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        log::debug!("Loading optimization options from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!(
                "Failed to read options file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&contents)
    }
}

fn deserialize_strip<'de, D>(deserializer: D) -> Result<Strip, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let strip = match &value {
        serde_json::Value::Null => Some(Strip::default()),
        serde_json::Value::Bool(flag) => Some(Strip::from(*flag)),
        serde_json::Value::String(name) => name.parse::<StripMode>().ok().map(Strip::Mode),
        _ => None,
    };

    Ok(strip.unwrap_or_else(|| {
        log::warn!("Ignoring strip value that is neither a boolean nor a mode name: {value}");
        Strip::default()
    }))
}

fn deserialize_max_quality<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let quality = match &value {
        serde_json::Value::Null => None,
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    };

    if quality.is_none() && !value.is_null() {
        log::warn!("Ignoring max quality value that is not a non-negative integer: {value}");
    }

    Ok(quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = OptimizationOptions::default();
        assert_eq!(options.strip, Strip::Mode(StripMode::All));
        assert!(!options.preserve_timestamps);
        assert_eq!(options.max_quality, None);
        assert!(!options.debug);
    }

    #[test]
    fn test_strip_mode_parsing() {
        assert_eq!("all".parse::<StripMode>().unwrap(), StripMode::All);
        assert_eq!("EXIF".parse::<StripMode>().unwrap(), StripMode::Exif);
        assert_eq!(" com ".parse::<StripMode>().unwrap(), StripMode::Com);
        assert_eq!(
            "jfif".parse::<StripMode>().unwrap(),
            StripMode::Custom("jfif".to_string())
        );
        assert!("".parse::<StripMode>().is_err());
        assert!("   ".parse::<StripMode>().is_err());
    }

    #[test]
    fn test_strip_mode_flag() {
        assert_eq!(StripMode::All.flag(), "--strip-all");
        assert_eq!(StripMode::Exif.flag(), "--strip-exif");
        assert_eq!(StripMode::Custom("none".to_string()).flag(), "--strip-none");
    }

    #[test]
    fn test_strip_from_bool() {
        assert_eq!(Strip::from(true), Strip::Mode(StripMode::All));
        assert_eq!(Strip::from(false), Strip::Disabled);
        assert_eq!(Strip::Disabled.mode(), None);
    }

    #[test]
    fn test_json_strip_variants() {
        let absent = OptimizationOptions::from_json_str("{}").unwrap();
        assert_eq!(absent.strip, Strip::Mode(StripMode::All));

        let null = OptimizationOptions::from_json_str(r#"{"strip": null}"#).unwrap();
        assert_eq!(null.strip, Strip::Mode(StripMode::All));

        let yes = OptimizationOptions::from_json_str(r#"{"strip": true}"#).unwrap();
        assert_eq!(yes.strip, Strip::Mode(StripMode::All));

        let no = OptimizationOptions::from_json_str(r#"{"strip": false}"#).unwrap();
        assert_eq!(no.strip, Strip::Disabled);

        let named = OptimizationOptions::from_json_str(r#"{"strip": "icc"}"#).unwrap();
        assert_eq!(named.strip, Strip::Mode(StripMode::Icc));
    }

    #[test]
    fn test_json_bad_strip_falls_back_to_default() {
        for json in [r#"{"strip": ""}"#, r#"{"strip": 5}"#, r#"{"strip": ["exif"]}"#] {
            let options = OptimizationOptions::from_json_str(json).unwrap();
            assert_eq!(options.strip, Strip::Mode(StripMode::All), "{json}");
        }

        let with_max = OptimizationOptions::from_json_str(r#"{"strip": 5, "max": 70}"#).unwrap();
        assert_eq!(with_max.max_quality, Some(70));
    }

    #[test]
    fn test_json_unknown_keys_ignored() {
        let options =
            OptimizationOptions::from_json_str(r#"{"dest": "/tmp", "threshold": 10}"#).unwrap();
        assert_eq!(options, OptimizationOptions::default());
    }

    #[test]
    fn test_json_aliases() {
        let options = OptimizationOptions::from_json_str(
            r#"{"preserveTimestamps": true, "maxQuality": 70, "debug": true}"#,
        )
        .unwrap();
        assert!(options.preserve_timestamps);
        assert_eq!(options.max_quality, Some(70));
        assert!(options.debug);
    }

    #[test]
    fn test_json_max_quality_must_be_integer() {
        let fractional = OptimizationOptions::from_json_str(r#"{"max": 80.5}"#).unwrap();
        assert_eq!(fractional.max_quality, None);

        let text = OptimizationOptions::from_json_str(r#"{"max": "80"}"#).unwrap();
        assert_eq!(text.max_quality, None);

        let negative = OptimizationOptions::from_json_str(r#"{"max": -5}"#).unwrap();
        assert_eq!(negative.max_quality, None);

        let zero = OptimizationOptions::from_json_str(r#"{"max": 0}"#).unwrap();
        assert_eq!(zero.max_quality, Some(0));
    }

    #[test]
    fn test_json_invalid_document() {
        assert!(matches!(
            OptimizationOptions::from_json_str("not json"),
            Err(CoreError::Json(_))
        ));
    }
}
