// ============================================================================
// optijpeg-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for OptimizationOptions
//
// Fluent construction of OptimizationOptions, starting from the defaults
// (strip all, no preserve, no max quality, no debug output).

use super::{OptimizationOptions, Strip, StripMode};

/// Builder for creating [`OptimizationOptions`] instances.
///
/// # Examples
///
/// ```rust
/// use optijpeg_core::config::{OptimizationOptionsBuilder, Strip, StripMode};
///
/// let options = OptimizationOptionsBuilder::new()
///     .strip_mode(StripMode::Exif)
///     .preserve_timestamps(true)
///     .max_quality(85)
///     .build();
///
/// assert_eq!(options.strip, Strip::Mode(StripMode::Exif));
/// assert_eq!(options.max_quality, Some(85));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptimizationOptionsBuilder {
    options: OptimizationOptions,
}

impl OptimizationOptionsBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing set of options, e.g. ones loaded from a file.
    pub fn from_options(options: OptimizationOptions) -> Self {
        Self { options }
    }

    /// Sets the strip setting; accepts a `bool`, a [`StripMode`] or a [`Strip`].
    pub fn strip(mut self, strip: impl Into<Strip>) -> Self {
        self.options.strip = strip.into();
        self
    }

    /// Strips only the given metadata category.
    pub fn strip_mode(self, mode: StripMode) -> Self {
        self.strip(mode)
    }

    /// Disables the strip flag entirely.
    pub fn no_strip(self) -> Self {
        self.strip(Strip::Disabled)
    }

    pub fn preserve_timestamps(mut self, preserve: bool) -> Self {
        self.options.preserve_timestamps = preserve;
        self
    }

    pub fn max_quality(mut self, quality: u64) -> Self {
        self.options.max_quality = Some(quality);
        self
    }

    /// Clears a previously set maximum quality.
    pub fn clear_max_quality(mut self) -> Self {
        self.options.max_quality = None;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.options.debug = debug;
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> OptimizationOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default_options() {
        assert_eq!(
            OptimizationOptionsBuilder::new().build(),
            OptimizationOptions::default()
        );
    }

    #[test]
    fn test_builder_chaining() {
        let options = OptimizationOptionsBuilder::new()
            .no_strip()
            .preserve_timestamps(true)
            .max_quality(90)
            .debug(true)
            .build();

        assert_eq!(options.strip, Strip::Disabled);
        assert!(options.preserve_timestamps);
        assert_eq!(options.max_quality, Some(90));
        assert!(options.debug);
    }

    #[test]
    fn test_builder_from_options_overrides() {
        let loaded = OptimizationOptions {
            strip: Strip::Mode(StripMode::Com),
            preserve_timestamps: true,
            max_quality: Some(60),
            debug: false,
        };

        let options = OptimizationOptionsBuilder::from_options(loaded)
            .strip(true)
            .clear_max_quality()
            .build();

        assert_eq!(options.strip, Strip::Mode(StripMode::All));
        assert!(options.preserve_timestamps);
        assert_eq!(options.max_quality, None);
    }
}
