//! Configuration types for cutout pipeline operations

use serde::{Deserialize, Serialize};

/// Default feather radius for edge smoothing on hard-labelled maps
pub const DEFAULT_FEATHER_RADIUS: u32 = 2;

/// Largest accepted feather radius
const MAX_FEATHER_RADIUS: u32 = 16;

/// RGBA color used for one side of the mask color pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl MaskColor {
    /// Create a new mask color with RGBA values
    ///
    /// # Examples
    /// ```rust
    /// use person_cutout::MaskColor;
    /// let half_gray = MaskColor::new(128, 128, 128, 255);
    /// assert_eq!(half_gray.a, 255);
    /// ```
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white (255, 255, 255, 255), the default foreground color
    #[must_use]
    pub fn opaque_white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Fully transparent black (0, 0, 0, 0), the default background color
    #[must_use]
    pub fn transparent_black() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Convert to an `image` crate RGBA pixel
    #[must_use]
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Configuration for cutout pipeline operations
///
/// The foreground/background color pair determines mask polarity. With
/// `inverted` set, the pair is swapped before synthesis, so the mask marks
/// everything that is *not* the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoutConfig {
    /// Feather mask edges instead of hard-thresholding every pixel
    pub smooth_edges: bool,

    /// Swap the foreground/background color pair before synthesis
    pub inverted: bool,

    /// Color emitted for pixels classified as subject
    pub foreground: MaskColor,

    /// Color emitted for pixels classified as background
    pub background: MaskColor,

    /// Neighborhood radius used to feather hard-labelled maps (1-16)
    pub feather_radius: u32,
}

impl Default for CutoutConfig {
    fn default() -> Self {
        Self {
            smooth_edges: true,
            inverted: false,
            foreground: MaskColor::opaque_white(),
            background: MaskColor::transparent_black(),
            feather_radius: DEFAULT_FEATHER_RADIUS,
        }
    }
}

impl CutoutConfig {
    /// Create a new configuration builder for fluent API construction
    ///
    /// # Examples
    ///
    /// ```rust
    /// use person_cutout::{CutoutConfig, MaskColor};
    ///
    /// let config = CutoutConfig::builder()
    ///     .smooth_edges(false)
    ///     .inverted(true)
    ///     .foreground(MaskColor::new(255, 0, 0, 255))
    ///     .build()
    ///     .unwrap();
    /// assert!(config.inverted);
    /// ```
    #[must_use]
    pub fn builder() -> CutoutConfigBuilder {
        CutoutConfigBuilder::default()
    }

    /// The color pair in synthesis order, with inversion applied
    ///
    /// Returns `(foreground, background)` as the synthesizer should use
    /// them. Inversion is realized purely by swapping the pair here; the
    /// synthesizer itself is polarity-agnostic.
    #[must_use]
    pub fn effective_colors(&self) -> (MaskColor, MaskColor) {
        if self.inverted {
            (self.background, self.foreground)
        } else {
            (self.foreground, self.background)
        }
    }

    /// Validate all configuration parameters
    ///
    /// # Errors
    ///
    /// Returns `CutoutError::InvalidConfig` when the feather radius is zero
    /// or larger than the supported maximum.
    pub fn validate(&self) -> crate::Result<()> {
        if self.feather_radius == 0 {
            return Err(crate::error::CutoutError::invalid_config(
                "Feather radius must be at least 1",
            ));
        }
        if self.feather_radius > MAX_FEATHER_RADIUS {
            return Err(crate::error::CutoutError::invalid_config(format!(
                "Feather radius must be at most {MAX_FEATHER_RADIUS}, got {}",
                self.feather_radius
            )));
        }
        Ok(())
    }
}

/// Builder for `CutoutConfig`
#[derive(Debug, Default)]
pub struct CutoutConfigBuilder {
    config: CutoutConfig,
}

impl CutoutConfigBuilder {
    /// Enable or disable edge smoothing
    #[must_use]
    pub fn smooth_edges(mut self, smooth: bool) -> Self {
        self.config.smooth_edges = smooth;
        self
    }

    /// Enable or disable mask polarity inversion
    #[must_use]
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.config.inverted = inverted;
        self
    }

    /// Set the foreground (subject) color
    #[must_use]
    pub fn foreground(mut self, color: MaskColor) -> Self {
        self.config.foreground = color;
        self
    }

    /// Set the background color
    #[must_use]
    pub fn background(mut self, color: MaskColor) -> Self {
        self.config.background = color;
        self
    }

    /// Set the feather radius used for hard-labelled maps
    #[must_use]
    pub fn feather_radius(mut self, radius: u32) -> Self {
        self.config.feather_radius = radius;
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `CutoutError::InvalidConfig` when validation fails; see
    /// [`CutoutConfig::validate`].
    pub fn build(self) -> crate::Result<CutoutConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}
