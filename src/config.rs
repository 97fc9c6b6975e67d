use image::ImageFormat;
use serde::Deserialize;

/// Top-level configuration, built once at startup and handed to the engines
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub phase: PhaseConfig,
    pub detection: DetectionConfig,
    pub upload: UploadConfig,
}

/// Parameters of the two contrast-phase transforms
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Contrast multiplier applied around each channel's mean (arterial)
    pub arterial_contrast_factor: f64,
    /// Gaussian kernel radius in pixels (venous)
    pub venous_blur_radius: u32,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            arterial_contrast_factor: 1.8,
            venous_blur_radius: 3,
        }
    }
}

/// Empirical geometry constants for liver-region detection.
///
/// Ratios are relative to the full frame: areas to `width * height`, positions
/// to `width` (x) or `height` (y).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Diameter of the elliptical closing element
    pub closing_kernel_size: u32,
    pub closing_iterations: u32,
    /// Candidates below this share of the frame are noise
    pub min_area_ratio: f64,
    pub aspect_min: f64,
    pub aspect_max: f64,
    pub centroid_x_min_ratio: f64,
    pub centroid_x_max_ratio: f64,
    pub centroid_y_min_ratio: f64,
    pub centroid_y_max_ratio: f64,
    /// Expected organ footprint; confidence saturates at this share of the frame
    pub target_area_ratio: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            closing_kernel_size: 15,
            closing_iterations: 2,
            min_area_ratio: 0.02,
            aspect_min: 0.4,
            aspect_max: 2.5,
            centroid_x_min_ratio: 0.10,
            centroid_x_max_ratio: 0.90,
            centroid_y_min_ratio: 0.15,
            centroid_y_max_ratio: 0.85,
            target_area_ratio: 0.25,
        }
    }
}

/// Encoded formats accepted by the upload guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    Jpeg,
    Png,
    Bmp,
    WebP,
}

impl UploadFormat {
    pub fn matches(&self, format: ImageFormat) -> bool {
        matches!(
            (self, format),
            (UploadFormat::Jpeg, ImageFormat::Jpeg)
                | (UploadFormat::Png, ImageFormat::Png)
                | (UploadFormat::Bmp, ImageFormat::Bmp)
                | (UploadFormat::WebP, ImageFormat::WebP)
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: usize,
    pub allowed_formats: Vec<UploadFormat>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            allowed_formats: vec![
                UploadFormat::Jpeg,
                UploadFormat::Png,
                UploadFormat::Bmp,
                UploadFormat::WebP,
            ],
        }
    }
}

impl Settings {
    /// Layer an optional config file under `PHASESCAN_*` environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `PHASESCAN_DETECTION__MIN_AREA_RATIO`.
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }
        builder
            .add_source(
                ::config::Environment::with_prefix("PHASESCAN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
