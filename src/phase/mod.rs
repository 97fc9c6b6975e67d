pub mod filters;

use image::RgbImage;
use tracing::debug;

use crate::config::PhaseConfig;
use crate::models::Phase;

/// Applies the fixed contrast-phase transforms
#[derive(Debug, Clone, Default)]
pub struct PhaseFilterEngine {
    config: PhaseConfig,
}

impl PhaseFilterEngine {
    pub fn new(config: PhaseConfig) -> Self {
        Self { config }
    }

    /// Transform a color raster; output dimensions always equal the input's
    pub fn apply(&self, image: &RgbImage, phase: Phase) -> RgbImage {
        debug!(%phase, width = image.width(), height = image.height(), "Applying phase filter");
        match phase {
            Phase::Arterial => {
                filters::enhance_contrast(image, self.config.arterial_contrast_factor)
            }
            Phase::Venous => filters::gaussian_blur(image, self.config.venous_blur_radius),
        }
    }
}
