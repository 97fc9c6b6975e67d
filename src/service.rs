use image::RgbImage;
use tracing::{debug, warn};

use crate::codec;
use crate::config::Settings;
use crate::detection::DetectionPipeline;
use crate::error::{ImagingError, Result};
use crate::models::{DetectionResult, Phase};
use crate::phase::PhaseFilterEngine;
use crate::pipeline::PipelineContext;

/// The two operations exposed to a surrounding service layer.
///
/// Holds only immutable configuration; every call decodes its own buffers,
/// so one instance can be shared across threads.
pub struct ImagingService {
    settings: Settings,
    phases: PhaseFilterEngine,
    detection: DetectionPipeline,
}

impl ImagingService {
    pub fn new(settings: Settings) -> Self {
        Self {
            phases: PhaseFilterEngine::new(settings.phase.clone()),
            detection: DetectionPipeline::new(settings.detection.clone()),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply the named phase transform.
    ///
    /// The phase is validated before the upload is looked at, and the upload guard
    /// runs before decoding.
    pub fn process_image(&self, bytes: &[u8], phase: &str) -> Result<RgbImage> {
        let phase: Phase = phase.parse()?;
        let format = codec::check_upload(bytes, &self.settings.upload)?;
        debug!(?format, %phase, "Processing upload of {} bytes", bytes.len());

        let image = codec::decode(bytes)?;
        Ok(self.phases.apply(&image, phase))
    }

    /// `process_image` followed by PNG encoding
    pub fn process_image_png(&self, bytes: &[u8], phase: &str) -> Result<Vec<u8>> {
        let processed = self.process_image(bytes, phase)?;
        codec::encode_png(&processed)
    }

    /// Detect a liver-like region; undecodable bytes count as nothing detected
    pub fn analyze_image(&self, bytes: &[u8]) -> DetectionResult {
        match self.analyze_image_with(bytes, &PipelineContext::new()) {
            Ok(result) => result,
            Err(e) => {
                warn!("Detection failed: {}", e);
                DetectionResult::not_detected()
            }
        }
    }

    /// Like `analyze_image`, but with a caller-supplied context (e.g. debug output).
    ///
    /// Decode failures still map to the not-detected result; only debug I/O errors surface.
    pub fn analyze_image_with(
        &self,
        bytes: &[u8],
        context: &PipelineContext,
    ) -> Result<DetectionResult> {
        let decoded = match codec::decode_with_gray(bytes) {
            Ok(decoded) => decoded,
            Err(ImagingError::Decode(reason)) => {
                warn!("Could not decode upload, reporting no detection: {}", reason);
                return Ok(DetectionResult::not_detected());
            }
            Err(e) => return Err(e),
        };
        self.detection.detect(&decoded, context)
    }
}

impl Default for ImagingService {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
