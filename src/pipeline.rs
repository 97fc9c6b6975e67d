use std::path::PathBuf;

use image::DynamicImage;
use tracing::debug;

use crate::error::{ImagingError, Result};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(ImagingError::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("Debug directory is not empty: {}", output_dir.display()),
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.is_some()
    }

    /// Save an intermediate raster as `{index:02}_{step_name}.png` when debug mode is on
    pub fn save_debug(&self, index: usize, step_name: &str, image: &DynamicImage) -> Result<()> {
        let Some(debug_config) = &self.debug else {
            return Ok(());
        };

        let filename = format!(
            "{:02}_{}.png",
            index,
            step_name.to_lowercase().replace(' ', "_")
        );
        let output_path = debug_config.output_dir.join(&filename);
        image
            .save(&output_path)
            .map_err(|e| ImagingError::Encode(format!("Failed to save debug image: {}", e)))?;

        debug!("Debug: saved {}", filename);
        Ok(())
    }
}

/// One typed stage of a processing pipeline
pub trait PipelineStep: Send + Sync {
    type Input;
    type Output;

    fn process(&self, input: Self::Input, context: &PipelineContext) -> Result<Self::Output>;

    /// Name used in logs and debug file names
    fn name(&self) -> &str;
}

/// Run a single step with logging
pub fn run_step<S: PipelineStep>(
    step: &S,
    input: S::Input,
    context: &PipelineContext,
) -> Result<S::Output> {
    debug!("Running step: {}", step.name());
    step.process(input, context)
}
