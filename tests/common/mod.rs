mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from phasescan for tests
pub use phasescan::{
    BoundingBox, DetectionConfig, DetectionResult, ImagingError, ImagingService, Phase,
    PhaseConfig, PhaseFilterEngine, PipelineContext, Settings, UploadConfig, UploadFormat,
};
