pub mod codec;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod phase;
pub mod pipeline;
pub mod service;

pub use crate::config::{DetectionConfig, PhaseConfig, Settings, UploadConfig, UploadFormat};
pub use detection::DetectionPipeline;
pub use error::{ImagingError, Result};
pub use models::{BoundingBox, Contour, DetectionResult, Frame, Phase};
pub use phase::PhaseFilterEngine;
pub use pipeline::{DebugConfig, PipelineContext, PipelineStep};
pub use service::ImagingService;
