//! Engine configuration
//!
//! Every knob has a default matching the production template, so an empty
//! JSON object is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Default output-size ceiling: 15 MiB
pub const DEFAULT_SIZE_CEILING: usize = 15 * 1024 * 1024;
pub const DEFAULT_QUALITY_STEP: u8 = 5;
pub const DEFAULT_QUALITY_FLOOR: u8 = 70;

/// What to do with sections holding more images than their capture limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageLimitPolicy {
    /// Keep only the first `max_images` images
    #[default]
    Clamp,
    /// Render every image, continuing on extra pages
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest acceptable serialized PDF, in bytes
    pub size_ceiling_bytes: usize,
    /// Quality decrement between assembly attempts
    pub quality_step: u8,
    /// Lowest document quality attempted before giving up
    pub quality_floor: u8,
    /// Flate-compress page content streams
    pub compress_streams: bool,
    pub image_limit_policy: ImageLimitPolicy,
    /// Corporate logo drawn in every page header
    pub logo_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size_ceiling_bytes: DEFAULT_SIZE_CEILING,
            quality_step: DEFAULT_QUALITY_STEP,
            quality_floor: DEFAULT_QUALITY_FLOOR,
            compress_streams: true,
            image_limit_policy: ImageLimitPolicy::default(),
            logo_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> ReportResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.quality_step == 0 {
            return Err(ReportError::Config("quality_step must be at least 1".into()));
        }
        if self.quality_floor > 100 {
            return Err(ReportError::Config(format!(
                "quality_floor {} is above 100",
                self.quality_floor
            )));
        }
        if self.size_ceiling_bytes == 0 {
            return Err(ReportError::Config("size_ceiling_bytes must be positive".into()));
        }
        Ok(())
    }
}
