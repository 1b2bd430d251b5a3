// Media tooling behind the pipeline's extraction, probing and burning stages
//
// - Commands: external tool invocation shared by every collaborator
// - Processor: ffprobe/ffmpeg backed probing and burning
// - Extractor: OCR tool that reads subtitles out of a frame region

pub mod commands;
pub mod extractor;
pub mod processor;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use commands::*;
pub use extractor::*;
pub use processor::*;

use crate::config::{ExtractorConfig, MediaConfig};
use crate::error::Result;
use crate::region::{Resolution, SubtitleRegion};

/// Reads the pixel dimensions of a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe_resolution(&self, video: &Path) -> Result<Resolution>;
}

/// Turns burned-in subtitles back into a timed-text file
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubtitleExtractor: Send + Sync {
    /// Returns wherever the extractor chose to write its output.
    async fn extract_subtitles(&self, video: &Path, region: SubtitleRegion) -> Result<PathBuf>;
}

/// Composites a subtitle file into video frames
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubtitleBurner: Send + Sync {
    async fn burn(&self, video: &Path, subtitles: &Path, output: &Path) -> Result<()>;
}

pub struct MediaFactory;

impl MediaFactory {
    pub fn create_probe(config: MediaConfig) -> Box<dyn MediaProbe> {
        Box::new(FfprobeProbe::new(config))
    }

    pub fn create_burner(config: MediaConfig) -> Box<dyn SubtitleBurner> {
        Box::new(FfmpegBurner::new(config))
    }

    pub fn create_extractor(config: ExtractorConfig) -> Box<dyn SubtitleExtractor> {
        Box::new(CommandExtractor::new(config))
    }
}
