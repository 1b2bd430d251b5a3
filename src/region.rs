use std::fmt;

use crate::config::RegionConfig;
use crate::error::Result;

/// Pixel dimensions of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rectangle scanned for subtitle text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitleRegion {
    pub y_min: u32,
    pub y_max: u32,
    pub x_min: u32,
    pub x_max: u32,
}

impl SubtitleRegion {
    /// `(y_min, y_max, x_min, x_max)`
    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.y_min, self.y_max, self.x_min, self.x_max)
    }
}

impl fmt::Display for SubtitleRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y {}..{}, x {}..{}",
            self.y_min, self.y_max, self.x_min, self.x_max
        )
    }
}

/// Scales a subtitle band measured on a reference frame height to any
/// resolution.
///
/// The band is assumed to sit at the same relative height for every source.
/// That holds for 16:9 material; letterboxed or portrait video can place
/// subtitles elsewhere.
#[derive(Debug, Clone)]
pub struct RegionEstimator {
    config: RegionConfig,
}

impl RegionEstimator {
    /// Fails with a configuration error for an empty or out-of-frame band.
    pub fn new(config: RegionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn estimate(&self, resolution: Resolution) -> SubtitleRegion {
        SubtitleRegion {
            y_min: self.scale(resolution.height, self.config.band_top),
            y_max: self.scale(resolution.height, self.config.band_bottom),
            x_min: 0,
            x_max: resolution.width,
        }
    }

    // Truncating integer scale. The band lies inside the reference frame, so
    // the result never exceeds `height`.
    fn scale(&self, height: u32, reference_row: u32) -> u32 {
        let scaled =
            u64::from(height) * u64::from(reference_row) / u64::from(self.config.reference_height);
        u32::try_from(scaled).unwrap_or(height)
    }
}

impl Default for RegionEstimator {
    fn default() -> Self {
        Self {
            config: RegionConfig::default(),
        }
    }
}

/// Subtitle region for a `width`x`height` frame using the default 1080p band.
pub fn calc_subtitle_area(width: u32, height: u32) -> SubtitleRegion {
    RegionEstimator::default().estimate(Resolution::new(width, height))
}
