use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::info;
use walkdir::WalkDir;

use crate::config::ExtractorConfig;
use crate::error::{Result, SubburnError};
use crate::region::SubtitleRegion;
use super::{SubtitleExtractor, ToolCommand};

/// Runs an OCR subtitle extractor restricted to the subtitle region.
///
/// The tool writes into an `extract/` directory next to the video; the newest
/// `.srt` found there afterwards is taken as its output.
pub struct CommandExtractor {
    config: ExtractorConfig,
}

impl CommandExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn command(&self, video: &Path, region: SubtitleRegion, output_dir: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.binary_path, "Subtitle extraction")
            .arg("--input")
            .path(video)
            .arg("--output-dir")
            .path(output_dir)
            .arg("--crop")
            .arg(format!("{}:{}:{}:{}", region.x_min, region.y_min, region.x_max, region.y_max))
            .args(self.config.extra_args.iter().cloned())
    }
}

#[async_trait]
impl SubtitleExtractor for CommandExtractor {
    async fn extract_subtitles(&self, video: &Path, region: SubtitleRegion) -> Result<PathBuf> {
        let output_dir = video
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("extract");
        prepare_output_dir(&output_dir).await?;

        info!("Extracting subtitles from {} ({})", video.display(), region);
        self.command(video, region, &output_dir)
            .execute()
            .await
            .map_err(|e| SubburnError::Extraction(e.to_string()))?;

        let produced = newest_subtitle_file(&output_dir).ok_or_else(|| {
            SubburnError::Extraction(format!(
                "Extractor produced no subtitle file in {}",
                output_dir.display()
            ))
        })?;

        info!("Subtitle extraction produced {}", produced.display());
        Ok(produced)
    }
}

/// Empties `dir` so only files written by this extraction can be picked up.
async fn prepare_output_dir(dir: &Path) -> Result<()> {
    if fs::try_exists(dir).await? {
        fs::remove_dir_all(dir).await?;
    }
    fs::create_dir_all(dir).await?;
    Ok(())
}

/// Most recently modified `.srt` below `dir`.
pub fn newest_subtitle_file(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("srt"))
                .unwrap_or(false)
        })
        .filter_map(|e| {
            let modified = e.metadata().ok()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            Some((modified, e.into_path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_passes_region_as_crop() {
        let extractor = CommandExtractor::new(ExtractorConfig {
            binary_path: "ocr".to_string(),
            extra_args: vec!["--lang".to_string(), "en".to_string()],
        });
        let region = SubtitleRegion { y_min: 843, y_max: 1070, x_min: 0, x_max: 1920 };
        let cmd = extractor.command(Path::new("work/sub_video.mp4"), region, Path::new("work/extract"));

        assert_eq!(
            cmd.args,
            vec![
                "--input", "work/sub_video.mp4",
                "--output-dir", "work/extract",
                "--crop", "0:843:1920:1070",
                "--lang", "en",
            ]
        );
    }

    #[test]
    fn test_newest_subtitle_file_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("frames.txt"), "x").unwrap();
        assert_eq!(newest_subtitle_file(dir.path()), None);

        let srt = dir.path().join("sub_video.srt");
        std::fs::write(&srt, "1\n00:00:01,000 --> 00:00:02,000\nHi\n").unwrap();
        assert_eq!(newest_subtitle_file(dir.path()), Some(srt));
    }

    #[test]
    fn test_stale_subtitles_are_cleared_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("extract");
        std::fs::create_dir_all(&output_dir).unwrap();
        std::fs::write(output_dir.join("previous.srt"), "stale").unwrap();

        tokio_test::block_on(prepare_output_dir(&output_dir)).unwrap();

        assert!(output_dir.is_dir());
        assert_eq!(newest_subtitle_file(&output_dir), None);
    }
}
