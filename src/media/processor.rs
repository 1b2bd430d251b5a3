use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::{Result, SubburnError};
use crate::region::Resolution;
use super::{MediaProbe, SubtitleBurner, ToolCommand};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Resolution lookup through ffprobe
pub struct FfprobeProbe {
    config: MediaConfig,
}

impl FfprobeProbe {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    fn command(&self, video: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.ffprobe_path, "Resolution probe")
            .args(["-v", "error", "-select_streams", "v:0"])
            .args(["-show_entries", "stream=width,height", "-of", "json"])
            .path(video)
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn probe_resolution(&self, video: &Path) -> Result<Resolution> {
        if !video.is_file() {
            return Err(SubburnError::Probe(format!("{} is not a readable file", video.display())));
        }

        let output = self
            .command(video)
            .execute()
            .await
            .map_err(|e| SubburnError::Probe(e.to_string()))?;

        let resolution = parse_probe_output(&output.stdout)?;
        info!("{} is {}", video.display(), resolution);
        Ok(resolution)
    }
}

/// Parse `ffprobe -of json` output for the first video stream.
pub fn parse_probe_output(json: &str) -> Result<Resolution> {
    let parsed: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| SubburnError::Probe(format!("Unreadable ffprobe output: {}", e)))?;

    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| SubburnError::Probe("No video stream found".to_string()))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok(Resolution::new(width, height)),
        _ => Err(SubburnError::Probe("Video stream has no dimensions".to_string())),
    }
}

/// Burns subtitles with ffmpeg's `subtitles` filter
pub struct FfmpegBurner {
    config: MediaConfig,
}

impl FfmpegBurner {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    fn command(&self, video: &Path, subtitles: &Path, output: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.config.ffmpeg_path, "Subtitle burning")
            .overwrite()
            .input(video)
            .video_filter(format!("subtitles={}", escape_filter_path(subtitles)))
            .video_codec("libx264") // Filters require re-encoding
            .copy_audio();

        for option in &self.config.subtitle_options {
            cmd = cmd.arg(option);
        }

        cmd.path(output)
    }
}

#[async_trait]
impl SubtitleBurner for FfmpegBurner {
    async fn burn(&self, video: &Path, subtitles: &Path, output: &Path) -> Result<()> {
        info!(
            "Burning subtitles from {} into {} -> {}",
            subtitles.display(),
            video.display(),
            output.display()
        );

        let command = self.command(video, subtitles, output);
        debug!("ffmpeg arguments: {:?}", command.args);
        command
            .execute()
            .await
            .map_err(|e| SubburnError::Burn(e.to_string()))?;

        info!("Subtitle burning completed");
        Ok(())
    }
}

/// Escape a path for use as a filtergraph option value.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{"programs": [], "streams": [{"width": 1920, "height": 1080}]}"#;
        assert_eq!(parse_probe_output(json).unwrap(), Resolution::new(1920, 1080));
    }

    #[test]
    fn test_parse_probe_output_without_stream() {
        let err = parse_probe_output(r#"{"streams": []}"#).unwrap_err();
        assert!(matches!(err, SubburnError::Probe(_)));

        let err = parse_probe_output("{}").unwrap_err();
        assert!(matches!(err, SubburnError::Probe(_)));
    }

    #[test]
    fn test_parse_probe_output_garbage() {
        assert!(matches!(parse_probe_output("not json"), Err(SubburnError::Probe(_))));
    }

    #[test]
    fn test_escape_filter_path() {
        assert_eq!(escape_filter_path(Path::new("C:\\work\\it's.srt")), "C\\:\\\\work\\\\it\\'s.srt");
        assert_eq!(escape_filter_path(Path::new("work/translated.srt")), "work/translated.srt");
    }

    #[test]
    fn test_burn_command_appends_user_options_before_output() {
        let config = MediaConfig {
            subtitle_options: vec!["-crf".to_string(), "23".to_string()],
            ..MediaConfig::default()
        };
        let burner = FfmpegBurner::new(config);
        let cmd = burner.command(
            Path::new("clean.mp4"),
            Path::new("translated.srt"),
            Path::new("out.mp4"),
        );

        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(cmd.args[cmd.args.len() - 3..], ["-crf", "23", "out.mp4"]);
        assert!(cmd.args.contains(&"subtitles=translated.srt".to_string()));
    }

    #[tokio::test]
    async fn test_probe_missing_file_is_probe_error() {
        let probe = FfprobeProbe::new(MediaConfig::default());
        let err = probe
            .probe_resolution(Path::new("/nonexistent/video.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubburnError::Probe(_)));
    }
}
