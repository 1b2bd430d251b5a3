use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::error::{Result, SubburnError};
use crate::media::ToolCommand;
use super::VideoSource;

pub struct YtDlpSource {
    config: SearchConfig,
}

impl YtDlpSource {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    fn search_command(&self, query: &str) -> ToolCommand {
        ToolCommand::new(&self.config.binary_path, "Video search")
            .args(["--skip-download", "--get-title", "--no-warnings"])
            .arg(search_target(query))
    }

    fn download_command(&self, query: &str, destination: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.binary_path, "Video download")
            .arg("-f")
            .arg(&self.config.format)
            .args(["--merge-output-format", "mp4"])
            .arg("--force-overwrites")
            .arg("-o")
            .path(destination)
            .arg(search_target(query))
    }
}

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn search_first_result(&self, query: &str) -> Result<Option<String>> {
        let output = self.search_command(query).execute().await?;
        let title = first_title(&output.stdout);
        debug!("Search {:?} -> {:?}", query, title);
        Ok(title)
    }

    async fn download(&self, query: &str, destination: &Path) -> Result<()> {
        info!("Downloading {:?} to {}", query, destination.display());
        self.download_command(query, destination)
            .execute()
            .await
            .map_err(|e| SubburnError::Download(e.to_string()))?;
        Ok(())
    }
}

fn search_target(query: &str) -> String {
    format!("ytsearch1:{}", query)
}

fn first_title(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_title_skips_blank_lines() {
        assert_eq!(first_title("\n  Movie [Eng Sub]  \nOther\n"), Some("Movie [Eng Sub]".to_string()));
        assert_eq!(first_title(" \n\n"), None);
    }

    #[test]
    fn test_download_command() {
        let source = YtDlpSource::new(SearchConfig::default());
        let cmd = source.download_command("Movie eng sub", Path::new("work/sub_video.mp4"));

        assert_eq!(cmd.binary_path, "yt-dlp");
        assert_eq!(
            cmd.args,
            vec![
                "-f",
                "bestvideo[height>=1080]+bestaudio/best[height>=1080]",
                "--merge-output-format",
                "mp4",
                "--force-overwrites",
                "-o",
                "work/sub_video.mp4",
                "ytsearch1:Movie eng sub",
            ]
        );
    }

    #[test]
    fn test_search_command_targets_first_result() {
        let source = YtDlpSource::new(SearchConfig::default());
        let cmd = source.search_command("Movie");
        assert_eq!(cmd.args.last().map(String::as_str), Some("ytsearch1:Movie"));
    }
}
