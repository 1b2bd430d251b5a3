use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, SubburnError};

/// Ordered subtitle keywords appended to a title when searching.
/// Earlier entries are tried first.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "sub",
    "eng sub",
    "english sub",
    "sub español",
    "subtitulado",
    "sub rus",
    "русские субтитры",
];

/// Ordered keyword -> language table. Longer, more specific keys come first
/// so that e.g. "sub español" wins before the bare "es".
pub const DEFAULT_LANGUAGE_RULES: &[(&str, &str)] = &[
    ("english sub", "English"),
    ("eng sub", "English"),
    ("sub español", "Spanish"),
    ("subtitulado", "Spanish"),
    ("español", "Spanish"),
    ("spanish", "Spanish"),
    ("sub rus", "Russian"),
    ("русские", "Russian"),
    ("russian", "Russian"),
    ("rus", "Russian"),
    ("japanese", "Japanese"),
    ("korean", "Korean"),
    ("chinese", "Chinese"),
    ("vostfr", "French"),
    ("french", "French"),
    ("english", "English"),
    ("eng", "English"),
    ("esp", "Spanish"),
    ("es", "Spanish"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub search: SearchConfig,
    pub region: RegionConfig,
    pub language: LanguageConfig,
    pub media: MediaConfig,
    pub extractor: ExtractorConfig,
    pub translate: TranslateConfig,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Final video with burned subtitles
    pub output: PathBuf,
    /// Root directory for intermediate files
    pub workdir: PathBuf,
    /// Create a fresh sub-directory of `workdir` for every run. When off,
    /// `workdir` itself must be empty or missing.
    pub isolate_runs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Path to yt-dlp binary
    pub binary_path: String,
    /// Format selector passed to `-f`
    pub format: String,
    /// Ordered subtitle keywords
    pub keywords: Vec<String>,
}

/// Subtitle band measured on a reference frame height; spans the full width.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub reference_height: u32,
    pub band_top: u32,
    pub band_bottom: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub rules: Vec<LanguageRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRule {
    pub keyword: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub ffmpeg_path: String,
    /// Path to ffprobe binary
    pub ffprobe_path: String,
    /// Additional encoding options for subtitle burning
    /// Common options: ["-preset", "medium", "-crf", "23", "-pix_fmt", "yuv420p"]
    pub subtitle_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// OCR subtitle extractor binary
    pub binary_path: String,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Subtitle translator binary
    pub binary_path: String,
    /// Flag used to pass the source language hint
    pub source_language_flag: String,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    pub api_base: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output.mp4"),
            workdir: PathBuf::from("work"),
            isolate_runs: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            binary_path: "yt-dlp".to_string(),
            format: "bestvideo[height>=1080]+bestaudio/best[height>=1080]".to_string(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            reference_height: 1080,
            band_top: 843,
            band_bottom: 1070,
        }
    }
}

impl RegionConfig {
    /// The band must be a non-empty range inside the reference frame.
    pub fn validate(&self) -> Result<()> {
        if self.reference_height == 0 {
            return Err(SubburnError::Config("region.reference_height must be positive".to_string()));
        }
        if self.band_top >= self.band_bottom {
            return Err(SubburnError::Config(format!(
                "region.band_top ({}) must be above region.band_bottom ({})",
                self.band_top, self.band_bottom
            )));
        }
        if self.band_bottom > self.reference_height {
            return Err(SubburnError::Config(format!(
                "region.band_bottom ({}) exceeds region.reference_height ({})",
                self.band_bottom, self.reference_height
            )));
        }
        Ok(())
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            rules: DEFAULT_LANGUAGE_RULES
                .iter()
                .map(|(keyword, language)| LanguageRule {
                    keyword: keyword.to_string(),
                    language: language.to_string(),
                })
                .collect(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            subtitle_options: Vec::new(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary_path: "videocr".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            binary_path: "chatgpt-subtitle-translator".to_string(),
            source_language_flag: "--from".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            token: None,
            chat_id: None,
            api_base: "https://api.telegram.org".to_string(),
        }
    }
}

impl DeliveryConfig {
    /// Credentials are usable only when both token and chat id are non-empty.
    pub fn credentials(&self) -> Option<DeliveryCredentials> {
        let token = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let chat_id = self.chat_id.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
        Some(DeliveryCredentials {
            token: token.to_string(),
            recipient: chat_id.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryCredentials {
    pub token: String,
    pub recipient: String,
}

/// Immutable per-run settings handed to the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output: PathBuf,
    pub workdir: PathBuf,
    pub delivery: Option<DeliveryCredentials>,
}

impl RunConfig {
    pub fn from_config(config: &Config) -> Self {
        let workdir = if config.pipeline.isolate_runs {
            isolated_workdir(&config.pipeline.workdir)
        } else {
            config.pipeline.workdir.clone()
        };

        Self {
            output: config.pipeline.output.clone(),
            workdir,
            delivery: config.delivery.credentials(),
        }
    }
}

/// `<root>/<timestamp>-<short uuid>`, distinct per call.
pub fn isolated_workdir(root: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let id = uuid::Uuid::new_v4().simple().to_string();
    root.join(format!("{}-{}", stamp, &id[..8]))
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubburnError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| SubburnError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.region.validate()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubburnError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubburnError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("config.toml");
        file.write_str("[pipeline]\noutput = \"out/final.mp4\"\n\n[delivery]\ntoken = \"abc\"\n")
            .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.pipeline.output, PathBuf::from("out/final.mp4"));
        assert_eq!(config.pipeline.workdir, PathBuf::from("work"));
        assert_eq!(config.region.band_top, 843);
        assert_eq!(config.search.keywords[0], "sub");
        assert_eq!(config.delivery.token.as_deref(), Some("abc"));
        assert!(config.delivery.credentials().is_none());
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.child("config.toml");

        let mut config = Config::default();
        config.delivery.token = Some("token".to_string());
        config.delivery.chat_id = Some("42".to_string());
        config.save_to_file(path.path()).unwrap();

        let loaded = Config::from_file(path.path()).unwrap();
        assert_eq!(loaded.language.rules, config.language.rules);
        assert_eq!(loaded.search.keywords, config.search.keywords);
        assert_eq!(
            loaded.delivery.credentials(),
            Some(DeliveryCredentials {
                token: "token".to_string(),
                recipient: "42".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("config.toml");
        file.write_str("[region]\nband_top = \"high\"\n").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SubburnError::Config(_)));
    }

    #[test]
    fn test_blank_credentials_are_absent() {
        let delivery = DeliveryConfig {
            token: Some("  ".to_string()),
            chat_id: Some("1".to_string()),
            ..DeliveryConfig::default()
        };
        assert!(delivery.credentials().is_none());
    }

    #[test]
    fn test_default_runs_get_distinct_workdirs() {
        let config = Config::default();

        let first = RunConfig::from_config(&config);
        let second = RunConfig::from_config(&config);
        assert_ne!(first.workdir, second.workdir);
        assert!(first.workdir.starts_with("work"));
        assert_ne!(first.workdir, PathBuf::from("work"));
    }

    #[test]
    fn test_shared_workdir_when_isolation_disabled() {
        let mut config = Config::default();
        config.pipeline.isolate_runs = false;
        assert_eq!(RunConfig::from_config(&config).workdir, PathBuf::from("work"));
    }

    #[test]
    fn test_invalid_region_band_is_rejected() {
        let zero_height = RegionConfig { reference_height: 0, ..RegionConfig::default() };
        assert!(matches!(zero_height.validate(), Err(SubburnError::Config(_))));

        let inverted = RegionConfig { reference_height: 1080, band_top: 1070, band_bottom: 843 };
        assert!(matches!(inverted.validate(), Err(SubburnError::Config(_))));

        let outside = RegionConfig { reference_height: 1080, band_top: 843, band_bottom: 2000 };
        assert!(matches!(outside.validate(), Err(SubburnError::Config(_))));

        assert!(RegionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_file_with_inverted_band_is_config_error() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("config.toml");
        file.write_str("[region]\nband_top = 1070\nband_bottom = 843\n").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SubburnError::Config(_)));
    }
}
