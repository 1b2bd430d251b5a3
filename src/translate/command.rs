use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::config::TranslateConfig;
use crate::error::{Result, SubburnError};
use crate::language::Language;
use crate::media::ToolCommand;
use super::SubtitleTranslator;

/// `<translator> <input> <output> [--from <language>]`
pub struct CommandTranslator {
    config: TranslateConfig,
}

impl CommandTranslator {
    pub fn new(config: TranslateConfig) -> Self {
        Self { config }
    }

    fn command(&self, input: &Path, output: &Path, source_language: Option<&Language>) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.config.binary_path, "Subtitle translation")
            .path(input)
            .path(output);

        if let Some(language) = source_language.and_then(Language::as_hint) {
            cmd = cmd.arg(&self.config.source_language_flag).arg(language);
        }

        cmd.args(self.config.extra_args.iter().cloned())
    }
}

#[async_trait]
impl SubtitleTranslator for CommandTranslator {
    async fn translate(
        &self,
        input: &Path,
        output: &Path,
        source_language: Option<Language>,
    ) -> Result<()> {
        match &source_language {
            Some(language) => info!("Translating {} from {}", input.display(), language),
            None => info!("Translating {} (source language auto-detected)", input.display()),
        }

        if fs::try_exists(output).await? {
            fs::remove_file(output).await?;
        }

        self.command(input, output, source_language.as_ref())
            .execute()
            .await
            .map_err(|e| SubburnError::Translation(e.to_string()))?;

        if !output.is_file() {
            return Err(SubburnError::Translation(format!(
                "Translator did not write {}",
                output.display()
            )));
        }

        info!("Translation written to {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_is_passed_with_flag() {
        let translator = CommandTranslator::new(TranslateConfig::default());
        let language = Language::new("Russian");
        let cmd = translator.command(Path::new("raw.srt"), Path::new("translated.srt"), Some(&language));

        assert_eq!(cmd.binary_path, "chatgpt-subtitle-translator");
        assert_eq!(cmd.args, vec!["raw.srt", "translated.srt", "--from", "Russian"]);
    }

    #[test]
    fn test_hint_is_omitted_when_absent() {
        let translator = CommandTranslator::new(TranslateConfig::default());
        let cmd = translator.command(Path::new("raw.srt"), Path::new("translated.srt"), None);
        assert_eq!(cmd.args, vec!["raw.srt", "translated.srt"]);

        let unspecified = Language::unspecified();
        let cmd = translator.command(Path::new("raw.srt"), Path::new("translated.srt"), Some(&unspecified));
        assert_eq!(cmd.args, vec!["raw.srt", "translated.srt"]);
    }

    #[test]
    fn test_stale_output_is_not_taken_as_translation() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.srt");
        let output = dir.path().join("translated.srt");
        std::fs::write(&input, "1\n00:00:01,000 --> 00:00:02,000\nHi\n").unwrap();
        std::fs::write(&output, "left over from an earlier run").unwrap();

        // A translator that exits successfully without writing anything.
        let translator = CommandTranslator::new(TranslateConfig {
            binary_path: "true".to_string(),
            ..TranslateConfig::default()
        });

        let result = tokio_test::block_on(translator.translate(&input, &output, None));

        assert!(matches!(result, Err(SubburnError::Translation(_))));
        assert!(!output.exists());
    }
}
