// Subtitle translation
//
// - Command: external subtitle translator invoked per file

pub mod command;

use async_trait::async_trait;
use std::path::Path;

pub use command::*;
use crate::config::TranslateConfig;
use crate::error::Result;
use crate::language::Language;

/// Translates a timed-text file
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubtitleTranslator: Send + Sync {
    /// `source_language` is a hint; `None` lets the translator detect it.
    async fn translate(
        &self,
        input: &Path,
        output: &Path,
        source_language: Option<Language>,
    ) -> Result<()>;
}

pub struct TranslatorFactory;

impl TranslatorFactory {
    pub fn create_translator(config: TranslateConfig) -> Box<dyn SubtitleTranslator> {
        Box::new(CommandTranslator::new(config))
    }
}
