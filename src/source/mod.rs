// Video search and download
//
// - YtDlp: yt-dlp backed search (`ytsearch1:`) and download

pub mod ytdlp;

use async_trait::async_trait;
use std::path::Path;

pub use ytdlp::*;
use crate::config::SearchConfig;
use crate::error::Result;

/// Title search and download for a single query
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Title of the first match, `None` when nothing matched.
    async fn search_first_result(&self, query: &str) -> Result<Option<String>>;

    /// Download the first match for `query` to `destination`.
    async fn download(&self, query: &str, destination: &Path) -> Result<()>;
}

pub struct SourceFactory;

impl SourceFactory {
    pub fn create_source(config: SearchConfig) -> Box<dyn VideoSource> {
        Box::new(YtDlpSource::new(config))
    }
}
