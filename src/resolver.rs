use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, SubburnError};
use crate::query::{Query, QueryCandidates};
use crate::source::VideoSource;

/// A search hit that has been downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Query that produced the hit
    pub query: Query,
    /// Display title of the hit
    pub title: String,
    pub path: PathBuf,
}

/// Turns query candidates into a downloaded video, first hit wins.
pub struct SourceResolver<'a> {
    source: &'a dyn VideoSource,
}

impl<'a> SourceResolver<'a> {
    pub fn new(source: &'a dyn VideoSource) -> Self {
        Self { source }
    }

    /// Try candidates in order; stop searching at the first non-empty result
    /// and download it.
    pub async fn resolve_subtitled(
        &self,
        candidates: QueryCandidates,
        destination: &Path,
    ) -> Result<ResolvedSource> {
        let title = candidates.title().to_string();

        for query in candidates {
            if let Some(hit) = self.search(&query).await? {
                info!("Subtitled source {:?} matched query {:?}", hit, query.as_str());
                return self.fetch(query, hit, destination).await;
            }
        }

        Err(SubburnError::NotFound(title))
    }

    /// Search the bare title only.
    pub async fn resolve_clean(&self, title: &str, destination: &Path) -> Result<ResolvedSource> {
        let query = Query::new(title);
        match self.search(&query).await? {
            Some(hit) => {
                info!("Clean source {:?} matched", hit);
                self.fetch(query, hit, destination).await
            }
            None => Err(SubburnError::NotFound(title.to_string())),
        }
    }

    async fn search(&self, query: &Query) -> Result<Option<String>> {
        let hit = self.source.search_first_result(query.as_str()).await?;
        let hit = hit.filter(|title| !title.trim().is_empty());
        debug!("Query {:?}: {}", query.as_str(), if hit.is_some() { "hit" } else { "no match" });
        Ok(hit)
    }

    async fn fetch(&self, query: Query, title: String, destination: &Path) -> Result<ResolvedSource> {
        self.source.download(query.as_str(), destination).await?;
        Ok(ResolvedSource {
            query,
            title,
            path: destination.to_path_buf(),
        })
    }
}
