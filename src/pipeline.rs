use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{error, info, warn};

use crate::config::{Config, RunConfig};
use crate::delivery::{DeliveryChannel, DeliveryFactory};
use crate::error::{Result, SubburnError};
use crate::language::{Language, LanguageInferencer};
use crate::media::{MediaFactory, MediaProbe, SubtitleBurner, SubtitleExtractor};
use crate::query::{Query, QueryGenerator};
use crate::region::RegionEstimator;
use crate::resolver::{ResolvedSource, SourceResolver};
use crate::source::{SourceFactory, VideoSource};
use crate::translate::{SubtitleTranslator, TranslatorFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Extracting,
    Translating,
    Burning,
    Delivering,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolving => "Resolving",
            Stage::Extracting => "Extracting",
            Stage::Translating => "Translating",
            Stage::Burning => "Burning",
            Stage::Delivering => "Delivering",
            Stage::Done => "Done",
            Stage::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// A fatal failure, tagged with the stage it happened in.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    pub source: SubburnError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: SubburnError) -> Self {
        Self { stage, source }
    }

    pub fn is_not_found(&self) -> bool {
        self.source.is_not_found()
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Intermediate files of one run. Nothing is cleaned up afterwards, and a
/// directory holding files from an earlier run is never reused.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    pub root: PathBuf,
    pub subtitled_video: PathBuf,
    pub clean_video: PathBuf,
    pub raw_subtitles: PathBuf,
    pub translated_subtitles: PathBuf,
}

impl WorkingSet {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            subtitled_video: root.join("sub_video.mp4"),
            clean_video: root.join("clean_video.mp4"),
            raw_subtitles: root.join("raw.srt"),
            translated_subtitles: root.join("translated.srt"),
            root,
        }
    }

    /// Create the root, which must be missing or empty.
    pub async fn create<P: AsRef<Path>>(root: P) -> Result<Self> {
        let working_set = Self::new(root);
        fs::create_dir_all(&working_set.root).await?;

        let mut entries = fs::read_dir(&working_set.root).await?;
        if entries.next_entry().await?.is_some() {
            return Err(SubburnError::Config(format!(
                "Working directory {} is not empty; use a fresh directory per run",
                working_set.root.display()
            )));
        }
        Ok(working_set)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// No credentials configured
    Skipped,
    Delivered,
    /// Delivery failed; the output file is still valid
    Failed(String),
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Skipped => f.write_str("skipped"),
            DeliveryOutcome::Delivered => f.write_str("delivered"),
            DeliveryOutcome::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// Result of a run that reached `Done`.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output: PathBuf,
    pub subtitled_title: String,
    pub query: Query,
    pub language: Language,
    pub working_set: WorkingSet,
    pub delivery: DeliveryOutcome,
}

/// State of one invocation as it moves through the stages.
#[derive(Debug)]
pub struct PipelineRun {
    title: String,
    output: PathBuf,
    working_set: WorkingSet,
    stage: Stage,
}

impl PipelineRun {
    fn new(title: &str, output: &Path, working_set: WorkingSet) -> Self {
        Self {
            title: title.to_string(),
            output: output.to_path_buf(),
            working_set,
            stage: Stage::Resolving,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(!self.stage.is_terminal(), "run already finished");
        info!("[{}] {} -> {}", self.title, self.stage, next);
        self.stage = next;
    }

    fn fail(&mut self, source: SubburnError) -> PipelineError {
        let stage = self.stage;
        error!("[{}] {} stage failed: {}", self.title, stage, source);
        self.stage = Stage::Failed;
        PipelineError::new(stage, source)
    }

    fn guard<T>(&mut self, result: Result<T>) -> PipelineResult<T> {
        result.map_err(|source| self.fail(source))
    }
}

/// The external collaborators a pipeline drives.
pub struct PipelineServices {
    pub source: Box<dyn VideoSource>,
    pub probe: Box<dyn MediaProbe>,
    pub extractor: Box<dyn SubtitleExtractor>,
    pub translator: Box<dyn SubtitleTranslator>,
    pub burner: Box<dyn SubtitleBurner>,
    pub delivery: Box<dyn DeliveryChannel>,
}

impl PipelineServices {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source: SourceFactory::create_source(config.search.clone()),
            probe: MediaFactory::create_probe(config.media.clone()),
            extractor: MediaFactory::create_extractor(config.extractor.clone()),
            translator: TranslatorFactory::create_translator(config.translate.clone()),
            burner: MediaFactory::create_burner(config.media.clone()),
            delivery: DeliveryFactory::create_channel(config.delivery.clone()),
        }
    }
}

/// Title in, burned video out.
///
/// Stages run strictly one after another and every collaborator is called at
/// most once per step; the subtitled source is resolved before the clean one
/// so a title without subtitles never costs a clean download.
pub struct Pipeline {
    services: PipelineServices,
    queries: QueryGenerator,
    regions: RegionEstimator,
    languages: LanguageInferencer,
}

impl Pipeline {
    pub fn new(services: PipelineServices, config: &Config) -> Result<Self> {
        Ok(Self {
            services,
            queries: QueryGenerator::new(config.search.keywords.clone()),
            regions: RegionEstimator::new(config.region.clone())?,
            languages: LanguageInferencer::new(config.language.clone()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(PipelineServices::from_config(config), config)
    }

    pub async fn run(&self, title: &str, run_config: &RunConfig) -> PipelineResult<RunReport> {
        let working_set = WorkingSet::create(&run_config.workdir)
            .await
            .map_err(|e| PipelineError::new(Stage::Resolving, e))?;
        info!("Starting run for {:?} in {}", title, working_set.root.display());

        let mut run = PipelineRun::new(title, &run_config.output, working_set);

        let resolver = SourceResolver::new(self.services.source.as_ref());
        let result = resolver
            .resolve_subtitled(self.queries.candidates(title), &run.working_set.subtitled_video)
            .await;
        let subtitled = run.guard(result)?;
        let result = resolver.resolve_clean(title, &run.working_set.clean_video).await;
        let clean = run.guard(result)?;

        run.advance(Stage::Extracting);
        let result = self.extract(&subtitled, &run.working_set.raw_subtitles).await;
        let raw_subtitles = run.guard(result)?;

        run.advance(Stage::Translating);
        let language = self.languages.infer(&subtitled.title);
        let hint = (!language.is_unspecified()).then(|| language.clone());
        let result = self
            .services
            .translator
            .translate(&raw_subtitles, &run.working_set.translated_subtitles, hint)
            .await;
        run.guard(result)?;

        run.advance(Stage::Burning);
        let result = self.burn(&clean, &run.working_set.translated_subtitles, &run.output).await;
        run.guard(result)?;

        let delivery = match &run_config.delivery {
            Some(credentials) => {
                run.advance(Stage::Delivering);
                let result = self
                    .services
                    .delivery
                    .deliver(&run.output, &credentials.token, &credentials.recipient)
                    .await;
                match result {
                    Ok(()) => DeliveryOutcome::Delivered,
                    Err(e) => {
                        warn!("[{}] Delivery failed, output kept at {}: {}", title, run.output.display(), e);
                        DeliveryOutcome::Failed(e.to_string())
                    }
                }
            }
            None => {
                info!("[{}] No delivery credentials, skipping delivery", title);
                DeliveryOutcome::Skipped
            }
        };

        run.advance(Stage::Done);
        Ok(RunReport {
            output: run.output,
            subtitled_title: subtitled.title,
            query: subtitled.query,
            language,
            working_set: run.working_set,
            delivery,
        })
    }

    async fn extract(&self, subtitled: &ResolvedSource, raw_subtitles: &Path) -> Result<PathBuf> {
        let resolution = self.services.probe.probe_resolution(&subtitled.path).await?;
        let region = self.regions.estimate(resolution);
        info!("Subtitle region for {}: {}", resolution, region);

        let extracted = self
            .services
            .extractor
            .extract_subtitles(&subtitled.path, region)
            .await?;

        if extracted != raw_subtitles {
            fs::rename(&extracted, raw_subtitles).await.map_err(|e| {
                SubburnError::Extraction(format!(
                    "Failed to move {} to {}: {}",
                    extracted.display(),
                    raw_subtitles.display(),
                    e
                ))
            })?;
        }
        Ok(raw_subtitles.to_path_buf())
    }

    async fn burn(&self, clean: &ResolvedSource, subtitles: &Path, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        self.services.burner.burn(&clean.path, subtitles, output).await
    }
}
