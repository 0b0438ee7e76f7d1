//! Acquisition orchestrator.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::AcquireConfig;
use super::error::AcquireError;
use super::result::AcquisitionResult;
use super::stage::AcquisitionStage;
use crate::candidate::ScoredCandidate;
use crate::download::{DownloadError, ImageDownloader};
use crate::http::{AsyncHttpClient, HttpError, ReqwestClient};
use crate::merge::merge;
use crate::query::ProductQuery;
use crate::score::MetadataProber;
use crate::select::rank;
use crate::source::SourceRegistry;
use crate::store::{file_stem, DiskStore, ImageStore};

/// Coordinates one acquisition through the pipeline stages.
///
/// The orchestrator owns no source logic: sources come from the
/// registry, and adding one never requires touching this type.
pub struct AcquisitionOrchestrator<C: AsyncHttpClient, S: ImageStore> {
    registry: SourceRegistry,
    prober: MetadataProber<C>,
    downloader: ImageDownloader<C, S>,
    config: AcquireConfig,
}

impl AcquisitionOrchestrator<Arc<ReqwestClient>, DiskStore> {
    /// Builds a fully wired orchestrator: pooled HTTP client, default
    /// source registry, metadata prober, and a disk store rooted at
    /// `output_dir`.
    pub fn with_defaults(
        output_dir: impl Into<std::path::PathBuf>,
        config: AcquireConfig,
    ) -> Result<Self, HttpError> {
        let client = Arc::new(ReqwestClient::new()?);
        let registry = SourceRegistry::with_default_sources(Arc::clone(&client));
        let prober = MetadataProber::new(Arc::clone(&client));
        let downloader = ImageDownloader::new(client, DiskStore::new(output_dir.into()));
        Ok(Self::new(registry, prober, downloader, config))
    }
}

impl<C: AsyncHttpClient, S: ImageStore> AcquisitionOrchestrator<C, S> {
    /// Assembles an orchestrator from its collaborators. The configured
    /// retry policy is applied to the downloader so the attempt cap is
    /// enforced uniformly.
    pub fn new(
        registry: SourceRegistry,
        prober: MetadataProber<C>,
        downloader: ImageDownloader<C, S>,
        config: AcquireConfig,
    ) -> Self {
        let downloader = downloader.with_policy(config.retry_policy.clone());
        Self {
            registry,
            prober,
            downloader,
            config,
        }
    }

    /// Mutable access to the source registry, for registering extra
    /// sources (e.g. an explicit fallback) before acquiring.
    pub fn registry_mut(&mut self) -> &mut SourceRegistry {
        &mut self.registry
    }

    /// Runs one acquisition for the given product.
    ///
    /// `product_id`, when given, keeps stored filenames collision-safe
    /// across products sharing a display name. Cancellation is honored
    /// at every stage boundary and inside network waits; a cancelled
    /// acquisition never leaves a partial file behind.
    pub async fn acquire(
        &self,
        query: &ProductQuery,
        product_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> AcquisitionResult {
        info!(
            product = query.product_name(),
            brand = query.brand_name(),
            download = self.config.download,
            "acquisition started"
        );

        // Searching: fan out to all registered sources concurrently.
        let (lists, sources_searched) = self.search_all(query).await;
        if cancel.is_cancelled() {
            return AcquisitionResult::failure(
                query,
                sources_searched,
                Vec::new(),
                AcquireError::Cancelled.to_string(),
            );
        }

        // MinSourcesCheck: fail fast on a thin result set.
        self.transition(AcquisitionStage::MinSourcesCheck);
        if sources_searched.len() < self.config.min_sources {
            warn!(
                searched = sources_searched.len(),
                required = self.config.min_sources,
                "not enough sources returned results"
            );
            let error = AcquireError::InsufficientSources {
                searched: sources_searched.len(),
                required: self.config.min_sources,
            };
            return AcquisitionResult::failure(
                query,
                sources_searched,
                Vec::new(),
                error.to_string(),
            );
        }

        // Deduplicating: merge per-source lists into unique candidates.
        self.transition(AcquisitionStage::Deduplicating);
        let mut candidates = merge(&lists);
        if candidates.is_empty() {
            return AcquisitionResult::failure(
                query,
                sources_searched,
                Vec::new(),
                AcquireError::NoCandidates.to_string(),
            );
        }
        candidates.truncate(self.config.candidate_cap);

        // Scoring: probe metadata for the capped candidate set.
        self.transition(AcquisitionStage::Scoring);
        let scored = self
            .prober
            .score_candidates(candidates, &self.config.weights, cancel)
            .await;
        if cancel.is_cancelled() {
            return AcquisitionResult::failure(
                query,
                sources_searched,
                Vec::new(),
                AcquireError::Cancelled.to_string(),
            );
        }

        // Selecting: best first, rest retained as fallback order.
        self.transition(AcquisitionStage::Selecting);
        let ranked = rank(scored);

        if !self.config.download {
            let chosen = ranked.first().cloned();
            self.transition(AcquisitionStage::Done);
            return AcquisitionResult::success(query, sources_searched, ranked, chosen, None);
        }

        // Downloading: sequential fallback over the ranked list.
        self.transition(AcquisitionStage::Downloading);
        let key_stem = file_stem(query.product_name(), product_id);
        match self.downloader.acquire(&ranked, &key_stem, cancel).await {
            Ok(outcome) => {
                let chosen: Option<ScoredCandidate> =
                    ranked.get(outcome.candidate_index).cloned();
                self.transition(AcquisitionStage::Done);
                AcquisitionResult::success(
                    query,
                    sources_searched,
                    ranked,
                    chosen,
                    Some(outcome.path),
                )
            }
            Err(DownloadError::Cancelled) => AcquisitionResult::failure(
                query,
                sources_searched,
                ranked,
                AcquireError::Cancelled.to_string(),
            ),
            Err(e) => {
                warn!(error = %e, "download failed for every candidate");
                AcquisitionResult::failure(
                    query,
                    sources_searched,
                    ranked,
                    AcquireError::AllCandidatesExhausted.to_string(),
                )
            }
        }
    }

    /// Queries every registered source concurrently with the per-source
    /// timeout. Returns the per-source URL lists in registry priority
    /// order plus the set of genuine sources that yielded results.
    async fn search_all(
        &self,
        query: &ProductQuery,
    ) -> (Vec<(String, Vec<String>)>, BTreeSet<String>) {
        self.transition(AcquisitionStage::Searching);

        let mut handles = Vec::with_capacity(self.registry.len());
        for source in self.registry.sources() {
            let source = Arc::clone(source);
            let query = query.clone();
            let timeout = self.config.source_timeout;
            handles.push(tokio::spawn(async move {
                let name = source.name().to_string();
                let is_fallback = source.is_fallback();
                let outcome = tokio::time::timeout(timeout, source.search(&query)).await;
                (name, is_fallback, outcome)
            }));
        }

        let mut lists = Vec::new();
        let mut sources_searched = BTreeSet::new();

        // Joining in spawn order keeps registry priority order for the
        // merge regardless of completion order.
        for handle in handles {
            match handle.await {
                Ok((name, is_fallback, Ok(Ok(urls)))) => {
                    debug!(source = %name, found = urls.len(), "source returned");
                    if !urls.is_empty() {
                        if !is_fallback {
                            sources_searched.insert(name.clone());
                        }
                        lists.push((name, urls));
                    }
                }
                Ok((name, _, Ok(Err(e)))) => {
                    warn!(source = %name, error = %e, "source failed");
                }
                Ok((name, _, Err(_))) => {
                    warn!(source = %name, "source timed out");
                }
                Err(e) => {
                    warn!(error = %e, "source task failed to join");
                }
            }
        }

        (lists, sources_searched)
    }

    fn transition(&self, stage: AcquisitionStage) {
        debug!(stage = %stage, "stage entered");
    }
}
