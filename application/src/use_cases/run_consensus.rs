//! Run Consensus use case
//!
//! Sends one prompt pair to the provider N times, extracts metrics and
//! quotes from every response and aggregates them into a
//! [`ConsensusResult`].

use super::fan_out::{FanOutLimits, run_n_times};
use crate::ports::llm_provider::LlmProvider;
use crate::ports::progress::{ConsensusProgress, NoProgress};
use crate::ports::result_recorder::ResultRecorder;
use consensus_domain::{
    ConsensusConfig, ConsensusResult, MetricExtractor, MetricMap, QuoteExtractor, QuoteRecord,
    RawRun, Stage, StageExtractors, aggregate_metrics, aggregate_quotes,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// System prompt used when the caller supplies none.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a research analysis assistant. \
Provide exact numbers, show calculations explicitly. \
Use consistent output format.";

/// Join an analysis prompt and its data into one user prompt.
pub fn build_user_prompt(prompt: &str, data: &str) -> String {
    format!("{prompt}\n\n---\n\nDATA:\n{data}")
}

/// Input for the RunConsensus use case
#[derive(Debug, Clone)]
pub struct ConsensusRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Number of runs
    pub n: usize,
    pub extractors: StageExtractors,
    /// Stage tag passed to the result recorder
    pub stage: Option<String>,
    /// Replaces the engine's configuration for this request
    pub config: Option<ConsensusConfig>,
}

impl ConsensusRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>, n: usize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            n,
            extractors: StageExtractors::default(),
            stage: None,
            config: None,
        }
    }

    pub fn with_metric_extractor(mut self, extractor: Arc<dyn MetricExtractor>) -> Self {
        self.extractors.metrics = Some(extractor);
        self
    }

    pub fn with_quote_extractor(mut self, extractor: Arc<dyn QuoteExtractor>) -> Self {
        self.extractors.quotes = Some(extractor);
        self
    }

    pub fn with_extractors(mut self, extractors: StageExtractors) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_config(mut self, config: ConsensusConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Use case for running a consensus request
///
/// Construction cannot fail once a provider exists; provider setup errors
/// surface where the provider is built. After that, `execute` always
/// returns a result: failed runs only lower the sample count.
pub struct RunConsensusUseCase<P: LlmProvider + ?Sized + 'static> {
    provider: Arc<P>,
    config: ConsensusConfig,
    recorder: Option<Arc<dyn ResultRecorder>>,
}

impl<P: LlmProvider + ?Sized + 'static> RunConsensusUseCase<P> {
    pub fn new(provider: Arc<P>, config: ConsensusConfig) -> Self {
        Self {
            provider,
            config,
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn ResultRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, request: ConsensusRequest) -> ConsensusResult {
        self.execute_with_progress(request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        request: ConsensusRequest,
        progress: &dyn ConsensusProgress,
    ) -> ConsensusResult {
        let config = request.config.as_ref().unwrap_or(&self.config);
        let started = Instant::now();

        info!(
            "Running consensus: {} runs on {}",
            request.n,
            self.provider.model()
        );

        let runs = self.fan_out(&request, config, progress).await;

        let metrics = request.extractors.metrics.as_ref().map(|extractor| {
            let per_run: Vec<MetricMap> = runs.iter().map(|r| extractor.extract(&r.text)).collect();
            aggregate_metrics(&per_run, &config.metric_thresholds())
        });

        let quotes = request.extractors.quotes.as_ref().map(|extractor| {
            let per_run: Vec<Vec<QuoteRecord>> =
                runs.iter().map(|r| extractor.extract(&r.text)).collect();
            aggregate_quotes(&per_run, runs.len(), &config.quote_thresholds())
        });

        let result = ConsensusResult::assemble(
            runs,
            metrics.unwrap_or_default(),
            quotes,
            self.provider.model().clone(),
            started.elapsed(),
        );

        info!(
            "Consensus finished: {} runs, {} metrics, overall {}",
            result.n_runs,
            result.metrics.len(),
            result.overall_stability.label()
        );
        debug!("Flagged items: {:?}", result.flagged_items);

        if let Some(recorder) = &self.recorder {
            recorder.record(request.stage.as_deref(), &result);
        }

        result
    }

    /// Run with explicit extractors, mirroring the request fields.
    pub async fn run_with_consensus(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        n: usize,
        metric_extractor: Option<Arc<dyn MetricExtractor>>,
        quote_extractor: Option<Arc<dyn QuoteExtractor>>,
        config: Option<ConsensusConfig>,
    ) -> ConsensusResult {
        let mut request = ConsensusRequest::new(system_prompt, user_prompt, n)
            .with_extractors(StageExtractors {
                metrics: metric_extractor,
                quotes: quote_extractor,
            });
        request.config = config;
        self.execute(request).await
    }

    async fn fan_out(
        &self,
        request: &ConsensusRequest,
        config: &ConsensusConfig,
        progress: &dyn ConsensusProgress,
    ) -> Vec<RawRun> {
        let limits = FanOutLimits::new(config.max_concurrent_runs, config.timeout_per_run());
        let system: Arc<str> = Arc::from(request.system_prompt.as_str());
        let user: Arc<str> = Arc::from(request.user_prompt.as_str());

        run_n_times(
            request.n,
            limits,
            |_| {
                let provider = Arc::clone(&self.provider);
                let system = Arc::clone(&system);
                let user = Arc::clone(&user);
                async move { provider.complete(&system, &user).await }
            },
            progress,
        )
        .await
    }
}

/// Run one analysis prompt over `data` for a named stage.
///
/// The stage picks the extractors and, unless `n` is given, the run count.
/// Unknown stages run without extractors.
pub async fn run_consensus<P: LlmProvider + ?Sized + 'static>(
    use_case: &RunConsensusUseCase<P>,
    prompt: &str,
    data: &str,
    stage: &str,
    n: Option<usize>,
    system_prompt: Option<&str>,
) -> ConsensusResult {
    let n = n.unwrap_or_else(|| use_case.config().stage_n(stage));
    let request = ConsensusRequest::new(
        system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT),
        build_user_prompt(prompt, data),
        n,
    )
    .with_extractors(Stage::extractors_for(stage))
    .with_stage(stage);

    use_case.execute(request).await
}
