use chrono::NaiveDate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::aggregator::{IntelligenceAggregator, IntelligenceScope, IntelligenceSnapshot};
use super::config::ScoringConfig;
use super::domain::{CarrierId, LaneQuery};
use super::ranker::{CandidateRanker, CarrierSearchOutcome, SearchOptions};
use super::repository::{DirectoryRegistry, HistorySource};
use super::scorers::{CarrierMatchResult, CarrierMatchScorer};
use super::signals::SignalExtractor;
use super::EngineError;
use crate::config::SearchSettings;

/// Serving limits applied around the engine, derived from `AppConfig`.
#[derive(Debug, Clone)]
pub struct ServiceLimits {
    pub max_bucket_results: usize,
    pub rank_budget: Option<Duration>,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_bucket_results: SearchSettings::DEFAULT_MAX_BUCKET_RESULTS,
            rank_budget: None,
        }
    }
}

impl From<&SearchSettings> for ServiceLimits {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            max_bucket_results: settings.max_bucket_results,
            rank_budget: settings.rank_budget_ms.map(Duration::from_millis),
        }
    }
}

/// Facade composing the row source, the registry, and the scorers. Every
/// call re-reads the snapshot and recomputes; nothing is cached.
pub struct IntelligenceService<H, R> {
    history: Arc<H>,
    registry: Arc<R>,
    config: ScoringConfig,
    limits: ServiceLimits,
}

impl<H, R> IntelligenceService<H, R>
where
    H: HistorySource + 'static,
    R: DirectoryRegistry + 'static,
{
    pub fn new(history: Arc<H>, registry: Arc<R>, config: ScoringConfig) -> Self {
        Self::with_limits(history, registry, config, ServiceLimits::default())
    }

    pub fn with_limits(
        history: Arc<H>,
        registry: Arc<R>,
        config: ScoringConfig,
        limits: ServiceLimits,
    ) -> Self {
        Self {
            history,
            registry,
            config,
            limits,
        }
    }

    pub fn limits(&self) -> &ServiceLimits {
        &self.limits
    }

    /// Rank the eligible pool for a lane query. The configured rank budget,
    /// if any, is translated to a deadline here so the ranker itself stays
    /// clock-free apart from deadline checks.
    pub fn search_carriers(
        &self,
        query: &LaneQuery,
        as_of: NaiveDate,
    ) -> Result<CarrierSearchOutcome, EngineError> {
        query.validate()?;

        let carriers = self.registry.carriers()?;
        let loads = self.history.loads()?;
        let quotes = self.history.quotes()?;

        let mut options = SearchOptions::new(as_of);
        if let Some(budget) = self.limits.rank_budget {
            options = options.with_deadline(Instant::now() + budget);
        }

        let ranker = CandidateRanker::new(&self.config);
        let outcome = ranker.rank(&carriers, &loads, &quotes, query, &options)?;
        debug!(
            recommended = outcome.recommended.len(),
            newcomers = outcome.newcomers.len(),
            truncated = outcome.truncated,
            "carrier search ranked"
        );
        Ok(outcome)
    }

    /// Score one carrier against a lane query; `NotFound` for unknown ids.
    pub fn score_carrier(
        &self,
        id: CarrierId,
        query: &LaneQuery,
        as_of: NaiveDate,
    ) -> Result<CarrierMatchResult, EngineError> {
        query.validate()?;

        let profile = self
            .registry
            .carrier(id)?
            .ok_or(EngineError::NotFound {
                kind: "carrier",
                id: id.0.to_string(),
            })?;

        let loads = self.history.loads()?;
        let quotes = self.history.quotes()?;
        let extractor = SignalExtractor::new(&loads, &quotes, as_of);
        let signals = extractor.carrier_signals(&profile, query);
        CarrierMatchScorer::new(&self.config).score(&profile, &signals)
    }

    /// Score every lane, CSR, and shipper in scope for the dashboard.
    pub fn intelligence_snapshot(
        &self,
        scope: &IntelligenceScope,
        as_of: NaiveDate,
    ) -> Result<IntelligenceSnapshot, EngineError> {
        let loads = self.history.loads()?;
        let quotes = self.history.quotes()?;
        let shippers = self.registry.shippers()?;
        let csrs = self.registry.csrs()?;

        let aggregator = IntelligenceAggregator::new(&self.config);
        let snapshot = aggregator.aggregate(&loads, &quotes, &shippers, &csrs, scope, as_of)?;
        debug!(
            lanes = snapshot.lane_risks.len(),
            csrs = snapshot.csr_performance.len(),
            shippers = snapshot.shipper_health.len(),
            "intelligence snapshot computed"
        );
        Ok(snapshot)
    }
}
