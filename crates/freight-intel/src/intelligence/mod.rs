//! The scoring engine: signal extraction, normalization, the four scorers,
//! candidate ranking, and dashboard aggregation. Everything here is a pure
//! function of the row snapshot and an explicit evaluation date.

pub mod aggregator;
pub mod config;
pub mod domain;
pub mod import;
pub(crate) mod normalize;
pub mod ranker;
pub mod repository;
pub mod router;
pub mod scorers;
pub mod service;
pub mod signals;

pub use aggregator::{IntelligenceAggregator, IntelligenceScope, IntelligenceSnapshot};
pub use config::ScoringConfig;
pub use domain::{
    CarrierId, CarrierProfile, CsrId, CsrProfile, EquipmentType, LaneKey, LaneQuery, LoadRecord,
    LoadStatus, Location, QuoteRecord, ShipperId, ShipperProfile,
};
pub use import::{LoadBookImportError, LoadBookImporter};
pub use ranker::{CandidateRanker, CarrierSearchOutcome, SearchOptions};
pub use repository::{DirectoryRegistry, HistorySource, SourceError};
pub use router::intelligence_router;
pub use scorers::{
    CarrierMatchResult, CarrierMatchScorer, CsrPerformanceResult, CsrPerformanceScorer, HealthBand,
    LaneRiskResult, LaneRiskScorer, MatchBand, PerformanceTier, RiskLevel, ShipperHealthResult,
    ShipperHealthScorer,
};
pub use service::{IntelligenceService, ServiceLimits};

/// Error taxonomy at the engine boundary. `InvalidQuery` and `NotFound` are
/// caller problems; `InvalidSignalSet` is a bug; `Unavailable` is the row
/// source and is the caller's to retry.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid lane query: {0}")]
    InvalidQuery(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("signal set invariant violated: {0}")]
    InvalidSignalSet(&'static str),
    #[error(transparent)]
    Unavailable(#[from] SourceError),
}
