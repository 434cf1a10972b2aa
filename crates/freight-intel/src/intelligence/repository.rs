use super::domain::{
    CarrierId, CarrierProfile, CsrProfile, LoadRecord, QuoteRecord, ShipperProfile,
};

/// Read failure from the backing store. The engine never retries; the caller
/// layer owns backoff.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("row source unavailable: {0}")]
    Unavailable(String),
}

/// Row source for the transactional history the extractor aggregates over.
/// Implementations hand back a point-in-time snapshot; the engine treats it
/// as read-only and eventually consistent.
pub trait HistorySource: Send + Sync {
    fn loads(&self) -> Result<Vec<LoadRecord>, SourceError>;
    fn quotes(&self) -> Result<Vec<QuoteRecord>, SourceError>;
}

/// Registry of the entities being scored, with the profile fields the
/// normalizer needs (equipment, service area, home location).
pub trait DirectoryRegistry: Send + Sync {
    fn carriers(&self) -> Result<Vec<CarrierProfile>, SourceError>;
    fn carrier(&self, id: CarrierId) -> Result<Option<CarrierProfile>, SourceError>;
    fn shippers(&self) -> Result<Vec<ShipperProfile>, SourceError>;
    fn csrs(&self) -> Result<Vec<CsrProfile>, SourceError>;
}
