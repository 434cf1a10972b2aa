use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use freight_intel::intelligence::repository::SourceError;
use freight_intel::intelligence::{
    CarrierId, CarrierProfile, CsrProfile, DirectoryRegistry, HistorySource, LoadRecord,
    QuoteRecord, ScoringConfig, ShipperProfile,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory row source backing the service until a database-backed source
/// is wired in. Snapshots clone so scoring never holds the lock.
#[derive(Default)]
pub(crate) struct InMemoryHistory {
    loads: Mutex<Vec<LoadRecord>>,
    quotes: Mutex<Vec<QuoteRecord>>,
}

impl InMemoryHistory {
    pub(crate) fn with_rows(loads: Vec<LoadRecord>, quotes: Vec<QuoteRecord>) -> Self {
        Self {
            loads: Mutex::new(loads),
            quotes: Mutex::new(quotes),
        }
    }
}

impl HistorySource for InMemoryHistory {
    fn loads(&self) -> Result<Vec<LoadRecord>, SourceError> {
        Ok(self.loads.lock().expect("load book mutex poisoned").clone())
    }

    fn quotes(&self) -> Result<Vec<QuoteRecord>, SourceError> {
        Ok(self
            .quotes
            .lock()
            .expect("quote book mutex poisoned")
            .clone())
    }
}

/// In-memory carrier/shipper/CSR directory.
#[derive(Default)]
pub(crate) struct InMemoryDirectory {
    carriers: Mutex<Vec<CarrierProfile>>,
    shippers: Mutex<Vec<ShipperProfile>>,
    csrs: Mutex<Vec<CsrProfile>>,
}

impl InMemoryDirectory {
    pub(crate) fn with_entities(
        carriers: Vec<CarrierProfile>,
        shippers: Vec<ShipperProfile>,
        csrs: Vec<CsrProfile>,
    ) -> Self {
        Self {
            carriers: Mutex::new(carriers),
            shippers: Mutex::new(shippers),
            csrs: Mutex::new(csrs),
        }
    }
}

impl DirectoryRegistry for InMemoryDirectory {
    fn carriers(&self) -> Result<Vec<CarrierProfile>, SourceError> {
        Ok(self
            .carriers
            .lock()
            .expect("carrier directory mutex poisoned")
            .clone())
    }

    fn carrier(&self, id: CarrierId) -> Result<Option<CarrierProfile>, SourceError> {
        Ok(self
            .carriers
            .lock()
            .expect("carrier directory mutex poisoned")
            .iter()
            .find(|carrier| carrier.id == id)
            .cloned())
    }

    fn shippers(&self) -> Result<Vec<ShipperProfile>, SourceError> {
        Ok(self
            .shippers
            .lock()
            .expect("shipper directory mutex poisoned")
            .clone())
    }

    fn csrs(&self) -> Result<Vec<CsrProfile>, SourceError> {
        Ok(self
            .csrs
            .lock()
            .expect("csr directory mutex poisoned")
            .clone())
    }
}

pub(crate) fn default_scoring_config() -> ScoringConfig {
    ScoringConfig::default()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
