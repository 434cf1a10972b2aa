use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

use super::config::ScoringConfig;
use super::domain::{CsrProfile, LoadRecord, QuoteRecord, ShipperProfile};
use super::scorers::{
    CsrPerformanceResult, CsrPerformanceScorer, LaneRiskResult, LaneRiskScorer,
    ShipperHealthResult, ShipperHealthScorer,
};
use super::signals::SignalExtractor;
use super::EngineError;

/// Row filtering passed through from the caller; no scorer interprets it.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntelligenceScope {
    pub include_test: bool,
}

/// Dashboard payload. `csr_performance` arrives sorted best-first;
/// `lane_risks` and `shipper_health` arrive unsorted (stable enumeration
/// order) because the dashboard computes its own aggregate statistics over
/// the full sets and sorts client-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceSnapshot {
    pub lane_risks: Vec<LaneRiskResult>,
    pub csr_performance: Vec<CsrPerformanceResult>,
    pub shipper_health: Vec<ShipperHealthResult>,
}

pub struct IntelligenceAggregator<'a> {
    config: &'a ScoringConfig,
}

impl<'a> IntelligenceAggregator<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    pub fn aggregate(
        &self,
        loads: &[LoadRecord],
        quotes: &[QuoteRecord],
        shippers: &[ShipperProfile],
        csrs: &[CsrProfile],
        scope: &IntelligenceScope,
        as_of: NaiveDate,
    ) -> Result<IntelligenceSnapshot, EngineError> {
        let loads: Vec<LoadRecord> = loads
            .iter()
            .filter(|load| scope.include_test || !load.is_test)
            .cloned()
            .collect();
        let quotes: Vec<QuoteRecord> = quotes
            .iter()
            .filter(|quote| scope.include_test || !quote.is_test)
            .cloned()
            .collect();

        let extractor = SignalExtractor::new(&loads, &quotes, as_of);
        let curves = &self.config.curves;

        let lane_scorer = LaneRiskScorer::new(self.config);
        let mut lane_risks = Vec::new();
        for lane in extractor.lane_keys() {
            let signals = extractor.lane_signals(&lane, curves.demand_window_days);
            lane_risks.push(lane_scorer.score(&lane, &signals)?);
        }

        let csr_scorer = CsrPerformanceScorer::new(self.config);
        let mut csr_performance = Vec::with_capacity(csrs.len());
        for profile in csrs {
            let signals = extractor.csr_signals(profile.id);
            csr_performance.push(csr_scorer.score(profile, &signals)?);
        }
        csr_performance.sort_by(|a, b| {
            b.total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.csr_id.cmp(&b.csr_id))
        });

        let shipper_scorer = ShipperHealthScorer::new(self.config);
        let mut shipper_health = Vec::with_capacity(shippers.len());
        for profile in shippers {
            let signals = extractor.shipper_signals(profile.id, curves.shipper_volume_window_days);
            shipper_health.push(shipper_scorer.score(profile, &signals)?);
        }

        Ok(IntelligenceSnapshot {
            lane_risks,
            csr_performance,
            shipper_health,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::domain::{
        CarrierId, CsrId, LoadStatus, Location, ShipperId,
    };

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn place(state: &str) -> Location {
        Location {
            city: None,
            state: Some(state.to_string()),
            zip: None,
        }
    }

    fn load(id: i64, origin: &str, destination: &str, csr: i64, is_test: bool) -> LoadRecord {
        LoadRecord {
            id,
            carrier: Some(CarrierId(1)),
            shipper: Some(ShipperId(1)),
            csr: Some(CsrId(csr)),
            origin: place(origin),
            destination: place(destination),
            equipment: None,
            status: LoadStatus::Delivered,
            booked_on: day(2026, 5, 10),
            delivery_due: None,
            delivered_at: None,
            margin: 300.0,
            disputed: false,
            is_test,
        }
    }

    fn quote(id: i64, csr: i64, won: bool) -> QuoteRecord {
        QuoteRecord {
            id,
            csr: CsrId(csr),
            shipper: Some(ShipperId(1)),
            quoted_on: day(2026, 5, 8),
            won,
            response_minutes: Some(12),
            is_test: false,
        }
    }

    fn entities() -> (Vec<ShipperProfile>, Vec<CsrProfile>) {
        (
            vec![ShipperProfile {
                id: ShipperId(1),
                name: "Prairie Foods".to_string(),
            }],
            vec![
                CsrProfile {
                    id: CsrId(1),
                    name: "Jordan Mills".to_string(),
                },
                CsrProfile {
                    id: CsrId(2),
                    name: "Casey Tran".to_string(),
                },
            ],
        )
    }

    #[test]
    fn snapshot_covers_every_entity_in_scope() {
        let loads = vec![
            load(1, "IA", "TX", 1, false),
            load(2, "IA", "TX", 1, false),
            load(3, "GA", "FL", 2, false),
        ];
        let quotes = vec![quote(1, 1, true), quote(2, 2, false)];
        let (shippers, csrs) = entities();

        let config = ScoringConfig::default();
        let aggregator = IntelligenceAggregator::new(&config);
        let snapshot = aggregator
            .aggregate(
                &loads,
                &quotes,
                &shippers,
                &csrs,
                &IntelligenceScope::default(),
                day(2026, 6, 1),
            )
            .expect("aggregates");

        assert_eq!(snapshot.lane_risks.len(), 2);
        assert_eq!(snapshot.csr_performance.len(), 2);
        assert_eq!(snapshot.shipper_health.len(), 1);
    }

    #[test]
    fn csr_collection_is_sorted_best_first() {
        // CSR 1 converts and books more than CSR 2.
        let loads = vec![
            load(1, "IA", "TX", 1, false),
            load(2, "IA", "TX", 1, false),
            load(3, "GA", "FL", 2, false),
        ];
        let quotes = vec![
            quote(1, 1, true),
            quote(2, 1, true),
            quote(3, 2, false),
        ];
        let (shippers, csrs) = entities();

        let config = ScoringConfig::default();
        let aggregator = IntelligenceAggregator::new(&config);
        let snapshot = aggregator
            .aggregate(
                &loads,
                &quotes,
                &shippers,
                &csrs,
                &IntelligenceScope::default(),
                day(2026, 6, 1),
            )
            .expect("aggregates");

        let scores: Vec<f64> = snapshot
            .csr_performance
            .iter()
            .map(|result| result.total_score)
            .collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(snapshot.csr_performance[0].csr_id, CsrId(1));
    }

    #[test]
    fn lane_collection_keeps_stable_enumeration_order() {
        let loads = vec![
            load(1, "TX", "IA", 1, false),
            load(2, "GA", "FL", 1, false),
            load(3, "IA", "TX", 1, false),
        ];
        let quotes = vec![];
        let (shippers, csrs) = entities();

        let config = ScoringConfig::default();
        let aggregator = IntelligenceAggregator::new(&config);
        let snapshot = aggregator
            .aggregate(
                &loads,
                &quotes,
                &shippers,
                &csrs,
                &IntelligenceScope::default(),
                day(2026, 6, 1),
            )
            .expect("aggregates");

        let lane_ids: Vec<&str> = snapshot
            .lane_risks
            .iter()
            .map(|result| result.lane_id.as_str())
            .collect();
        assert_eq!(lane_ids, vec!["GA-FL", "IA-TX", "TX-IA"]);
    }

    #[test]
    fn test_rows_are_excluded_unless_requested() {
        let loads = vec![
            load(1, "IA", "TX", 1, false),
            load(2, "GA", "FL", 1, true),
        ];
        let quotes = vec![];
        let (shippers, csrs) = entities();

        let config = ScoringConfig::default();
        let aggregator = IntelligenceAggregator::new(&config);

        let filtered = aggregator
            .aggregate(
                &loads,
                &quotes,
                &shippers,
                &csrs,
                &IntelligenceScope { include_test: false },
                day(2026, 6, 1),
            )
            .expect("aggregates");
        assert_eq!(filtered.lane_risks.len(), 1);

        let unfiltered = aggregator
            .aggregate(
                &loads,
                &quotes,
                &shippers,
                &csrs,
                &IntelligenceScope { include_test: true },
                day(2026, 6, 1),
            )
            .expect("aggregates");
        assert_eq!(unfiltered.lane_risks.len(), 2);
    }
}
