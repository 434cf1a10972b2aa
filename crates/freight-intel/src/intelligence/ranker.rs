use chrono::NaiveDate;
use std::cmp::Ordering;
use std::time::Instant;

use super::config::ScoringConfig;
use super::domain::{
    match_declared_equipment, CarrierProfile, EquipmentMatch, LaneQuery, LoadRecord, QuoteRecord,
};
use super::scorers::{CarrierMatchResult, CarrierMatchScorer};
use super::signals::SignalExtractor;
use super::EngineError;

/// Per-call knobs for ranking. The evaluation date is explicit so identical
/// snapshots rank identically; the optional deadline bounds long pools.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub as_of: NaiveDate,
    pub deadline: Option<Instant>,
}

impl SearchOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Both buckets of a lane search. `recommended ∪ newcomers` is the full
/// eligible pool unless `truncated` is set, and the buckets never overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierSearchOutcome {
    pub recommended: Vec<CarrierMatchResult>,
    pub newcomers: Vec<CarrierMatchResult>,
    pub truncated: bool,
}

pub struct CandidateRanker<'a> {
    config: &'a ScoringConfig,
}

impl<'a> CandidateRanker<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    pub fn rank(
        &self,
        carriers: &[CarrierProfile],
        loads: &[LoadRecord],
        quotes: &[QuoteRecord],
        query: &LaneQuery,
        options: &SearchOptions,
    ) -> Result<CarrierSearchOutcome, EngineError> {
        query.validate()?;

        let mut pool: Vec<&CarrierProfile> = carriers
            .iter()
            .filter(|carrier| eligible(carrier, query))
            .collect();
        pool.sort_by_key(|carrier| carrier.id);

        let extractor = SignalExtractor::new(loads, quotes, options.as_of);
        let scorer = CarrierMatchScorer::new(self.config);

        let mut scored = Vec::with_capacity(pool.len());
        let mut truncated = false;
        for carrier in pool {
            if let Some(deadline) = options.deadline {
                if Instant::now() >= deadline {
                    truncated = true;
                    break;
                }
            }
            let signals = extractor.carrier_signals(carrier, query);
            scored.push(scorer.score(carrier, &signals)?);
        }

        let (mut recommended, mut newcomers): (Vec<_>, Vec<_>) = scored
            .into_iter()
            .partition(|result| result.has_lane_history || result.is_near_origin);
        recommended.sort_by(rank_ordering);
        newcomers.sort_by(rank_ordering);

        Ok(CarrierSearchOutcome {
            recommended,
            newcomers,
            truncated,
        })
    }
}

fn eligible(carrier: &CarrierProfile, query: &LaneQuery) -> bool {
    if !carrier.active || carrier.blocked {
        return false;
    }
    // An undeclared equipment list is unknown, not incompatible; only a
    // declared-but-unrelated list removes the carrier from the pool.
    if let Some(requested) = query.equipment {
        if match_declared_equipment(&carrier.equipment, requested)
            == Some(EquipmentMatch::Unrelated)
        {
            return false;
        }
    }
    true
}

/// Score descending, then lane runs descending, then most recent last load
/// (absent dates last), then ascending carrier id as the deterministic
/// final word.
fn rank_ordering(a: &CarrierMatchResult, b: &CarrierMatchResult) -> Ordering {
    b.total_score
        .partial_cmp(&a.total_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.lane_run_count.cmp(&a.lane_run_count))
        .then_with(|| b.last_load_date.cmp(&a.last_load_date))
        .then_with(|| a.carrier_id.cmp(&b.carrier_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::domain::{
        CarrierId, EquipmentType, LoadStatus, Location, ShipperId,
    };
    use std::time::Duration;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn place(city: &str, state: &str, zip: &str) -> Location {
        Location {
            city: Some(city.to_string()),
            state: Some(state.to_string()),
            zip: Some(zip.to_string()),
        }
    }

    fn carrier(id: i64, home: Location) -> CarrierProfile {
        CarrierProfile {
            id: CarrierId(id),
            name: format!("Carrier {id}"),
            mc_number: Some(format!("MC{id:06}")),
            dot_number: None,
            email: Some("dispatch@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            equipment: vec![EquipmentType::DryVan],
            service_states: vec!["IA".to_string(), "TX".to_string()],
            nationwide: false,
            home,
            active: true,
            blocked: false,
        }
    }

    fn lane_load(id: i64, carrier_id: i64, booked_on: NaiveDate) -> LoadRecord {
        LoadRecord {
            id,
            carrier: Some(CarrierId(carrier_id)),
            shipper: Some(ShipperId(1)),
            csr: None,
            origin: place("Davenport", "IA", "52806"),
            destination: place("Dallas", "TX", "75207"),
            equipment: Some(EquipmentType::DryVan),
            status: LoadStatus::Delivered,
            booked_on,
            delivery_due: None,
            delivered_at: None,
            margin: 300.0,
            disputed: false,
            is_test: false,
        }
    }

    fn query() -> LaneQuery {
        LaneQuery {
            origin_city: Some("Davenport".to_string()),
            origin_state: Some("IA".to_string()),
            origin_zip: Some("52801".to_string()),
            destination_city: Some("Dallas".to_string()),
            destination_state: Some("TX".to_string()),
            destination_zip: Some("75201".to_string()),
            equipment: Some(EquipmentType::DryVan),
            ..LaneQuery::default()
        }
    }

    #[test]
    fn buckets_partition_the_eligible_pool() {
        let far_home = place("Phoenix", "AZ", "85001");
        let carriers = vec![
            carrier(1, place("Davenport", "IA", "52801")), // near origin
            carrier(2, far_home.clone()),                  // lane history below
            carrier(3, far_home.clone()),                  // stranger
            carrier(4, far_home),                          // stranger
        ];
        let loads = vec![lane_load(1, 2, day(2026, 5, 1))];
        let quotes = vec![];

        let config = ScoringConfig::default();
        let ranker = CandidateRanker::new(&config);
        let outcome = ranker
            .rank(
                &carriers,
                &loads,
                &quotes,
                &query(),
                &SearchOptions::new(day(2026, 6, 1)),
            )
            .expect("ranks");

        assert!(!outcome.truncated);
        let recommended_ids: Vec<i64> = outcome
            .recommended
            .iter()
            .map(|result| result.carrier_id.0)
            .collect();
        let newcomer_ids: Vec<i64> = outcome
            .newcomers
            .iter()
            .map(|result| result.carrier_id.0)
            .collect();

        assert_eq!(
            outcome.recommended.len() + outcome.newcomers.len(),
            carriers.len()
        );
        for id in &recommended_ids {
            assert!(!newcomer_ids.contains(id));
        }
        assert!(recommended_ids.contains(&1));
        assert!(recommended_ids.contains(&2));
        assert_eq!(newcomer_ids, vec![3, 4]);
    }

    #[test]
    fn blocked_and_inactive_carriers_never_enter_the_pool() {
        let mut blocked = carrier(1, place("Davenport", "IA", "52801"));
        blocked.blocked = true;
        let mut inactive = carrier(2, place("Davenport", "IA", "52801"));
        inactive.active = false;
        let carriers = vec![blocked, inactive, carrier(3, place("Davenport", "IA", "52801"))];

        let config = ScoringConfig::default();
        let ranker = CandidateRanker::new(&config);
        let outcome = ranker
            .rank(
                &carriers,
                &[],
                &[],
                &query(),
                &SearchOptions::new(day(2026, 6, 1)),
            )
            .expect("ranks");

        assert_eq!(outcome.recommended.len() + outcome.newcomers.len(), 1);
    }

    #[test]
    fn incompatible_equipment_filters_but_undeclared_stays() {
        let mut power_only = carrier(1, place("Davenport", "IA", "52801"));
        power_only.equipment = vec![EquipmentType::PowerOnly];
        let mut undeclared = carrier(2, place("Davenport", "IA", "52801"));
        undeclared.equipment = vec![];
        let carriers = vec![power_only, undeclared];

        let config = ScoringConfig::default();
        let ranker = CandidateRanker::new(&config);
        let outcome = ranker
            .rank(
                &carriers,
                &[],
                &[],
                &query(),
                &SearchOptions::new(day(2026, 6, 1)),
            )
            .expect("ranks");

        let ids: Vec<i64> = outcome
            .recommended
            .iter()
            .chain(outcome.newcomers.iter())
            .map(|result| result.carrier_id.0)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn empty_pool_yields_two_empty_buckets() {
        let config = ScoringConfig::default();
        let ranker = CandidateRanker::new(&config);
        let outcome = ranker
            .rank(
                &[],
                &[],
                &[],
                &query(),
                &SearchOptions::new(day(2026, 6, 1)),
            )
            .expect("empty pool is not an error");
        assert!(outcome.recommended.is_empty());
        assert!(outcome.newcomers.is_empty());
        assert!(!outcome.truncated);
    }

    #[test]
    fn invalid_query_fails_before_any_scoring() {
        let carriers = vec![carrier(1, place("Davenport", "IA", "52801"))];
        let bad_query = LaneQuery {
            destination_city: Some("Dallas".to_string()),
            destination_state: Some("TX".to_string()),
            ..LaneQuery::default()
        };

        let config = ScoringConfig::default();
        let ranker = CandidateRanker::new(&config);
        let err = ranker
            .rank(
                &carriers,
                &[],
                &[],
                &bad_query,
                &SearchOptions::new(day(2026, 6, 1)),
            )
            .expect_err("origin unidentified");
        assert!(matches!(err, EngineError::InvalidQuery(_)));
    }

    #[test]
    fn ties_break_on_runs_then_recency_then_id() {
        // Four carriers with identical profiles and no history at all score
        // identically; ordering must fall through to ascending id.
        let home = place("Phoenix", "AZ", "85001");
        let carriers = vec![
            carrier(9, home.clone()),
            carrier(3, home.clone()),
            carrier(7, home.clone()),
            carrier(5, home),
        ];

        let config = ScoringConfig::default();
        let ranker = CandidateRanker::new(&config);
        let outcome = ranker
            .rank(
                &carriers,
                &[],
                &[],
                &query(),
                &SearchOptions::new(day(2026, 6, 1)),
            )
            .expect("ranks");

        let ids: Vec<i64> = outcome
            .newcomers
            .iter()
            .map(|result| result.carrier_id.0)
            .collect();
        assert_eq!(ids, vec![3, 5, 7, 9]);

        // Same score and run count, different last-load dates: recency wins.
        let carriers = vec![
            carrier(11, place("Davenport", "IA", "52801")),
            carrier(12, place("Davenport", "IA", "52801")),
        ];
        let loads = vec![
            lane_load(1, 11, day(2026, 3, 1)),
            lane_load(2, 12, day(2026, 5, 1)),
        ];
        let outcome = ranker
            .rank(
                &carriers,
                &loads,
                &[],
                &query(),
                &SearchOptions::new(day(2026, 6, 1)),
            )
            .expect("ranks");
        let ids: Vec<i64> = outcome
            .recommended
            .iter()
            .map(|result| result.carrier_id.0)
            .collect();
        assert_eq!(ids[0], 12);
    }

    #[test]
    fn expired_deadline_returns_truncated_best_effort() {
        let carriers = vec![
            carrier(1, place("Davenport", "IA", "52801")),
            carrier(2, place("Davenport", "IA", "52801")),
        ];

        let config = ScoringConfig::default();
        let ranker = CandidateRanker::new(&config);
        let expired = Instant::now() - Duration::from_millis(1);
        let outcome = ranker
            .rank(
                &carriers,
                &[],
                &[],
                &query(),
                &SearchOptions::new(day(2026, 6, 1)).with_deadline(expired),
            )
            .expect("truncation is not an error");

        assert!(outcome.truncated);
        assert!(outcome.recommended.len() + outcome.newcomers.len() < carriers.len());
    }
}
