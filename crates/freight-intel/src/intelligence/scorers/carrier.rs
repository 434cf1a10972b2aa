use chrono::NaiveDate;
use serde::Serialize;

use super::{weighted_total, SignalReading};
use crate::intelligence::config::ScoringConfig;
use crate::intelligence::domain::{CarrierId, CarrierProfile};
use crate::intelligence::normalize;
use crate::intelligence::signals::{CarrierSignals, ServiceAreaSignal};
use crate::intelligence::EngineError;

/// Match strength bands for a carrier against a queried lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Strong,
    Moderate,
    Weak,
}

impl MatchBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::Weak => "Weak",
        }
    }
}

/// Composite match for one carrier. Direction: a higher score is a better
/// match; this scorer never expresses risk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierMatchResult {
    pub carrier_id: CarrierId,
    pub name: String,
    pub total_score: f64,
    pub band: MatchBand,
    pub signals: Vec<SignalReading>,
    pub has_lane_history: bool,
    pub is_near_origin: bool,
    pub is_recently_active: bool,
    pub is_new_carrier: bool,
    pub lane_run_count: u32,
    pub origin_pickup_count: u32,
    pub region_run_count: u32,
    /// Fraction in [0,1]; `null` until the carrier has lane history.
    pub on_time_rate: Option<f64>,
    pub last_load_date: Option<NaiveDate>,
}

pub struct CarrierMatchScorer<'a> {
    config: &'a ScoringConfig,
}

impl<'a> CarrierMatchScorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        profile: &CarrierProfile,
        signals: &CarrierSignals,
    ) -> Result<CarrierMatchResult, EngineError> {
        let weights = &self.config.carrier;
        let curves = &self.config.curves;

        let proximity =
            normalize::proximity(signals.origin_distance_miles, curves.origin_max_radius_miles);

        let readings = vec![
            SignalReading::new(
                "laneHistory",
                normalize::saturating_share(signals.lane_run_count, curves.lane_run_saturation),
                weights.lane_history,
            ),
            SignalReading::new(
                "onTime",
                normalize::optional_ratio(signals.on_time_rate, curves.on_time_neutral),
                weights.on_time,
            ),
            SignalReading::new(
                "equipmentMatch",
                normalize::optional_ratio(signals.equipment_match, curves.equipment_neutral),
                weights.equipment_match,
            ),
            SignalReading::new(
                "profileCompleteness",
                normalize::ratio(signals.profile_completeness),
                weights.profile_completeness,
            ),
            SignalReading::new(
                "serviceAreaMatch",
                normalize::ratio(coverage_ratio(&signals.service_area, self.config)),
                weights.service_area,
            ),
            SignalReading::new("originProximity", proximity, weights.origin_proximity),
        ];

        let total_score = weighted_total(&readings)?;
        let band = self.classify(total_score);

        let has_lane_history = signals.lane_run_count > 0;
        let is_near_origin = proximity >= curves.near_origin_min_proximity
            || signals.origin_pickup_count >= curves.near_origin_min_pickups;
        let activity = normalize::recency(
            signals.days_since_last_load,
            curves.activity_half_life_days,
            0.0,
        );
        let is_recently_active = activity >= curves.recently_active_min;
        let is_new_carrier =
            !has_lane_history && !is_near_origin && signals.origin_pickup_count == 0;

        Ok(CarrierMatchResult {
            carrier_id: profile.id,
            name: profile.name.clone(),
            total_score,
            band,
            signals: readings,
            has_lane_history,
            is_near_origin,
            is_recently_active,
            is_new_carrier,
            lane_run_count: signals.lane_run_count,
            origin_pickup_count: signals.origin_pickup_count,
            region_run_count: signals.region_run_count,
            on_time_rate: signals.on_time_rate,
            last_load_date: signals.last_load_on,
        })
    }

    fn classify(&self, score: f64) -> MatchBand {
        let thresholds = &self.config.thresholds;
        if score >= thresholds.carrier_strong {
            MatchBand::Strong
        } else if score >= thresholds.carrier_moderate {
            MatchBand::Moderate
        } else {
            MatchBand::Weak
        }
    }
}

fn coverage_ratio(signal: &ServiceAreaSignal, config: &ScoringConfig) -> f64 {
    let curves = &config.curves;
    if signal.nationwide {
        return curves.service_area_nationwide;
    }
    if !signal.declared {
        return curves.service_area_floor;
    }
    let mut covered_sides = 0u8;
    if signal.covers_origin {
        covered_sides += 1;
    }
    if signal.covers_destination {
        covered_sides += 1;
    }
    (curves.service_area_floor + curves.service_area_per_side * f64::from(covered_sides)).min(1.0)
}
