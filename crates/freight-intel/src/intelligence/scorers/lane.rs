use serde::Serialize;

use super::{weighted_total, SignalReading};
use crate::intelligence::config::ScoringConfig;
use crate::intelligence::domain::LaneKey;
use crate::intelligence::normalize;
use crate::intelligence::signals::LaneSignals;
use crate::intelligence::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Composite risk for one lane. Direction: a higher score is a riskier
/// lane, the opposite of the carrier match scale, so the two must never be
/// compared directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneRiskResult {
    pub lane_id: String,
    pub origin: String,
    pub destination: String,
    pub total_score: f64,
    pub risk_level: RiskLevel,
    pub signals: Vec<SignalReading>,
    pub loads: u32,
    pub avg_margin: f64,
}

pub struct LaneRiskScorer<'a> {
    config: &'a ScoringConfig,
}

impl<'a> LaneRiskScorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        lane: &LaneKey,
        signals: &LaneSignals,
    ) -> Result<LaneRiskResult, EngineError> {
        let weights = &self.config.lane;
        let curves = &self.config.curves;

        let readings = vec![
            SignalReading::new(
                "reliabilityRisk",
                normalize::optional_ratio(signals.fall_off_rate, curves.fall_off_neutral),
                weights.reliability,
            ),
            SignalReading::new(
                "pricingVolatility",
                normalize::volatility(
                    signals.margin_volatility,
                    curves.volatility_saturation,
                    curves.volatility_neutral,
                ),
                weights.volatility,
            ),
            SignalReading::new(
                "demandScarcity",
                normalize::inverse_share(signals.demand, curves.lane_demand_saturation),
                weights.scarcity,
            ),
            SignalReading::new(
                "competitionPressure",
                normalize::inverse_share(
                    signals.competing_carriers,
                    curves.lane_competition_saturation,
                ),
                weights.competition,
            ),
        ];

        let total_score = weighted_total(&readings)?;

        // A lane shedding carriers at the saturated fall-off rate is high
        // risk no matter how calm pricing and demand look.
        let reliability_saturated = readings
            .first()
            .map(|reading| reading.normalized >= 100.0)
            .unwrap_or(false);
        let risk_level = if reliability_saturated {
            RiskLevel::High
        } else {
            self.classify(total_score)
        };

        Ok(LaneRiskResult {
            lane_id: lane.label(),
            origin: lane.origin_state.clone(),
            destination: lane.destination_state.clone(),
            total_score,
            risk_level,
            signals: readings,
            loads: signals.loads,
            avg_margin: signals.avg_margin,
        })
    }

    fn classify(&self, score: f64) -> RiskLevel {
        let thresholds = &self.config.thresholds;
        if score >= thresholds.lane_high {
            RiskLevel::High
        } else if score >= thresholds.lane_medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy_lane() -> LaneSignals {
        LaneSignals {
            loads: 40,
            avg_margin: 320.0,
            demand: 25,
            margin_volatility: Some(0.1),
            fall_off_rate: Some(0.02),
            competing_carriers: 9,
        }
    }

    #[test]
    fn healthy_lane_classifies_low() {
        let config = ScoringConfig::default();
        let scorer = LaneRiskScorer::new(&config);
        let result = scorer
            .score(&LaneKey::new("IA", "TX"), &busy_lane())
            .expect("scores");
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!((0.0..=100.0).contains(&result.total_score));
        assert_eq!(result.lane_id, "IA-TX");
    }

    #[test]
    fn saturated_fall_off_rate_forces_high_risk() {
        let config = ScoringConfig::default();
        let scorer = LaneRiskScorer::new(&config);

        // Every other signal at its calmest; saturated fall-offs alone must
        // still carry the lane into the high band.
        let mut signals = busy_lane();
        signals.fall_off_rate = Some(1.0);
        signals.margin_volatility = Some(0.0);
        signals.demand = 25;
        signals.competing_carriers = 9;

        let result = scorer
            .score(&LaneKey::new("IA", "TX"), &signals)
            .expect("scores");
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn more_fall_offs_never_lower_the_risk() {
        let config = ScoringConfig::default();
        let scorer = LaneRiskScorer::new(&config);
        let lane = LaneKey::new("IA", "TX");

        let mut previous = -1.0;
        for step in 0..=10 {
            let mut signals = busy_lane();
            signals.fall_off_rate = Some(f64::from(step) / 10.0);
            let score = scorer.score(&lane, &signals).expect("scores").total_score;
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn thin_demand_reads_riskier_than_heavy_demand() {
        let config = ScoringConfig::default();
        let scorer = LaneRiskScorer::new(&config);
        let lane = LaneKey::new("GA", "FL");

        let mut thin = busy_lane();
        thin.demand = 1;
        thin.competing_carriers = 1;
        let mut heavy = busy_lane();
        heavy.demand = 30;
        heavy.competing_carriers = 10;

        let thin_score = scorer.score(&lane, &thin).expect("scores").total_score;
        let heavy_score = scorer.score(&lane, &heavy).expect("scores").total_score;
        assert!(thin_score > heavy_score);
    }

    #[test]
    fn unknown_fall_off_history_reads_neutral() {
        let config = ScoringConfig::default();
        let scorer = LaneRiskScorer::new(&config);
        let mut signals = busy_lane();
        signals.fall_off_rate = None;

        let result = scorer
            .score(&LaneKey::new("MN", "WI"), &signals)
            .expect("scores");
        let reliability = result
            .signals
            .iter()
            .find(|reading| reading.signal == "reliabilityRisk")
            .expect("reliability reading present");
        assert_eq!(reliability.normalized, config.curves.fall_off_neutral);
    }
}
