use serde::Serialize;

use super::{weighted_total, SignalReading};
use crate::intelligence::config::ScoringConfig;
use crate::intelligence::domain::{ShipperId, ShipperProfile};
use crate::intelligence::normalize;
use crate::intelligence::signals::ShipperSignals;
use crate::intelligence::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    Green,
    Yellow,
    Red,
}

impl HealthBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
        }
    }
}

/// Composite health for one shipper relationship. Direction: a higher score
/// is a healthier account; red means the relationship needs attention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipperHealthResult {
    pub shipper_id: ShipperId,
    pub name: String,
    pub total_score: f64,
    pub risk_level: HealthBand,
    pub signals: Vec<SignalReading>,
    pub loads: u32,
    pub dispute_count: u32,
}

pub struct ShipperHealthScorer<'a> {
    config: &'a ScoringConfig,
}

impl<'a> ShipperHealthScorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        profile: &ShipperProfile,
        signals: &ShipperSignals,
    ) -> Result<ShipperHealthResult, EngineError> {
        let weights = &self.config.shipper;
        let curves = &self.config.curves;

        let readings = vec![
            SignalReading::new(
                "margin",
                normalize::margin(
                    signals.avg_margin,
                    curves.margin_saturation,
                    curves.margin_neutral,
                ),
                weights.margin,
            ),
            SignalReading::new(
                "volume",
                normalize::saturating_share(
                    signals.volume_recent,
                    curves.shipper_volume_saturation,
                ),
                weights.volume,
            ),
            SignalReading::new(
                "responsiveness",
                normalize::optional_ratio(signals.response_rate, curves.response_neutral),
                weights.responsiveness,
            ),
            SignalReading::new(
                "retention",
                normalize::retention(
                    signals.tenure_days,
                    signals.days_since_last_load,
                    curves.shipper_tenure_saturation_days,
                    curves.shipper_idle_half_life_days,
                ),
                weights.retention,
            ),
        ];

        // Disputes subtract points directly instead of carrying a weight, so
        // a high-margin account cannot buy its way out of claims.
        let weighted = weighted_total(&readings)?;
        let penalty = (f64::from(signals.dispute_count) * weights.dispute_penalty_points)
            .min(weights.dispute_penalty_cap);
        let total_score = (weighted - penalty).clamp(0.0, 100.0);
        let risk_level = self.classify(total_score);

        Ok(ShipperHealthResult {
            shipper_id: profile.id,
            name: profile.name.clone(),
            total_score,
            risk_level,
            signals: readings,
            loads: signals.loads,
            dispute_count: signals.dispute_count,
        })
    }

    fn classify(&self, score: f64) -> HealthBand {
        let thresholds = &self.config.thresholds;
        if score >= thresholds.shipper_green {
            HealthBand::Green
        } else if score >= thresholds.shipper_yellow {
            HealthBand::Yellow
        } else {
            HealthBand::Red
        }
    }
}
