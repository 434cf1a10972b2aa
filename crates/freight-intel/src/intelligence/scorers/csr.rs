use serde::Serialize;

use super::{weighted_total, SignalReading};
use crate::intelligence::config::ScoringConfig;
use crate::intelligence::domain::{CsrId, CsrProfile};
use crate::intelligence::normalize;
use crate::intelligence::signals::CsrSignals;
use crate::intelligence::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Top,
    Solid,
    Developing,
}

impl PerformanceTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Solid => "Solid",
            Self::Developing => "Developing",
        }
    }
}

/// Composite performance for one CSR. Direction: a higher score is a
/// stronger performer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrPerformanceResult {
    pub csr_id: CsrId,
    pub name: String,
    pub total_score: f64,
    pub tier: PerformanceTier,
    pub signals: Vec<SignalReading>,
    pub loads_secured: u32,
    pub total_quotes: u32,
    pub avg_margin: Option<f64>,
    pub strengths: Vec<&'static str>,
    pub weaknesses: Vec<&'static str>,
}

pub struct CsrPerformanceScorer<'a> {
    config: &'a ScoringConfig,
}

impl<'a> CsrPerformanceScorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        profile: &CsrProfile,
        signals: &CsrSignals,
    ) -> Result<CsrPerformanceResult, EngineError> {
        let weights = &self.config.csr;
        let curves = &self.config.curves;
        let thresholds = &self.config.thresholds;

        let conversion_rate = if signals.total_quotes > 0 {
            Some(f64::from(signals.quotes_won) / f64::from(signals.total_quotes))
        } else {
            None
        };

        let readings = vec![
            SignalReading::new(
                "quoteConversion",
                normalize::optional_ratio(conversion_rate, curves.response_neutral),
                weights.conversion,
            ),
            SignalReading::new(
                "bookedVolume",
                normalize::saturating_share(signals.loads_secured, curves.csr_volume_saturation),
                weights.volume,
            ),
            SignalReading::new(
                "marginQuality",
                normalize::margin(
                    signals.avg_margin,
                    curves.margin_saturation,
                    curves.margin_neutral,
                ),
                weights.margin,
            ),
        ];

        let total_score = weighted_total(&readings)?;
        let tier = self.classify(total_score);

        // Coaching signals compare against the same benchmarks as the scored
        // ones but carry no weight in the composite.
        let repeat_share = if signals.loads_secured > 0 {
            f64::from(signals.repeat_shipper_loads) / f64::from(signals.loads_secured)
        } else {
            0.0
        };
        let benchmarked = [
            ("quoteConversion", readings[0].normalized),
            ("bookedVolume", readings[1].normalized),
            ("marginQuality", readings[2].normalized),
            (
                "laneDiversity",
                normalize::saturating_share(
                    signals.lane_diversity,
                    curves.csr_lane_diversity_saturation,
                ),
            ),
            ("repeatBusiness", normalize::ratio(repeat_share)),
        ];

        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        for (signal, normalized) in benchmarked {
            let label = signal_label(signal);
            if normalized >= thresholds.csr_strength_min {
                strengths.push(label);
            } else if normalized <= thresholds.csr_weakness_max {
                weaknesses.push(label);
            }
        }

        Ok(CsrPerformanceResult {
            csr_id: profile.id,
            name: profile.name.clone(),
            total_score,
            tier,
            signals: readings,
            loads_secured: signals.loads_secured,
            total_quotes: signals.total_quotes,
            avg_margin: signals.avg_margin,
            strengths,
            weaknesses,
        })
    }

    fn classify(&self, score: f64) -> PerformanceTier {
        let thresholds = &self.config.thresholds;
        if score >= thresholds.csr_top {
            PerformanceTier::Top
        } else if score >= thresholds.csr_solid {
            PerformanceTier::Solid
        } else {
            PerformanceTier::Developing
        }
    }
}

fn signal_label(signal: &'static str) -> &'static str {
    match signal {
        "quoteConversion" => "Quote conversion",
        "bookedVolume" => "Booked volume",
        "marginQuality" => "Margin quality",
        "laneDiversity" => "Lane diversity",
        "repeatBusiness" => "Repeat business",
        other => other,
    }
}
