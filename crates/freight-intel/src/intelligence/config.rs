use serde::{Deserialize, Serialize};

/// Tuning surface for every scorer: weight vectors, normalization curves,
/// and classification thresholds. Values here are calibration inputs, not
/// invariants; the engine only requires the documented monotonicity of each
/// curve and that the positive weights of a scorer sum to its stated total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub carrier: CarrierMatchWeights,
    pub lane: LaneRiskWeights,
    pub shipper: ShipperHealthWeights,
    pub csr: CsrPerformanceWeights,
    pub curves: NormalizationCurves,
    pub thresholds: LevelThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            carrier: CarrierMatchWeights::default(),
            lane: LaneRiskWeights::default(),
            shipper: ShipperHealthWeights::default(),
            csr: CsrPerformanceWeights::default(),
            curves: NormalizationCurves::default(),
            thresholds: LevelThresholds::default(),
        }
    }
}

/// Weights for carrier-to-lane matching. Sums to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierMatchWeights {
    pub lane_history: f64,
    pub on_time: f64,
    pub equipment_match: f64,
    pub profile_completeness: f64,
    pub service_area: f64,
    pub origin_proximity: f64,
}

impl Default for CarrierMatchWeights {
    fn default() -> Self {
        Self {
            lane_history: 0.35,
            on_time: 0.20,
            equipment_match: 0.15,
            profile_completeness: 0.10,
            service_area: 0.10,
            origin_proximity: 0.10,
        }
    }
}

/// Weights for lane risk. Sums to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneRiskWeights {
    pub reliability: f64,
    pub volatility: f64,
    pub scarcity: f64,
    pub competition: f64,
}

impl Default for LaneRiskWeights {
    fn default() -> Self {
        Self {
            reliability: 0.40,
            volatility: 0.25,
            scarcity: 0.20,
            competition: 0.15,
        }
    }
}

/// Weights for shipper health. The positive portion sums to 0.90 so a
/// flawless shipper with open disputes still has headroom to lose; disputes
/// subtract points directly rather than carrying a weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipperHealthWeights {
    pub margin: f64,
    pub volume: f64,
    pub responsiveness: f64,
    pub retention: f64,
    pub dispute_penalty_points: f64,
    pub dispute_penalty_cap: f64,
}

impl Default for ShipperHealthWeights {
    fn default() -> Self {
        Self {
            margin: 0.30,
            volume: 0.25,
            responsiveness: 0.20,
            retention: 0.15,
            dispute_penalty_points: 12.0,
            dispute_penalty_cap: 45.0,
        }
    }
}

/// Weights for CSR performance. Sums to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrPerformanceWeights {
    pub conversion: f64,
    pub volume: f64,
    pub margin: f64,
}

impl Default for CsrPerformanceWeights {
    fn default() -> Self {
        Self {
            conversion: 0.40,
            volume: 0.30,
            margin: 0.30,
        }
    }
}

/// Saturation points, half-lives, neutral defaults, and flag cutoffs used by
/// the normalizer. Every `*_neutral` value documents what an absent signal
/// reads as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationCurves {
    /// Lane run count saturates here: this many completed runs reads as 100.
    pub lane_run_saturation: u32,
    pub origin_pickup_saturation: u32,
    /// Unknown on-time history reads as average, not as failing.
    pub on_time_neutral: f64,
    /// No basis for an equipment comparison (either side undeclared).
    pub equipment_neutral: f64,
    /// Undeclared service areas earn partial credit rather than zero; a
    /// nationwide declaration maps to this coverage ratio.
    pub service_area_floor: f64,
    pub service_area_nationwide: f64,
    pub service_area_per_side: f64,
    pub origin_max_radius_miles: f64,
    /// Carrier recent-activity decay and the cutoff for the
    /// `isRecentlyActive` flag.
    pub activity_half_life_days: f64,
    pub recently_active_min: f64,
    /// `isNearOrigin` cutoffs: normalized proximity, or habitual pickups.
    pub near_origin_min_proximity: f64,
    pub near_origin_min_pickups: u32,
    /// Lane demand window and saturation.
    pub demand_window_days: i64,
    pub lane_demand_saturation: u32,
    pub lane_competition_saturation: u32,
    /// Margin coefficient-of-variation that reads as fully volatile.
    pub volatility_saturation: f64,
    pub volatility_neutral: f64,
    /// Unknown fall-off history on a lane reads as average risk.
    pub fall_off_neutral: f64,
    /// Average margin (dollars per load) that reads as 100.
    pub margin_saturation: f64,
    pub margin_neutral: f64,
    pub response_neutral: f64,
    pub shipper_volume_window_days: i64,
    pub shipper_volume_saturation: u32,
    pub shipper_tenure_saturation_days: f64,
    pub shipper_idle_half_life_days: f64,
    pub csr_volume_saturation: u32,
    /// Distinct lanes that read as a fully diversified book.
    pub csr_lane_diversity_saturation: u32,
}

impl Default for NormalizationCurves {
    fn default() -> Self {
        Self {
            lane_run_saturation: 10,
            origin_pickup_saturation: 10,
            on_time_neutral: 50.0,
            equipment_neutral: 50.0,
            service_area_floor: 0.3,
            service_area_nationwide: 0.8,
            service_area_per_side: 0.35,
            origin_max_radius_miles: 250.0,
            activity_half_life_days: 90.0,
            recently_active_min: 50.0,
            near_origin_min_proximity: 60.0,
            near_origin_min_pickups: 3,
            demand_window_days: 90,
            lane_demand_saturation: 20,
            lane_competition_saturation: 8,
            volatility_saturation: 1.0,
            volatility_neutral: 50.0,
            fall_off_neutral: 50.0,
            margin_saturation: 600.0,
            margin_neutral: 50.0,
            response_neutral: 50.0,
            shipper_volume_window_days: 90,
            shipper_volume_saturation: 12,
            shipper_tenure_saturation_days: 365.0,
            shipper_idle_half_life_days: 90.0,
            csr_volume_saturation: 30,
            csr_lane_diversity_saturation: 8,
        }
    }
}

/// Ordered classification cutoffs, evaluated high-to-low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelThresholds {
    pub carrier_strong: f64,
    pub carrier_moderate: f64,
    pub lane_high: f64,
    pub lane_medium: f64,
    pub shipper_green: f64,
    pub shipper_yellow: f64,
    pub csr_top: f64,
    pub csr_solid: f64,
    /// CSR signal benchmarks feeding strengths/weaknesses.
    pub csr_strength_min: f64,
    pub csr_weakness_max: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            carrier_strong: 70.0,
            carrier_moderate: 40.0,
            lane_high: 70.0,
            lane_medium: 40.0,
            shipper_green: 70.0,
            shipper_yellow: 40.0,
            csr_top: 75.0,
            csr_solid: 45.0,
            csr_strength_min: 65.0,
            csr_weakness_max: 35.0,
        }
    }
}
