//! Transforms from raw aggregates to bounded [0,100] sub-signal values.
//!
//! Every transform is monotonic: more of a positively-correlated raw signal
//! never lowers the normalized value, and more of a penalty signal never
//! raises the value produced by its inverse transform. Absent (`None`)
//! inputs map to the explicit default passed by the scorer; nothing here
//! silently coerces missing data to zero.

/// Saturating linear scale for counts: `count >= saturation` reads as 100.
pub(crate) fn saturating_share(count: u32, saturation: u32) -> f64 {
    if saturation == 0 {
        return 100.0;
    }
    (f64::from(count) / f64::from(saturation)).min(1.0) * 100.0
}

/// Inverse count scale for scarcity/pressure style signals: zero volume is
/// maximum risk, the saturation point and beyond read as none.
pub(crate) fn inverse_share(count: u32, saturation: u32) -> f64 {
    100.0 - saturating_share(count, saturation)
}

/// A ratio already in [0,1], e.g. an on-time rate.
pub(crate) fn ratio(raw: f64) -> f64 {
    raw.clamp(0.0, 1.0) * 100.0
}

/// A nullable ratio; `None` reads as the scorer's documented neutral value.
pub(crate) fn optional_ratio(raw: Option<f64>, neutral: f64) -> f64 {
    raw.map(ratio).unwrap_or(neutral).clamp(0.0, 100.0)
}

/// Exponential recency decay: today is 100, one half-life-worth of days ago
/// is ~36.8. `None` (no activity on record) reads as the supplied default.
pub(crate) fn recency(days_since: Option<i64>, half_life_days: f64, missing: f64) -> f64 {
    match days_since {
        Some(days) => {
            let days = days.max(0) as f64;
            100.0 * (-days / half_life_days.max(1.0)).exp()
        }
        None => missing,
    }
}

/// Linear distance falloff saturating at the configured radius. An unknown
/// home location earns no proximity credit.
pub(crate) fn proximity(distance_miles: Option<f64>, max_radius_miles: f64) -> f64 {
    match distance_miles {
        Some(miles) => {
            let radius = max_radius_miles.max(1.0);
            100.0 * (1.0 - miles.max(0.0) / radius).max(0.0)
        }
        None => 0.0,
    }
}

/// Saturating scale of a margin coefficient of variation. `None` (fewer than
/// two priced loads) reads as the neutral value.
pub(crate) fn volatility(cv: Option<f64>, saturation_cv: f64, neutral: f64) -> f64 {
    match cv {
        Some(value) => (value.max(0.0) / saturation_cv.max(f64::EPSILON)).min(1.0) * 100.0,
        None => neutral,
    }
}

/// Average dollar margin on a saturating scale; negative margins floor at 0.
pub(crate) fn margin(avg_margin: Option<f64>, saturation: f64, neutral: f64) -> f64 {
    match avg_margin {
        Some(value) => (value.max(0.0) / saturation.max(f64::EPSILON)).min(1.0) * 100.0,
        None => neutral,
    }
}

/// Tenure-weighted continuity: how long the relationship has existed, damped
/// by how long it has sat idle. Either input missing means no relationship
/// to retain, which reads as 0.
pub(crate) fn retention(
    tenure_days: Option<i64>,
    idle_days: Option<i64>,
    tenure_saturation_days: f64,
    idle_half_life_days: f64,
) -> f64 {
    match (tenure_days, idle_days) {
        (Some(tenure), Some(idle)) => {
            let tenure_share =
                (tenure.max(0) as f64 / tenure_saturation_days.max(1.0)).min(1.0);
            let continuity = (-(idle.max(0) as f64) / idle_half_life_days.max(1.0)).exp();
            tenure_share * continuity * 100.0
        }
        _ => 0.0,
    }
}
