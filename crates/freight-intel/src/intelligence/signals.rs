use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap, HashSet};

use super::domain::{
    match_declared_equipment, CarrierProfile, CsrId, LaneKey, LaneQuery, LoadRecord, QuoteRecord,
    Region, ShipperId,
};

/// Raw aggregates for carrier-to-lane matching. Extraction only; weighting
/// and normalization happen downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierSignals {
    pub lane_run_count: u32,
    /// `None` until the carrier has completed a load on this lane.
    pub on_time_rate: Option<f64>,
    /// `None` when the query names no equipment or the carrier declares none.
    pub equipment_match: Option<f64>,
    /// Populated fraction of the profile fields dispatch relies on.
    pub profile_completeness: f64,
    pub service_area: ServiceAreaSignal,
    /// Estimated miles from the carrier's home base to the query origin;
    /// `None` when the home location is unknown.
    pub origin_distance_miles: Option<f64>,
    pub days_since_last_load: Option<i64>,
    pub region_run_count: u32,
    pub origin_pickup_count: u32,
    pub last_load_on: Option<NaiveDate>,
}

/// What the carrier's declared service area says about the queried lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceAreaSignal {
    pub declared: bool,
    pub nationwide: bool,
    pub covers_origin: bool,
    pub covers_destination: bool,
}

/// Raw aggregates for one state-to-state lane.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSignals {
    pub loads: u32,
    pub avg_margin: f64,
    /// Loads booked inside the demand window.
    pub demand: u32,
    /// Coefficient of variation of lane margins; `None` below two priced
    /// loads or at zero mean.
    pub margin_volatility: Option<f64>,
    /// Share of carrier-assigned lane loads that fell off; `None` when no
    /// load was ever assigned.
    pub fall_off_rate: Option<f64>,
    pub competing_carriers: u32,
}

/// Raw aggregates for shipper health.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipperSignals {
    pub loads: u32,
    /// Realized margin across completed loads; `None` until one completes.
    pub avg_margin: Option<f64>,
    pub volume_recent: u32,
    /// Share of RFQs the shipper answered; `None` without quotes on record.
    pub response_rate: Option<f64>,
    pub tenure_days: Option<i64>,
    pub days_since_last_load: Option<i64>,
    pub dispute_count: u32,
}

/// Raw aggregates for CSR performance.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrSignals {
    pub loads_secured: u32,
    pub total_quotes: u32,
    pub quotes_won: u32,
    pub avg_margin: Option<f64>,
    pub lane_diversity: u32,
    pub repeat_shipper_loads: u32,
}

/// Aggregates a point-in-time row snapshot into per-entity raw signals. The
/// evaluation date is an explicit input so extraction stays referentially
/// transparent.
pub struct SignalExtractor<'a> {
    loads: &'a [LoadRecord],
    quotes: &'a [QuoteRecord],
    as_of: NaiveDate,
}

impl<'a> SignalExtractor<'a> {
    pub fn new(loads: &'a [LoadRecord], quotes: &'a [QuoteRecord], as_of: NaiveDate) -> Self {
        Self {
            loads,
            quotes,
            as_of,
        }
    }

    pub fn carrier_signals(&self, profile: &CarrierProfile, query: &LaneQuery) -> CarrierSignals {
        let origin_region = query.origin_region();
        let destination_region = query.destination_region();

        let carrier_loads: Vec<&LoadRecord> = self
            .loads
            .iter()
            .filter(|load| load.carrier == Some(profile.id))
            .collect();

        let mut lane_runs = 0u32;
        let mut lane_on_time = 0u32;
        let mut region_runs = 0u32;
        let mut origin_pickups = 0u32;
        let mut last_load_on: Option<NaiveDate> = None;

        for load in &carrier_loads {
            if last_load_on.map(|seen| load.booked_on > seen).unwrap_or(true) {
                last_load_on = Some(load.booked_on);
            }

            if !load.is_completed() {
                continue;
            }

            let picks_up_in_origin = origin_region
                .as_ref()
                .map(|region| region.covers(&load.origin))
                .unwrap_or(false);
            let drops_in_destination = destination_region
                .as_ref()
                .map(|region| region.covers(&load.destination))
                .unwrap_or(false);

            if picks_up_in_origin {
                origin_pickups += 1;
            }
            if picks_up_in_origin || drops_in_destination {
                region_runs += 1;
            }
            if picks_up_in_origin && drops_in_destination {
                lane_runs += 1;
                if load.delivered_on_time() {
                    lane_on_time += 1;
                }
            }
        }

        let on_time_rate = if lane_runs > 0 {
            Some(f64::from(lane_on_time) / f64::from(lane_runs))
        } else {
            None
        };

        let equipment_match = query.equipment.and_then(|requested| {
            match_declared_equipment(&profile.equipment, requested).map(|grade| grade.ratio())
        });

        CarrierSignals {
            lane_run_count: lane_runs,
            on_time_rate,
            equipment_match,
            profile_completeness: profile_completeness(profile),
            service_area: service_area_signal(profile, query),
            origin_distance_miles: estimate_origin_distance(profile, query),
            days_since_last_load: last_load_on.map(|on| (self.as_of - on).num_days()),
            region_run_count: region_runs,
            origin_pickup_count: origin_pickups,
            last_load_on,
        }
    }

    pub fn lane_signals(&self, lane: &LaneKey, demand_window_days: i64) -> LaneSignals {
        let origin = Region::State(lane.origin_state.clone());
        let destination = Region::State(lane.destination_state.clone());

        let lane_loads: Vec<&LoadRecord> = self
            .loads
            .iter()
            .filter(|load| origin.covers(&load.origin) && destination.covers(&load.destination))
            .collect();

        let loads = lane_loads.len() as u32;
        let margins: Vec<f64> = lane_loads.iter().map(|load| load.margin).collect();
        let avg_margin = if margins.is_empty() {
            0.0
        } else {
            margins.iter().sum::<f64>() / margins.len() as f64
        };

        let demand_cutoff = self.as_of - chrono::Duration::days(demand_window_days.max(0));
        let demand = lane_loads
            .iter()
            .filter(|load| load.booked_on >= demand_cutoff)
            .count() as u32;

        let assigned = lane_loads
            .iter()
            .filter(|load| load.carrier.is_some())
            .count() as u32;
        let fall_offs = lane_loads.iter().filter(|load| load.is_fall_off()).count() as u32;
        let fall_off_rate = if assigned > 0 {
            Some(f64::from(fall_offs) / f64::from(assigned))
        } else {
            None
        };

        let competing_carriers = lane_loads
            .iter()
            .filter_map(|load| load.carrier)
            .collect::<HashSet<_>>()
            .len() as u32;

        LaneSignals {
            loads,
            avg_margin,
            demand,
            margin_volatility: coefficient_of_variation(&margins),
            fall_off_rate,
            competing_carriers,
        }
    }

    pub fn shipper_signals(&self, shipper: ShipperId, volume_window_days: i64) -> ShipperSignals {
        let shipper_loads: Vec<&LoadRecord> = self
            .loads
            .iter()
            .filter(|load| load.shipper == Some(shipper))
            .collect();

        let mut first_booked: Option<NaiveDate> = None;
        let mut last_booked: Option<NaiveDate> = None;
        let mut completed_margins: Vec<f64> = Vec::new();
        let mut dispute_count = 0u32;

        for load in &shipper_loads {
            if first_booked.map(|seen| load.booked_on < seen).unwrap_or(true) {
                first_booked = Some(load.booked_on);
            }
            if last_booked.map(|seen| load.booked_on > seen).unwrap_or(true) {
                last_booked = Some(load.booked_on);
            }
            if load.is_completed() {
                completed_margins.push(load.margin);
            }
            if load.disputed {
                dispute_count += 1;
            }
        }

        let avg_margin = if completed_margins.is_empty() {
            None
        } else {
            Some(completed_margins.iter().sum::<f64>() / completed_margins.len() as f64)
        };

        let volume_cutoff = self.as_of - chrono::Duration::days(volume_window_days.max(0));
        let volume_recent = shipper_loads
            .iter()
            .filter(|load| load.booked_on >= volume_cutoff)
            .count() as u32;

        let shipper_quotes: Vec<&QuoteRecord> = self
            .quotes
            .iter()
            .filter(|quote| quote.shipper == Some(shipper))
            .collect();
        let response_rate = if shipper_quotes.is_empty() {
            None
        } else {
            let responded = shipper_quotes
                .iter()
                .filter(|quote| quote.response_minutes.is_some())
                .count();
            Some(responded as f64 / shipper_quotes.len() as f64)
        };

        ShipperSignals {
            loads: shipper_loads.len() as u32,
            avg_margin,
            volume_recent,
            response_rate,
            tenure_days: first_booked.map(|on| (self.as_of - on).num_days()),
            days_since_last_load: last_booked.map(|on| (self.as_of - on).num_days()),
            dispute_count,
        }
    }

    pub fn csr_signals(&self, csr: CsrId) -> CsrSignals {
        let secured: Vec<&LoadRecord> = self
            .loads
            .iter()
            .filter(|load| load.csr == Some(csr) && load.is_completed())
            .collect();

        let avg_margin = if secured.is_empty() {
            None
        } else {
            Some(secured.iter().map(|load| load.margin).sum::<f64>() / secured.len() as f64)
        };

        let lanes: HashSet<(String, String)> = secured
            .iter()
            .filter_map(|load| {
                match (load.origin.state.as_deref(), load.destination.state.as_deref()) {
                    (Some(origin), Some(destination)) => Some((
                        origin.to_ascii_uppercase(),
                        destination.to_ascii_uppercase(),
                    )),
                    _ => None,
                }
            })
            .collect();

        let mut per_shipper: HashMap<ShipperId, u32> = HashMap::new();
        for load in &secured {
            if let Some(shipper) = load.shipper {
                *per_shipper.entry(shipper).or_insert(0) += 1;
            }
        }
        let repeat_shipper_loads: u32 = per_shipper
            .values()
            .filter(|count| **count >= 2)
            .sum();

        let mut total_quotes = 0u32;
        let mut quotes_won = 0u32;
        for quote in self.quotes.iter().filter(|quote| quote.csr == csr) {
            total_quotes += 1;
            if quote.won {
                quotes_won += 1;
            }
        }

        CsrSignals {
            loads_secured: secured.len() as u32,
            total_quotes,
            quotes_won,
            avg_margin,
            lane_diversity: lanes.len() as u32,
            repeat_shipper_loads,
        }
    }

    /// Distinct state-to-state lanes present in the snapshot, in a stable
    /// order.
    pub fn lane_keys(&self) -> Vec<LaneKey> {
        let mut keys = BTreeSet::new();
        for load in self.loads {
            if let (Some(origin), Some(destination)) = (
                load.origin.state.as_deref(),
                load.destination.state.as_deref(),
            ) {
                keys.insert(LaneKey::new(origin, destination));
            }
        }
        keys.into_iter().collect()
    }
}

fn profile_completeness(profile: &CarrierProfile) -> f64 {
    let checks = [
        profile.mc_number.is_some() || profile.dot_number.is_some(),
        profile.email.is_some(),
        profile.phone.is_some(),
        !profile.equipment.is_empty(),
        !profile.service_states.is_empty() || profile.nationwide,
        profile.home.is_known(),
    ];
    let populated = checks.iter().filter(|check| **check).count();
    populated as f64 / checks.len() as f64
}

fn service_area_signal(profile: &CarrierProfile, query: &LaneQuery) -> ServiceAreaSignal {
    let declared = profile.nationwide || !profile.service_states.is_empty();
    let covers = |state: Option<&str>| {
        state
            .map(|wanted| {
                profile
                    .service_states
                    .iter()
                    .any(|served| served.eq_ignore_ascii_case(wanted))
            })
            .unwrap_or(false)
    };

    ServiceAreaSignal {
        declared,
        nationwide: profile.nationwide,
        covers_origin: covers(query.origin_state.as_deref()),
        covers_destination: covers(query.destination_state.as_deref()),
    }
}

/// Rough home-to-origin mileage from location-tier matching: same ZIP reads
/// as on-site, same ZIP3 as across town, same city as a short deadhead, same
/// state as a regional reposition, anything else as beyond the radius.
fn estimate_origin_distance(profile: &CarrierProfile, query: &LaneQuery) -> Option<f64> {
    let home = &profile.home;
    if !home.is_known() {
        return None;
    }

    let origin = query.origin();
    if let (Some(home_zip), Some(origin_zip)) = (home.zip.as_deref(), origin.zip.as_deref()) {
        if home_zip.trim() == origin_zip.trim() {
            return Some(0.0);
        }
    }
    if let (Some(home_zip3), Some(origin_zip3)) = (home.zip3(), origin.zip3()) {
        if home_zip3 == origin_zip3 {
            return Some(10.0);
        }
    }
    if home.same_city(&origin) {
        return Some(30.0);
    }
    if home.same_state(&origin) {
        return Some(100.0);
    }
    Some(400.0)
}

fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean.abs() < f64::EPSILON {
        return None;
    }
    let variance =
        values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt() / mean.abs())
}
