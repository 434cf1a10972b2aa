use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CarrierId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipperId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CsrId(pub i64);

impl fmt::Display for CarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ShipperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CsrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    DryVan,
    Reefer,
    Flatbed,
    StepDeck,
    PowerOnly,
    BoxTruck,
}

impl EquipmentType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DryVan => "Dry Van",
            Self::Reefer => "Reefer",
            Self::Flatbed => "Flatbed",
            Self::StepDeck => "Step Deck",
            Self::PowerOnly => "Power Only",
            Self::BoxTruck => "Box Truck",
        }
    }

    /// Parse the equipment codes seen in TMS exports and API payloads.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized: String = code
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "DRY_VAN" | "DRYVAN" | "VAN" | "DRY" => Some(Self::DryVan),
            "REEFER" | "REFRIGERATED" | "COLD" => Some(Self::Reefer),
            "FLATBED" | "FLAT" => Some(Self::Flatbed),
            "STEP_DECK" | "STEPDECK" => Some(Self::StepDeck),
            "POWER_ONLY" | "POWERONLY" => Some(Self::PowerOnly),
            "BOX_TRUCK" | "BOXTRUCK" | "STRAIGHT_TRUCK" => Some(Self::BoxTruck),
            _ => None,
        }
    }

    /// Trailer families that can usually cover each other's freight.
    pub fn related_to(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::DryVan, Self::Reefer)
                | (Self::Reefer, Self::DryVan)
                | (Self::DryVan, Self::BoxTruck)
                | (Self::BoxTruck, Self::DryVan)
                | (Self::Flatbed, Self::StepDeck)
                | (Self::StepDeck, Self::Flatbed)
        )
    }
}

/// How a carrier's declared trailer list lines up with a requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentMatch {
    Exact,
    Related,
    Unrelated,
}

impl EquipmentMatch {
    pub const fn ratio(self) -> f64 {
        match self {
            Self::Exact => 1.0,
            Self::Related => 0.7,
            Self::Unrelated => 0.0,
        }
    }
}

/// `None` when the carrier declares no equipment at all; the normalizer
/// treats that as unknown rather than incompatible.
pub fn match_declared_equipment(
    declared: &[EquipmentType],
    requested: EquipmentType,
) -> Option<EquipmentMatch> {
    if declared.is_empty() {
        return None;
    }
    if declared.contains(&requested) {
        return Some(EquipmentMatch::Exact);
    }
    if declared.iter().any(|eq| eq.related_to(requested)) {
        return Some(EquipmentMatch::Related);
    }
    Some(EquipmentMatch::Unrelated)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl Location {
    pub fn zip3(&self) -> Option<&str> {
        self.zip
            .as_deref()
            .map(str::trim)
            .filter(|zip| zip.len() >= 3)
            .map(|zip| &zip[..3])
    }

    pub fn is_known(&self) -> bool {
        self.zip.is_some() || self.state.is_some() || self.city.is_some()
    }

    pub fn same_city(&self, other: &Location) -> bool {
        match (
            self.city.as_deref(),
            self.state.as_deref(),
            other.city.as_deref(),
            other.state.as_deref(),
        ) {
            (Some(city), Some(state), Some(other_city), Some(other_state)) => {
                city.eq_ignore_ascii_case(other_city) && state.eq_ignore_ascii_case(other_state)
            }
            _ => false,
        }
    }

    pub fn same_state(&self, other: &Location) -> bool {
        match (self.state.as_deref(), other.state.as_deref()) {
            (Some(state), Some(other_state)) => state.eq_ignore_ascii_case(other_state),
            _ => false,
        }
    }

    /// The lane-matching region: ZIP3 prefix when a ZIP is present, else the
    /// state.
    pub fn region(&self) -> Option<Region> {
        if let Some(zip3) = self.zip3() {
            return Some(Region::Zip3(zip3.to_string()));
        }
        self.state
            .as_deref()
            .map(|state| Region::State(state.trim().to_ascii_uppercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    Zip3(String),
    State(String),
}

impl Region {
    pub fn covers(&self, location: &Location) -> bool {
        match self {
            Region::Zip3(prefix) => location
                .zip3()
                .map(|zip3| zip3 == prefix)
                .unwrap_or(false),
            Region::State(state) => location
                .state
                .as_deref()
                .map(|candidate| candidate.eq_ignore_ascii_case(state))
                .unwrap_or(false),
        }
    }
}

/// Lane unit for risk enumeration: a state -> state pairing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LaneKey {
    pub origin_state: String,
    pub destination_state: String,
}

impl LaneKey {
    pub fn new(origin_state: &str, destination_state: &str) -> Self {
        Self {
            origin_state: origin_state.trim().to_ascii_uppercase(),
            destination_state: destination_state.trim().to_ascii_uppercase(),
        }
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.origin_state, self.destination_state)
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin_state, self.destination_state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Booked,
    InTransit,
    Delivered,
    Covered,
    Cancelled,
    FellOff,
}

/// One row of the load book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    pub id: i64,
    pub carrier: Option<CarrierId>,
    pub shipper: Option<ShipperId>,
    pub csr: Option<CsrId>,
    pub origin: Location,
    pub destination: Location,
    pub equipment: Option<EquipmentType>,
    pub status: LoadStatus,
    pub booked_on: NaiveDate,
    pub delivery_due: Option<NaiveDate>,
    pub delivered_at: Option<NaiveDate>,
    pub margin: f64,
    pub disputed: bool,
    pub is_test: bool,
}

impl LoadRecord {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, LoadStatus::Delivered | LoadStatus::Covered)
    }

    pub fn is_fall_off(&self) -> bool {
        matches!(self.status, LoadStatus::FellOff)
    }

    /// Loads missing either date count as on time; late data entry is common
    /// and must not read as a service failure.
    pub fn delivered_on_time(&self) -> bool {
        match (self.delivery_due, self.delivered_at) {
            (Some(due), Some(actual)) => actual <= due,
            _ => true,
        }
    }
}

/// One RFQ sent to a shipper, and whether it converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: i64,
    pub csr: CsrId,
    pub shipper: Option<ShipperId>,
    pub quoted_on: NaiveDate,
    pub won: bool,
    pub response_minutes: Option<u32>,
    pub is_test: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierProfile {
    pub id: CarrierId,
    pub name: String,
    pub mc_number: Option<String>,
    pub dot_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub equipment: Vec<EquipmentType>,
    /// Two-letter state codes the carrier runs; empty with `nationwide`
    /// unset means the service area is undeclared.
    pub service_states: Vec<String>,
    pub nationwide: bool,
    pub home: Location,
    pub active: bool,
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipperProfile {
    pub id: ShipperId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrProfile {
    pub id: CsrId,
    pub name: String,
}

/// A requested lane plus freight constraints, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneQuery {
    pub origin_city: Option<String>,
    pub origin_state: Option<String>,
    pub origin_zip: Option<String>,
    pub destination_city: Option<String>,
    pub destination_state: Option<String>,
    pub destination_zip: Option<String>,
    pub equipment: Option<EquipmentType>,
    pub pickup_date: Option<NaiveDate>,
    pub weight_lbs: Option<u32>,
}

impl LaneQuery {
    /// Each side needs a ZIP or a city+state pair before any scoring work
    /// starts.
    pub fn validate(&self) -> Result<(), EngineError> {
        Self::validate_side(
            "origin",
            self.origin_city.as_deref(),
            self.origin_state.as_deref(),
            self.origin_zip.as_deref(),
        )?;
        Self::validate_side(
            "destination",
            self.destination_city.as_deref(),
            self.destination_state.as_deref(),
            self.destination_zip.as_deref(),
        )
    }

    fn validate_side(
        side: &str,
        city: Option<&str>,
        state: Option<&str>,
        zip: Option<&str>,
    ) -> Result<(), EngineError> {
        let has_zip = zip.map(|z| !z.trim().is_empty()).unwrap_or(false);
        let has_city = city.map(|c| !c.trim().is_empty()).unwrap_or(false);
        let has_state = state.map(|s| !s.trim().is_empty()).unwrap_or(false);

        if has_zip || (has_city && has_state) {
            return Ok(());
        }
        if has_city {
            return Err(EngineError::InvalidQuery(format!(
                "{side} city requires a state"
            )));
        }
        Err(EngineError::InvalidQuery(format!(
            "{side} requires a city+state or a ZIP"
        )))
    }

    pub fn origin(&self) -> Location {
        Location {
            city: self.origin_city.clone(),
            state: self.origin_state.clone(),
            zip: self.origin_zip.clone(),
        }
    }

    pub fn destination(&self) -> Location {
        Location {
            city: self.destination_city.clone(),
            state: self.destination_state.clone(),
            zip: self.destination_zip.clone(),
        }
    }

    pub fn origin_region(&self) -> Option<Region> {
        self.origin().region()
    }

    pub fn destination_region(&self) -> Option<Region> {
        self.destination().region()
    }

    pub fn describe_origin(&self) -> String {
        describe_side(
            self.origin_city.as_deref(),
            self.origin_state.as_deref(),
            self.origin_zip.as_deref(),
        )
    }

    pub fn describe_destination(&self) -> String {
        describe_side(
            self.destination_city.as_deref(),
            self.destination_state.as_deref(),
            self.destination_zip.as_deref(),
        )
    }
}

fn describe_side(city: Option<&str>, state: Option<&str>, zip: Option<&str>) -> String {
    match (city, state) {
        (Some(city), Some(state)) => format!("{city}, {state}"),
        _ => zip.map(str::to_string).unwrap_or_else(|| "Unknown".to_string()),
    }
}
