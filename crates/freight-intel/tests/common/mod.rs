use chrono::NaiveDate;
use std::sync::Arc;

use freight_intel::intelligence::repository::SourceError;
use freight_intel::intelligence::{
    CarrierId, CarrierProfile, CsrId, CsrProfile, DirectoryRegistry, EquipmentType,
    HistorySource, IntelligenceService, LoadRecord, LoadStatus, Location, QuoteRecord,
    ScoringConfig, ShipperId, ShipperProfile,
};

pub struct MemoryHistory {
    pub loads: Vec<LoadRecord>,
    pub quotes: Vec<QuoteRecord>,
}

impl HistorySource for MemoryHistory {
    fn loads(&self) -> Result<Vec<LoadRecord>, SourceError> {
        Ok(self.loads.clone())
    }

    fn quotes(&self) -> Result<Vec<QuoteRecord>, SourceError> {
        Ok(self.quotes.clone())
    }
}

pub struct MemoryDirectory {
    pub carriers: Vec<CarrierProfile>,
    pub shippers: Vec<ShipperProfile>,
    pub csrs: Vec<CsrProfile>,
}

impl DirectoryRegistry for MemoryDirectory {
    fn carriers(&self) -> Result<Vec<CarrierProfile>, SourceError> {
        Ok(self.carriers.clone())
    }

    fn carrier(&self, id: CarrierId) -> Result<Option<CarrierProfile>, SourceError> {
        Ok(self
            .carriers
            .iter()
            .find(|carrier| carrier.id == id)
            .cloned())
    }

    fn shippers(&self) -> Result<Vec<ShipperProfile>, SourceError> {
        Ok(self.shippers.clone())
    }

    fn csrs(&self) -> Result<Vec<CsrProfile>, SourceError> {
        Ok(self.csrs.clone())
    }
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn place(city: &str, state: &str, zip: &str) -> Location {
    Location {
        city: Some(city.to_string()),
        state: Some(state.to_string()),
        zip: Some(zip.to_string()),
    }
}

pub fn carrier(id: i64, name: &str, home: Location, equipment: Vec<EquipmentType>) -> CarrierProfile {
    CarrierProfile {
        id: CarrierId(id),
        name: name.to_string(),
        mc_number: Some(format!("MC{id:06}")),
        dot_number: Some(format!("{id:07}")),
        email: Some(format!("dispatch{id}@example.com")),
        phone: Some("555-0100".to_string()),
        equipment,
        service_states: vec!["IA".to_string(), "TX".to_string(), "MO".to_string()],
        nationwide: false,
        home,
        active: true,
        blocked: false,
    }
}

pub struct LoadSeed {
    pub id: i64,
    pub carrier: Option<i64>,
    pub shipper: Option<i64>,
    pub csr: Option<i64>,
    pub origin: Location,
    pub destination: Location,
    pub status: LoadStatus,
    pub booked_on: NaiveDate,
    pub margin: f64,
}

pub fn load(seed: LoadSeed) -> LoadRecord {
    LoadRecord {
        id: seed.id,
        carrier: seed.carrier.map(CarrierId),
        shipper: seed.shipper.map(ShipperId),
        csr: seed.csr.map(CsrId),
        origin: seed.origin,
        destination: seed.destination,
        equipment: Some(EquipmentType::DryVan),
        status: seed.status,
        booked_on: seed.booked_on,
        delivery_due: None,
        delivered_at: None,
        margin: seed.margin,
        disputed: false,
        is_test: false,
    }
}

/// A small brokerage network: one seasoned lane carrier, one regional
/// carrier near the origin, one stranger, one blocked carrier, two shippers
/// in different health, and two CSRs.
pub fn network() -> (MemoryHistory, MemoryDirectory) {
    let davenport = place("Davenport", "IA", "52806");
    let dallas = place("Dallas", "TX", "75207");

    let mut carriers = vec![
        carrier(
            7,
            "Hawkeye Freight",
            place("Davenport", "IA", "52801"),
            vec![EquipmentType::DryVan, EquipmentType::Reefer],
        ),
        carrier(
            9,
            "Prairie Skies Transport",
            place("Des Moines", "IA", "50309"),
            vec![EquipmentType::DryVan],
        ),
        carrier(
            10,
            "Pacific Crest Lines",
            place("Portland", "OR", "97201"),
            vec![EquipmentType::DryVan],
        ),
        carrier(
            11,
            "Blocked Logistics",
            place("Davenport", "IA", "52801"),
            vec![EquipmentType::DryVan],
        ),
    ];
    carriers[3].blocked = true;

    let shippers = vec![
        ShipperProfile {
            id: ShipperId(31),
            name: "Prairie Foods".to_string(),
        },
        ShipperProfile {
            id: ShipperId(32),
            name: "Rustbelt Metals".to_string(),
        },
    ];

    let csrs = vec![
        CsrProfile {
            id: CsrId(4),
            name: "Jordan Mills".to_string(),
        },
        CsrProfile {
            id: CsrId(5),
            name: "Casey Tran".to_string(),
        },
    ];

    let mut loads = vec![
        load(LoadSeed {
            id: 1,
            carrier: Some(7),
            shipper: Some(31),
            csr: Some(4),
            origin: davenport.clone(),
            destination: dallas.clone(),
            status: LoadStatus::Delivered,
            booked_on: day(2026, 5, 1),
            margin: 420.0,
        }),
        load(LoadSeed {
            id: 2,
            carrier: Some(7),
            shipper: Some(31),
            csr: Some(4),
            origin: davenport.clone(),
            destination: dallas.clone(),
            status: LoadStatus::Delivered,
            booked_on: day(2026, 5, 12),
            margin: 380.0,
        }),
        load(LoadSeed {
            id: 3,
            carrier: Some(7),
            shipper: Some(31),
            csr: Some(4),
            origin: davenport.clone(),
            destination: dallas.clone(),
            status: LoadStatus::Delivered,
            booked_on: day(2026, 5, 20),
            margin: 415.0,
        }),
        load(LoadSeed {
            id: 4,
            carrier: Some(10),
            shipper: Some(32),
            csr: Some(5),
            origin: place("Portland", "OR", "97201"),
            destination: place("Sacramento", "CA", "95814"),
            status: LoadStatus::FellOff,
            booked_on: day(2026, 4, 18),
            margin: 120.0,
        }),
        load(LoadSeed {
            id: 5,
            carrier: None,
            shipper: Some(32),
            csr: Some(5),
            origin: place("Gary", "IN", "46402"),
            destination: place("Cleveland", "OH", "44101"),
            status: LoadStatus::Cancelled,
            booked_on: day(2026, 2, 9),
            margin: -40.0,
        }),
    ];
    // One synthetic row used by QA; excluded from dashboards by default.
    let mut test_load = load(LoadSeed {
        id: 6,
        carrier: Some(9),
        shipper: Some(31),
        csr: Some(4),
        origin: place("Testville", "ZZ", "00001"),
        destination: place("Mockburg", "ZZ", "00002"),
        status: LoadStatus::Delivered,
        booked_on: day(2026, 5, 25),
        margin: 999.0,
    });
    test_load.is_test = true;
    loads.push(test_load);

    let quotes = vec![
        QuoteRecord {
            id: 1,
            csr: CsrId(4),
            shipper: Some(ShipperId(31)),
            quoted_on: day(2026, 5, 10),
            won: true,
            response_minutes: Some(14),
            is_test: false,
        },
        QuoteRecord {
            id: 2,
            csr: CsrId(4),
            shipper: Some(ShipperId(31)),
            quoted_on: day(2026, 5, 18),
            won: true,
            response_minutes: Some(22),
            is_test: false,
        },
        QuoteRecord {
            id: 3,
            csr: CsrId(5),
            shipper: Some(ShipperId(32)),
            quoted_on: day(2026, 4, 2),
            won: false,
            response_minutes: None,
            is_test: false,
        },
    ];

    (
        MemoryHistory { loads, quotes },
        MemoryDirectory {
            carriers,
            shippers,
            csrs,
        },
    )
}

pub fn service() -> IntelligenceService<MemoryHistory, MemoryDirectory> {
    let (history, directory) = network();
    IntelligenceService::new(
        Arc::new(history),
        Arc::new(directory),
        ScoringConfig::default(),
    )
}
