use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::infra::{default_scoring_config, parse_date, InMemoryDirectory, InMemoryHistory};
use freight_intel::error::AppError;
use freight_intel::intelligence::{
    CarrierId, CarrierProfile, CarrierSearchOutcome, CsrId, CsrProfile, EngineError,
    EquipmentType, IntelligenceScope, IntelligenceService, IntelligenceSnapshot, LaneQuery,
    LoadBookImporter, LoadRecord, LoadStatus, Location, QuoteRecord, ShipperId, ShipperProfile,
};

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Origin city (pair with --origin-state)
    #[arg(long)]
    pub(crate) origin_city: Option<String>,
    /// Origin state code
    #[arg(long)]
    pub(crate) origin_state: Option<String>,
    /// Origin ZIP
    #[arg(long)]
    pub(crate) origin_zip: Option<String>,
    /// Destination city (pair with --destination-state)
    #[arg(long)]
    pub(crate) destination_city: Option<String>,
    /// Destination state code
    #[arg(long)]
    pub(crate) destination_state: Option<String>,
    /// Destination ZIP
    #[arg(long)]
    pub(crate) destination_zip: Option<String>,
    /// Requested equipment type (e.g. "dry van", "reefer")
    #[arg(long)]
    pub(crate) equipment: Option<String>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Hydrate the load book from a TMS CSV export
    #[arg(long)]
    pub(crate) loads_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct IntelligenceArgs {
    /// Include synthetic/QA rows in the snapshot
    #[arg(long)]
    pub(crate) include_test: bool,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Hydrate the load book from a TMS CSV export
    #[arg(long)]
    pub(crate) loads_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Hydrate the load book from a TMS CSV export instead of the seed
    #[arg(long)]
    pub(crate) loads_csv: Option<PathBuf>,
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let equipment = parse_equipment(args.equipment.as_deref())?;
    let query = LaneQuery {
        origin_city: args.origin_city,
        origin_state: args.origin_state,
        origin_zip: args.origin_zip,
        destination_city: args.destination_city,
        destination_state: args.destination_state,
        destination_zip: args.destination_zip,
        equipment,
        pickup_date: None,
        weight_lbs: None,
    };

    let service = build_service(args.loads_csv)?;
    let outcome = service.search_carriers(&query, as_of)?;
    render_search(&query, &outcome, as_of);
    Ok(())
}

pub(crate) fn run_intelligence(args: IntelligenceArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let scope = IntelligenceScope {
        include_test: args.include_test,
    };

    let service = build_service(args.loads_csv)?;
    let snapshot = service.intelligence_snapshot(&scope, as_of)?;
    render_snapshot(&snapshot, as_of);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let service = build_service(args.loads_csv)?;

    println!("Freight intelligence demo");

    let query = LaneQuery {
        origin_city: Some("Davenport".to_string()),
        origin_state: Some("IA".to_string()),
        origin_zip: Some("52801".to_string()),
        destination_city: Some("Dallas".to_string()),
        destination_state: Some("TX".to_string()),
        destination_zip: Some("75201".to_string()),
        equipment: Some(EquipmentType::DryVan),
        pickup_date: None,
        weight_lbs: Some(42_000),
    };

    let outcome = service.search_carriers(&query, as_of)?;
    render_search(&query, &outcome, as_of);

    let snapshot = service.intelligence_snapshot(&IntelligenceScope::default(), as_of)?;
    render_snapshot(&snapshot, as_of);

    Ok(())
}

fn parse_equipment(raw: Option<&str>) -> Result<Option<EquipmentType>, AppError> {
    match raw {
        Some(code) => EquipmentType::from_code(code)
            .map(Some)
            .ok_or_else(|| {
                AppError::Engine(EngineError::InvalidQuery(format!(
                    "unknown equipment type '{code}'"
                )))
            }),
        None => Ok(None),
    }
}

fn build_service(
    loads_csv: Option<PathBuf>,
) -> Result<IntelligenceService<InMemoryHistory, InMemoryDirectory>, AppError> {
    let (carriers, shippers, csrs) = sample_directory();
    let (seed_loads, quotes) = sample_history();
    let loads = match loads_csv {
        Some(path) => LoadBookImporter::from_path(path)?,
        None => seed_loads,
    };

    Ok(IntelligenceService::new(
        Arc::new(InMemoryHistory::with_rows(loads, quotes)),
        Arc::new(InMemoryDirectory::with_entities(carriers, shippers, csrs)),
        default_scoring_config(),
    ))
}

fn render_search(query: &LaneQuery, outcome: &CarrierSearchOutcome, as_of: NaiveDate) {
    println!(
        "\nCarrier search: {} -> {} (evaluated {as_of})",
        query.describe_origin(),
        query.describe_destination()
    );
    if let Some(equipment) = query.equipment {
        println!("Equipment: {}", equipment.label());
    }
    if outcome.truncated {
        println!("NOTE: ranking hit its time budget; results are partial");
    }

    println!("\nRecommended carriers ({})", outcome.recommended.len());
    for result in &outcome.recommended {
        let reason = if result.has_lane_history {
            format!("{} lane run(s)", result.lane_run_count)
        } else {
            "near origin".to_string()
        };
        println!(
            "- [{:>5.1}] {} ({}) | {} | {} pickup(s) at origin",
            result.total_score,
            result.name,
            result.band.label(),
            reason,
            result.origin_pickup_count
        );
    }

    println!("\nNew carriers ({})", outcome.newcomers.len());
    for result in &outcome.newcomers {
        println!(
            "- [{:>5.1}] {} ({})",
            result.total_score,
            result.name,
            result.band.label()
        );
    }
}

fn render_snapshot(snapshot: &IntelligenceSnapshot, as_of: NaiveDate) {
    println!("\nIntelligence snapshot (evaluated {as_of})");

    println!("\nLane risk ({} lanes)", snapshot.lane_risks.len());
    for lane in &snapshot.lane_risks {
        println!(
            "- {}: {:.1} ({}) | {} load(s) | avg margin {:.0}",
            lane.lane_id,
            lane.total_score,
            lane.risk_level.label(),
            lane.loads,
            lane.avg_margin
        );
    }

    println!("\nCSR performance ({} reps)", snapshot.csr_performance.len());
    for csr in &snapshot.csr_performance {
        println!(
            "- {}: {:.1} ({}) | {} load(s) secured / {} quote(s)",
            csr.name,
            csr.total_score,
            csr.tier.label(),
            csr.loads_secured,
            csr.total_quotes
        );
        if !csr.strengths.is_empty() {
            println!("    strengths: {}", csr.strengths.join(", "));
        }
        if !csr.weaknesses.is_empty() {
            println!("    weaknesses: {}", csr.weaknesses.join(", "));
        }
    }

    println!("\nShipper health ({} accounts)", snapshot.shipper_health.len());
    for shipper in &snapshot.shipper_health {
        println!(
            "- {}: {:.1} ({}) | {} load(s) | {} dispute(s)",
            shipper.name,
            shipper.total_score,
            shipper.risk_level.label(),
            shipper.loads,
            shipper.dispute_count
        );
    }
}

/// Seeded carrier/shipper/CSR directory used by the demo commands and by
/// `serve` until a real registry is attached.
pub(crate) fn sample_directory() -> (
    Vec<CarrierProfile>,
    Vec<ShipperProfile>,
    Vec<CsrProfile>,
) {
    let carriers = vec![
        CarrierProfile {
            id: CarrierId(7),
            name: "Hawkeye Freight".to_string(),
            mc_number: Some("MC700100".to_string()),
            dot_number: Some("3395721".to_string()),
            email: Some("dispatch@hawkeyefreight.example".to_string()),
            phone: Some("563-555-0142".to_string()),
            equipment: vec![EquipmentType::DryVan, EquipmentType::Reefer],
            service_states: vec!["IA".to_string(), "MO".to_string(), "TX".to_string()],
            nationwide: false,
            home: location("Davenport", "IA", "52801"),
            active: true,
            blocked: false,
        },
        CarrierProfile {
            id: CarrierId(9),
            name: "Prairie Skies Transport".to_string(),
            mc_number: Some("MC811402".to_string()),
            dot_number: None,
            email: Some("ops@prairieskies.example".to_string()),
            phone: Some("515-555-0168".to_string()),
            equipment: vec![EquipmentType::DryVan],
            service_states: vec!["IA".to_string(), "NE".to_string(), "IL".to_string()],
            nationwide: false,
            home: location("Des Moines", "IA", "50309"),
            active: true,
            blocked: false,
        },
        CarrierProfile {
            id: CarrierId(10),
            name: "Pacific Crest Lines".to_string(),
            mc_number: Some("MC905523".to_string()),
            dot_number: Some("4101188".to_string()),
            email: None,
            phone: Some("503-555-0114".to_string()),
            equipment: vec![EquipmentType::DryVan, EquipmentType::BoxTruck],
            service_states: vec![],
            nationwide: true,
            home: location("Portland", "OR", "97201"),
            active: true,
            blocked: false,
        },
        CarrierProfile {
            id: CarrierId(12),
            name: "Lone Star Haulers".to_string(),
            mc_number: None,
            dot_number: None,
            email: Some("book@lonestarhaulers.example".to_string()),
            phone: None,
            equipment: vec![EquipmentType::Flatbed, EquipmentType::StepDeck],
            service_states: vec!["TX".to_string(), "OK".to_string()],
            nationwide: false,
            home: location("Dallas", "TX", "75207"),
            active: true,
            blocked: false,
        },
        CarrierProfile {
            id: CarrierId(13),
            name: "Gray Route Logistics".to_string(),
            mc_number: Some("MC660090".to_string()),
            dot_number: Some("2988410".to_string()),
            email: Some("dispatch@grayroute.example".to_string()),
            phone: Some("312-555-0177".to_string()),
            equipment: vec![EquipmentType::DryVan],
            service_states: vec!["IL".to_string(), "IN".to_string(), "IA".to_string()],
            nationwide: false,
            home: location("Chicago", "IL", "60601"),
            active: true,
            blocked: true,
        },
    ];

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

    (carriers, shippers, csrs)
}

/// Seeded load/quote history: a steady IA-TX lane, a fall-off-prone OR-CA
/// lane, a dormant account, and one synthetic QA row.
pub(crate) fn sample_history() -> (Vec<LoadRecord>, Vec<QuoteRecord>) {
    let mut loads = Vec::new();

    // Hawkeye's IA -> TX lane history: three on-time runs, one late.
    for (id, (booked, due, delivered, margin)) in [
        ((2026, 3, 9), (2026, 3, 13), (2026, 3, 12), 405.0),
        ((2026, 4, 6), (2026, 4, 10), (2026, 4, 9), 430.0),
        ((2026, 5, 4), (2026, 5, 8), (2026, 5, 10), 365.0),
        ((2026, 5, 22), (2026, 5, 27), (2026, 5, 26), 440.0),
    ]
    .into_iter()
    .enumerate()
    {
        loads.push(LoadRecord {
            id: 100 + id as i64,
            carrier: Some(CarrierId(7)),
            shipper: Some(ShipperId(31)),
            csr: Some(CsrId(4)),
            origin: location("Davenport", "IA", "52806"),
            destination: location("Dallas", "TX", "75207"),
            equipment: Some(EquipmentType::DryVan),
            status: LoadStatus::Delivered,
            booked_on: date(booked),
            delivery_due: Some(date(due)),
            delivered_at: Some(date(delivered)),
            margin,
            disputed: false,
            is_test: false,
        });
    }

    // Prairie Skies picks up around the origin but runs other destinations.
    loads.push(LoadRecord {
        id: 110,
        carrier: Some(CarrierId(9)),
        shipper: Some(ShipperId(31)),
        csr: Some(CsrId(4)),
        origin: location("Davenport", "IA", "52806"),
        destination: location("Omaha", "NE", "68102"),
        equipment: Some(EquipmentType::DryVan),
        status: LoadStatus::Delivered,
        booked_on: date((2026, 5, 15)),
        delivery_due: None,
        delivered_at: None,
        margin: 280.0,
        disputed: false,
        is_test: false,
    });

    // Pacific Crest's OR -> CA lane keeps shedding carriers.
    loads.push(LoadRecord {
        id: 120,
        carrier: Some(CarrierId(10)),
        shipper: Some(ShipperId(32)),
        csr: Some(CsrId(5)),
        origin: location("Portland", "OR", "97201"),
        destination: location("Sacramento", "CA", "95814"),
        equipment: Some(EquipmentType::DryVan),
        status: LoadStatus::FellOff,
        booked_on: date((2026, 4, 18)),
        delivery_due: Some(date((2026, 4, 22))),
        delivered_at: None,
        margin: 150.0,
        disputed: true,
        is_test: false,
    });
    loads.push(LoadRecord {
        id: 121,
        carrier: Some(CarrierId(10)),
        shipper: Some(ShipperId(32)),
        csr: Some(CsrId(5)),
        origin: location("Portland", "OR", "97201"),
        destination: location("Sacramento", "CA", "95814"),
        equipment: Some(EquipmentType::DryVan),
        status: LoadStatus::Delivered,
        booked_on: date((2026, 2, 11)),
        delivery_due: Some(date((2026, 2, 15))),
        delivered_at: Some(date((2026, 2, 14))),
        margin: 210.0,
        disputed: false,
        is_test: false,
    });

    // An unassigned cancellation on a thin midwest lane.
    loads.push(LoadRecord {
        id: 130,
        carrier: None,
        shipper: Some(ShipperId(32)),
        csr: Some(CsrId(5)),
        origin: location("Gary", "IN", "46402"),
        destination: location("Cleveland", "OH", "44101"),
        equipment: Some(EquipmentType::Flatbed),
        status: LoadStatus::Cancelled,
        booked_on: date((2026, 2, 9)),
        delivery_due: None,
        delivered_at: None,
        margin: -40.0,
        disputed: false,
        is_test: false,
    });

    // Synthetic QA row; excluded from dashboards unless asked for.
    loads.push(LoadRecord {
        id: 140,
        carrier: Some(CarrierId(9)),
        shipper: Some(ShipperId(31)),
        csr: Some(CsrId(4)),
        origin: location("Testville", "ZZ", "00001"),
        destination: location("Mockburg", "ZZ", "00002"),
        equipment: Some(EquipmentType::DryVan),
        status: LoadStatus::Delivered,
        booked_on: date((2026, 5, 25)),
        delivery_due: None,
        delivered_at: None,
        margin: 999.0,
        disputed: false,
        is_test: true,
    });

    let quotes = vec![
        QuoteRecord {
            id: 1,
            csr: CsrId(4),
            shipper: Some(ShipperId(31)),
            quoted_on: date((2026, 3, 7)),
            won: true,
            response_minutes: Some(18),
            is_test: false,
        },
        QuoteRecord {
            id: 2,
            csr: CsrId(4),
            shipper: Some(ShipperId(31)),
            quoted_on: date((2026, 4, 4)),
            won: true,
            response_minutes: Some(25),
            is_test: false,
        },
        QuoteRecord {
            id: 3,
            csr: CsrId(4),
            shipper: Some(ShipperId(31)),
            quoted_on: date((2026, 5, 20)),
            won: true,
            response_minutes: Some(11),
            is_test: false,
        },
        QuoteRecord {
            id: 4,
            csr: CsrId(5),
            shipper: Some(ShipperId(32)),
            quoted_on: date((2026, 4, 2)),
            won: false,
            response_minutes: None,
            is_test: false,
        },
        QuoteRecord {
            id: 5,
            csr: CsrId(5),
            shipper: Some(ShipperId(32)),
            quoted_on: date((2026, 4, 16)),
            won: true,
            response_minutes: Some(95),
            is_test: false,
        },
    ];

    (loads, quotes)
}

fn location(city: &str, state: &str, zip: &str) -> Location {
    Location {
        city: Some(city.to_string()),
        state: Some(state.to_string()),
        zip: Some(zip.to_string()),
    }
}

fn date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}
