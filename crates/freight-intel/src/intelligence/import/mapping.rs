use chrono::{DateTime, NaiveDate};

use super::parser::LoadBookRow;
use super::LoadBookImportError;
use crate::intelligence::domain::{
    CarrierId, CsrId, EquipmentType, LoadRecord, LoadStatus, Location, ShipperId,
};

pub(crate) fn map_row(row: LoadBookRow, line: usize) -> Result<LoadRecord, LoadBookImportError> {
    let id = parse_i64(&row.load_id, line, "Load ID")?;

    let carrier = row
        .carrier_id
        .as_deref()
        .map(|raw| parse_i64(raw, line, "Carrier ID").map(CarrierId))
        .transpose()?;
    let shipper = row
        .shipper_id
        .as_deref()
        .map(|raw| parse_i64(raw, line, "Shipper ID").map(ShipperId))
        .transpose()?;
    let csr = row
        .csr_id
        .as_deref()
        .map(|raw| parse_i64(raw, line, "CSR ID").map(CsrId))
        .transpose()?;

    let equipment = row
        .equipment
        .as_deref()
        .map(|code| {
            EquipmentType::from_code(code).ok_or_else(|| LoadBookImportError::InvalidRow {
                line,
                reason: format!("unknown Equipment '{code}'"),
            })
        })
        .transpose()?;

    let status = parse_status(&row.status, line)?;
    let booked_on = parse_date(&row.booked_on, line, "Booked On")?;
    let delivery_due = row
        .delivery_due
        .as_deref()
        .map(|raw| parse_date(raw, line, "Delivery Due"))
        .transpose()?;
    let delivered_at = row
        .delivered_at
        .as_deref()
        .map(|raw| parse_date(raw, line, "Delivered At"))
        .transpose()?;

    let margin = match row.margin.as_deref() {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| LoadBookImportError::InvalidRow {
                line,
                reason: format!("Margin '{raw}' is not a number"),
            })?,
        None => 0.0,
    };

    Ok(LoadRecord {
        id,
        carrier,
        shipper,
        csr,
        origin: Location {
            city: row.pickup_city,
            state: row.pickup_state,
            zip: row.pickup_zip,
        },
        destination: Location {
            city: row.drop_city,
            state: row.drop_state,
            zip: row.drop_zip,
        },
        equipment,
        status,
        booked_on,
        delivery_due,
        delivered_at,
        margin,
        disputed: parse_flag(row.disputed.as_deref()),
        is_test: parse_flag(row.is_test.as_deref()),
    })
}

fn parse_i64(raw: &str, line: usize, field: &str) -> Result<i64, LoadBookImportError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| LoadBookImportError::InvalidRow {
            line,
            reason: format!("{field} '{raw}' is not an integer"),
        })
}

fn parse_status(raw: &str, line: usize) -> Result<LoadStatus, LoadBookImportError> {
    let normalized: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect();

    match normalized.as_str() {
        "BOOKED" => Ok(LoadStatus::Booked),
        "IN_TRANSIT" => Ok(LoadStatus::InTransit),
        "DELIVERED" => Ok(LoadStatus::Delivered),
        "COVERED" => Ok(LoadStatus::Covered),
        "CANCELLED" | "CANCELED" => Ok(LoadStatus::Cancelled),
        "FELL_OFF" | "FELLOFF" => Ok(LoadStatus::FellOff),
        _ => Err(LoadBookImportError::InvalidRow {
            line,
            reason: format!("unknown Status '{raw}'"),
        }),
    }
}

/// Accepts RFC3339 timestamps or bare `YYYY-MM-DD` dates; TMS exports mix
/// both.
fn parse_date(raw: &str, line: usize, field: &str) -> Result<NaiveDate, LoadBookImportError> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.naive_utc().date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    Err(LoadBookImportError::InvalidRow {
        line,
        reason: format!("{field} '{raw}' is not a date"),
    })
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim)
            .map(|value| value.to_ascii_lowercase())
            .as_deref(),
        Some("yes") | Some("y") | Some("true") | Some("1")
    )
}
