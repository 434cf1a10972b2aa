use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct LoadBookRow {
    #[serde(rename = "Load ID")]
    pub(crate) load_id: String,
    #[serde(rename = "Carrier ID", default, deserialize_with = "empty_string_as_none")]
    pub(crate) carrier_id: Option<String>,
    #[serde(rename = "Shipper ID", default, deserialize_with = "empty_string_as_none")]
    pub(crate) shipper_id: Option<String>,
    #[serde(rename = "CSR ID", default, deserialize_with = "empty_string_as_none")]
    pub(crate) csr_id: Option<String>,
    #[serde(rename = "Pickup City", default, deserialize_with = "empty_string_as_none")]
    pub(crate) pickup_city: Option<String>,
    #[serde(rename = "Pickup State", default, deserialize_with = "empty_string_as_none")]
    pub(crate) pickup_state: Option<String>,
    #[serde(rename = "Pickup Zip", default, deserialize_with = "empty_string_as_none")]
    pub(crate) pickup_zip: Option<String>,
    #[serde(rename = "Drop City", default, deserialize_with = "empty_string_as_none")]
    pub(crate) drop_city: Option<String>,
    #[serde(rename = "Drop State", default, deserialize_with = "empty_string_as_none")]
    pub(crate) drop_state: Option<String>,
    #[serde(rename = "Drop Zip", default, deserialize_with = "empty_string_as_none")]
    pub(crate) drop_zip: Option<String>,
    #[serde(rename = "Equipment", default, deserialize_with = "empty_string_as_none")]
    pub(crate) equipment: Option<String>,
    #[serde(rename = "Status")]
    pub(crate) status: String,
    #[serde(rename = "Booked On")]
    pub(crate) booked_on: String,
    #[serde(rename = "Delivery Due", default, deserialize_with = "empty_string_as_none")]
    pub(crate) delivery_due: Option<String>,
    #[serde(rename = "Delivered At", default, deserialize_with = "empty_string_as_none")]
    pub(crate) delivered_at: Option<String>,
    #[serde(rename = "Margin", default, deserialize_with = "empty_string_as_none")]
    pub(crate) margin: Option<String>,
    #[serde(rename = "Disputed", default, deserialize_with = "empty_string_as_none")]
    pub(crate) disputed: Option<String>,
    #[serde(rename = "Test", default, deserialize_with = "empty_string_as_none")]
    pub(crate) is_test: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<LoadBookRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize::<LoadBookRow>() {
        rows.push(row?);
    }
    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
