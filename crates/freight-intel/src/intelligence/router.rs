use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::aggregator::IntelligenceScope;
use super::domain::{CarrierId, EquipmentType, LaneQuery};
use super::ranker::CarrierSearchOutcome;
use super::repository::{DirectoryRegistry, HistorySource};
use super::scorers::CarrierMatchResult;
use super::service::IntelligenceService;
use super::EngineError;

/// Router builder exposing the scoring endpoints over JSON.
pub fn intelligence_router<H, R>(service: Arc<IntelligenceService<H, R>>) -> Router
where
    H: HistorySource + 'static,
    R: DirectoryRegistry + 'static,
{
    Router::new()
        .route(
            "/api/v1/freight/carrier-search",
            post(carrier_search_handler::<H, R>),
        )
        .route(
            "/api/v1/freight/carriers/:carrier_id/match",
            post(carrier_match_handler::<H, R>),
        )
        .route(
            "/api/v1/freight/intelligence",
            get(intelligence_handler::<H, R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CarrierSearchRequest {
    #[serde(default)]
    pub(crate) origin_city: Option<String>,
    #[serde(default)]
    pub(crate) origin_state: Option<String>,
    #[serde(default)]
    pub(crate) origin_zip: Option<String>,
    #[serde(default)]
    pub(crate) destination_city: Option<String>,
    #[serde(default)]
    pub(crate) destination_state: Option<String>,
    #[serde(default)]
    pub(crate) destination_zip: Option<String>,
    #[serde(default)]
    pub(crate) equipment_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) pickup_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) weight: Option<u32>,
    /// Evaluation date override; defaults to today. Exposed so callers can
    /// reproduce a ranking against a known snapshot.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
}

impl CarrierSearchRequest {
    fn into_query(self) -> Result<(LaneQuery, NaiveDate), EngineError> {
        let equipment = match self.equipment_type.as_deref() {
            Some(code) => Some(EquipmentType::from_code(code).ok_or_else(|| {
                EngineError::InvalidQuery(format!("unknown equipment type '{code}'"))
            })?),
            None => None,
        };

        let as_of = self.as_of.unwrap_or_else(|| Local::now().date_naive());
        let query = LaneQuery {
            origin_city: self.origin_city,
            origin_state: self.origin_state,
            origin_zip: self.origin_zip,
            destination_city: self.destination_city,
            destination_state: self.destination_state,
            destination_zip: self.destination_zip,
            equipment,
            pickup_date: self.pickup_date,
            weight_lbs: self.weight,
        };
        Ok((query, as_of))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CarrierSearchResponse {
    pub(crate) recommended_carriers: Vec<CarrierMatchResult>,
    pub(crate) new_carriers: Vec<CarrierMatchResult>,
    pub(crate) meta: SearchMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchMeta {
    pub(crate) query: QueryEcho,
    pub(crate) total_recommended: usize,
    pub(crate) total_new: usize,
    pub(crate) truncated: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryEcho {
    pub(crate) origin: String,
    pub(crate) destination: String,
    pub(crate) equipment_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IntelligenceParams {
    #[serde(default)]
    pub(crate) include_test: bool,
    #[serde(default)]
    pub(crate) as_of: Option<String>,
}

pub(crate) async fn carrier_search_handler<H, R>(
    State(service): State<Arc<IntelligenceService<H, R>>>,
    Json(request): Json<CarrierSearchRequest>,
) -> Response
where
    H: HistorySource + 'static,
    R: DirectoryRegistry + 'static,
{
    let (query, as_of) = match request.into_query() {
        Ok(parsed) => parsed,
        Err(err) => return engine_error_response(err),
    };

    match service.search_carriers(&query, as_of) {
        Ok(outcome) => {
            let response =
                search_response(&query, outcome, service.limits().max_bucket_results);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => engine_error_response(err),
    }
}

pub(crate) async fn carrier_match_handler<H, R>(
    State(service): State<Arc<IntelligenceService<H, R>>>,
    Path(carrier_id): Path<i64>,
    Json(request): Json<CarrierSearchRequest>,
) -> Response
where
    H: HistorySource + 'static,
    R: DirectoryRegistry + 'static,
{
    let (query, as_of) = match request.into_query() {
        Ok(parsed) => parsed,
        Err(err) => return engine_error_response(err),
    };

    match service.score_carrier(CarrierId(carrier_id), &query, as_of) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

pub(crate) async fn intelligence_handler<H, R>(
    State(service): State<Arc<IntelligenceService<H, R>>>,
    Query(params): Query<IntelligenceParams>,
) -> Response
where
    H: HistorySource + 'static,
    R: DirectoryRegistry + 'static,
{
    let as_of = match params.as_of.as_deref() {
        Some(raw) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                return engine_error_response(EngineError::InvalidQuery(format!(
                    "asOf '{raw}' is not a YYYY-MM-DD date"
                )))
            }
        },
        None => Local::now().date_naive(),
    };

    let scope = IntelligenceScope {
        include_test: params.include_test,
    };

    match service.intelligence_snapshot(&scope, as_of) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

fn search_response(
    query: &LaneQuery,
    outcome: CarrierSearchOutcome,
    max_bucket_results: usize,
) -> CarrierSearchResponse {
    let CarrierSearchOutcome {
        mut recommended,
        mut newcomers,
        truncated,
    } = outcome;

    let total_recommended = recommended.len();
    let total_new = newcomers.len();
    recommended.truncate(max_bucket_results);
    newcomers.truncate(max_bucket_results);

    CarrierSearchResponse {
        recommended_carriers: recommended,
        new_carriers: newcomers,
        meta: SearchMeta {
            query: QueryEcho {
                origin: query.describe_origin(),
                destination: query.describe_destination(),
                equipment_type: query.equipment.map(EquipmentType::label),
            },
            total_recommended,
            total_new,
            truncated,
        },
    }
}

fn engine_error_response(err: EngineError) -> Response {
    let status = match &err {
        EngineError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
        EngineError::InvalidSignalSet(detail) => {
            // Closed signal types should make this unreachable; reaching it
            // is a bug worth paging on, not a caller problem.
            error!(detail = *detail, "scoring invariant violated");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    let body = Json(json!({ "error": err.to_string() }));
    (status, body).into_response()
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| {
            serde::de::Error::custom(format!("failed to parse '{value}' as YYYY-MM-DD ({err})"))
        })
    })
    .transpose()
}
