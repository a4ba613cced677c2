// Router - quote service and HTTP API
// This file ties discretization, venue tables and the optimizer together
// for read-only quoting, and exposes quoting over HTTP
//
// Numan Thabit 2025 Nov

use crate::asset::{Amount, Asset};
use crate::errors::{AggrError, Result};
use crate::metrics::{QUOTE_ERRORS, QUOTE_LATENCY, VENUE_UNAVAILABLE};
use crate::quant::{to_parts, MAX_PARTS};
use crate::state::MarketState;
use crate::venues::VenueSet;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use super::optimizer::optimize;
use super::routes::{ExecutionPlan, Quote, VenueShare};
use super::validation::validate_quote_request;

/// Quote service. Holds no venue state: every call receives the snapshot
/// it should price against.
#[derive(Debug, Clone)]
pub struct Router {
    max_parts: u32,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            max_parts: MAX_PARTS,
        }
    }
}

/// Quote together with the tables it was computed from
struct Evaluation {
    quote: Quote,
    tables: Vec<Option<Vec<Amount>>>,
}

impl Router {
    pub fn new(max_parts: u32) -> Result<Self> {
        if max_parts == 0 || max_parts > MAX_PARTS {
            return Err(AggrError::Config(format!(
                "max_parts must be within 1..={MAX_PARTS}, got {max_parts}"
            )));
        }
        Ok(Self { max_parts })
    }

    pub fn max_parts(&self) -> u32 {
        self.max_parts
    }

    /// Best split of `total` across the enabled venues.
    ///
    /// Bit `i` of `disable_flags` excludes venue `i` for this call only.
    #[tracing::instrument(skip_all, fields(source = %source, dest = %dest, total = total, parts = parts, disable_flags = disable_flags))]
    pub fn get_expected_return(
        &self,
        venues: &VenueSet,
        source: &Asset,
        dest: &Asset,
        total: Amount,
        parts: u32,
        disable_flags: u64,
    ) -> Result<Quote> {
        self.timed(|| {
            self.evaluate(venues, source, dest, total, parts, disable_flags)
                .map(|e| e.quote)
        })
    }

    /// Quote plus the input amount each venue would execute.
    pub fn plan(
        &self,
        venues: &VenueSet,
        source: &Asset,
        dest: &Asset,
        total: Amount,
        parts: u32,
        disable_flags: u64,
    ) -> Result<ExecutionPlan> {
        let eval = self.timed(|| self.evaluate(venues, source, dest, total, parts, disable_flags))?;

        let mut shares = Vec::new();
        if eval.quote.parts() > 0 {
            let disc = to_parts(total, parts)?;
            let amounts = disc.split(&eval.quote.distribution)?;
            for (index, &units) in eval.quote.distribution.iter().enumerate() {
                if units == 0 {
                    continue;
                }
                let expected_out = eval.tables[index]
                    .as_ref()
                    .map(|t| t[units as usize])
                    .unwrap_or(0);
                shares.push(VenueShare {
                    index,
                    venue: venues.get(index).map(|v| v.name().to_string()).unwrap_or_default(),
                    parts: units,
                    amount_in: amounts[index],
                    expected_out,
                });
            }
        }

        Ok(ExecutionPlan {
            source: *source,
            dest: *dest,
            total_input: total,
            quote: eval.quote,
            shares,
        })
    }

    fn timed<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let started = Instant::now();
        let res = f();
        let outcome = match &res {
            Ok(_) => "ok",
            Err(err) => {
                QUOTE_ERRORS.with_label_values(&[err.kind()]).inc();
                "error"
            }
        };
        QUOTE_LATENCY
            .with_label_values(&[outcome])
            .observe(started.elapsed().as_secs_f64());
        res
    }

    fn evaluate(
        &self,
        venues: &VenueSet,
        source: &Asset,
        dest: &Asset,
        total: Amount,
        parts: u32,
        disable_flags: u64,
    ) -> Result<Evaluation> {
        validate_quote_request(source, dest, parts, self.max_parts).into_result()?;

        if parts == 0 || total == 0 {
            return Ok(Evaluation {
                quote: Quote::zero(venues.len()),
                tables: vec![None; venues.len()],
            });
        }

        let enabled = venues.enabled(disable_flags);
        if !enabled.iter().any(|&e| e) {
            return Err(AggrError::NoLiquidity(format!("{source} -> {dest}")));
        }

        let width = parts as usize + 1;
        let mut tables: Vec<Option<Vec<Amount>>> = Vec::with_capacity(venues.len());
        let mut available = 0usize;
        for (index, venue) in venues.iter().enumerate() {
            if !enabled[index] {
                tables.push(None);
                continue;
            }
            let table = match venue.cumulative_return(source, dest, parts, total) {
                Ok(t) if t.len() == width && t[0] == 0 => {
                    available += 1;
                    t
                }
                Ok(t) => {
                    warn!(
                        venue = venue.name(),
                        len = t.len(),
                        expected = width,
                        "malformed return table; treating venue as unavailable"
                    );
                    VENUE_UNAVAILABLE.with_label_values(&[venue.name()]).inc();
                    vec![0; width]
                }
                Err(err) if err.is_local() => {
                    debug!(venue = venue.name(), error = %err, "venue unavailable for pair");
                    VENUE_UNAVAILABLE.with_label_values(&[venue.name()]).inc();
                    vec![0; width]
                }
                Err(err) => return Err(err),
            };
            debug!(venue = venue.name(), full = table[width - 1], "venue table");
            tables.push(Some(table));
        }

        if available == 0 {
            return Err(AggrError::NoLiquidity(format!("{source} -> {dest}")));
        }

        let refs: Vec<Option<&[Amount]>> = tables.iter().map(|t| t.as_deref()).collect();
        let allocation = optimize(&refs, parts)?;

        info!(
            return_amount = allocation.return_amount,
            distribution = ?allocation.distribution,
            "quote computed"
        );

        Ok(Evaluation {
            quote: Quote {
                return_amount: allocation.return_amount,
                distribution: allocation.distribution,
            },
            tables,
        })
    }
}

/// Shared state behind the HTTP API
pub struct ApiState {
    pub router: Router,
    pub market: MarketState,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub source: String,
    pub dest: String,
    #[serde(with = "crate::asset::amount_str")]
    pub amount: Amount,
    pub parts: u32,
    #[serde(default)]
    pub disable_flags: u64,
}

#[derive(Debug, Serialize)]
pub struct VenueInfo {
    pub index: usize,
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct VenuesResponse {
    pub version: u64,
    pub venues: Vec<VenueInfo>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: AggrError) -> ApiError {
    let status = match &err {
        AggrError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        AggrError::NoLiquidity(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AggrError::SlippageExceeded { .. } => StatusCode::CONFLICT,
        AggrError::VenueUnavailable { .. }
        | AggrError::ArithmeticOverflow(_)
        | AggrError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }),
    )
}

/// Body decoding failures surface as `InvalidArgument`
fn decode(
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> std::result::Result<QuoteRequest, ApiError> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| api_error(AggrError::InvalidArgument(rejection.body_text())))
}

impl QuoteRequest {
    fn assets(&self) -> Result<(Asset, Asset)> {
        Ok((Asset::from_str(&self.source)?, Asset::from_str(&self.dest)?))
    }
}

/// Create the HTTP router with API endpoints
pub fn create_api_router(state: Arc<ApiState>) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/v1/venues", get(list_venues))
        .route("/api/v1/quote", post(quote))
        .route("/api/v1/plan", post(plan))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn metrics() -> String {
    crate::metrics::render()
}

async fn list_venues(State(state): State<Arc<ApiState>>) -> Json<VenuesResponse> {
    let version = state.market.version();
    let venues = state.market.snapshot().await;
    Json(VenuesResponse {
        version,
        venues: venues
            .iter()
            .enumerate()
            .map(|(index, v)| VenueInfo {
                index,
                name: v.name().to_string(),
                kind: v.kind().to_string(),
            })
            .collect(),
    })
}

/// Quote endpoint - returns the best distribution without executing
async fn quote(
    State(state): State<Arc<ApiState>>,
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> std::result::Result<Json<Quote>, ApiError> {
    let req = decode(payload)?;
    let (source, dest) = req.assets().map_err(api_error)?;
    let venues = state.market.snapshot().await;
    state
        .router
        .get_expected_return(&venues, &source, &dest, req.amount, req.parts, req.disable_flags)
        .map(Json)
        .map_err(api_error)
}

/// Plan endpoint - quote plus per-venue input amounts
async fn plan(
    State(state): State<Arc<ApiState>>,
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> std::result::Result<Json<ExecutionPlan>, ApiError> {
    let req = decode(payload)?;
    let (source, dest) = req.assets().map_err(api_error)?;
    let venues = state.market.snapshot().await;
    state
        .router
        .plan(&venues, &source, &dest, req.amount, req.parts, req.disable_flags)
        .map(Json)
        .map_err(api_error)
}
