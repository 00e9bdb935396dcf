//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<Sportsbook>`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::engine::{SlipSnapshot, Sportsbook};
use crate::slip::ledger::Settlement;
use crate::types::{Match, Outcome, ValidationError, Wager};

pub type AppState = Arc<Sportsbook>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error returned by handlers. Validation failures and malformed requests
/// become 4xx responses, anything else is a 500. The body is always
/// `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(rejection) = self.0.downcast_ref::<JsonRejection>() {
            let body = Json(json!({ "error": rejection.body_text() }));
            return (rejection.status(), body).into_response();
        }
        if let Some(rejection) = self.0.downcast_ref::<PathRejection>() {
            let body = Json(json!({ "error": rejection.body_text() }));
            return (rejection.status(), body).into_response();
        }

        let status = match self.0.downcast_ref::<ValidationError>() {
            Some(ValidationError::InvalidIndex { .. }) | Some(ValidationError::UnknownMatch(_)) => {
                StatusCode::NOT_FOUND
            }
            Some(ValidationError::MatchSuspended { .. })
            | Some(ValidationError::MatchNotOpen { .. }) => StatusCode::CONFLICT,
            Some(_) => StatusCode::UNPROCESSABLE_ENTITY,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A match as rendered, with the suspension flag spelled out.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub fixture: Match,
    pub suspended: bool,
    pub outcomes: Vec<Outcome>,
}

impl From<Match> for MatchView {
    fn from(fixture: Match) -> Self {
        Self {
            suspended: fixture.is_suspended(),
            outcomes: fixture.outcomes(),
            fixture,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectRequest {
    pub match_id: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSelectionRequest {
    pub match_id: String,
    pub market_type: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakeRequest {
    pub stake: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionResponse {
    pub index: usize,
    pub slip: SlipSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashOutQuote {
    pub index: usize,
    pub value: Decimal,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/matches
pub async fn get_matches(State(book): State<AppState>) -> Json<Vec<MatchView>> {
    let matches = book.matches().await;
    Json(matches.into_iter().map(MatchView::from).collect())
}

/// GET /api/slip
pub async fn get_slip(State(book): State<AppState>) -> Json<SlipSnapshot> {
    Json(book.slip().await)
}

/// POST /api/slip/selections
pub async fn post_selection(
    State(book): State<AppState>,
    payload: Result<Json<SelectRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SelectionResponse>)> {
    let Json(req) = payload?;
    let index = book.select(&req.match_id, &req.outcome).await?;
    let slip = book.slip().await;
    Ok((StatusCode::CREATED, Json(SelectionResponse { index, slip })))
}

/// POST /api/slip/raw
pub async fn post_raw_selection(
    State(book): State<AppState>,
    payload: Result<Json<RawSelectionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SelectionResponse>)> {
    let Json(req) = payload?;
    let index = book
        .add_selection(&req.match_id, &req.market_type, req.price)
        .await?;
    let slip = book.slip().await;
    Ok((StatusCode::CREATED, Json(SelectionResponse { index, slip })))
}

/// PUT /api/slip/:index/stake
pub async fn put_stake(
    State(book): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
    payload: Result<Json<StakeRequest>, JsonRejection>,
) -> ApiResult<Json<Wager>> {
    let Path(index) = index?;
    let Json(req) = payload?;
    Ok(Json(book.set_stake(index, req.stake).await?))
}

/// DELETE /api/slip/:index
pub async fn delete_selection(
    State(book): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> ApiResult<Json<Wager>> {
    let Path(index) = index?;
    Ok(Json(book.remove_selection(index).await?))
}

/// DELETE /api/slip
pub async fn clear_slip(State(book): State<AppState>) -> StatusCode {
    book.clear_all().await;
    StatusCode::NO_CONTENT
}

/// GET /api/slip/:index/cash-out
pub async fn get_cash_out(
    State(book): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> ApiResult<Json<CashOutQuote>> {
    let Path(index) = index?;
    let value = book.cash_out_value(index).await?;
    Ok(Json(CashOutQuote { index, value }))
}

/// POST /api/slip/:index/cash-out
pub async fn post_cash_out(
    State(book): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
) -> ApiResult<Json<Settlement>> {
    let Path(index) = index?;
    Ok(Json(book.cash_out(index).await?))
}

/// POST /api/slip/place
pub async fn post_place_all(State(book): State<AppState>) -> ApiResult<Json<Vec<Settlement>>> {
    Ok(Json(book.place_all().await?))
}

/// GET /api/settlements
pub async fn get_settlements(State(book): State<AppState>) -> ApiResult<Json<Vec<Settlement>>> {
    Ok(Json(book.settlements().await?))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
