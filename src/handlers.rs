// region:    --- Imports
use crate::auction::commands::{handle_advance, handle_start_live, AdvanceResponse};
use crate::auction::sequencer::Advance;
use crate::auth::Principal;
use crate::bidding::commands::{handle_place_bid, BidPolicy, PlaceBidCommand, PlaceBidResponse};
use crate::bidding::validator::AmountInput;
use crate::error::{AuctionError, ErrorKind};
use crate::query;
use crate::store::Store;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

// region:    --- State
/// 호출자 식별 헤더
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub policy: BidPolicy,
    pub default_lot_duration_minutes: i64,
}

/// 입찰 요청 본문
#[derive(Debug, Serialize, Deserialize)]
pub struct BidRequest {
    pub amount: AmountInput,
}

/// 라우터 구성
pub fn router<S: Store>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/lots/:id", get(handle_get_lot::<S>))
        .route(
            "/lots/:id/bids",
            get(handle_get_lot_bids::<S>).post(handle_bid::<S>),
        )
        .route("/auctions/:id", get(handle_get_auction::<S>))
        .route("/auctions/:id/lots", get(handle_get_auction_lots::<S>))
        .route("/auctions/:id/advance", post(handle_advance_lot::<S>))
        .route("/auctions/:id/start-live", post(handle_start_live_auction::<S>))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 64))
        .with_state(state)
}
// endregion: --- State

// region:    --- Errors
/// 오류 종류별 HTTP 상태
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotAuthorized => StatusCode::FORBIDDEN,
        ErrorKind::InvalidAmount | ErrorKind::BidTooLow => StatusCode::BAD_REQUEST,
        ErrorKind::LotNotFound | ErrorKind::AuctionNotFound => StatusCode::NOT_FOUND,
        ErrorKind::LotNotActive
        | ErrorKind::BiddingWindowClosed
        | ErrorKind::NoLotsAvailable
        | ErrorKind::AuctionClosed
        | ErrorKind::BidConflict => StatusCode::CONFLICT,
        ErrorKind::SequencerError | ErrorKind::StoreError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        (
            status_for(kind),
            Json(serde_json::json!({
                "error": self.to_string(),
                "code": kind,
            })),
        )
            .into_response()
    }
}

/// 헤더의 사용자 id로 호출자 조회
async fn resolve_caller<S: Store>(
    store: &S,
    headers: &HeaderMap,
) -> Result<Principal, AuctionError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or(AuctionError::NotAuthorized)?;

    store
        .resolve_principal(user_id)
        .await?
        .ok_or(AuctionError::NotAuthorized)
}
// endregion: --- Errors

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_bid<S: Store>(
    State(state): State<AppState<S>>,
    Path(lot_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<BidRequest>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 요청 랏: {}", "Handler", lot_id);

    let result = match resolve_caller(&state.store, &headers).await {
        Ok(principal) => {
            let cmd = PlaceBidCommand {
                lot_id,
                bidder: principal,
                amount: body.amount,
            };
            handle_place_bid(cmd, &state.store, state.policy, Utc::now()).await
        }
        Err(e) => Err(e),
    };

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => status_for(e.kind()),
    };
    (status, Json(PlaceBidResponse::from(&result)))
}

/// 다음 랏 진행 요청 처리
pub async fn handle_advance_lot<S: Store>(
    State(state): State<AppState<S>>,
    Path(auction_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("{:<12} --> 랏 진행 요청 경매: {}", "Handler", auction_id);

    let result = match resolve_caller(&state.store, &headers).await {
        Ok(principal) => {
            handle_advance(
                &state.store,
                &principal,
                auction_id,
                Utc::now(),
                state.default_lot_duration_minutes,
            )
            .await
        }
        Err(e) => Err(e),
    };
    advance_response(result)
}

/// 라이브 시작 요청 처리
pub async fn handle_start_live_auction<S: Store>(
    State(state): State<AppState<S>>,
    Path(auction_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    info!("{:<12} --> 라이브 시작 요청 경매: {}", "Handler", auction_id);

    let result = match resolve_caller(&state.store, &headers).await {
        Ok(principal) => {
            handle_start_live(
                &state.store,
                &principal,
                auction_id,
                Utc::now(),
                state.default_lot_duration_minutes,
            )
            .await
        }
        Err(e) => Err(e),
    };
    advance_response(result)
}

fn advance_response(
    result: Result<Advance, AuctionError>,
) -> (StatusCode, Json<AdvanceResponse>) {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => status_for(e.kind()),
    };
    (status, Json(AdvanceResponse::from(&result)))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 랏 조회
pub async fn handle_get_lot<S: Store>(
    State(state): State<AppState<S>>,
    Path(lot_id): Path<i64>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 랏 조회 id: {}", "HandlerQuery", lot_id);
    Ok(Json(query::handlers::get_lot_view(&state.store, lot_id).await?))
}

/// 랏 입찰 이력 조회
pub async fn handle_get_lot_bids<S: Store>(
    State(state): State<AppState<S>>,
    Path(lot_id): Path<i64>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", lot_id);
    Ok(Json(query::handlers::get_bid_history(&state.store, lot_id).await?))
}

/// 경매 조회
pub async fn handle_get_auction<S: Store>(
    State(state): State<AppState<S>>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", auction_id);
    Ok(Json(query::handlers::get_auction(&state.store, auction_id).await?))
}

/// 경매 랏 목록 조회
pub async fn handle_get_auction_lots<S: Store>(
    State(state): State<AppState<S>>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 경매 랏 목록 조회 id: {}", "HandlerQuery", auction_id);
    Ok(Json(
        query::handlers::get_auction_lots(&state.store, auction_id).await?,
    ))
}

// endregion: --- Query Handlers
