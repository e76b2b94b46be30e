/// 경매 관리 커맨드
/// 1. 다음 랏 진행 (소유 경매사 또는 관리자)
/// 2. 라이브 시작
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus};
use crate::auction::sequencer::{advance_live_lot, Advance};
use crate::auth::Principal;
use crate::error::{AuctionError, ErrorKind};
use crate::store::{AuctionStore, LotStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands
/// 관리 권한 확인 후 경매 조회
async fn load_managed_auction<S>(
    store: &S,
    principal: &Principal,
    auction_id: i64,
) -> Result<Auction, AuctionError>
where
    S: AuctionStore,
{
    let auction = store
        .get_auction(auction_id)
        .await?
        .ok_or(AuctionError::AuctionNotFound(auction_id))?;
    if !principal.can_manage(&auction) {
        return Err(AuctionError::NotAuthorized);
    }
    Ok(auction)
}

/// 1. 다음 랏 진행
pub async fn handle_advance<S>(
    store: &S,
    principal: &Principal,
    auction_id: i64,
    now: DateTime<Utc>,
    default_duration_minutes: i64,
) -> Result<Advance, AuctionError>
where
    S: LotStore + AuctionStore,
{
    info!(
        "{:<12} --> 랏 진행 요청: 경매 {} 사용자 {}",
        "Command", auction_id, principal.user_id
    );
    load_managed_auction(store, principal, auction_id).await?;
    advance_live_lot(store, auction_id, now, default_duration_minutes).await
}

/// 2. 라이브 시작
/// 이미 라이브 중이면 현재 상태를 그대로 돌려준다.
pub async fn handle_start_live<S>(
    store: &S,
    principal: &Principal,
    auction_id: i64,
    now: DateTime<Utc>,
    default_duration_minutes: i64,
) -> Result<Advance, AuctionError>
where
    S: LotStore + AuctionStore,
{
    info!(
        "{:<12} --> 라이브 시작 요청: 경매 {} 사용자 {}",
        "Command", auction_id, principal.user_id
    );
    let auction = load_managed_auction(store, principal, auction_id).await?;

    if auction.status == AuctionStatus::Closed {
        return Err(AuctionError::AuctionClosed);
    }

    if let (true, Some(lot_id)) = (auction.is_live, auction.current_lot_id) {
        let lot = store.get_lot(lot_id).await?;
        return Ok(Advance {
            auction_ended: false,
            current_lot_id: Some(lot_id),
            lot_start_time: lot.as_ref().and_then(|l| l.lot_start_time),
            lot_end_time: lot.as_ref().and_then(|l| l.lot_end_time),
        });
    }

    advance_live_lot(store, auction_id, now, default_duration_minutes).await
}
// endregion: --- Commands

// region:    --- Response
/// 랏 진행 결과 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub auction_ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_current_lot_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Result<Advance, AuctionError>> for AdvanceResponse {
    fn from(result: &Result<Advance, AuctionError>) -> Self {
        match result {
            Ok(advance) => Self {
                auction_ended: advance.auction_ended,
                new_current_lot_id: advance.current_lot_id,
                lot_end_time: advance.lot_end_time,
                error_kind: None,
                message: None,
            },
            Err(e) => Self {
                auction_ended: false,
                new_current_lot_id: None,
                lot_end_time: None,
                error_kind: Some(e.kind()),
                message: Some(e.to_string()),
            },
        }
    }
}
// endregion: --- Response
