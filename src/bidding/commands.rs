/// 입찰 관련 커맨드 처리
/// 랏 조회 → 검증 → 랏 갱신 → 입찰 기록 추가 순서로 진행한다.
/// 랏 갱신 후 입찰 기록 추가가 실패해도 랏 갱신은 되돌리지 않는다.
// region:    --- Imports
use crate::auth::{Principal, Role};
use crate::bidding::model::Bid;
use crate::bidding::validator::{evaluate_bid, parse_amount, AmountInput};
use crate::error::{AuctionError, ErrorKind};
use crate::store::{AuctionStore, BidLog, LotStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub lot_id: i64,
    pub bidder: Principal,
    pub amount: AmountInput,
}

/// 랏 갱신 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BidPolicy {
    /// true 면 읽은 시점의 현재가가 그대로일 때만 갱신
    pub strict: bool,
}

/// 수락된 입찰
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedBid {
    pub bid: Bid,
    pub new_current_bid: i64,
    pub bid_count: i64,
}

/// 입찰 처리
pub async fn handle_place_bid<S>(
    cmd: PlaceBidCommand,
    store: &S,
    policy: BidPolicy,
    now: DateTime<Utc>,
) -> Result<PlacedBid, AuctionError>
where
    S: LotStore + AuctionStore + BidLog,
{
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    if !cmd.bidder.has_role(Role::Buyer) {
        return Err(AuctionError::NotAuthorized);
    }
    let amount = parse_amount(&cmd.amount)?;

    let lot = store
        .get_lot(cmd.lot_id)
        .await?
        .ok_or(AuctionError::LotNotFound(cmd.lot_id))?;
    let auction = store
        .get_auction(lot.auction_id)
        .await?
        .ok_or(AuctionError::AuctionNotFound(lot.auction_id))?;

    let acceptance = evaluate_bid(&lot, &auction, cmd.bidder.user_id, amount, now)?;

    if policy.strict {
        let updated = store
            .update_lot_bid_if_unchanged(acceptance.lot_update, lot.current_bid, lot.bid_count)
            .await?;
        if !updated {
            warn!(
                "{:<12} --> 랏 {} 버전 충돌: 최신 상태로 재검증",
                "Command", lot.id
            );
            let fresh = store
                .get_lot(lot.id)
                .await?
                .ok_or(AuctionError::LotNotFound(lot.id))?;
            evaluate_bid(&fresh, &auction, cmd.bidder.user_id, amount, now)?;
            return Err(AuctionError::BidConflict);
        }
    } else {
        store.update_lot_bid(acceptance.lot_update).await?;
    }

    let bid = match store.append_bid(acceptance.bid).await {
        Ok(bid) => bid,
        Err(e) => {
            error!(
                "{:<12} --> 랏 {} 가격 갱신 후 입찰 기록 실패 (되돌리지 않음): {}",
                "Command", lot.id, e
            );
            return Err(e.into());
        }
    };

    info!(
        "{:<12} --> 입찰 성공: 랏 {} 현재가 {}",
        "Command", lot.id, acceptance.lot_update.current_bid
    );

    Ok(PlacedBid {
        bid,
        new_current_bid: acceptance.lot_update.current_bid,
        bid_count: acceptance.lot_update.bid_count,
    })
}
// endregion: --- Commands

// region:    --- Response
/// 입찰 결과 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceBidResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_current_bid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_required: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Result<PlacedBid, AuctionError>> for PlaceBidResponse {
    fn from(result: &Result<PlacedBid, AuctionError>) -> Self {
        match result {
            Ok(placed) => Self {
                accepted: true,
                new_current_bid: Some(placed.new_current_bid),
                min_required: None,
                error_kind: None,
                message: None,
            },
            Err(e) => Self {
                accepted: false,
                new_current_bid: None,
                min_required: e.min_required(),
                error_kind: Some(e.kind()),
                message: Some(e.to_string()),
            },
        }
    }
}
// endregion: --- Response
