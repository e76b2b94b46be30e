// region:    --- Imports
use crate::auction::model::Auction;
use crate::bidding::increment::{increment_schedule, min_acceptable_bid};
use crate::bidding::model::{Bid, Lot};
use crate::error::AuctionError;
use crate::store::{AuctionStore, BidLog, LotStore};
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Views
/// 랏 상세 (다음 입찰 최소 금액 포함)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotView {
    #[serde(flatten)]
    pub lot: Lot,
    pub min_increment: i64,
    /// 현재가가 최댓값 근처라 더 받을 수 없으면 null
    pub min_next_bid: Option<i64>,
}

impl From<Lot> for LotView {
    fn from(lot: Lot) -> Self {
        Self {
            min_increment: increment_schedule(lot.current_bid),
            min_next_bid: min_acceptable_bid(lot.current_bid),
            lot,
        }
    }
}
// endregion: --- Views

// region:    --- Query Handlers

/// 랏 조회
pub async fn get_lot_view(store: &impl LotStore, lot_id: i64) -> Result<LotView, AuctionError> {
    info!("{:<12} --> 랏 조회 id: {}", "Query", lot_id);
    store
        .get_lot(lot_id)
        .await?
        .map(LotView::from)
        .ok_or(AuctionError::LotNotFound(lot_id))
}

/// 랏 입찰 이력 조회 (최신순)
pub async fn get_bid_history(
    store: &(impl LotStore + BidLog),
    lot_id: i64,
) -> Result<Vec<Bid>, AuctionError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", lot_id);
    if store.get_lot(lot_id).await?.is_none() {
        return Err(AuctionError::LotNotFound(lot_id));
    }
    Ok(store.list_bids(lot_id).await?)
}

/// 경매 조회
pub async fn get_auction(
    store: &impl AuctionStore,
    auction_id: i64,
) -> Result<Auction, AuctionError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    store
        .get_auction(auction_id)
        .await?
        .ok_or(AuctionError::AuctionNotFound(auction_id))
}

/// 경매의 active 랏 조회 (진행 순서)
pub async fn get_auction_lots(
    store: &(impl LotStore + AuctionStore),
    auction_id: i64,
) -> Result<Vec<LotView>, AuctionError> {
    info!("{:<12} --> 경매 랏 목록 조회 id: {}", "Query", auction_id);
    if store.get_auction(auction_id).await?.is_none() {
        return Err(AuctionError::AuctionNotFound(auction_id));
    }
    let lots = store.list_active_lots(auction_id).await?;
    Ok(lots.into_iter().map(LotView::from).collect())
}

// endregion: --- Query Handlers
