// region:    --- Imports
use super::{AuctionStore, BidLog, IdentityStore, LotStore, StoreResult};
use crate::auction::model::{ApprovalStatus, Auction, AuctionHouse, AuctionStatus, LiveUpdate};
use crate::auth::{Principal, Role};
use crate::bidding::model::{Bid, Lot, LotStatus, NewBid};
use crate::bidding::validator::LotBidUpdate;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

// endregion: --- Imports

// region:    --- Fail Points
/// 다음 호출 한 번을 실패시킬 지점
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    UpdateLotBid,
    AppendBid,
    SetLotWindow,
    UpdateLiveState,
}
// endregion: --- Fail Points

// region:    --- In-Memory Store
#[derive(Default)]
struct Inner {
    lots: HashMap<i64, Lot>,
    auctions: HashMap<i64, Auction>,
    bids: Vec<Bid>,
    profiles: HashMap<i64, Role>,
    auction_houses: HashMap<i64, AuctionHouse>,
    next_bid_id: i64,
    fail_points: HashSet<FailPoint>,
}

impl Inner {
    fn take_fail_point(&mut self, point: FailPoint) -> StoreResult<()> {
        if self.fail_points.remove(&point) {
            return Err(StoreError::Backend(format!("주입된 실패: {:?}", point)));
        }
        Ok(())
    }
}

/// 메모리 저장소
///
/// 테스트와 로컬 실행용. 행 단위 원자성만 흉내 낸다.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_auction(&self, auction: Auction) {
        self.inner.lock().await.auctions.insert(auction.id, auction);
    }

    pub async fn insert_lot(&self, lot: Lot) {
        self.inner.lock().await.lots.insert(lot.id, lot);
    }

    pub async fn insert_profile(&self, user_id: i64, role: Role) {
        self.inner.lock().await.profiles.insert(user_id, role);
    }

    pub async fn insert_auction_house(&self, house: AuctionHouse) {
        self.inner.lock().await.auction_houses.insert(house.id, house);
    }

    /// 지정한 지점의 다음 호출을 실패시킨다
    pub async fn fail_next(&self, point: FailPoint) {
        self.inner.lock().await.fail_points.insert(point);
    }
}

#[async_trait]
impl LotStore for InMemoryStore {
    async fn get_lot(&self, lot_id: i64) -> StoreResult<Option<Lot>> {
        Ok(self.inner.lock().await.lots.get(&lot_id).cloned())
    }

    async fn update_lot_bid(&self, update: LotBidUpdate) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.take_fail_point(FailPoint::UpdateLotBid)?;
        if let Some(lot) = inner.lots.get_mut(&update.lot_id) {
            lot.current_bid = update.current_bid;
            lot.bid_count = update.bid_count;
        }
        Ok(())
    }

    async fn update_lot_bid_if_unchanged(
        &self,
        update: LotBidUpdate,
        expected_bid: i64,
        expected_count: i64,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.lock().await;
        inner.take_fail_point(FailPoint::UpdateLotBid)?;
        match inner.lots.get_mut(&update.lot_id) {
            Some(lot) if lot.current_bid == expected_bid && lot.bid_count == expected_count => {
                lot.current_bid = update.current_bid;
                lot.bid_count = update.bid_count;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_lot_window(
        &self,
        lot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.take_fail_point(FailPoint::SetLotWindow)?;
        if let Some(lot) = inner.lots.get_mut(&lot_id) {
            lot.lot_start_time = Some(start);
            lot.lot_end_time = Some(end);
        }
        Ok(())
    }

    async fn list_active_lots(&self, auction_id: i64) -> StoreResult<Vec<Lot>> {
        let inner = self.inner.lock().await;
        let mut lots: Vec<Lot> = inner
            .lots
            .values()
            .filter(|lot| lot.auction_id == auction_id && lot.status == LotStatus::Active)
            .cloned()
            .collect();
        lots.sort_by_key(|lot| (lot.lot_order, lot.id));
        Ok(lots)
    }
}

#[async_trait]
impl AuctionStore for InMemoryStore {
    async fn get_auction(&self, auction_id: i64) -> StoreResult<Option<Auction>> {
        Ok(self.inner.lock().await.auctions.get(&auction_id).cloned())
    }

    async fn update_live_state(&self, auction_id: i64, update: LiveUpdate) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.take_fail_point(FailPoint::UpdateLiveState)?;
        if let Some(auction) = inner.auctions.get_mut(&auction_id) {
            auction.current_lot_id = update.current_lot_id;
            auction.is_live = update.is_live;
            auction.status = update.status;
        }
        Ok(())
    }

    async fn list_live_auctions(&self) -> StoreResult<Vec<Auction>> {
        let inner = self.inner.lock().await;
        let mut auctions: Vec<Auction> = inner
            .auctions
            .values()
            .filter(|a| a.is_live && a.status != AuctionStatus::Closed)
            .cloned()
            .collect();
        auctions.sort_by_key(|a| a.id);
        Ok(auctions)
    }
}

#[async_trait]
impl BidLog for InMemoryStore {
    async fn append_bid(&self, bid: NewBid) -> StoreResult<Bid> {
        let mut inner = self.inner.lock().await;
        inner.take_fail_point(FailPoint::AppendBid)?;
        inner.next_bid_id += 1;
        let stored = Bid {
            id: inner.next_bid_id,
            lot_id: bid.lot_id,
            bidder_id: bid.bidder_id,
            amount: bid.amount,
            created_at: bid.created_at,
        };
        inner.bids.push(stored.clone());
        Ok(stored)
    }

    async fn list_bids(&self, lot_id: i64) -> StoreResult<Vec<Bid>> {
        let inner = self.inner.lock().await;
        // 추가 순서가 곧 생성 순서
        Ok(inner
            .bids
            .iter()
            .rev()
            .filter(|bid| bid.lot_id == lot_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn resolve_principal(&self, user_id: i64) -> StoreResult<Option<Principal>> {
        let inner = self.inner.lock().await;
        let Some(role) = inner.profiles.get(&user_id).copied() else {
            return Ok(None);
        };
        // 승인된 경매사만 연결
        let auction_house_id = inner
            .auction_houses
            .values()
            .filter(|h| h.owner_user_id == user_id && h.status == ApprovalStatus::Approved)
            .map(|h| h.id)
            .min();
        Ok(Some(Principal {
            user_id,
            role,
            auction_house_id,
        }))
    }
}
// endregion: --- In-Memory Store
