/// 저장소 인터페이스
/// 모든 메서드는 한 행 단위로만 원자적이다. 여러 행에 걸친 갱신은 호출자가 순서대로 수행하고
/// 중간 실패를 직접 처리한다.
// region:    --- Imports
use crate::auction::model::{Auction, LiveUpdate};
use crate::auth::Principal;
use crate::bidding::model::{Bid, Lot, NewBid};
use crate::bidding::validator::LotBidUpdate;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

// endregion: --- Imports

pub type StoreResult<T> = Result<T, StoreError>;

// region:    --- Store Traits
/// 랏 저장소
#[async_trait]
pub trait LotStore: Send + Sync {
    async fn get_lot(&self, lot_id: i64) -> StoreResult<Option<Lot>>;

    /// 현재가와 입찰 수를 무조건 덮어쓴다 (마지막 쓰기 우선)
    async fn update_lot_bid(&self, update: LotBidUpdate) -> StoreResult<()>;

    /// 읽은 시점의 현재가/입찰 수가 그대로일 때만 갱신. 갱신 여부 반환
    async fn update_lot_bid_if_unchanged(
        &self,
        update: LotBidUpdate,
        expected_bid: i64,
        expected_count: i64,
    ) -> StoreResult<bool>;

    async fn set_lot_window(
        &self,
        lot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// 경매의 active 랏을 진행 순서대로 조회
    async fn list_active_lots(&self, auction_id: i64) -> StoreResult<Vec<Lot>>;
}

/// 경매 저장소
#[async_trait]
pub trait AuctionStore: Send + Sync {
    async fn get_auction(&self, auction_id: i64) -> StoreResult<Option<Auction>>;

    async fn update_live_state(&self, auction_id: i64, update: LiveUpdate) -> StoreResult<()>;

    async fn list_live_auctions(&self) -> StoreResult<Vec<Auction>>;
}

/// 입찰 기록 (추가 전용)
#[async_trait]
pub trait BidLog: Send + Sync {
    async fn append_bid(&self, bid: NewBid) -> StoreResult<Bid>;

    /// 최신 입찰부터
    async fn list_bids(&self, lot_id: i64) -> StoreResult<Vec<Bid>>;
}

/// 사용자 역할 조회
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn resolve_principal(&self, user_id: i64) -> StoreResult<Option<Principal>>;
}

/// 서비스 전체에서 사용하는 저장소 묶음
pub trait Store:
    LotStore + AuctionStore + BidLog + IdentityStore + Clone + Send + Sync + 'static
{
}

impl<T> Store for T where
    T: LotStore + AuctionStore + BidLog + IdentityStore + Clone + Send + Sync + 'static
{
}
// endregion: --- Store Traits
