// region:    --- Imports
use super::{AuctionStore, BidLog, IdentityStore, LotStore, StoreResult};
use crate::auction::model::{Auction, LiveUpdate};
use crate::auth::Principal;
use crate::bidding::model::{Bid, Lot, NewBid};
use crate::bidding::validator::LotBidUpdate;
use crate::database::DatabaseManager;
use crate::error::StoreError;
use crate::query::queries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

// endregion: --- Imports

// region:    --- Rows
#[derive(FromRow)]
struct LotRow {
    id: i64,
    auction_id: i64,
    name: String,
    description: String,
    initial_price: i64,
    current_bid: i64,
    bid_count: i64,
    image_urls: Vec<String>,
    status: String,
    lot_start_time: Option<DateTime<Utc>>,
    lot_end_time: Option<DateTime<Utc>>,
    lot_order: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<LotRow> for Lot {
    type Error = StoreError;

    fn try_from(row: LotRow) -> Result<Self, Self::Error> {
        Ok(Lot {
            id: row.id,
            auction_id: row.auction_id,
            name: row.name,
            description: row.description,
            initial_price: row.initial_price,
            current_bid: row.current_bid,
            bid_count: row.bid_count,
            image_urls: row.image_urls,
            status: row.status.parse().map_err(StoreError::Decode)?,
            lot_start_time: row.lot_start_time,
            lot_end_time: row.lot_end_time,
            lot_order: row.lot_order,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct AuctionRow {
    id: i64,
    auction_house_id: i64,
    title: String,
    description: String,
    category: Option<String>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    status: String,
    is_live: bool,
    current_lot_id: Option<i64>,
    lot_duration_minutes: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuctionRow> for Auction {
    type Error = StoreError;

    fn try_from(row: AuctionRow) -> Result<Self, Self::Error> {
        Ok(Auction {
            id: row.id,
            auction_house_id: row.auction_house_id,
            title: row.title,
            description: row.description,
            category: row.category,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse().map_err(StoreError::Decode)?,
            is_live: row.is_live,
            current_lot_id: row.current_lot_id,
            lot_duration_minutes: row.lot_duration_minutes,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct BidRow {
    id: i64,
    lot_id: i64,
    bidder_id: i64,
    amount: i64,
    created_at: DateTime<Utc>,
}

impl From<BidRow> for Bid {
    fn from(row: BidRow) -> Self {
        Bid {
            id: row.id,
            lot_id: row.lot_id,
            bidder_id: row.bidder_id,
            amount: row.amount,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct PrincipalRow {
    user_id: i64,
    role: String,
    auction_house_id: Option<i64>,
}
// endregion: --- Rows

// region:    --- Postgres Store
/// Postgres 저장소
///
/// 모든 메서드는 단일 SQL 문 하나로 끝난다. 트랜잭션으로 묶지 않는다.
#[derive(Clone)]
pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub fn new(db_manager: &DatabaseManager) -> Self {
        Self {
            pool: db_manager.get_pool(),
        }
    }
}

#[async_trait]
impl LotStore for PgStore {
    async fn get_lot(&self, lot_id: i64) -> StoreResult<Option<Lot>> {
        sqlx::query_as::<_, LotRow>(queries::GET_LOT)
            .bind(lot_id)
            .fetch_optional(&*self.pool)
            .await?
            .map(Lot::try_from)
            .transpose()
    }

    async fn update_lot_bid(&self, update: LotBidUpdate) -> StoreResult<()> {
        sqlx::query(queries::UPDATE_LOT_BID)
            .bind(update.current_bid)
            .bind(update.bid_count)
            .bind(update.lot_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn update_lot_bid_if_unchanged(
        &self,
        update: LotBidUpdate,
        expected_bid: i64,
        expected_count: i64,
    ) -> StoreResult<bool> {
        let result = sqlx::query(queries::UPDATE_LOT_BID_IF_UNCHANGED)
            .bind(update.current_bid)
            .bind(update.bid_count)
            .bind(update.lot_id)
            .bind(expected_bid)
            .bind(expected_count)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn set_lot_window(
        &self,
        lot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query(queries::SET_LOT_WINDOW)
            .bind(start)
            .bind(end)
            .bind(lot_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn list_active_lots(&self, auction_id: i64) -> StoreResult<Vec<Lot>> {
        sqlx::query_as::<_, LotRow>(queries::GET_ACTIVE_LOTS)
            .bind(auction_id)
            .fetch_all(&*self.pool)
            .await?
            .into_iter()
            .map(Lot::try_from)
            .collect()
    }
}

#[async_trait]
impl AuctionStore for PgStore {
    async fn get_auction(&self, auction_id: i64) -> StoreResult<Option<Auction>> {
        sqlx::query_as::<_, AuctionRow>(queries::GET_AUCTION)
            .bind(auction_id)
            .fetch_optional(&*self.pool)
            .await?
            .map(Auction::try_from)
            .transpose()
    }

    async fn update_live_state(&self, auction_id: i64, update: LiveUpdate) -> StoreResult<()> {
        sqlx::query(queries::UPDATE_LIVE_STATE)
            .bind(update.current_lot_id)
            .bind(update.is_live)
            .bind(update.status.as_str())
            .bind(auction_id)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn list_live_auctions(&self) -> StoreResult<Vec<Auction>> {
        sqlx::query_as::<_, AuctionRow>(queries::GET_LIVE_AUCTIONS)
            .fetch_all(&*self.pool)
            .await?
            .into_iter()
            .map(Auction::try_from)
            .collect()
    }
}

#[async_trait]
impl BidLog for PgStore {
    async fn append_bid(&self, bid: NewBid) -> StoreResult<Bid> {
        let row = sqlx::query_as::<_, BidRow>(queries::INSERT_BID)
            .bind(bid.lot_id)
            .bind(bid.bidder_id)
            .bind(bid.amount)
            .bind(bid.created_at)
            .fetch_one(&*self.pool)
            .await?;
        Ok(row.into())
    }

    async fn list_bids(&self, lot_id: i64) -> StoreResult<Vec<Bid>> {
        let rows = sqlx::query_as::<_, BidRow>(queries::GET_LOT_BIDS)
            .bind(lot_id)
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.into_iter().map(Bid::from).collect())
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn resolve_principal(&self, user_id: i64) -> StoreResult<Option<Principal>> {
        let row = sqlx::query_as::<_, PrincipalRow>(queries::GET_PRINCIPAL)
            .bind(user_id)
            .fetch_optional(&*self.pool)
            .await?;

        row.map(|row| {
            Ok(Principal {
                user_id: row.user_id,
                role: row.role.parse().map_err(StoreError::Decode)?,
                auction_house_id: row.auction_house_id,
            })
        })
        .transpose()
    }
}
// endregion: --- Postgres Store
