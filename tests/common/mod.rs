#![allow(dead_code)]

use auction_marketplace::auction::model::{ApprovalStatus, Auction, AuctionHouse, AuctionStatus};
use auction_marketplace::auth::Role;
use auction_marketplace::bidding::model::{Lot, LotStatus};
use auction_marketplace::store::InMemoryStore;
use chrono::{DateTime, TimeZone, Utc};

pub const HOUSE_ID: i64 = 10;
pub const OTHER_HOUSE_ID: i64 = 20;
pub const PENDING_HOUSE_ID: i64 = 30;

pub const BUYER: i64 = 1;
pub const HOUSE_USER: i64 = 2;
pub const ADMIN: i64 = 3;
pub const OTHER_HOUSE_USER: i64 = 4;
pub const PENDING_HOUSE_USER: i64 = 5;

pub const AUCTION_ID: i64 = 1;
pub const LOT_A: i64 = 101;
pub const LOT_B: i64 = 102;

/// 고정된 기준 시각
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// 테스트용 경매 (라이브 아님)
pub fn auction(id: i64) -> Auction {
    Auction {
        id,
        auction_house_id: HOUSE_ID,
        title: format!("테스트 경매 {}", id),
        description: "테스트를 위한 경매입니다.".to_string(),
        category: Some("art".to_string()),
        start_time: Some(t0()),
        end_time: None,
        status: AuctionStatus::Active,
        is_live: false,
        current_lot_id: None,
        lot_duration_minutes: None,
        created_at: t0(),
    }
}

/// 테스트용 랏
pub fn lot(id: i64, auction_id: i64, lot_order: i32, current_bid: i64) -> Lot {
    Lot {
        id,
        auction_id,
        name: format!("테스트 랏 {}", id),
        description: String::new(),
        initial_price: current_bid,
        current_bid,
        bid_count: 0,
        image_urls: vec![format!("lots/{}/1.jpg", id)],
        status: LotStatus::Active,
        lot_start_time: None,
        lot_end_time: None,
        lot_order,
        created_at: t0(),
    }
}

fn house(id: i64, owner_user_id: i64, status: ApprovalStatus) -> AuctionHouse {
    AuctionHouse {
        id,
        owner_user_id,
        name: format!("경매사 {}", id),
        status,
    }
}

/// 사용자 및 경매사 등록
pub async fn seed_principals(store: &InMemoryStore) {
    store.insert_profile(BUYER, Role::Buyer).await;
    store.insert_profile(HOUSE_USER, Role::AuctionHouse).await;
    store.insert_profile(ADMIN, Role::Admin).await;
    store.insert_profile(OTHER_HOUSE_USER, Role::AuctionHouse).await;
    store.insert_profile(PENDING_HOUSE_USER, Role::AuctionHouse).await;

    store
        .insert_auction_house(house(HOUSE_ID, HOUSE_USER, ApprovalStatus::Approved))
        .await;
    store
        .insert_auction_house(house(OTHER_HOUSE_ID, OTHER_HOUSE_USER, ApprovalStatus::Approved))
        .await;
    store
        .insert_auction_house(house(PENDING_HOUSE_ID, PENDING_HOUSE_USER, ApprovalStatus::Pending))
        .await;
}

/// 경매 1개 + 랏 A(순서 1), B(순서 2)
pub async fn seeded_store(current_bid: i64) -> InMemoryStore {
    let store = InMemoryStore::new();
    seed_principals(&store).await;
    store.insert_auction(auction(AUCTION_ID)).await;
    store.insert_lot(lot(LOT_A, AUCTION_ID, 1, current_bid)).await;
    store.insert_lot(lot(LOT_B, AUCTION_ID, 2, current_bid)).await;
    store
}
