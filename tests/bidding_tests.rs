mod common;

use async_trait::async_trait;
use auction_marketplace::auction::model::{Auction, AuctionStatus, LiveUpdate};
use auction_marketplace::auth::Principal;
use auction_marketplace::bidding::commands::{
    handle_place_bid, BidPolicy, PlaceBidCommand, PlaceBidResponse,
};
use auction_marketplace::bidding::increment::{increment_schedule, min_acceptable_bid};
use auction_marketplace::bidding::model::{Bid, Lot, LotStatus, NewBid};
use auction_marketplace::bidding::validator::{parse_amount, AmountInput, LotBidUpdate};
use auction_marketplace::error::{AuctionError, ErrorKind};
use auction_marketplace::store::memory::FailPoint;
use auction_marketplace::store::{AuctionStore, BidLog, InMemoryStore, LotStore, StoreResult};
use chrono::{DateTime, Duration, Utc};
use common::*;
use std::sync::Mutex;

fn bid_cmd(lot_id: i64, amount: i64) -> PlaceBidCommand {
    PlaceBidCommand {
        lot_id,
        bidder: Principal::buyer(BUYER),
        amount: AmountInput::from(amount),
    }
}

/// 라이브 경매: 랏 A가 현재 랏이고 t0 + 5분에 종료
async fn live_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    seed_principals(&store).await;

    let mut live = auction(AUCTION_ID);
    live.is_live = true;
    live.current_lot_id = Some(LOT_A);
    store.insert_auction(live).await;

    let mut a = lot(LOT_A, AUCTION_ID, 1, 90_000);
    a.lot_start_time = Some(t0());
    a.lot_end_time = Some(t0() + Duration::minutes(5));
    store.insert_lot(a).await;
    store.insert_lot(lot(LOT_B, AUCTION_ID, 2, 90_000)).await;
    store
}

/// 최소 입찰 단위표 경계값
#[test]
fn test_increment_schedule_boundaries() {
    assert_eq!(increment_schedule(0), 1_000);
    assert_eq!(increment_schedule(99_999), 1_000);
    assert_eq!(increment_schedule(100_000), 5_000);
    assert_eq!(increment_schedule(499_999), 5_000);
    assert_eq!(increment_schedule(500_000), 10_000);
    assert_eq!(increment_schedule(999_999), 10_000);
    assert_eq!(increment_schedule(1_000_000), 50_000);
    assert_eq!(increment_schedule(25_000_000), 50_000);

    assert_eq!(min_acceptable_bid(90_000), Some(91_000));
    assert_eq!(min_acceptable_bid(100_000), Some(105_000));
    assert_eq!(min_acceptable_bid(i64::MAX - 50_000), Some(i64::MAX));
    assert_eq!(min_acceptable_bid(i64::MAX - 49_999), None);
}

/// 금액 파싱: 숫자/문자열 허용, 비정상 값 거절
#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount(&AmountInput::Number(91_000.0)), Ok(91_000));
    assert_eq!(
        parse_amount(&AmountInput::Text(" 92000 ".to_string())),
        Ok(92_000)
    );

    let rejected = [
        AmountInput::Text("abc".to_string()),
        AmountInput::Text(String::new()),
        AmountInput::Number(0.0),
        AmountInput::Number(-5.0),
        AmountInput::Number(f64::NAN),
        AmountInput::Number(f64::INFINITY),
        AmountInput::Number(1_000.5),
        AmountInput::Number(i64::MAX as f64),
        AmountInput::Text("-3".to_string()),
        AmountInput::Text("9223372036854775808".to_string()),
    ];
    for input in rejected {
        assert_eq!(
            parse_amount(&input),
            Err(AuctionError::InvalidAmount),
            "{:?}",
            input
        );
    }
}

/// 큰 정수 문자열은 반올림 없이 파싱
#[test]
fn test_parse_amount_keeps_large_integers_exact() {
    assert_eq!(
        parse_amount(&AmountInput::Text("9007199254740993".to_string())),
        Ok(9_007_199_254_740_993)
    );
    assert_eq!(
        parse_amount(&AmountInput::Text(i64::MAX.to_string())),
        Ok(i64::MAX)
    );
    assert_eq!(parse_amount(&AmountInput::from(i64::MAX - 1)), Ok(i64::MAX - 1));
}

/// 최댓값 입찰 이후에는 같은 금액을 다시 받지 않음
#[tokio::test]
async fn test_top_amount_cannot_be_matched() {
    let store = seeded_store(90_000).await;

    let placed = handle_place_bid(bid_cmd(LOT_A, i64::MAX), &store, BidPolicy::default(), t0())
        .await
        .unwrap();
    assert_eq!(placed.new_current_bid, i64::MAX);

    let again = handle_place_bid(bid_cmd(LOT_A, i64::MAX), &store, BidPolicy::default(), t0()).await;
    assert_eq!(again, Err(AuctionError::InvalidAmount));

    let lot = store.get_lot(LOT_A).await.unwrap().unwrap();
    assert_eq!(lot.current_bid, i64::MAX);
    assert_eq!(lot.bid_count, 1);
    assert_eq!(store.list_bids(LOT_A).await.unwrap().len(), 1);
}

/// 현재가 + 최소 증가폭 이상만 수락
#[tokio::test]
async fn test_bid_must_clear_full_increment() {
    let store = seeded_store(90_000).await;

    let low = handle_place_bid(bid_cmd(LOT_A, 90_999), &store, BidPolicy::default(), t0()).await;
    assert_eq!(
        low,
        Err(AuctionError::BidTooLow {
            min_required: 91_000
        })
    );

    let placed = handle_place_bid(bid_cmd(LOT_A, 91_000), &store, BidPolicy::default(), t0())
        .await
        .unwrap();
    assert_eq!(placed.new_current_bid, 91_000);
    assert_eq!(placed.bid_count, 1);
    assert_eq!(placed.bid.amount, 91_000);
    assert_eq!(placed.bid.bidder_id, BUYER);
    assert_eq!(placed.bid.created_at, t0());

    let stored = store.get_lot(LOT_A).await.unwrap().unwrap();
    assert_eq!(stored.current_bid, 91_000);
    assert_eq!(stored.bid_count, 1);
}

/// 증가폭은 제안 금액이 아니라 현재가 기준
#[tokio::test]
async fn test_increment_uses_current_bid_not_proposed_amount() {
    let store = seeded_store(99_000).await;

    // 현재가 99,000 → 증가폭 1,000. 제안 금액 100,000 은 다음 구간이지만 수락된다
    let placed = handle_place_bid(bid_cmd(LOT_A, 100_000), &store, BidPolicy::default(), t0())
        .await
        .unwrap();
    assert_eq!(placed.new_current_bid, 100_000);

    // 이제 현재가 100,000 → 증가폭 5,000
    let low = handle_place_bid(bid_cmd(LOT_A, 104_000), &store, BidPolicy::default(), t0()).await;
    assert_eq!(
        low,
        Err(AuctionError::BidTooLow {
            min_required: 105_000
        })
    );
}

/// 구매자가 아니면 금액이나 랏 상태와 관계없이 거절
#[tokio::test]
async fn test_non_buyer_is_not_authorized() {
    let store = seeded_store(10_000).await;

    for bidder in [Principal::auction_house(HOUSE_USER, HOUSE_ID), Principal::admin(ADMIN)] {
        for lot_id in [LOT_A, 999] {
            let cmd = PlaceBidCommand {
                lot_id,
                bidder: bidder.clone(),
                amount: AmountInput::Number(5_000_000.0),
            };
            let result = handle_place_bid(cmd, &store, BidPolicy::default(), t0()).await;
            assert_eq!(result, Err(AuctionError::NotAuthorized));
        }
    }

    let untouched = store.get_lot(LOT_A).await.unwrap().unwrap();
    assert_eq!(untouched.bid_count, 0);
}

/// 잘못된 금액, 없는 랏
#[tokio::test]
async fn test_invalid_amount_and_missing_lot() {
    let store = seeded_store(10_000).await;

    let cmd = PlaceBidCommand {
        amount: AmountInput::Text("만원".to_string()),
        ..bid_cmd(LOT_A, 0)
    };
    let invalid = handle_place_bid(cmd, &store, BidPolicy::default(), t0()).await;
    assert_eq!(invalid, Err(AuctionError::InvalidAmount));

    let missing = handle_place_bid(bid_cmd(999, 20_000), &store, BidPolicy::default(), t0()).await;
    assert_eq!(missing, Err(AuctionError::LotNotFound(999)));
}

/// 삭제된 랏, 종료된 경매
#[tokio::test]
async fn test_removed_lot_and_closed_auction() {
    let store = seeded_store(10_000).await;
    let mut removed = lot(LOT_B, AUCTION_ID, 2, 10_000);
    removed.status = LotStatus::Removed;
    store.insert_lot(removed).await;

    let result = handle_place_bid(bid_cmd(LOT_B, 50_000), &store, BidPolicy::default(), t0()).await;
    assert_eq!(result, Err(AuctionError::LotNotActive));

    let mut closed = auction(AUCTION_ID);
    closed.status = AuctionStatus::Closed;
    store.insert_auction(closed).await;

    let result = handle_place_bid(bid_cmd(LOT_A, 50_000), &store, BidPolicy::default(), t0()).await;
    assert_eq!(result, Err(AuctionError::AuctionClosed));
}

/// 라이브 경매: 현재 랏이 아니면 금액과 관계없이 거절
#[tokio::test]
async fn test_live_auction_rejects_non_current_lot() {
    let store = live_store().await;

    let result = handle_place_bid(bid_cmd(LOT_B, 9_000_000), &store, BidPolicy::default(), t0()).await;
    assert_eq!(result, Err(AuctionError::LotNotActive));

    let ok = handle_place_bid(bid_cmd(LOT_A, 91_000), &store, BidPolicy::default(), t0()).await;
    assert!(ok.is_ok());
}

/// 라이브 경매: 종료 시각 이후(종료 시각 포함) 입찰 거절
#[tokio::test]
async fn test_live_auction_window_closed() {
    let store = live_store().await;
    let end = t0() + Duration::minutes(5);

    let before = handle_place_bid(
        bid_cmd(LOT_A, 91_000),
        &store,
        BidPolicy::default(),
        end - Duration::seconds(1),
    )
    .await;
    assert!(before.is_ok());

    for now in [end, end + Duration::seconds(1)] {
        let late = handle_place_bid(bid_cmd(LOT_A, 500_000), &store, BidPolicy::default(), now).await;
        assert_eq!(late, Err(AuctionError::BiddingWindowClosed));
    }
}

/// 수락된 입찰은 랏별로 엄격히 증가하고 입찰 수와 기록 수가 일치
#[tokio::test]
async fn test_accepted_bids_are_monotonic() {
    let store = seeded_store(95_000).await;
    let attempts = [96_000, 96_500, 97_000, 150_000, 152_000, 155_000, 155_000, 700_000];

    for (i, amount) in attempts.into_iter().enumerate() {
        let now = t0() + Duration::seconds(i as i64);
        let _ = handle_place_bid(bid_cmd(LOT_A, amount), &store, BidPolicy::default(), now).await;
    }

    let mut bids = store.list_bids(LOT_A).await.unwrap();
    bids.reverse();
    let amounts: Vec<i64> = bids.iter().map(|b| b.amount).collect();
    assert_eq!(amounts, vec![96_000, 97_000, 150_000, 155_000, 700_000]);
    assert!(amounts.windows(2).all(|w| w[1] > w[0]));

    let stored = store.get_lot(LOT_A).await.unwrap().unwrap();
    assert_eq!(stored.bid_count, amounts.len() as i64);
    assert_eq!(stored.current_bid, 700_000);
    assert!(stored.current_bid >= stored.initial_price);
}

/// 입찰 기록 추가 실패: 오류를 돌려주지만 랏 갱신은 되돌리지 않음
#[tokio::test]
async fn test_bid_append_failure_is_not_rolled_back() {
    let store = seeded_store(10_000).await;
    store.fail_next(FailPoint::AppendBid).await;

    let result = handle_place_bid(bid_cmd(LOT_A, 11_000), &store, BidPolicy::default(), t0()).await;
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreError);

    let stored = store.get_lot(LOT_A).await.unwrap().unwrap();
    assert_eq!(stored.current_bid, 11_000);
    assert_eq!(stored.bid_count, 1);
    assert!(store.list_bids(LOT_A).await.unwrap().is_empty());
}

/// 응답 변환: 거절 사유와 최소 금액 포함
#[tokio::test]
async fn test_place_bid_response() {
    let store = seeded_store(90_000).await;

    let result = handle_place_bid(bid_cmd(LOT_A, 90_500), &store, BidPolicy::default(), t0()).await;
    let response = PlaceBidResponse::from(&result);
    assert!(!response.accepted);
    assert_eq!(response.min_required, Some(91_000));
    assert_eq!(response.error_kind, Some(ErrorKind::BidTooLow));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["error_kind"], "BID_TOO_LOW");
    assert!(json["message"].as_str().unwrap().contains("91000"));
    assert!(json.get("new_current_bid").is_none());

    let result = handle_place_bid(bid_cmd(LOT_A, 91_000), &store, BidPolicy::default(), t0()).await;
    let response = PlaceBidResponse::from(&result);
    assert!(response.accepted);
    assert_eq!(response.new_current_bid, Some(91_000));
    assert_eq!(response.error_kind, None);
}

// region:    --- Stale Read

/// 첫 번째 랏 조회에서 오래된 스냅샷을 돌려주는 저장소
/// 다른 입찰자가 먼저 쓴 상황을 재현한다.
struct StaleReadStore {
    inner: InMemoryStore,
    stale: Mutex<Option<Lot>>,
}

impl StaleReadStore {
    fn new(inner: InMemoryStore, stale: Lot) -> Self {
        Self {
            inner,
            stale: Mutex::new(Some(stale)),
        }
    }
}

#[async_trait]
impl LotStore for StaleReadStore {
    async fn get_lot(&self, lot_id: i64) -> StoreResult<Option<Lot>> {
        let stale = self.stale.lock().unwrap().take();
        match stale {
            Some(lot) => Ok(Some(lot)),
            None => self.inner.get_lot(lot_id).await,
        }
    }

    async fn update_lot_bid(&self, update: LotBidUpdate) -> StoreResult<()> {
        self.inner.update_lot_bid(update).await
    }

    async fn update_lot_bid_if_unchanged(
        &self,
        update: LotBidUpdate,
        expected_bid: i64,
        expected_count: i64,
    ) -> StoreResult<bool> {
        self.inner
            .update_lot_bid_if_unchanged(update, expected_bid, expected_count)
            .await
    }

    async fn set_lot_window(
        &self,
        lot_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.inner.set_lot_window(lot_id, start, end).await
    }

    async fn list_active_lots(&self, auction_id: i64) -> StoreResult<Vec<Lot>> {
        self.inner.list_active_lots(auction_id).await
    }
}

#[async_trait]
impl AuctionStore for StaleReadStore {
    async fn get_auction(&self, auction_id: i64) -> StoreResult<Option<Auction>> {
        self.inner.get_auction(auction_id).await
    }

    async fn update_live_state(&self, auction_id: i64, update: LiveUpdate) -> StoreResult<()> {
        self.inner.update_live_state(auction_id, update).await
    }

    async fn list_live_auctions(&self) -> StoreResult<Vec<Auction>> {
        self.inner.list_live_auctions().await
    }
}

#[async_trait]
impl BidLog for StaleReadStore {
    async fn append_bid(&self, bid: NewBid) -> StoreResult<Bid> {
        self.inner.append_bid(bid).await
    }

    async fn list_bids(&self, lot_id: i64) -> StoreResult<Vec<Bid>> {
        self.inner.list_bids(lot_id).await
    }
}

/// 다른 입찰자가 95,000 으로 먼저 갱신한 랏. 읽은 스냅샷은 90,000
async fn raced_store() -> StaleReadStore {
    let inner = seeded_store(90_000).await;
    let snapshot = inner.get_lot(LOT_A).await.unwrap().unwrap();
    inner
        .update_lot_bid(LotBidUpdate {
            lot_id: LOT_A,
            current_bid: 95_000,
            bid_count: 1,
        })
        .await
        .unwrap();
    StaleReadStore::new(inner, snapshot)
}

// endregion: --- Stale Read

/// 기본 모드: 오래된 값으로 검증해도 마지막 쓰기가 이긴다
#[tokio::test]
async fn test_last_write_wins_without_strict_mode() {
    let store = raced_store().await;

    let placed = handle_place_bid(bid_cmd(LOT_A, 91_000), &store, BidPolicy::default(), t0())
        .await
        .unwrap();
    assert_eq!(placed.new_current_bid, 91_000);

    let stored = store.inner.get_lot(LOT_A).await.unwrap().unwrap();
    assert_eq!(stored.current_bid, 91_000);
}

/// 엄격 모드: 충돌 시 최신 상태로 재검증해 정확한 최소 금액을 알려준다
#[tokio::test]
async fn test_strict_mode_reports_fresh_minimum() {
    let store = raced_store().await;
    let strict = BidPolicy { strict: true };

    let result = handle_place_bid(bid_cmd(LOT_A, 91_000), &store, strict, t0()).await;
    assert_eq!(
        result,
        Err(AuctionError::BidTooLow {
            min_required: 96_000
        })
    );

    let stored = store.inner.get_lot(LOT_A).await.unwrap().unwrap();
    assert_eq!(stored.current_bid, 95_000);
    assert!(store.inner.list_bids(LOT_A).await.unwrap().is_empty());
}

/// 엄격 모드: 최신 상태로도 통과하는 금액이면 충돌로 알리고 재입찰을 요구한다
#[tokio::test]
async fn test_strict_mode_conflict_requires_resubmit() {
    let store = raced_store().await;
    let strict = BidPolicy { strict: true };

    let result = handle_place_bid(bid_cmd(LOT_A, 120_000), &store, strict, t0()).await;
    assert_eq!(result, Err(AuctionError::BidConflict));

    // 재입찰은 최신 상태 기준으로 수락된다
    let retry = handle_place_bid(bid_cmd(LOT_A, 120_000), &store, strict, t0())
        .await
        .unwrap();
    assert_eq!(retry.new_current_bid, 120_000);
    assert_eq!(retry.bid_count, 2);
}
