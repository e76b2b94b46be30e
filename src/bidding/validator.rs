/// 입찰 검증
/// 저장소를 건드리지 않는 순수 함수들. 입력 상태(랏, 경매, 현재 시각)만 보고 수락/거절을 결정한다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus};
use crate::bidding::increment::min_acceptable_bid;
use crate::bidding::model::{Lot, LotStatus, NewBid};
use crate::error::AuctionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Amount
/// 폼에서 들어오는 입찰 금액 (숫자 또는 문자열)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl From<i64> for AmountInput {
    // f64 로는 2^53 이상을 정확히 담을 수 없음
    fn from(value: i64) -> Self {
        AmountInput::Text(value.to_string())
    }
}

/// 입찰 금액 파싱
/// 유한한 양의 정수만 허용한다.
pub fn parse_amount(input: &AmountInput) -> Result<i64, AuctionError> {
    let value = match input {
        AmountInput::Number(n) => *n,
        AmountInput::Text(s) => {
            let s = s.trim();
            // 정수 문자열은 f64 를 거치지 않고 그대로 (2^53 이상 정밀도 유지)
            if let Ok(n) = s.parse::<i64>() {
                return if n > 0 {
                    Ok(n)
                } else {
                    Err(AuctionError::InvalidAmount)
                };
            }
            s.parse::<f64>().map_err(|_| AuctionError::InvalidAmount)?
        }
    };

    // i64::MAX as f64 는 2^63 이므로 같은 값도 범위 밖
    if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 || value >= i64::MAX as f64 {
        return Err(AuctionError::InvalidAmount);
    }
    Ok(value as i64)
}
// endregion: --- Amount

// region:    --- Evaluation
/// 랏 가격 갱신 지시
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotBidUpdate {
    pub lot_id: i64,
    pub current_bid: i64,
    pub bid_count: i64,
}

/// 수락된 입찰의 부수 효과: 랏 갱신 + 입찰 기록 추가
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidAcceptance {
    pub lot_update: LotBidUpdate,
    pub bid: NewBid,
}

/// 랏 상태 기준 입찰 판정
/// 역할과 금액 형식은 호출 전에 확인되어 있어야 한다.
pub fn evaluate_bid(
    lot: &Lot,
    auction: &Auction,
    bidder_id: i64,
    amount: i64,
    now: DateTime<Utc>,
) -> Result<BidAcceptance, AuctionError> {
    if lot.status == LotStatus::Removed {
        return Err(AuctionError::LotNotActive);
    }

    match auction.status {
        AuctionStatus::Closed => return Err(AuctionError::AuctionClosed),
        AuctionStatus::Draft => return Err(AuctionError::LotNotActive),
        _ => {}
    }

    // 라이브 경매: 현재 랏이어야 하고 종료 시각 이전이어야 함
    if auction.is_live {
        if auction.current_lot_id != Some(lot.id) {
            return Err(AuctionError::LotNotActive);
        }
        if let Some(end) = lot.lot_end_time {
            if now >= end {
                return Err(AuctionError::BiddingWindowClosed);
            }
        }
    }

    // 현재가가 최댓값 근처라 더 높은 금액을 표현할 수 없음
    let Some(min_required) = min_acceptable_bid(lot.current_bid) else {
        return Err(AuctionError::InvalidAmount);
    };
    if amount < min_required {
        return Err(AuctionError::BidTooLow { min_required });
    }

    Ok(BidAcceptance {
        lot_update: LotBidUpdate {
            lot_id: lot.id,
            current_bid: amount,
            bid_count: lot.bid_count + 1,
        },
        bid: NewBid {
            lot_id: lot.id,
            bidder_id,
            amount,
            created_at: now,
        },
    })
}
// endregion: --- Evaluation
