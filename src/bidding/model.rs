use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// 랏 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotStatus {
    Active,
    Removed,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Active => "active",
            LotStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LotStatus::Active),
            "removed" => Ok(LotStatus::Removed),
            other => Err(format!("알 수 없는 랏 상태: {}", other)),
        }
    }
}

// 랏 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub id: i64,
    pub auction_id: i64,
    pub name: String,
    pub description: String,
    pub initial_price: i64,
    /// 현재 최고 입찰가 (감소하지 않음)
    pub current_bid: i64,
    pub bid_count: i64,
    pub image_urls: Vec<String>,
    pub status: LotStatus,
    pub lot_start_time: Option<DateTime<Utc>>,
    pub lot_end_time: Option<DateTime<Utc>>,
    /// 같은 경매 안에서의 진행 순서
    pub lot_order: i32,
    pub created_at: DateTime<Utc>,
}

// 입찰 모델 (생성 후 변경 불가)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: i64,
    pub lot_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

// 입찰 기록 추가 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBid {
    pub lot_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}
