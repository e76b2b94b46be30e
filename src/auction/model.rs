use crate::auth::Owned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Draft,
    Upcoming,
    Active,
    Live,
    Closed,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Draft => "draft",
            AuctionStatus::Upcoming => "upcoming",
            AuctionStatus::Active => "active",
            AuctionStatus::Live => "live",
            AuctionStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(AuctionStatus::Draft),
            "upcoming" => Ok(AuctionStatus::Upcoming),
            "active" => Ok(AuctionStatus::Active),
            "live" => Ok(AuctionStatus::Live),
            "closed" => Ok(AuctionStatus::Closed),
            other => Err(format!("알 수 없는 경매 상태: {}", other)),
        }
    }
}

// 경매 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: i64,
    pub auction_house_id: i64,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: AuctionStatus,
    pub is_live: bool,
    /// 라이브 진행 중 입찰 가능한 랏
    pub current_lot_id: Option<i64>,
    pub lot_duration_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Owned for Auction {
    fn owner_house_id(&self) -> i64 {
        self.auction_house_id
    }
}

/// 라이브 진행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LiveState {
    NotLive,
    LotOpen { lot_id: i64 },
    Ended,
}

impl Auction {
    pub fn live_state(&self) -> LiveState {
        match (self.is_live, self.current_lot_id) {
            (true, Some(lot_id)) => LiveState::LotOpen { lot_id },
            _ if self.status == AuctionStatus::Closed => LiveState::Ended,
            _ => LiveState::NotLive,
        }
    }

    /// 랏 진행 시간(분), 설정이 없거나 0 이하면 기본값
    pub fn lot_duration_or(&self, default_minutes: i64) -> i64 {
        match self.lot_duration_minutes {
            Some(minutes) if minutes > 0 => i64::from(minutes),
            _ => default_minutes,
        }
    }
}

/// 라이브 진행 관련 필드 갱신 (경매 행 단위)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveUpdate {
    pub current_lot_id: Option<i64>,
    pub is_live: bool,
    pub status: AuctionStatus,
}

// 경매사 승인 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
}

// 경매사 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionHouse {
    pub id: i64,
    pub owner_user_id: i64,
    pub name: String,
    pub status: ApprovalStatus,
}
