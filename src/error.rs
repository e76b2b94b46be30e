// region:    --- Imports
use serde::{Deserialize, Serialize};
use thiserror::Error;

// endregion: --- Imports

// region:    --- Startup Error
pub type Result<T> = std::result::Result<T, Error>;

/// 서버 기동 단계에서만 발생하는 오류
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
// endregion: --- Startup Error

// region:    --- Store Error
/// 저장소 호출 실패
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("저장소 오류: {0}")]
    Backend(String),

    #[error("저장된 행을 해석할 수 없습니다: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}
// endregion: --- Store Error

// region:    --- Auction Error
/// 입찰 및 라이브 랏 진행 결과로 호출자에게 돌려주는 오류
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuctionError {
    #[error("권한이 없습니다.")]
    NotAuthorized,

    #[error("입찰 금액이 올바르지 않습니다.")]
    InvalidAmount,

    #[error("랏을 찾을 수 없습니다: {0}")]
    LotNotFound(i64),

    #[error("경매를 찾을 수 없습니다: {0}")]
    AuctionNotFound(i64),

    #[error("현재 입찰 가능한 랏이 아닙니다.")]
    LotNotActive,

    #[error("입찰 시간이 종료되었습니다.")]
    BiddingWindowClosed,

    #[error("입찰 금액이 너무 낮습니다. 최소 입찰 금액: {min_required}")]
    BidTooLow { min_required: i64 },

    #[error("진행할 랏이 없습니다.")]
    NoLotsAvailable,

    #[error("경매가 이미 종료되었습니다.")]
    AuctionClosed,

    #[error("랏 정보가 변경되었습니다. 다시 입찰해 주세요.")]
    BidConflict,

    #[error("랏 진행 중 일부 갱신에 실패했습니다: {0}")]
    Sequencer(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// UI에서 분기할 수 있는 고정 오류 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotAuthorized,
    InvalidAmount,
    LotNotFound,
    AuctionNotFound,
    LotNotActive,
    BiddingWindowClosed,
    BidTooLow,
    NoLotsAvailable,
    AuctionClosed,
    BidConflict,
    SequencerError,
    StoreError,
}

impl AuctionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuctionError::NotAuthorized => ErrorKind::NotAuthorized,
            AuctionError::InvalidAmount => ErrorKind::InvalidAmount,
            AuctionError::LotNotFound(_) => ErrorKind::LotNotFound,
            AuctionError::AuctionNotFound(_) => ErrorKind::AuctionNotFound,
            AuctionError::LotNotActive => ErrorKind::LotNotActive,
            AuctionError::BiddingWindowClosed => ErrorKind::BiddingWindowClosed,
            AuctionError::BidTooLow { .. } => ErrorKind::BidTooLow,
            AuctionError::NoLotsAvailable => ErrorKind::NoLotsAvailable,
            AuctionError::AuctionClosed => ErrorKind::AuctionClosed,
            AuctionError::BidConflict => ErrorKind::BidConflict,
            AuctionError::Sequencer(_) => ErrorKind::SequencerError,
            AuctionError::Store(_) => ErrorKind::StoreError,
        }
    }

    /// 최소 입찰 금액 (BidTooLow 인 경우만)
    pub fn min_required(&self) -> Option<i64> {
        match self {
            AuctionError::BidTooLow { min_required } => Some(*min_required),
            _ => None,
        }
    }
}
// endregion: --- Auction Error
