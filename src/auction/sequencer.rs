/// 라이브 랏 진행
/// 현재 랏 다음의 active 랏을 열거나, 더 이상 랏이 없으면 경매를 종료한다.
/// 타이머는 직접 갖지 않는다. 스케줄러나 운영자 요청이 호출한다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus, LiveUpdate};
use crate::error::AuctionError;
use crate::store::{AuctionStore, LotStore};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Sequencer
/// 진행 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advance {
    pub auction_ended: bool,
    pub current_lot_id: Option<i64>,
    pub lot_start_time: Option<DateTime<Utc>>,
    pub lot_end_time: Option<DateTime<Utc>>,
}

impl Advance {
    fn ended() -> Self {
        Self {
            auction_ended: true,
            current_lot_id: None,
            lot_start_time: None,
            lot_end_time: None,
        }
    }
}

/// 다음 랏으로 진행
///
/// 랏 시간 기록과 경매 현재 랏 갱신은 별도의 쓰기다. 두 번째 쓰기가 실패하면
/// `AuctionError::Sequencer` 를 돌려주며, 현재 랏이 바뀌지 않았으므로 같은 호출을
/// 다시 하면 같은 랏을 다시 연다.
pub async fn advance_live_lot<S>(
    store: &S,
    auction_id: i64,
    now: DateTime<Utc>,
    default_duration_minutes: i64,
) -> Result<Advance, AuctionError>
where
    S: LotStore + AuctionStore,
{
    let auction = store
        .get_auction(auction_id)
        .await?
        .ok_or(AuctionError::AuctionNotFound(auction_id))?;
    open_next_lot(store, auction, now, default_duration_minutes).await
}

/// 현재 랏이 `expected_lot_id` 일 때만 진행
///
/// 스케줄러처럼 예전에 읽은 상태를 보고 진행을 결정하는 호출자용. 그 사이 다른
/// 요청이 이미 진행했다면 아무것도 쓰지 않고 `None` 을 돌려준다.
pub async fn advance_if_current<S>(
    store: &S,
    auction_id: i64,
    expected_lot_id: i64,
    now: DateTime<Utc>,
    default_duration_minutes: i64,
) -> Result<Option<Advance>, AuctionError>
where
    S: LotStore + AuctionStore,
{
    let auction = store
        .get_auction(auction_id)
        .await?
        .ok_or(AuctionError::AuctionNotFound(auction_id))?;

    if auction.current_lot_id != Some(expected_lot_id) {
        return Ok(None);
    }
    open_next_lot(store, auction, now, default_duration_minutes)
        .await
        .map(Some)
}

async fn open_next_lot<S>(
    store: &S,
    auction: Auction,
    now: DateTime<Utc>,
    default_duration_minutes: i64,
) -> Result<Advance, AuctionError>
where
    S: LotStore + AuctionStore,
{
    let auction_id = auction.id;
    if auction.status == AuctionStatus::Closed {
        return Err(AuctionError::AuctionClosed);
    }

    let lots = store.list_active_lots(auction_id).await?;
    if lots.is_empty() {
        return Err(AuctionError::NoLotsAvailable);
    }

    let next_index = auction
        .current_lot_id
        .and_then(|current| lots.iter().position(|lot| lot.id == current))
        .map_or(0, |found| found + 1);

    let Some(next_lot) = lots.get(next_index) else {
        store
            .update_live_state(
                auction_id,
                LiveUpdate {
                    current_lot_id: None,
                    is_live: false,
                    status: AuctionStatus::Closed,
                },
            )
            .await?;
        info!("{:<12} --> 경매 {} 종료: 남은 랏 없음", "Sequencer", auction_id);
        return Ok(Advance::ended());
    };

    let minutes = auction.lot_duration_or(default_duration_minutes);
    let start = now;
    let end = Duration::try_minutes(minutes)
        .and_then(|length| now.checked_add_signed(length))
        .ok_or_else(|| AuctionError::Sequencer(format!("랏 진행 시간 범위 초과: {}분", minutes)))?;
    store.set_lot_window(next_lot.id, start, end).await?;

    if let Err(e) = store
        .update_live_state(
            auction_id,
            LiveUpdate {
                current_lot_id: Some(next_lot.id),
                is_live: true,
                status: AuctionStatus::Live,
            },
        )
        .await
    {
        error!(
            "{:<12} --> 경매 {} 랏 {} 시간 기록 후 현재 랏 갱신 실패: {}",
            "Sequencer", auction_id, next_lot.id, e
        );
        return Err(AuctionError::Sequencer(e.to_string()));
    }

    info!(
        "{:<12} --> 경매 {} 현재 랏 {} (종료 {})",
        "Sequencer", auction_id, next_lot.id, end
    );

    Ok(Advance {
        auction_ended: false,
        current_lot_id: Some(next_lot.id),
        lot_start_time: Some(start),
        lot_end_time: Some(end),
    })
}
// endregion: --- Sequencer
