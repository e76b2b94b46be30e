/// 라이브 랏 자동 진행 스케줄러
/// 라이브 중인 경매의 현재 랏 종료 시각이 지나면 다음 랏으로 진행한다.
// region:    --- Imports
use crate::auction::sequencer::advance_if_current;
use crate::store::{AuctionStore, LotStore, StoreResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Live Lot Scheduler
pub struct LiveLotScheduler<S> {
    store: Arc<S>,
    tick: Duration,
    default_duration_minutes: i64,
}

impl<S> LiveLotScheduler<S>
where
    S: LotStore + AuctionStore + 'static,
{
    pub fn new(store: Arc<S>, tick: Duration, default_duration_minutes: i64) -> Self {
        Self {
            store,
            tick,
            default_duration_minutes,
        }
    }

    /// 스케줄러 시작
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = interval(self.tick);
            loop {
                interval.tick().await;
                if let Err(e) = self.run_once(Utc::now()).await {
                    error!(
                        "{:<12} --> 라이브 경매 조회 중 오류 발생: {:?}",
                        "Scheduler", e
                    );
                }
            }
        })
    }

    /// 종료 시각이 지난 랏을 가진 경매를 한 번씩 진행. 진행한 경매 수 반환
    pub async fn run_once(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let store = self.store.as_ref();
        let mut advanced = 0;

        for auction in store.list_live_auctions().await? {
            let Some(lot_id) = auction.current_lot_id else {
                continue;
            };
            let due = match store.get_lot(lot_id).await? {
                Some(lot) => lot.lot_end_time.map_or(false, |end| end <= now),
                // 현재 랏이 사라졌으면 다음 랏으로 넘긴다
                None => true,
            };
            if !due {
                continue;
            }

            // 점검 이후 수동 진행이 있었으면 새로 열린 랏은 건드리지 않는다
            match advance_if_current(store, auction.id, lot_id, now, self.default_duration_minutes)
                .await
            {
                Ok(None) => debug!(
                    "{:<12} --> 경매 {} 랏 {} 이미 진행됨",
                    "Scheduler", auction.id, lot_id
                ),
                Ok(Some(result)) => {
                    advanced += 1;
                    info!(
                        "{:<12} --> 경매 {} 자동 진행: {:?}",
                        "Scheduler", auction.id, result
                    );
                }
                Err(e) => error!(
                    "{:<12} --> 경매 {} 자동 진행 실패: {}",
                    "Scheduler", auction.id, e
                ),
            }
        }

        debug!("{:<12} --> 라이브 경매 점검 완료", "Scheduler");
        Ok(advanced)
    }
}
// endregion: --- Live Lot Scheduler
