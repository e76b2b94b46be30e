// region:    --- Imports
use auction_marketplace::bidding::commands::BidPolicy;
use auction_marketplace::config::Config;
use auction_marketplace::database::DatabaseManager;
use auction_marketplace::error::Error;
use auction_marketplace::handlers::{self, AppState};
use auction_marketplace::scheduler::LiveLotScheduler;
use auction_marketplace::store::PgStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Duration;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Error> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    // DatabaseManager 생성
    let db_manager = DatabaseManager::new(&config).await?;

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database(config.reset_database).await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    let store = PgStore::new(&db_manager);

    // 라이브 랏 자동 진행
    if config.live_auto_advance {
        LiveLotScheduler::new(
            Arc::new(store.clone()),
            Duration::from_secs(config.scheduler_interval_secs),
            config.default_lot_duration_minutes,
        )
        .start();
        info!("{:<12} --> 라이브 랏 스케줄러 시작", "Main");
    }

    let state = AppState {
        store,
        policy: BidPolicy {
            strict: config.strict_bid_updates,
        },
        default_lot_duration_minutes: config.default_lot_duration_minutes,
    };
    let routes_all = handlers::router(state);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
