/// 환경 변수 기반 설정
// region:    --- Imports
use crate::error::{Error, Result};
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Config
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub max_connections: u32,
    /// 시작 시 테이블 삭제 후 재생성
    pub reset_database: bool,
    /// 경매에 랏 진행 시간이 없을 때 사용하는 기본값(분)
    pub default_lot_duration_minutes: i64,
    /// 랏 가격 갱신 시 버전 비교(compare-and-swap) 사용 여부
    pub strict_bid_updates: bool,
    /// 라이브 랏 자동 진행 스케줄러 실행 여부
    pub live_auto_advance: bool,
    pub scheduler_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| Error::Config("DATABASE_URL not set".into()))?;

        let config = Config {
            database_url,
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            max_connections: env_or("DB_MAX_CONNECTIONS", 5)?,
            reset_database: env_or("RESET_DATABASE", false)?,
            default_lot_duration_minutes: env_or("DEFAULT_LOT_DURATION_MINUTES", 5)?,
            strict_bid_updates: env_or("STRICT_BID_UPDATES", false)?,
            live_auto_advance: env_or("LIVE_AUTO_ADVANCE", false)?,
            scheduler_interval_secs: env_or("SCHEDULER_INTERVAL_SECS", 1)?,
        };

        if config.default_lot_duration_minutes <= 0 {
            return Err(Error::Config(
                "DEFAULT_LOT_DURATION_MINUTES must be positive".into(),
            ));
        }
        if config.scheduler_interval_secs == 0 {
            return Err(Error::Config(
                "SCHEDULER_INTERVAL_SECS must be positive".into(),
            ));
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            listen_addr: "0.0.0.0:3000".to_string(),
            max_connections: 5,
            reset_database: false,
            default_lot_duration_minutes: 5,
            strict_bid_updates: false,
            live_auto_advance: false,
            scheduler_interval_secs: 1,
        }
    }
}

/// 환경 변수가 없으면 기본값, 있으면 파싱
fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}
// endregion: --- Config
