//! 캐시 저장소 점검 도구
//!
//! 환경 설정으로 Redis에 연결한 뒤 점검용 키로 왕복 연산을 수행하여
//! 저장소가 캐시 백엔드로 사용 가능한지 확인합니다.

use std::process::ExitCode;
use std::time::Duration;

use env_logger::Env;
use log::{error, info};
use redis_cache_store::caching::{CacheStore, Expiration, RedisStore};
use redis_cache_store::config::Environment;
use redis_cache_store::core::errors::CacheError;

const PROBE_KEY: &str = "redis_cache_store:probe";

#[tokio::main]
async fn main() -> ExitCode {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 캐시 저장소 점검 시작...");

    let store = match RedisStore::from_env().await {
        Ok(store) => store,
        Err(e) => {
            error!("Redis 연결 실패: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("기본 만료 시간: {:?}", store.default_expiration());

    match run_probe(&store).await {
        Ok(()) => {
            info!("✅ 점검 완료");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("점검 실패: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 파일이 없으면 기본 .env 파일 로드
fn load_env_file() {
    let profile = Environment::current();
    let file = profile.env_file();

    if dotenv::from_filename(file).is_err() {
        dotenv::dotenv().ok();
    }
}

/// `RUST_LOG` 기반 로깅 초기화 (기본값: "info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
}

/// 점검용 키로 set → get → increment → delete 왕복을 수행합니다.
async fn run_probe<S: CacheStore>(store: &S) -> Result<(), Box<dyn std::error::Error>> {
    store
        .set(PROBE_KEY, &41u64, Expiration::After(Duration::from_secs(30)))
        .await?;

    let value: u64 = store.get(PROBE_KEY).await?;
    info!("GET {} = {}", PROBE_KEY, value);

    let next = store.increment(PROBE_KEY, 1).await?;
    if next != value + 1 {
        return Err(format!("expected {} after increment, got {}", value + 1, next).into());
    }
    info!("INCR {} = {}", PROBE_KEY, next);

    store.delete(PROBE_KEY).await?;

    let gone: Result<u64, CacheError> = store.get(PROBE_KEY).await;
    match gone {
        Err(CacheError::CacheMiss) => Ok(()),
        Ok(_) => Err(format!("{} still present after delete", PROBE_KEY).into()),
        Err(e) => Err(e.into()),
    }
}
