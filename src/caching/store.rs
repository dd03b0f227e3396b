//! 캐시 저장소 계약
//!
//! HTTP 캐싱 미들웨어가 의존하는 고정된 메서드 집합과 만료 시간 표현을
//! 정의합니다. 모든 백엔드(Redis, 인메모리)는 이 계약을 통해 사용됩니다.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::core::errors::CacheResult;

/// 항목의 만료 정책
///
/// 두 가지 특수 값(`Default`, `Never`)과 그 외의 명시적인 기간으로 구성됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// 저장소에 설정된 기본 만료 시간 사용
    #[default]
    Default,
    /// 만료되지 않음
    Never,
    /// 지정된 기간 후 만료
    After(Duration),
}

impl Expiration {
    /// 기본 만료 시간을 적용하여 실제 TTL을 계산합니다.
    ///
    /// `None`은 만료 없음을 의미합니다. 0 기간은 기본값이든 명시값이든
    /// 만료 없음으로 취급됩니다.
    pub fn resolve(self, default: Duration) -> Option<Duration> {
        let ttl = match self {
            Expiration::Default => default,
            Expiration::Never => return None,
            Expiration::After(ttl) => ttl,
        };
        if ttl.is_zero() { None } else { Some(ttl) }
    }
}

impl From<Duration> for Expiration {
    fn from(ttl: Duration) -> Self {
        Expiration::After(ttl)
    }
}

/// 캐시 저장소 인터페이스
///
/// 각 메서드는 원격 저장소에 대한 한두 번의 왕복으로 변환됩니다.
/// 저장소 고유의 조건(키 없음 등)은 [`CacheError`](crate::core::errors::CacheError)의
/// `CacheMiss`, `NotStored`로 매핑됩니다.
///
/// ## 사용 예제
///
/// ```rust,ignore
/// store.set("page:/", &page, Expiration::Default).await?;
/// let cached: Page = store.get("page:/").await?;
///
/// store.set("hits", &0u64, Expiration::Never).await?;
/// let hits = store.increment("hits", 1).await?;
/// ```
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 키에 값을 무조건 저장합니다.
    async fn set<T>(&self, key: &str, value: &T, expires: Expiration) -> CacheResult<()>
    where
        T: Serialize + Sync + ?Sized;

    /// 키가 없을 때만 저장합니다.
    ///
    /// 키가 이미 존재하면 `NotStored`를 반환하고 기존 값은 변경되지 않습니다.
    async fn add<T>(&self, key: &str, value: &T, expires: Expiration) -> CacheResult<()>
    where
        T: Serialize + Sync + ?Sized;

    /// 키가 이미 있을 때만 저장합니다.
    ///
    /// 존재 확인과 쓰기는 원자적이지 않습니다. 두 단계 사이에 다른 클라이언트가
    /// 키를 삭제하면 `replace`가 키를 다시 생성할 수 있습니다.
    async fn replace<T>(&self, key: &str, value: &T, expires: Expiration) -> CacheResult<()>
    where
        T: Serialize + Sync + ?Sized;

    /// 키의 값을 조회하여 역직렬화합니다.
    async fn get<T>(&self, key: &str) -> CacheResult<T>
    where
        T: DeserializeOwned + Send;

    /// 키를 삭제합니다. 키가 없으면 `CacheMiss`를 반환합니다.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// 정수 값을 `delta`만큼 증가시키고 새 값을 반환합니다.
    async fn increment(&self, key: &str, delta: u64) -> CacheResult<u64>;

    /// 정수 값을 `delta`만큼 감소시키고 새 값을 반환합니다. 결과는 0 미만이 되지 않습니다.
    async fn decrement(&self, key: &str, delta: u64) -> CacheResult<u64>;

    /// 연결된 저장소의 모든 키를 삭제합니다.
    async fn flush(&self) -> CacheResult<()>;
}
