//! 원격 키-값 저장소 추상화
//!
//! 어댑터가 사용하는 원시 연산만을 노출하는 좁은 인터페이스입니다.
//! Redis 구현([`RedisBackend`](super::redis::RedisBackend))과
//! 인메모리 구현([`MemoryBackend`](super::memory::MemoryBackend))이 있습니다.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::errors::{CacheError, CacheResult};

/// 키-값 저장소 원시 연산
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// 연결 상태를 확인합니다.
    async fn ping(&self) -> CacheResult<()>;

    /// 키에 값을 저장합니다. `ttl`이 `None`이면 만료되지 않습니다.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()>;

    /// 키가 없을 때만 저장하고, 저장 여부를 반환합니다.
    async fn set_if_absent(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<bool>;

    /// 키 존재 여부를 확인합니다.
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// 키의 원시 바이트를 조회합니다.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// 키를 삭제하고 삭제된 키의 개수를 반환합니다.
    async fn delete(&self, key: &str) -> CacheResult<u64>;

    /// 키의 값을 정수로 조회합니다.
    ///
    /// 값이 정수 형태가 아니면 `NotInteger`를 반환합니다.
    async fn get_int(&self, key: &str) -> CacheResult<Option<i64>>;

    /// 키의 정수 값을 원자적으로 감소시키고 결과를 반환합니다.
    async fn decr_by(&self, key: &str, delta: i64) -> CacheResult<i64>;

    /// 모든 키를 삭제합니다.
    async fn flush_all(&self) -> CacheResult<()>;
}

/// 저장된 바이트를 정수로 해석합니다.
pub(crate) fn parse_int(key: &str, bytes: &[u8]) -> CacheResult<i64> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|text| text.parse::<i64>().ok())
        .ok_or_else(|| CacheError::NotInteger(key.to_string()))
}
