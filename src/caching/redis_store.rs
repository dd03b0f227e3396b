//! # Redis 캐시 저장소
//!
//! HTTP 캐싱 미들웨어가 응답 데이터를 메모리 대신 Redis에 보관하도록 하는
//! [`CacheStore`] 구현입니다. 각 호출을 원격 키-값 연산 한두 번으로 변환하고,
//! 저장소 고유의 조건을 [`CacheError`]의 공유 어휘로 매핑합니다.
//!
//! ## 연산 매핑
//!
//! | 메서드 | 원격 연산 | 실패 조건 |
//! |--------|-----------|-----------|
//! | `set` | `SET [PX]` | IO 오류 |
//! | `add` | `SET NX [PX]` | 키 존재 → `NotStored` |
//! | `replace` | `EXISTS` → `SET [PX]` | 키 없음/빈 값 → `NotStored` |
//! | `get` | `GET` | 키 없음 → `CacheMiss` |
//! | `delete` | `DEL` | 삭제 0건 → `CacheMiss` |
//! | `increment` | `GET` → `SET` | 키 없음 → `CacheMiss` |
//! | `decrement` | `GET` → `DECRBY` | 키 없음 → `CacheMiss` |
//! | `flush` | `FLUSHALL` | IO 오류 |
//!
//! ## 알려진 제약
//!
//! - `replace`의 존재 확인과 쓰기 사이에는 경쟁 구간이 있습니다.
//! - `increment`는 새 값을 만료 없이 다시 기록하므로 기존 TTL이 사라집니다.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Serialize, de::DeserializeOwned};

use super::backend::KeyValueBackend;
use super::codec::{Codec, JsonCodec};
use super::redis::RedisBackend;
use super::store::{CacheStore, Expiration};
use crate::config::{CacheConfig, ClientOptions};
use crate::core::errors::{CacheError, CacheResult};

/// Redis 기반 캐시 저장소
///
/// 원격 연결과 기본 만료 시간만 보관하며, 호출 사이에 다른 상태는 없습니다.
/// 스레드 안전성은 하위 클라이언트가 제공하는 수준을 따릅니다.
///
/// ## 사용 예제
///
/// ```rust,ignore
/// use std::time::Duration;
/// use redis_cache_store::caching::{CacheStore, Expiration, RedisStore};
/// use redis_cache_store::config::ClientOptions;
///
/// let store = RedisStore::connect(&ClientOptions::default(), Duration::from_secs(300)).await?;
///
/// store.set("page:/about", &cached_page, Expiration::Default).await?;
/// let page: CachedPage = store.get("page:/about").await?;
/// ```
pub struct RedisStore<B = RedisBackend, C = JsonCodec> {
    backend: B,
    codec: C,
    default_expiration: Duration,
}

impl RedisStore<RedisBackend, JsonCodec> {
    /// 연결 옵션으로 클라이언트를 만들고 PING으로 확인한 뒤 저장소를 반환합니다.
    pub async fn connect(options: &ClientOptions, default_expiration: Duration) -> CacheResult<Self> {
        let backend = RedisBackend::connect(options).await?;
        Ok(Self::from_backend(backend, default_expiration))
    }

    /// 환경 변수 설정으로 연결합니다.
    ///
    /// 연결 옵션은 [`ClientOptions::from_env`], 기본 만료 시간은
    /// [`CacheConfig::default_expiration`]을 따릅니다.
    pub async fn from_env() -> CacheResult<Self> {
        let options = ClientOptions::from_env()?;
        Self::connect(&options, CacheConfig::default_expiration()).await
    }
}

impl<B: KeyValueBackend> RedisStore<B, JsonCodec> {
    /// 이미 준비된 백엔드를 감쌉니다. 연결 확인은 수행하지 않습니다.
    pub fn from_backend(backend: B, default_expiration: Duration) -> Self {
        Self {
            backend,
            codec: JsonCodec,
            default_expiration,
        }
    }
}

impl<B, C> RedisStore<B, C> {
    /// 직렬화 방식을 교체합니다.
    pub fn with_codec<C2: Codec>(self, codec: C2) -> RedisStore<B, C2> {
        RedisStore {
            backend: self.backend,
            codec,
            default_expiration: self.default_expiration,
        }
    }

    /// 하위 백엔드
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 설정된 기본 만료 시간
    pub fn default_expiration(&self) -> Duration {
        self.default_expiration
    }

    fn resolve(&self, expires: Expiration) -> Option<Duration> {
        expires.resolve(self.default_expiration)
    }
}

impl<B: KeyValueBackend, C> RedisStore<B, C> {
    /// 키를 부호 없는 카운터로 읽습니다.
    async fn read_counter(&self, key: &str) -> CacheResult<u64> {
        let value = match self.backend.get_int(key).await? {
            Some(value) => value,
            None => {
                debug!("counter miss: {}", key);
                return Err(CacheError::CacheMiss);
            }
        };
        u64::try_from(value).map_err(|_| CacheError::NotInteger(key.to_string()))
    }
}

#[async_trait]
impl<B, C> CacheStore for RedisStore<B, C>
where
    B: KeyValueBackend,
    C: Codec,
{
    async fn set<T>(&self, key: &str, value: &T, expires: Expiration) -> CacheResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let bytes = self.codec.encode(value)?;
        self.backend.set(key, &bytes, self.resolve(expires)).await
    }

    async fn add<T>(&self, key: &str, value: &T, expires: Expiration) -> CacheResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let bytes = self.codec.encode(value)?;
        if !self.backend.set_if_absent(key, &bytes, self.resolve(expires)).await? {
            debug!("add refused, key exists: {}", key);
            return Err(CacheError::NotStored);
        }
        Ok(())
    }

    async fn replace<T>(&self, key: &str, value: &T, expires: Expiration) -> CacheResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let bytes = self.codec.encode(value)?;
        if !self.backend.exists(key).await? {
            debug!("replace refused, key absent: {}", key);
            return Err(CacheError::NotStored);
        }
        if bytes.is_empty() {
            return Err(CacheError::NotStored);
        }
        // EXISTS와 SET 사이에 키가 삭제되면 다시 생성됨
        self.backend.set(key, &bytes, self.resolve(expires)).await
    }

    async fn get<T>(&self, key: &str) -> CacheResult<T>
    where
        T: DeserializeOwned + Send,
    {
        match self.backend.get(key).await? {
            Some(bytes) => self.codec.decode(&bytes),
            None => {
                debug!("cache miss: {}", key);
                Err(CacheError::CacheMiss)
            }
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        if self.backend.delete(key).await? == 0 {
            return Err(CacheError::CacheMiss);
        }
        Ok(())
    }

    async fn increment(&self, key: &str, delta: u64) -> CacheResult<u64> {
        let current = self.read_counter(key).await?;
        let sum = current
            .checked_add(delta)
            .filter(|sum| i64::try_from(*sum).is_ok())
            .ok_or_else(|| CacheError::CounterOverflow(key.to_string()))?;

        // 새 값은 만료 없이 기록되어 기존 TTL이 유지되지 않음
        self.backend.set(key, sum.to_string().as_bytes(), None).await?;
        Ok(sum)
    }

    async fn decrement(&self, key: &str, delta: u64) -> CacheResult<u64> {
        let current = self.read_counter(key).await?;
        let delta = delta.min(current);

        // current는 i64 범위에서 읽었으므로 변환이 실패하지 않음
        let delta = i64::try_from(delta).map_err(|_| CacheError::CounterOverflow(key.to_string()))?;
        let value = self.backend.decr_by(key, delta).await?;
        u64::try_from(value).map_err(|_| CacheError::CounterOverflow(key.to_string()))
    }

    async fn flush(&self) -> CacheResult<()> {
        warn!("flushing all keys in the connected store");
        self.backend.flush_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caching::memory::MemoryBackend;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DEFAULT_TTL: Duration = Duration::from_secs(300);

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct CachedPage {
        status: u16,
        headers: HashMap<String, Vec<String>>,
        data: Vec<u8>,
    }

    fn page(body: &str) -> CachedPage {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), vec!["text/html".to_string()]);
        CachedPage {
            status: 200,
            headers,
            data: body.as_bytes().to_vec(),
        }
    }

    fn store() -> RedisStore<MemoryBackend> {
        RedisStore::from_backend(MemoryBackend::new(), DEFAULT_TTL)
    }

    #[tokio::test]
    async fn test_get_absent_key_is_miss() {
        let store = store();
        let result: CacheResult<CachedPage> = store.get("missing").await;
        assert!(matches!(result, Err(CacheError::CacheMiss)));
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let store = store();
        let original = page("<h1>hello</h1>");

        store.set("page:/", &original, Expiration::Default).await.unwrap();
        let cached: CachedPage = store.get("page:/").await.unwrap();
        assert_eq!(cached, original);

        store.set("greeting", "hi", Expiration::Never).await.unwrap();
        let greeting: String = store.get("greeting").await.unwrap();
        assert_eq!(greeting, "hi");
    }

    #[tokio::test]
    async fn test_set_resolves_expiration() {
        let store = store();

        store.set("default", &1, Expiration::Default).await.unwrap();
        store.set("never", &1, Expiration::Never).await.unwrap();
        store.set("explicit", &1, Expiration::After(Duration::from_secs(10))).await.unwrap();

        let backend = store.backend();
        let ttl = backend.ttl("default").unwrap();
        assert!(ttl > Duration::from_secs(290) && ttl <= DEFAULT_TTL);
        assert_eq!(backend.ttl("never"), None);
        assert!(backend.ttl("explicit").unwrap() <= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_zero_default_means_no_expiry() {
        let store = RedisStore::from_backend(MemoryBackend::new(), Duration::ZERO);
        store.set("k", &1, Expiration::Default).await.unwrap();
        assert_eq!(store.backend().ttl("k"), None);
    }

    #[tokio::test]
    async fn test_get_malformed_payload() {
        let store = store();
        store.set("k", "not a page", Expiration::Default).await.unwrap();

        let result: CacheResult<CachedPage> = store.get("k").await;
        assert!(matches!(result, Err(CacheError::Deserialization(_))));
    }

    #[tokio::test]
    async fn test_add_existing_key_not_stored() {
        let store = store();
        store.add("k", &page("first"), Expiration::Default).await.unwrap();

        let result = store.add("k", &page("second"), Expiration::Default).await;
        assert!(matches!(result, Err(CacheError::NotStored)));

        let cached: CachedPage = store.get("k").await.unwrap();
        assert_eq!(cached, page("first"));
    }

    #[tokio::test]
    async fn test_replace_absent_key_not_stored() {
        let store = store();
        let result = store.replace("k", &page("x"), Expiration::Default).await;
        assert!(matches!(result, Err(CacheError::NotStored)));

        let after: CacheResult<CachedPage> = store.get("k").await;
        assert!(matches!(after, Err(CacheError::CacheMiss)));
    }

    #[tokio::test]
    async fn test_replace_existing_key() {
        let store = store();
        store.set("k", &page("old"), Expiration::Never).await.unwrap();
        store
            .replace("k", &page("new"), Expiration::After(Duration::from_secs(5)))
            .await
            .unwrap();

        let cached: CachedPage = store.get("k").await.unwrap();
        assert_eq!(cached, page("new"));
        assert!(store.backend().ttl("k").unwrap() <= Duration::from_secs(5));
    }

    /// 항상 빈 바이트를 만드는 코덱
    struct EmptyCodec;

    impl Codec for EmptyCodec {
        fn encode<T: Serialize + ?Sized>(&self, _value: &T) -> CacheResult<Vec<u8>> {
            Ok(Vec::new())
        }

        fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CacheResult<T> {
            JsonCodec.decode(bytes)
        }
    }

    #[tokio::test]
    async fn test_replace_with_empty_payload_not_stored() {
        let store = store();
        store.set("k", &page("old"), Expiration::Never).await.unwrap();

        let store = store.with_codec(EmptyCodec);
        let result = store.replace("k", &page("new"), Expiration::Default).await;
        assert!(matches!(result, Err(CacheError::NotStored)));

        let cached: CachedPage = store.get("k").await.unwrap();
        assert_eq!(cached, page("old"));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store();
        assert!(matches!(store.delete("k").await, Err(CacheError::CacheMiss)));

        store.set("k", &1, Expiration::Default).await.unwrap();
        store.delete("k").await.unwrap();

        let result: CacheResult<i32> = store.get("k").await;
        assert!(matches!(result, Err(CacheError::CacheMiss)));
    }

    #[tokio::test]
    async fn test_increment() {
        let store = store();
        assert!(matches!(store.increment("hits", 1).await, Err(CacheError::CacheMiss)));

        store.set("hits", &5u64, Expiration::Default).await.unwrap();
        assert_eq!(store.increment("hits", 3).await.unwrap(), 8);

        let hits: u64 = store.get("hits").await.unwrap();
        assert_eq!(hits, 8);
    }

    #[tokio::test]
    async fn test_increment_drops_ttl() {
        let store = store();
        store.set("hits", &5u64, Expiration::After(Duration::from_secs(60))).await.unwrap();
        assert!(store.backend().ttl("hits").is_some());

        store.increment("hits", 1).await.unwrap();
        assert_eq!(store.backend().ttl("hits"), None);
    }

    #[tokio::test]
    async fn test_increment_non_integer() {
        let store = store();
        store.set("k", &page("x"), Expiration::Default).await.unwrap();
        assert!(matches!(store.increment("k", 1).await, Err(CacheError::NotInteger(_))));

        store.set("neg", &-4i64, Expiration::Default).await.unwrap();
        assert!(matches!(store.increment("neg", 1).await, Err(CacheError::NotInteger(_))));
    }

    #[tokio::test]
    async fn test_increment_overflow() {
        let store = store();
        store.set("k", &(i64::MAX as u64), Expiration::Default).await.unwrap();
        assert!(matches!(store.increment("k", 1).await, Err(CacheError::CounterOverflow(_))));
    }

    #[tokio::test]
    async fn test_decrement() {
        let store = store();
        assert!(matches!(store.decrement("n", 1).await, Err(CacheError::CacheMiss)));

        store.set("n", &10u64, Expiration::Default).await.unwrap();
        assert_eq!(store.decrement("n", 4).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_decrement_clamps_at_zero() {
        let store = store();
        store.set("n", &3u64, Expiration::Default).await.unwrap();

        assert_eq!(store.decrement("n", 10).await.unwrap(), 0);
        let n: u64 = store.get("n").await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_decrement_keeps_ttl() {
        let store = store();
        store.set("n", &3u64, Expiration::Default).await.unwrap();
        store.decrement("n", 1).await.unwrap();
        assert!(store.backend().ttl("n").is_some());
    }

    #[tokio::test]
    async fn test_flush() {
        let store = store();
        for key in ["a", "b", "c"] {
            store.set(key, &page(key), Expiration::Default).await.unwrap();
        }

        store.flush().await.unwrap();

        for key in ["a", "b", "c"] {
            let result: CacheResult<CachedPage> = store.get(key).await;
            assert!(matches!(result, Err(CacheError::CacheMiss)));
        }
    }

    /// 모든 호출이 IO 오류로 실패하는 백엔드
    #[derive(Default)]
    struct DownBackend {
        calls: AtomicUsize,
    }

    impl DownBackend {
        fn fail<T>(&self) -> CacheResult<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(redis::RedisError::from((redis::ErrorKind::IoError, "connection refused")).into())
        }
    }

    #[async_trait]
    impl KeyValueBackend for DownBackend {
        async fn ping(&self) -> CacheResult<()> {
            self.fail()
        }
        async fn set(&self, _: &str, _: &[u8], _: Option<Duration>) -> CacheResult<()> {
            self.fail()
        }
        async fn set_if_absent(&self, _: &str, _: &[u8], _: Option<Duration>) -> CacheResult<bool> {
            self.fail()
        }
        async fn exists(&self, _: &str) -> CacheResult<bool> {
            self.fail()
        }
        async fn get(&self, _: &str) -> CacheResult<Option<Vec<u8>>> {
            self.fail()
        }
        async fn delete(&self, _: &str) -> CacheResult<u64> {
            self.fail()
        }
        async fn get_int(&self, _: &str) -> CacheResult<Option<i64>> {
            self.fail()
        }
        async fn decr_by(&self, _: &str, _: i64) -> CacheResult<i64> {
            self.fail()
        }
        async fn flush_all(&self) -> CacheResult<()> {
            self.fail()
        }
    }

    #[tokio::test]
    async fn test_backend_errors_pass_through_without_retry() {
        let store = RedisStore::from_backend(DownBackend::default(), DEFAULT_TTL);

        let set = store.set("k", &1, Expiration::Default).await;
        let add = store.add("k", &1, Expiration::Default).await;
        let replace = store.replace("k", &1, Expiration::Default).await;
        let get: CacheResult<i32> = store.get("k").await;
        let delete = store.delete("k").await;
        let incr = store.increment("k", 1).await;
        let decr = store.decrement("k", 1).await;
        let flush = store.flush().await;

        for error in [
            set.unwrap_err(),
            add.unwrap_err(),
            replace.unwrap_err(),
            get.unwrap_err(),
            delete.unwrap_err(),
            incr.unwrap_err(),
            decr.unwrap_err(),
            flush.unwrap_err(),
        ] {
            match error {
                CacheError::Redis(inner) => assert_eq!(inner.kind(), redis::ErrorKind::IoError),
                other => panic!("Expected Redis error, got {:?}", other),
            }
        }
        assert_eq!(store.backend().calls.load(Ordering::SeqCst), 8);
    }
}
