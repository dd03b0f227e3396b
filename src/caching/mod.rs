//! 캐싱 계층 모듈
//!
//! HTTP 캐싱 미들웨어의 응답 데이터를 Redis 호환 저장소에 보관하는
//! 저장소 어댑터와 그 구성 요소를 제공합니다.
//!
//! # 구성
//!
//! - [`store`] - 캐시 저장소 계약 (`CacheStore`, `Expiration`)
//! - [`redis_store`] - Redis 기반 `CacheStore` 구현 (`RedisStore`)
//! - [`backend`] - 원격 키-값 연산 추상화 (`KeyValueBackend`)
//! - [`redis`] - Redis 백엔드 (단일 노드/클러스터)
//! - [`memory`] - 인메모리 백엔드 (테스트용)
//! - [`codec`] - 값 직렬화 (`Codec`, `JsonCodec`)
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use redis_cache_store::caching::{CacheStore, Expiration, RedisStore};
//!
//! let cache = RedisStore::from_env().await?;
//! cache.set("page:/", &page, Expiration::Default).await?;
//! cache.add("lock:rebuild", &1, Expiration::After(Duration::from_secs(30))).await?;
//!
//! let cached: Page = cache.get("page:/").await?;
//! let views = cache.increment("views:/", 1).await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod backend;
pub mod codec;
pub mod memory;
pub mod redis;
pub mod redis_store;
pub mod store;

pub use backend::KeyValueBackend;
pub use codec::{Codec, JsonCodec};
pub use memory::MemoryBackend;
pub use self::redis::{RedisBackend, UniversalConnection};
pub use redis_store::RedisStore;
pub use store::{CacheStore, Expiration};
