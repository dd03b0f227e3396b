//! Redis 캐시 저장소
//!
//! HTTP 캐싱 미들웨어가 응답 데이터를 메모리 대신 Redis 호환 저장소에
//! 보관할 수 있도록 하는 저장소 어댑터입니다.
//!
//! # Features
//!
//! - **고정된 저장소 계약**: Set, Add, Replace, Get, Delete, Increment, Decrement, Flush
//! - **만료 정책**: 기본 만료 / 만료 없음 / 명시적 기간
//! - **단일 노드 & 클러스터**: 연결 옵션의 주소 개수로 자동 선택
//! - **교체 가능한 백엔드**: 테스트용 인메모리 구현 제공
//! - **교체 가능한 직렬화**: 기본 JSON 코덱
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  HTTP Cache Layer    │ ← 외부 (이 크레이트 범위 밖)
//! └──────────────────────┘
//!            │ CacheStore
//!            ▼
//! ┌──────────────────────┐
//! │     RedisStore       │ ← 직렬화 + 에러 매핑
//! └──────────────────────┘
//!            │ KeyValueBackend
//!            ▼
//! ┌──────────────────────┐
//! │ RedisBackend/Memory  │ ← 원시 키-값 연산
//! └──────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use redis_cache_store::caching::{CacheStore, Expiration, RedisStore};
//! use redis_cache_store::config::ClientOptions;
//!
//! let store = RedisStore::connect(&ClientOptions::default(), Duration::from_secs(60)).await?;
//! store.set("user:123", &profile, Expiration::Default).await?;
//! let cached: Profile = store.get("user:123").await?;
//! ```

pub mod caching;
pub mod config;
pub mod core;
