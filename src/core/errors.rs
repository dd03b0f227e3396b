//! # Cache Error Handling
//!
//! 캐시 저장소 계층의 통합 에러 타입입니다.
//! 호출자(HTTP 캐싱 미들웨어)가 구분해야 하는 조건은 소수의 공유 어휘로
//! 정리하고, Redis 클라이언트 에러는 가공 없이 그대로 전달합니다.
//!
//! ## 에러 매핑
//!
//! | CacheError | 의미 | 발생 연산 |
//! |------------|------|-----------|
//! | `CacheMiss` | 존재해야 할 키가 없음 | `get`, `delete`, `increment`, `decrement` |
//! | `NotStored` | 조건부 쓰기가 거부됨 | `add`, `replace` |
//! | `Redis` | 연결/IO 오류 (원본 그대로) | 모든 연산 |
//! | `Serialization` / `Deserialization` | 페이로드 변환 실패 | `set`, `add`, `replace`, `get` |
//! | `NotInteger` | 정수가 아닌 값에 카운터 연산 | `increment`, `decrement` |
//! | `CounterOverflow` | 카운터 범위 초과 | `increment`, `decrement` |
//! | `Config` | 잘못된 연결 설정 | 생성 시점 |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use redis_cache_store::core::errors::CacheError;
//!
//! match store.get::<Page>("page:/index").await {
//!     Ok(page) => render(page),
//!     Err(CacheError::CacheMiss) => render_fresh().await,
//!     Err(e) => return Err(e),
//! }
//! ```
//!
//! 재시도는 이 계층에서 수행하지 않습니다. 모든 실패는 해당 호출에만
//! 영향을 주며 즉시 호출자에게 반환됩니다.

use thiserror::Error;

/// 캐시 저장소 에러 타입
#[derive(Error, Debug)]
pub enum CacheError {
    /// 키가 존재하지 않음
    #[error("cache miss")]
    CacheMiss,

    /// 조건부 쓰기(`add`, `replace`)가 거부됨
    #[error("not stored")]
    NotStored,

    /// Redis 클라이언트 에러
    ///
    /// 연결 실패, 타임아웃, 인증 실패 등 원격 저장소에서 발생한 에러를
    /// 그대로 감싸서 전달합니다.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// 값을 바이트로 변환하지 못함
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 저장된 바이트가 요청한 타입의 형태와 맞지 않음
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// 카운터 연산 대상 값이 정수 형태가 아님
    #[error("value for key '{0}' is not an integer")]
    NotInteger(String),

    /// 카운터 연산 결과가 표현 범위를 벗어남
    #[error("counter overflow for key '{0}'")]
    CounterOverflow(String),

    /// 연결 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CacheError {
    /// 키 부재로 인한 에러인지 확인합니다.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::CacheMiss)
    }

    /// 조건부 쓰기 거부로 인한 에러인지 확인합니다.
    pub fn is_not_stored(&self) -> bool {
        matches!(self, CacheError::NotStored)
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type CacheResult<T> = Result<T, CacheError>;
