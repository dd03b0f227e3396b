//! # Core Module
//!
//! 저장소 계층 전반에서 공유하는 기반 타입을 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`errors`] - 통합 에러 처리
//! - **CacheError**: 캐시 연산의 공유 에러 어휘
//! - **CacheResult**: 편의성 Result 별칭
//! - **원본 보존**: Redis 클라이언트 에러는 `#[from]`으로 그대로 전달

pub mod errors;

pub use errors::{CacheError, CacheResult};
