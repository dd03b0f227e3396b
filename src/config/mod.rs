//! # Configuration Module
//!
//! 캐시 저장소의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`cache_config`] - Redis 연결 옵션, 기본 만료 시간, 실행 환경
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 단일 노드
//! export REDIS_URL="redis://localhost:6379"
//!
//! # 클러스터 (REDIS_URL보다 우선)
//! export REDIS_ADDRS="10.0.0.1:7000,10.0.0.2:7000,10.0.0.3:7000"
//!
//! # 인증 (선택)
//! export REDIS_USERNAME="cache"
//! export REDIS_PASSWORD="secret"
//! export REDIS_DB="0"
//!
//! # 기본 만료 시간 (초, 0 = 만료 없음)
//! export CACHE_DEFAULT_EXPIRATION_SECS="3600"
//!
//! # 프로필 (.env.dev / .env.prod 선택)
//! export PROFILE="dev"
//! ```

pub mod cache_config;

pub use cache_config::*;
