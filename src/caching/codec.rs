//! 값 직렬화 계층
//!
//! 저장소에 기록되는 바이트 형식은 어댑터와 무관하며, [`Codec`] 구현으로
//! 교체할 수 있습니다.

use serde::{Serialize, de::DeserializeOwned};

use crate::core::errors::{CacheError, CacheResult};

/// 값 ↔ 바이트 변환기
pub trait Codec: Send + Sync {
    /// 값을 바이트로 직렬화합니다.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CacheResult<Vec<u8>>;

    /// 바이트를 값으로 역직렬화합니다.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CacheResult<T>;
}

/// JSON 기반 코덱 (serde_json)
///
/// 정수는 십진수 텍스트(`42`)로 기록되므로 `set`으로 저장한 카운터를
/// Redis의 `DECRBY`와 `increment`가 그대로 다룰 수 있습니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CacheResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CacheResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}
