//! 인메모리 키-값 백엔드
//!
//! Redis 없이 [`KeyValueBackend`]를 대체하는 프로세스 로컬 구현입니다.
//! 주로 테스트에서 사용되며, 만료된 항목은 접근 시점에 제거됩니다.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::backend::{KeyValueBackend, parse_int};
use crate::core::errors::{CacheError, CacheResult};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: &[u8], ttl: Option<Duration>) -> Self {
        Self {
            value: value.to_vec(),
            expires_at: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// 인메모리 백엔드
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 만료되지 않은 키의 개수
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock().values().filter(|e| !e.is_expired(now)).count()
    }

    /// 저장소가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 키의 남은 만료 시간. 키가 없거나 만료가 없으면 `None`.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.live_entry(&mut self.lock(), key, now)
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // 잠금 중 패닉이 나도 맵 자체는 일관된 상태
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn live_entry<'a>(
        &self,
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
        now: Instant,
    ) -> Option<&'a mut Entry> {
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.lock().insert(key.to_string(), Entry::new(value, ttl));
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<bool> {
        let mut entries = self.lock();
        if self.live_entry(&mut entries, key, Instant::now()).is_some() {
            return Ok(false);
        }
        entries.insert(key.to_string(), Entry::new(value, ttl));
        Ok(true)
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.live_entry(&mut self.lock(), key, Instant::now()).is_some())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self
            .live_entry(&mut self.lock(), key, Instant::now())
            .map(|e| e.value.clone()))
    }

    async fn delete(&self, key: &str) -> CacheResult<u64> {
        let mut entries = self.lock();
        let removed = self.live_entry(&mut entries, key, Instant::now()).is_some();
        entries.remove(key);
        Ok(u64::from(removed))
    }

    async fn get_int(&self, key: &str) -> CacheResult<Option<i64>> {
        match self.live_entry(&mut self.lock(), key, Instant::now()) {
            Some(entry) => parse_int(key, &entry.value).map(Some),
            None => Ok(None),
        }
    }

    async fn decr_by(&self, key: &str, delta: i64) -> CacheResult<i64> {
        let mut entries = self.lock();
        let now = Instant::now();

        // Redis DECRBY와 동일하게 없는 키는 0에서 시작하고 TTL은 유지
        let current = match self.live_entry(&mut entries, key, now) {
            Some(entry) => parse_int(key, &entry.value)?,
            None => 0,
        };
        let next = current
            .checked_sub(delta)
            .ok_or_else(|| CacheError::CounterOverflow(key.to_string()))?;

        let bytes = next.to_string().into_bytes();
        entries
            .entry(key.to_string())
            .and_modify(|entry| entry.value = bytes.clone())
            .or_insert_with(|| Entry::new(&bytes, None));
        Ok(next)
    }

    async fn flush_all(&self) -> CacheResult<()> {
        self.lock().clear();
        Ok(())
    }
}
