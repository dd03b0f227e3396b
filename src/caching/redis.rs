//! # Redis 백엔드 구현
//!
//! 이 모듈은 Redis를 원격 저장소로 사용하는 [`KeyValueBackend`] 구현을 제공합니다.
//!
//! ## 연결 관리
//!
//! - **단일 노드**: `ConnectionManager`가 멀티플렉싱된 연결을 유지하며
//!   연결이 끊어지면 자동으로 재연결합니다.
//! - **클러스터**: 주소가 두 개 이상이면 비동기 클러스터 연결을 사용하며,
//!   키 슬롯 라우팅은 클라이언트가 처리합니다.
//!
//! 두 연결 모두 [`UniversalConnection`]으로 감싸서 동일한 명령 코드를 사용합니다.
//! 타임아웃과 재시도 정책은 하위 클라이언트 설정에 위임합니다.

use std::time::Duration;

use async_trait::async_trait;
use log::info;
use redis::aio::{ConnectionLike, ConnectionManager};
use redis::cluster::ClusterClient;
use redis::cluster_async::ClusterConnection;
use redis::{AsyncCommands, Client, Cmd, Pipeline, RedisFuture, Value};

use super::backend::{KeyValueBackend, parse_int};
use crate::config::ClientOptions;
use crate::core::errors::CacheResult;

/// 단일 노드/클러스터 연결 래퍼
///
/// 두 연결 모두 복제 비용이 낮으며, 복제본은 같은 하위 연결을 공유합니다.
#[derive(Clone)]
pub enum UniversalConnection {
    /// 단일 노드 연결 (자동 재연결)
    Single(ConnectionManager),
    /// 클러스터 연결
    Cluster(ClusterConnection),
}

impl UniversalConnection {
    /// 연결 옵션으로부터 연결을 생성합니다.
    ///
    /// 주소가 두 개 이상이면 클러스터 연결을, 그렇지 않으면 단일 노드 연결을
    /// 생성합니다. 이 단계에서는 PING을 수행하지 않습니다.
    pub async fn open(options: &ClientOptions) -> CacheResult<Self> {
        let urls = options.connection_urls()?;

        if options.is_cluster() {
            let client = ClusterClient::new(urls)?;
            let conn = client.get_async_connection().await?;
            Ok(UniversalConnection::Cluster(conn))
        } else {
            let client = Client::open(urls[0].as_str())?;
            let conn = ConnectionManager::new(client).await?;
            Ok(UniversalConnection::Single(conn))
        }
    }
}

impl ConnectionLike for UniversalConnection {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        match self {
            UniversalConnection::Single(conn) => conn.req_packed_command(cmd),
            UniversalConnection::Cluster(conn) => conn.req_packed_command(cmd),
        }
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        cmd: &'a Pipeline,
        offset: usize,
        count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        match self {
            UniversalConnection::Single(conn) => conn.req_packed_commands(cmd, offset, count),
            UniversalConnection::Cluster(conn) => conn.req_packed_commands(cmd, offset, count),
        }
    }

    fn get_db(&self) -> i64 {
        match self {
            UniversalConnection::Single(conn) => conn.get_db(),
            UniversalConnection::Cluster(conn) => conn.get_db(),
        }
    }
}

/// Redis 키-값 백엔드
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let options = ClientOptions::from_env()?;
/// let backend = RedisBackend::connect(&options).await?;
/// backend.set("greeting", b"\"hello\"", Some(Duration::from_secs(60))).await?;
/// ```
#[derive(Clone)]
pub struct RedisBackend {
    conn: UniversalConnection,
}

impl RedisBackend {
    /// 연결 옵션으로 클라이언트를 생성하고 PING으로 가용성을 확인합니다.
    ///
    /// ## 에러 케이스
    ///
    /// - 잘못된 주소/URL 형식
    /// - Redis 서버에 연결할 수 없는 경우
    /// - 인증 실패
    pub async fn connect(options: &ClientOptions) -> CacheResult<Self> {
        let conn = UniversalConnection::open(options).await?;
        let backend = Self::from_connection(conn);

        // 연결 테스트 - PING 명령으로 서버 가용성 확인
        backend.ping().await?;

        info!(
            "✅ Redis 연결 성공 ({}, {} node(s))",
            if options.is_cluster() { "cluster" } else { "single" },
            options.addrs.len()
        );
        Ok(backend)
    }

    /// 이미 생성된 연결을 감쌉니다. 연결 확인은 수행하지 않습니다.
    pub fn from_connection(conn: UniversalConnection) -> Self {
        Self { conn }
    }

    fn connection(&self) -> UniversalConnection {
        self.conn.clone()
    }
}

/// TTL을 `PX` 인자용 밀리초로 변환합니다. 1ms 미만은 1ms로 올립니다.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

fn set_command(key: &str, value: &[u8], ttl: Option<Duration>) -> Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key).arg(value);
    if let Some(ttl) = ttl {
        cmd.arg("PX").arg(ttl_millis(ttl));
    }
    cmd
}

#[async_trait]
impl KeyValueBackend for RedisBackend {
    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.connection();
        redis::cmd("PING").query_async::<()>(&mut conn).await?;
        Ok(())
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        let mut conn = self.connection();
        set_command(key, value, ttl).query_async::<()>(&mut conn).await?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<bool> {
        let mut conn = self.connection();
        let mut cmd = set_command(key, value, ttl);
        cmd.arg("NX");

        // 키가 이미 존재하면 Nil 응답
        let reply: Value = cmd.query_async(&mut conn).await?;
        Ok(!matches!(reply, Value::Nil))
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.connection();
        let found: bool = conn.exists(key).await?;
        Ok(found)
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.connection();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> CacheResult<u64> {
        let mut conn = self.connection();
        let removed: u64 = conn.del(key).await?;
        Ok(removed)
    }

    async fn get_int(&self, key: &str) -> CacheResult<Option<i64>> {
        match self.get(key).await? {
            Some(bytes) => parse_int(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn decr_by(&self, key: &str, delta: i64) -> CacheResult<i64> {
        let mut conn = self.connection();
        let value: i64 = conn.decr(key, delta).await?;
        Ok(value)
    }

    async fn flush_all(&self) -> CacheResult<()> {
        let mut conn = self.connection();
        redis::cmd("FLUSHALL").query_async::<()>(&mut conn).await?;
        Ok(())
    }
}
