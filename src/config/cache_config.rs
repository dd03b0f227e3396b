//! Redis 연결 및 캐시 설정 관리 모듈
//!
//! 연결 대상 주소, 인증 정보, 클러스터 구성과 기본 만료 시간을 관리합니다.

use std::env;
use std::time::Duration;

use crate::core::errors::{CacheError, CacheResult};

/// 기본 Redis 주소
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// 기본 만료 시간 (초)
pub const DEFAULT_EXPIRATION_SECS: u64 = 3600;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경
    Development,
    /// 테스트 환경
    Test,
    /// 스테이징 환경
    Staging,
    /// 프로덕션 환경
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `PROFILE` 환경 변수를 확인하며, 설정되지 않은 경우
    /// `Development`를 기본값으로 사용합니다.
    pub fn current() -> Self {
        Self::from_str(&env::var("PROFILE").unwrap_or_else(|_| "dev".to_string()))
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 환경별 dotenv 파일 이름을 반환합니다.
    pub fn env_file(&self) -> &'static str {
        match self {
            Environment::Development => ".env.dev",
            Environment::Test => ".env.test",
            Environment::Staging => ".env.staging",
            Environment::Production => ".env.prod",
        }
    }
}

/// Redis 클라이언트 연결 옵션
///
/// 단일 노드와 클러스터 구성을 하나의 옵션으로 표현합니다.
/// `addrs`에 주소가 두 개 이상이면 클러스터 모드로 연결합니다.
///
/// ## 주소 형식
///
/// ```text
/// localhost:6379                 # host:port
/// redis://10.0.0.5:6379          # 스킴 포함 (그대로 사용)
/// rediss://cache.internal:6380   # TLS
/// ```
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let options = ClientOptions {
///     addrs: vec!["10.0.0.1:7000".into(), "10.0.0.2:7000".into()],
///     password: Some("secret".into()),
///     ..ClientOptions::default()
/// };
/// assert!(options.is_cluster());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// 연결 대상 주소 목록
    pub addrs: Vec<String>,
    /// ACL 사용자 이름
    pub username: Option<String>,
    /// 비밀번호
    pub password: Option<String>,
    /// 데이터베이스 번호 (클러스터 모드에서는 무시)
    pub db: i64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            addrs: vec![DEFAULT_REDIS_URL.to_string()],
            username: None,
            password: None,
            db: 0,
        }
    }
}

impl ClientOptions {
    /// 환경 변수에서 연결 옵션을 읽어옵니다.
    ///
    /// ## 환경 변수
    ///
    /// ```bash
    /// REDIS_ADDRS=10.0.0.1:7000,10.0.0.2:7000  # 클러스터 (우선)
    /// REDIS_URL=redis://localhost:6379         # 단일 노드 (기본값)
    /// REDIS_USERNAME=cache
    /// REDIS_PASSWORD=secret
    /// REDIS_DB=0
    /// ```
    pub fn from_env() -> CacheResult<Self> {
        let addrs = match env::var("REDIS_ADDRS") {
            Ok(list) => Self::parse_addrs(&list),
            Err(_) => vec![env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string())],
        };

        let db = match env::var("REDIS_DB") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|e| CacheError::Config(format!("REDIS_DB '{}': {}", raw, e)))?,
            Err(_) => 0,
        };

        let options = Self {
            addrs,
            username: env::var("REDIS_USERNAME").ok().filter(|s| !s.is_empty()),
            password: env::var("REDIS_PASSWORD").ok().filter(|s| !s.is_empty()),
            db,
        };
        options.validate()?;
        Ok(options)
    }

    /// 쉼표로 구분된 주소 목록을 파싱합니다.
    pub fn parse_addrs(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// 옵션의 유효성을 검사합니다.
    pub fn validate(&self) -> CacheResult<()> {
        if self.addrs.is_empty() {
            return Err(CacheError::Config("at least one Redis address is required".to_string()));
        }
        if self.db < 0 {
            return Err(CacheError::Config(format!("invalid database index {}", self.db)));
        }
        Ok(())
    }

    /// 클러스터 모드 여부
    pub fn is_cluster(&self) -> bool {
        self.addrs.len() > 1
    }

    /// 각 주소에 대한 연결 URL을 생성합니다.
    ///
    /// 스킴이 없는 주소에는 `redis://`를 붙이고, 인증 정보는 퍼센트 인코딩하여
    /// 삽입합니다. 이미 인증 정보가 포함된 URL은 그대로 사용합니다.
    /// 단일 노드 모드에서만 데이터베이스 번호를 경로로 추가합니다.
    pub fn connection_urls(&self) -> CacheResult<Vec<String>> {
        self.validate()?;
        let cluster = self.is_cluster();
        Ok(self
            .addrs
            .iter()
            .map(|addr| self.connection_url(addr, cluster))
            .collect())
    }

    fn connection_url(&self, addr: &str, cluster: bool) -> String {
        let (scheme, rest) = match addr.split_once("://") {
            Some((scheme, rest)) => (scheme, rest),
            None => ("redis", addr),
        };

        if rest.contains('@') {
            return format!("{}://{}", scheme, rest);
        }

        let (host, path) = match rest.split_once('/') {
            Some((host, path)) => (host, Some(path)),
            None => (rest, None),
        };

        let credentials = match (&self.username, &self.password) {
            (Some(user), Some(pass)) => format!(
                "{}:{}@",
                urlencoding::encode(user),
                urlencoding::encode(pass)
            ),
            (Some(user), None) => format!("{}@", urlencoding::encode(user)),
            (None, Some(pass)) => format!(":{}@", urlencoding::encode(pass)),
            (None, None) => String::new(),
        };

        match path {
            Some(path) if !path.is_empty() => format!("{}://{}{}/{}", scheme, credentials, host, path),
            _ if !cluster && self.db != 0 => format!("{}://{}{}/{}", scheme, credentials, host, self.db),
            _ => format!("{}://{}{}", scheme, credentials, host),
        }
    }
}

/// 캐시 동작 설정
pub struct CacheConfig;

impl CacheConfig {
    /// 기본 만료 시간을 반환합니다.
    ///
    /// `CACHE_DEFAULT_EXPIRATION_SECS` 환경 변수를 읽으며,
    /// 파싱에 실패하면 기본값 3600초를 사용합니다. 0은 만료 없음을 의미합니다.
    pub fn default_expiration() -> Duration {
        let secs = env::var("CACHE_DEFAULT_EXPIRATION_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_EXPIRATION_SECS);
        Duration::from_secs(secs)
    }
}
