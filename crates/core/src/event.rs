//! 이벤트 모델: 파이프라인을 흐르는 로그 이벤트와 공통 메타데이터
//!
//! [`LogEvent`]는 스테이지 사이를 지나는 기본 단위입니다. 본문은 `Bytes`로
//! 그대로 전달되고, 스테이지가 읽고 변경하는 영역은 문자열 헤더 맵뿐입니다.
//! [`EventMetadata`]는 모든 이벤트에 공통으로 포함되는 추적 정보입니다.

use std::collections::HashMap;
use std::fmt;
use std::time::SystemTime;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// 이벤트 메타데이터: 발생 시각, 유입 소스, 분산 추적 ID
///
/// 이벤트가 파이프라인에 들어온 지점과 흐름을 추적하고 디버깅할 수 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// 이벤트 발생 시각
    pub timestamp: SystemTime,
    /// 이벤트 유입 소스 (예: "/var/log/app.log", "syslog:514")
    pub source: String,
    /// 분산 추적 ID, 같은 흐름의 이벤트를 연결합니다
    pub trace_id: String,
}

impl EventMetadata {
    /// 기존 trace_id를 사용하여 새 메타데이터를 생성합니다.
    ///
    /// 이벤트 체인에서 동일한 추적 ID를 유지할 때 사용합니다.
    pub fn new(source: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source: source.into(),
            trace_id: trace_id.into(),
        }
    }

    /// 새로운 UUID v4 trace_id를 생성하여 메타데이터를 만듭니다.
    ///
    /// 새로운 이벤트 체인의 시작점에서 사용합니다.
    pub fn with_new_trace(source: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source: source.into(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl fmt::Display for EventMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] source={} trace={}",
            unix_timestamp_str(self.timestamp),
            self.source,
            self.trace_id,
        )
    }
}

/// 파이프라인을 통과하는 로그 이벤트
///
/// 수집기가 채운 원시 본문과 스테이지가 덧붙이는 헤더 맵을 담습니다.
/// 본문과 메타데이터는 스테이지를 지나도 변하지 않습니다.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// 이벤트 고유 ID
    pub id: String,
    /// 이벤트 메타데이터
    pub metadata: EventMetadata,
    /// 원시 로그 본문
    pub body: Bytes,
    /// 문자열 헤더 맵
    pub headers: HashMap<String, String>,
}

impl LogEvent {
    /// 새로운 trace를 시작하는 로그 이벤트를 생성합니다.
    pub fn new(body: impl Into<Bytes>, source: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::with_new_trace(source),
            body: body.into(),
            headers: HashMap::new(),
        }
    }

    /// 기존 trace에 연결된 로그 이벤트를 생성합니다.
    pub fn with_trace(
        body: impl Into<Bytes>,
        source: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::new(source, trace_id),
            body: body.into(),
            headers: HashMap::new(),
        }
    }

    /// 헤더 하나를 추가한 이벤트를 돌려줍니다. 생성 직후 체이닝에 사용합니다.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// 헤더 값을 조회합니다.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// 헤더를 설정합니다. 같은 키가 있으면 덮어씁니다.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    /// 헤더를 제거하고 있었던 값을 돌려줍니다.
    pub fn remove_header(&mut self, key: &str) -> Option<String> {
        self.headers.remove(key)
    }

    /// 해당 키의 헤더가 존재하는지 확인합니다.
    pub fn contains_header(&self, key: &str) -> bool {
        self.headers.contains_key(key)
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LogEvent[{}] source={} bytes={} headers={}",
            &self.id[..8.min(self.id.len())],
            self.metadata.source,
            self.body.len(),
            self.headers.len(),
        )
    }
}

/// SystemTime을 사람이 읽을 수 있는 형태로 변환합니다.
fn unix_timestamp_str(time: SystemTime) -> String {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(duration) => {
            let secs = duration.as_secs();
            format!("{secs}")
        }
        Err(_) => "unknown".to_owned(),
    }
}
