//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다. 익스포터 연결은
//! 호스트 프로세스의 몫입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `stampost_`
//! - 모듈명: `keyval_`, `enricher_`, `registry_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(stampost_core::metrics::KEYVAL_TOKENS_PARSED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 스테이지 인스턴스 이름 레이블 키
pub const LABEL_STAGE: &str = "stage";

/// 토큰 드롭 사유 레이블 키 (missing_separator, empty_key)
pub const LABEL_REASON: &str = "reason";

/// 스테이지 종류 레이블 키
pub const LABEL_KIND: &str = "kind";

// ─── Key/Value Parser 메트릭 ───────────────────────────────────────

/// Keyval: 맵에 수용된 토큰 수 (counter)
pub const KEYVAL_TOKENS_PARSED_TOTAL: &str = "stampost_keyval_tokens_parsed_total";

/// Keyval: 드롭된 토큰 수 (counter, label: reason)
pub const KEYVAL_TOKENS_DROPPED_TOTAL: &str = "stampost_keyval_tokens_dropped_total";

// ─── Enricher 메트릭 ────────────────────────────────────────────────

/// Enricher: 처리된 이벤트 수 (counter, label: stage)
pub const ENRICHER_EVENTS_TOTAL: &str = "stampost_enricher_events_total";

/// Enricher: 기록된 헤더 수 (counter, label: stage)
pub const ENRICHER_HEADERS_APPLIED_TOTAL: &str = "stampost_enricher_headers_applied_total";

/// Enricher: 보존되어 건너뛴 헤더 수 (counter, label: stage)
pub const ENRICHER_HEADERS_PRESERVED_TOTAL: &str = "stampost_enricher_headers_preserved_total";

/// Enricher: 배치 처리 지연 시간 (histogram, 초)
pub const ENRICHER_BATCH_DURATION_SECONDS: &str = "stampost_enricher_batch_duration_seconds";

// ─── Registry 메트릭 ────────────────────────────────────────────────

/// Registry: 조립된 스테이지 수 (counter, label: kind)
pub const REGISTRY_STAGES_BUILT_TOTAL: &str = "stampost_registry_stages_built_total";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 배치 처리 지연 시간 히스토그램 버킷 (초)
///
/// 1us ~ 100ms 범위, 헤더 스탬핑은 메모리 연산만 수행
pub const ENRICH_DURATION_BUCKETS: [f64; 9] = [
    0.000001, 0.000005, 0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.01, 0.1,
];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// `metrics::describe_counter!()`, `describe_histogram!()`을 호출하여
/// HELP 텍스트를 설정합니다.
///
/// 이 함수는 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    // Key/Value Parser
    describe_counter!(
        KEYVAL_TOKENS_PARSED_TOTAL,
        "Total number of key/value tokens accepted into static header maps"
    );
    describe_counter!(
        KEYVAL_TOKENS_DROPPED_TOTAL,
        "Total number of key/value tokens dropped (by reason)"
    );

    // Enricher
    describe_counter!(
        ENRICHER_EVENTS_TOTAL,
        "Total number of events passed through header enrichment"
    );
    describe_counter!(
        ENRICHER_HEADERS_APPLIED_TOTAL,
        "Total number of static headers written onto events"
    );
    describe_counter!(
        ENRICHER_HEADERS_PRESERVED_TOTAL,
        "Total number of header writes skipped because the key already existed"
    );
    describe_histogram!(
        ENRICHER_BATCH_DURATION_SECONDS,
        "Time to enrich a single event batch in seconds"
    );

    // Registry
    describe_counter!(
        REGISTRY_STAGES_BUILT_TOTAL,
        "Total number of stages assembled from configuration (by kind)"
    );
}
