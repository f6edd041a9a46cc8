//! 정적 헤더 주입 스테이지
//!
//! [`HeaderEnricher`]는 설정에서 파싱한 정적 헤더 맵을 이벤트 헤더에
//! 병합합니다. preserve 모드는 이벤트에 이미 있는 키를 건너뛰고,
//! overwrite 모드는 무조건 덮어씁니다.
//!
//! 설정 검증과 key-value 파싱은 생성 시점에 한 번만 일어나며,
//! 조립된 스테이지의 적용은 실패하지 않습니다.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, warn};

use stampost_core::config::StageSpec;
use stampost_core::error::{StageError, StampostError};
use stampost_core::event::LogEvent;
use stampost_core::metrics::{
    ENRICHER_BATCH_DURATION_SECONDS, ENRICHER_EVENTS_TOTAL, ENRICHER_HEADERS_APPLIED_TOTAL,
    ENRICHER_HEADERS_PRESERVED_TOTAL, LABEL_STAGE,
};
use stampost_core::stage::{Stage, StageInfo, StageRegistry};

use crate::config::EnricherConfig;
use crate::keyval::{KeyValueSpec, StaticHeaderMap};

/// 레지스트리에 등록되는 스테이지 종류 식별자
pub const STATIC_HEADERS_KIND: &str = "static_headers";

// ─── HeaderEnricher ──────────────────────────────────────────────────

/// 정적 헤더 주입 스테이지
///
/// 생성 이후 내부 상태가 바뀌지 않으므로 하나의 인스턴스를 여러
/// 스레드가 서로 다른 이벤트에 동시에 적용할 수 있습니다.
///
/// # 사용 예시
/// ```
/// use stampost_enricher::{EnricherConfig, HeaderEnricher};
///
/// let config = EnricherConfig {
///     key_values: "dc:ap-east env:prod".to_owned(),
///     ..Default::default()
/// };
/// let enricher = HeaderEnricher::from_config("datacenter-tags", &config).unwrap();
/// assert_eq!(enricher.header_count(), 2);
/// ```
#[derive(Debug)]
pub struct HeaderEnricher {
    /// 스테이지 메타데이터
    info: StageInfo,
    /// 설정에서 파싱한 정적 헤더
    headers: StaticHeaderMap,
    /// 기존 헤더 보존 여부
    preserve_existing: bool,
}

impl HeaderEnricher {
    /// 이미 파싱된 정적 헤더 맵으로 스테이지를 직접 생성합니다.
    ///
    /// 파싱을 호스트 쪽에서 따로 수행한 임베딩 경로용이며 실패하지
    /// 않습니다. 인스턴스 이름은 kind 기본값을 사용합니다.
    pub fn new(headers: StaticHeaderMap, preserve_existing: bool) -> Self {
        Self {
            info: StageInfo {
                name: STATIC_HEADERS_KIND.to_owned(),
                kind: STATIC_HEADERS_KIND.to_owned(),
                description: "injects a fixed header set into event headers".to_owned(),
            },
            headers,
            preserve_existing,
        }
    }

    /// 설정으로 스테이지를 생성합니다.
    ///
    /// 설정 검증과 key-value 파싱이 여기에서 일어납니다. 버려진 토큰은
    /// 경고 로그로 남지만 생성 자체는 실패하지 않습니다. 생성이
    /// 실패하는 경우는 설정 검증(빈 구분자)뿐입니다.
    pub fn from_config(
        name: impl Into<String>,
        config: &EnricherConfig,
    ) -> Result<Self, StampostError> {
        config.validate()?;

        let name = name.into();
        let outcome = KeyValueSpec::new(config.key_values.as_str(), config.separator.as_str())
            .parse();

        for warning in &outcome.warnings {
            warn!(stage = name.as_str(), "discarded key-value token: {}", warning);
        }
        debug!(
            stage = name.as_str(),
            headers = outcome.headers.len(),
            dropped = outcome.warnings.len(),
            preserve_existing = config.preserve_existing,
            "header enricher built"
        );

        Ok(Self {
            info: StageInfo {
                name,
                kind: STATIC_HEADERS_KIND.to_owned(),
                description: "injects a fixed header set into event headers".to_owned(),
            },
            headers: outcome.headers,
            preserve_existing: config.preserve_existing,
        })
    }

    /// 파싱된 정적 헤더 수를 반환합니다.
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// 기존 헤더 보존 여부를 반환합니다.
    pub fn preserves_existing(&self) -> bool {
        self.preserve_existing
    }

    /// 헤더 맵 하나에 정적 헤더를 병합합니다.
    ///
    /// 호출자는 맵에 대한 배타적 가변 접근을 보장해야 합니다.
    /// preserve 모드에서 이미 있는 키는 건너뛰고, overwrite 모드에서는
    /// 모든 정적 헤더를 무조건 기록합니다.
    pub fn enrich_one(&self, headers: &mut HashMap<String, String>) {
        let mut applied = 0u64;
        let mut preserved = 0u64;

        for (key, value) in self.headers.iter() {
            if self.preserve_existing && headers.contains_key(key) {
                preserved += 1;
                continue;
            }
            headers.insert(key.to_owned(), value.to_owned());
            applied += 1;
        }

        if applied > 0 {
            metrics::counter!(
                ENRICHER_HEADERS_APPLIED_TOTAL,
                LABEL_STAGE => self.info.name.clone()
            )
            .increment(applied);
        }
        if preserved > 0 {
            metrics::counter!(
                ENRICHER_HEADERS_PRESERVED_TOTAL,
                LABEL_STAGE => self.info.name.clone()
            )
            .increment(preserved);
        }
    }

    /// 배치의 모든 이벤트에 입력 순서대로 정적 헤더를 병합합니다.
    ///
    /// 이벤트를 건너뛰거나 중간에 중단하지 않습니다.
    pub fn enrich_batch(&self, events: &mut [LogEvent]) {
        let started = Instant::now();

        for event in events.iter_mut() {
            self.enrich_one(&mut event.headers);
        }

        metrics::counter!(ENRICHER_EVENTS_TOTAL, LABEL_STAGE => self.info.name.clone())
            .increment(events.len() as u64);
        metrics::histogram!(
            ENRICHER_BATCH_DURATION_SECONDS,
            LABEL_STAGE => self.info.name.clone()
        )
        .record(started.elapsed().as_secs_f64());

        debug!(
            stage = self.info.name.as_str(),
            events = events.len(),
            "enriched batch"
        );
    }
}

impl Stage for HeaderEnricher {
    fn info(&self) -> &StageInfo {
        &self.info
    }

    fn apply(&self, event: &mut LogEvent) {
        self.enrich_one(&mut event.headers);
    }

    fn apply_batch(&self, events: &mut [LogEvent]) {
        self.enrich_batch(events);
    }
}

// ─── HeaderEnricherBuilder ───────────────────────────────────────────

/// 헤더 주입 스테이지 빌더
///
/// # 사용 예시
/// ```
/// use stampost_enricher::HeaderEnricherBuilder;
///
/// let enricher = HeaderEnricherBuilder::new()
///     .name("datacenter-tags")
///     .key_values("dc:ap-east")
///     .preserve_existing(false)
///     .build()
///     .unwrap();
/// assert!(!enricher.preserves_existing());
/// ```
pub struct HeaderEnricherBuilder {
    name: String,
    config: EnricherConfig,
}

impl HeaderEnricherBuilder {
    /// 새 빌더를 생성합니다. 이름 기본값은 kind입니다.
    pub fn new() -> Self {
        Self {
            name: STATIC_HEADERS_KIND.to_owned(),
            config: EnricherConfig::default(),
        }
    }

    /// 스테이지 인스턴스 이름을 설정합니다.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 설정 전체를 교체합니다.
    pub fn config(mut self, config: EnricherConfig) -> Self {
        self.config = config;
        self
    }

    /// key-value 토큰 문자열을 설정합니다.
    pub fn key_values(mut self, raw: impl Into<String>) -> Self {
        self.config.key_values = raw.into();
        self
    }

    /// 구분자를 설정합니다.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.config.separator = separator.into();
        self
    }

    /// 기존 헤더 보존 여부를 설정합니다.
    pub fn preserve_existing(mut self, preserve: bool) -> Self {
        self.config.preserve_existing = preserve;
        self
    }

    /// 설정을 검증하고 스테이지를 생성합니다.
    pub fn build(self) -> Result<HeaderEnricher, StampostError> {
        HeaderEnricher::from_config(self.name, &self.config)
    }
}

impl Default for HeaderEnricherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Registry 연동 ───────────────────────────────────────────────────

/// 이 크레이트가 제공하는 스테이지 종류를 레지스트리에 등록합니다.
///
/// `static_headers` kind는 `[[stages]]` 블록의 설정을
/// [`EnricherConfig`]로 해석하여 [`HeaderEnricher`]를 조립합니다.
pub fn register_defaults(registry: &mut StageRegistry) -> Result<(), StampostError> {
    registry.register(
        STATIC_HEADERS_KIND,
        Box::new(|spec: &StageSpec| -> Result<Box<dyn Stage>, StampostError> {
            let config: EnricherConfig = toml::Value::Table(spec.settings.clone())
                .try_into()
                .map_err(|e: toml::de::Error| StageError::InvalidSettings {
                    kind: STATIC_HEADERS_KIND.to_owned(),
                    reason: e.to_string(),
                })?;
            let stage = HeaderEnricher::from_config(spec.display_name(), &config)?;
            Ok(Box::new(stage))
        }),
    )
}

// ─── Tests ───────────────────────────────────────────────────────────
