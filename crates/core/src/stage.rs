//! 스테이지 시스템: 이벤트 변환 단계의 trait과 kind 레지스트리
//!
//! [`Stage`]는 이벤트 헤더를 변환하는 동기 처리 단계입니다.
//! [`StageRegistry`]는 설정의 `kind` 문자열을 생성자 클로저에 매핑하여
//! 설정 로드 시점에 스테이지 인스턴스를 조립합니다. 리플렉션 없이
//! 등록된 생성자만 호출됩니다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StageSpec;
use crate::error::{StageError, StampostError};
use crate::event::LogEvent;
use crate::metrics::{LABEL_KIND, REGISTRY_STAGES_BUILT_TOTAL};

// ─── StageInfo ───────────────────────────────────────────────────────

/// 스테이지 메타데이터
///
/// 인스턴스 이름은 설정에서 오고, kind는 레지스트리 등록 식별자입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageInfo {
    /// 스테이지 인스턴스 이름 (예: `"datacenter-tags"`)
    pub name: String,
    /// 스테이지 종류 식별자 (예: `"static_headers"`)
    pub kind: String,
    /// 스테이지 설명
    pub description: String,
}

// ─── Stage Trait ─────────────────────────────────────────────────────

/// 이벤트 헤더를 변환하는 동기 스테이지 trait
///
/// 적용은 실패 경로가 없으며 호출마다 단일 스레드에서 완료됩니다.
/// 구현체는 생성 이후 내부 상태를 바꾸지 않아야 하고, 그 덕분에 하나의
/// 인스턴스를 여러 스레드가 서로 다른 이벤트에 동시에 적용할 수 있습니다.
///
/// # 구현 예시
/// ```ignore
/// struct Stamp {
///     info: StageInfo,
/// }
///
/// impl Stage for Stamp {
///     fn info(&self) -> &StageInfo { &self.info }
///     fn apply(&self, event: &mut LogEvent) {
///         event.set_header("stamped", "true");
///     }
/// }
/// ```
pub trait Stage: Send + Sync {
    /// 스테이지 메타데이터를 반환합니다.
    fn info(&self) -> &StageInfo;

    /// 이벤트 하나에 스테이지를 적용합니다.
    ///
    /// 헤더 맵만 변경합니다. 본문과 메타데이터는 그대로 통과합니다.
    fn apply(&self, event: &mut LogEvent);

    /// 배치의 모든 이벤트에 입력 순서대로 스테이지를 적용합니다.
    ///
    /// 이벤트를 건너뛰거나 중간에 중단하지 않습니다.
    fn apply_batch(&self, events: &mut [LogEvent]) {
        for event in events.iter_mut() {
            self.apply(event);
        }
    }
}

impl std::fmt::Debug for dyn Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("info", self.info()).finish()
    }
}

// ─── StageConstructor ────────────────────────────────────────────────

/// 스테이지 생성자 클로저
///
/// 레지스트리가 `kind`를 해석한 뒤 [`StageSpec`]을 넘겨 호출합니다.
/// 설정 해석 실패는 여기에서만 발생하며, 조립된 스테이지의 적용은
/// 실패하지 않습니다.
pub type StageConstructor =
    Box<dyn Fn(&StageSpec) -> Result<Box<dyn Stage>, StampostError> + Send + Sync>;

// ─── StageRegistry ───────────────────────────────────────────────────

/// 스테이지 레지스트리
///
/// `kind` 문자열을 생성자에 매핑합니다. 등록 순서가 보존되며,
/// [`build_all`](Self::build_all)은 설정에 선언된 순서대로 스테이지를
/// 조립합니다.
///
/// # 사용 예시
/// ```ignore
/// let mut registry = StageRegistry::new();
/// registry.register("static_headers", constructor)?;
///
/// let stages = registry.build_all(&config.stages)?;
/// ```
pub struct StageRegistry {
    constructors: Vec<(String, StageConstructor)>,
}

impl StageRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            constructors: Vec::new(),
        }
    }

    /// 스테이지 종류를 등록합니다.
    ///
    /// 동일한 kind가 이미 등록되어 있으면 에러를 반환합니다.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        constructor: StageConstructor,
    ) -> Result<(), StampostError> {
        let kind = kind.into();
        if self.contains(&kind) {
            return Err(StageError::AlreadyRegistered { kind }.into());
        }
        debug!(kind = kind.as_str(), "stage kind registered");
        self.constructors.push((kind, constructor));
        Ok(())
    }

    /// 해당 kind가 등록되어 있는지 확인합니다.
    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.iter().any(|(k, _)| k == kind)
    }

    /// 등록된 kind 목록을 등록 순서대로 반환합니다.
    pub fn kinds(&self) -> Vec<&str> {
        self.constructors.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// 등록된 스테이지 종류 수를 반환합니다.
    pub fn count(&self) -> usize {
        self.constructors.len()
    }

    /// 선언 하나를 스테이지 인스턴스로 조립합니다.
    ///
    /// `spec.kind`가 등록되어 있지 않으면 에러를 반환합니다.
    pub fn build(&self, spec: &StageSpec) -> Result<Box<dyn Stage>, StampostError> {
        let constructor = self
            .constructors
            .iter()
            .find(|(k, _)| *k == spec.kind)
            .map(|(_, c)| c)
            .ok_or_else(|| StageError::UnknownKind {
                kind: spec.kind.clone(),
            })?;

        let stage = constructor(spec)?;
        metrics::counter!(REGISTRY_STAGES_BUILT_TOTAL, LABEL_KIND => spec.kind.clone())
            .increment(1);
        debug!(
            kind = spec.kind.as_str(),
            name = spec.display_name(),
            "stage built"
        );
        Ok(stage)
    }

    /// 선언 목록 전체를 선언 순서대로 조립합니다.
    ///
    /// 첫 번째 실패 시 즉시 반환합니다 (fail-fast).
    pub fn build_all(&self, specs: &[StageSpec]) -> Result<Vec<Box<dyn Stage>>, StampostError> {
        let mut stages = Vec::with_capacity(specs.len());
        for spec in specs {
            stages.push(self.build(spec)?);
        }
        Ok(stages)
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
