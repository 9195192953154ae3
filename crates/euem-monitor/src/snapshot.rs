//! 스냅샷 재생 어댑터.
//!
//! JSON 파일에 저장된 WMI 결과 행과 세션 GUID 매핑을 라이브 제공자 대신 사용한다.
//! WMI 어댑터와 같은 포트를 구현하므로 수집/병합/출력 단계는 그대로 실행된다.
//!
//! ```json
//! {
//!   "rows": [ { "SessionID": { "type": "I4", "value": 5 } } ],
//!   "session_guids": { "5": "GUID-ABC" }
//! }
//! ```
//!
//! 열린 핸들 수를 세므로 세션/결과 집합/항목 해제를 테스트에서 검증할 수 있다.

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use euem_core::error::CoreError;
use euem_core::models::endpoint_metric::PROPERTY_NAMES;
use euem_core::models::session_guid::SessionGuidMap;
use euem_core::models::variant::Variant;
use euem_core::ports::instrumentation::{
    InstrumentationProvider, InstrumentationSession, QueryResultSet, ResultItem,
};
use euem_core::ports::session_guid_source::SessionGuidSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 결과 행 하나 (속성 이름 → 값)
pub type SnapshotRow = HashMap<String, Variant>;

/// 스냅샷 파일 내용
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// 결과 행 (파일 순서 = 열거 순서)
    #[serde(default)]
    pub rows: Vec<SnapshotRow>,
    /// SessionID → SessionGUID
    #[serde(default)]
    pub session_guids: SessionGuidMap,
}

impl Snapshot {
    /// JSON 파일에서 로드
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("스냅샷 파일 읽기 실패: {}: {}", path.display(), e))
        })?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        for name in snapshot.unknown_properties() {
            warn!("스냅샷에 알 수 없는 속성: {name}");
        }
        info!(
            "스냅샷 로드: {} ({}행, GUID {}개)",
            path.display(),
            snapshot.rows.len(),
            snapshot.session_guids.len()
        );
        Ok(snapshot)
    }

    /// WMI 클래스에 없는 속성 이름 (중복 제거, 정렬)
    pub fn unknown_properties(&self) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .rows
            .iter()
            .flat_map(|row| row.keys())
            .filter(|name| !PROPERTY_NAMES.contains(&name.as_str()))
            .cloned()
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }

    /// 제공자와 GUID 소스로 분리
    pub fn into_parts(self) -> (SnapshotProvider, StaticGuidSource) {
        (
            SnapshotProvider::new(self.rows),
            StaticGuidSource::new(self.session_guids),
        )
    }
}

/// 실패 주입 지점
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    /// 네임스페이스 연결
    Connect,
    /// 쿼리 실행
    Query,
    /// 결과 개수 조회
    Count,
    /// 지정 인덱스 항목 조회
    Item(usize),
}

/// 메모리 상의 행을 돌려주는 계측 제공자
#[derive(Debug, Default)]
pub struct SnapshotProvider {
    rows: Vec<SnapshotRow>,
    failure: Option<FailurePoint>,
    open_handles: Rc<Cell<usize>>,
}

impl SnapshotProvider {
    /// 새 제공자 생성
    pub fn new(rows: Vec<SnapshotRow>) -> Self {
        Self {
            rows,
            failure: None,
            open_handles: Rc::new(Cell::new(0)),
        }
    }

    /// 지정 지점에서 실패하도록 설정
    pub fn with_failure(mut self, failure: FailurePoint) -> Self {
        self.failure = Some(failure);
        self
    }

    /// 현재 열려 있는 세션/결과 집합/항목 핸들 수
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }

    fn fails_at(&self, point: FailurePoint) -> bool {
        self.failure == Some(point)
    }
}

impl InstrumentationProvider for SnapshotProvider {
    fn connect(
        &self,
        namespace: &str,
    ) -> Result<Box<dyn InstrumentationSession + '_>, CoreError> {
        if self.fails_at(FailurePoint::Connect) {
            return Err(CoreError::Connection(format!(
                "스냅샷 연결 실패 주입: {namespace}"
            )));
        }
        debug!("스냅샷 세션 열기: {namespace}");
        Ok(Box::new(SnapshotSession {
            provider: self,
            _handle: HandleGuard::acquire(&self.open_handles),
        }))
    }
}

/// 열린 핸들 카운터 — 생성 시 증가, `Drop` 시 감소
#[derive(Debug)]
struct HandleGuard(Rc<Cell<usize>>);

impl HandleGuard {
    fn acquire(counter: &Rc<Cell<usize>>) -> Self {
        counter.set(counter.get() + 1);
        Self(Rc::clone(counter))
    }
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

struct SnapshotSession<'p> {
    provider: &'p SnapshotProvider,
    _handle: HandleGuard,
}

impl InstrumentationSession for SnapshotSession<'_> {
    fn exec_query(&self, query: &str) -> Result<Box<dyn QueryResultSet + '_>, CoreError> {
        if self.provider.fails_at(FailurePoint::Query) {
            return Err(CoreError::Query(format!("스냅샷 쿼리 실패 주입: {query}")));
        }
        debug!("스냅샷 쿼리: {query}");
        Ok(Box::new(SnapshotResultSet {
            provider: self.provider,
            _handle: HandleGuard::acquire(&self.provider.open_handles),
        }))
    }
}

struct SnapshotResultSet<'p> {
    provider: &'p SnapshotProvider,
    _handle: HandleGuard,
}

impl QueryResultSet for SnapshotResultSet<'_> {
    fn count(&self) -> Result<usize, CoreError> {
        if self.provider.fails_at(FailurePoint::Count) {
            return Err(CoreError::Query("스냅샷 결과 개수 조회 실패 주입".to_string()));
        }
        Ok(self.provider.rows.len())
    }

    fn item(&self, index: usize) -> Result<Box<dyn ResultItem + '_>, CoreError> {
        if self.provider.fails_at(FailurePoint::Item(index)) {
            return Err(CoreError::ItemFetch {
                index,
                message: "스냅샷 항목 조회 실패 주입".to_string(),
            });
        }
        let row = self
            .provider
            .rows
            .get(index)
            .ok_or_else(|| CoreError::ItemFetch {
                index,
                message: format!("범위 초과 (행 {}개)", self.provider.rows.len()),
            })?;
        Ok(Box::new(SnapshotItem {
            row,
            _handle: HandleGuard::acquire(&self.provider.open_handles),
        }))
    }
}

struct SnapshotItem<'p> {
    row: &'p SnapshotRow,
    _handle: HandleGuard,
}

impl ResultItem for SnapshotItem<'_> {
    fn property(&self, name: &str) -> Result<Variant, CoreError> {
        self.row.get(name).cloned().ok_or_else(|| CoreError::Field {
            name: name.to_string(),
            message: "속성 없음".to_string(),
        })
    }
}

/// 고정 매핑을 돌려주는 세션 GUID 소스
#[derive(Debug, Clone, Default)]
pub struct StaticGuidSource {
    guids: SessionGuidMap,
}

impl StaticGuidSource {
    /// 새 소스 생성
    pub fn new(guids: SessionGuidMap) -> Self {
        Self { guids }
    }

    /// 빈 매핑 (GUID 조회 비활성화)
    pub fn empty() -> Self {
        Self::default()
    }
}

impl SessionGuidSource for StaticGuidSource {
    fn load_session_guids(&self) -> Result<SessionGuidMap, CoreError> {
        Ok(self.guids.clone())
    }
}
