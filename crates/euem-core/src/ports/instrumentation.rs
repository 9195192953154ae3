//! 관리 계측(WMI) 조회 포트.
//!
//! 구현: `euem-monitor` crate (`wmi` 기반 Windows 어댑터, 스냅샷 재생 어댑터)
//!
//! 핸들 수명은 빌림으로 묶인다. 항목은 결과 집합을, 결과 집합은 세션을 빌리므로
//! 항목 → 결과 집합 → 세션 순서로 해제되며, 에러로 조기 반환해도 `Drop`이 실행된다.

use crate::error::CoreError;
use crate::models::variant::Variant;

/// 계측 제공자 — 네임스페이스 세션을 연다
pub trait InstrumentationProvider {
    /// 네임스페이스에 연결
    ///
    /// 실패 시 `CoreError::Connection`.
    fn connect(
        &self,
        namespace: &str,
    ) -> Result<Box<dyn InstrumentationSession + '_>, CoreError>;
}

/// 열린 네임스페이스 세션
pub trait InstrumentationSession {
    /// 쿼리 실행
    ///
    /// 실패 시 `CoreError::Query`.
    fn exec_query(&self, query: &str) -> Result<Box<dyn QueryResultSet + '_>, CoreError>;
}

/// 쿼리 결과 집합
pub trait QueryResultSet {
    /// 결과 항목 개수
    ///
    /// 실패 시 `CoreError::Query`.
    fn count(&self) -> Result<usize, CoreError>;

    /// 인덱스의 항목 조회
    ///
    /// 실패 시 `CoreError::ItemFetch`.
    fn item(&self, index: usize) -> Result<Box<dyn ResultItem + '_>, CoreError>;
}

/// 결과 항목 (WMI 인스턴스 하나)
pub trait ResultItem {
    /// 속성 값 읽기
    ///
    /// 실패 시 `CoreError::Field`. 호출자는 이 에러를 흡수하고 기본값을 쓴다.
    fn property(&self, name: &str) -> Result<Variant, CoreError>;
}
