//! 세션 GUID 병합.
//!
//! 수집된 메트릭마다 SessionID(10진 문자열)로 외부 매핑을 조회해
//! `session_guid`를 채운다. 이 단계는 실패하지 않는다.

use std::collections::HashMap;

use tracing::debug;

use crate::models::endpoint_metric::EndpointMetric;

/// SessionID가 0인 레코드에 할당되는 센티널
pub const NO_SESSION_ID: &str = "No SessionID available";

/// 매핑에 SessionID가 없는 레코드에 할당되는 센티널
pub const NO_GUID_FOUND: &str = "No GUID found for SessionID";

/// SessionID(10진 문자열) → SessionGUID
pub type SessionGuidMap = HashMap<String, String>;

/// 병합 결과 집계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// 매핑된 GUID가 할당된 레코드 수
    pub mapped: usize,
    /// SessionID는 있지만 매핑이 없는 레코드 수
    pub unmapped: usize,
    /// SessionID가 0인 레코드 수
    pub without_session: usize,
}

/// 조회 결과 분류
#[derive(Clone, Copy)]
enum Resolution<'a> {
    NoSession,
    Mapped(&'a str),
    Unmapped,
}

impl<'a> Resolution<'a> {
    fn of(session_id: i64, guids: &'a SessionGuidMap) -> Self {
        if session_id == 0 {
            return Resolution::NoSession;
        }
        match guids.get(&session_id.to_string()) {
            Some(guid) => Resolution::Mapped(guid),
            None => Resolution::Unmapped,
        }
    }

    fn as_str(self) -> &'a str {
        match self {
            Resolution::NoSession => NO_SESSION_ID,
            Resolution::Mapped(guid) => guid,
            Resolution::Unmapped => NO_GUID_FOUND,
        }
    }
}

/// SessionID 하나에 대한 상관관계 문자열 결정
pub fn resolve_session_guid(session_id: i64, guids: &SessionGuidMap) -> &str {
    Resolution::of(session_id, guids).as_str()
}

/// 모든 메트릭에 SessionGUID 할당
pub fn assign_session_guids(
    metrics: &mut [EndpointMetric],
    guids: &SessionGuidMap,
) -> MergeSummary {
    let mut summary = MergeSummary::default();

    for metric in metrics.iter_mut() {
        let resolution = Resolution::of(metric.session_id, guids);
        match resolution {
            Resolution::NoSession => summary.without_session += 1,
            Resolution::Mapped(_) => summary.mapped += 1,
            Resolution::Unmapped => summary.unmapped += 1,
        }
        metric.session_guid = resolution.as_str().to_string();
    }

    debug!(
        "세션 GUID 병합: 매핑 {}, 미매핑 {}, 세션 없음 {}",
        summary.mapped, summary.unmapped, summary.without_session
    );
    summary
}
