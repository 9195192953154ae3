//! 세션 GUID 소스 포트.
//!
//! 구현: `euem-monitor` crate (Windows 레지스트리, 고정 매핑)

use crate::error::CoreError;
use crate::models::session_guid::SessionGuidMap;

/// SessionID → SessionGUID 매핑 제공자
///
/// 실행당 한 번, 병합 단계 전에 호출된다.
/// 일부만 채워진 매핑이나 빈 매핑을 반환할 수 있다.
pub trait SessionGuidSource {
    /// 매핑 로드
    ///
    /// 실패 시 `CoreError::IdentifierSource`. 호출자는 경고 후 빈 매핑으로 진행한다.
    fn load_session_guids(&self) -> Result<SessionGuidMap, CoreError>;
}
