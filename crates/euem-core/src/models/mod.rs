//! 도메인 모델.
//!
//! WMI 값 표현과 변환 엔진, 세션별 메트릭 레코드, 세션 GUID 병합 규칙을 정의한다.

pub mod endpoint_metric;
pub mod session_guid;
pub mod variant;
