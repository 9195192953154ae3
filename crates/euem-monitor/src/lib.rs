//! # euem-monitor
//!
//! 엔드포인트 메트릭 수집 어댑터.
//! WMI 결과 집합을 열거해 세션별 [`EndpointMetric`](euem_core::models::endpoint_metric::EndpointMetric)을
//! 만들고, 세션 GUID 매핑을 레지스트리에서 읽는다.
//! 플랫폼별(Windows) 네이티브 API와 플랫폼 독립적인 스냅샷 재생 어댑터를 제공한다.

pub mod acquisition;
pub mod platform;
pub mod registry;
pub mod snapshot;

#[cfg(target_os = "windows")]
pub mod windows;
