//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! `euem-monitor` crate가 플랫폼별 어댑터(WMI, 레지스트리)와
//! 스냅샷 재생 어댑터로 이 trait들을 구현하며,
//! `euem-app`에서 `Box<dyn T>`로 와이어링한다.
//!
//! 수집은 단일 스레드에서 동기적으로 한 번 실행되므로 async trait을 쓰지 않는다.

pub mod instrumentation;
pub mod session_guid_source;
