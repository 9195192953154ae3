//! # euem-core
//!
//! EUEM 엔드포인트 메트릭 수집기의 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 도메인 데이터 구조체 (Variant 변환 엔진, 메트릭 레코드, GUID 병합)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (WMI 조회, 세션 GUID 소스)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 수집기 설정 구조체
//! - [`config_manager`] — 설정 파일 로드

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
