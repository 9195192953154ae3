//! # euem-output
//!
//! 메트릭 레코드를 외부 텔레메트리 파이프라인이 읽는 텍스트 형식으로 직렬화한다.
//! 레코드당 한 줄, 고정 키 순서의 공백 구분 `key=value` 토큰.

pub mod key_value;
