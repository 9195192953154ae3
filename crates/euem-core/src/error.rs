//! 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 에러 타입을 그대로 반환한다.
//! 치명(fatal) 여부는 [`CoreError::is_fatal`]로 판별한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// WMI 조회 단계별 실패와 설정/입출력 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// WMI 네임스페이스 연결 실패 (치명)
    #[error("WMI 연결 실패: {0}")]
    Connection(String),

    /// 쿼리 실행 또는 결과 개수 조회 실패 (치명)
    #[error("WMI 쿼리 실패: {0}")]
    Query(String),

    /// 결과 집합의 특정 항목 조회 실패 (치명)
    #[error("결과 항목 {index} 조회 실패: {message}")]
    ItemFetch {
        /// 항목 인덱스 (0부터)
        index: usize,
        /// 실패 사유
        message: String,
    },

    /// 단일 필드 읽기 실패 (비치명, 기본값으로 대체)
    #[error("필드 {name} 읽기 실패: {message}")]
    Field {
        /// WMI 속성 이름
        name: String,
        /// 실패 사유
        message: String,
    },

    /// 세션 GUID 소스 읽기 실패 (비치명, 경고 후 센티널 값 사용)
    #[error("세션 GUID 소스 에러: {0}")]
    IdentifierSource(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 현재 플랫폼에서 지원하지 않는 기능
    #[error("미지원 플랫폼: {0}")]
    Unsupported(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 수집 전체를 중단해야 하는 에러인지 여부
    ///
    /// 연결/쿼리/항목 조회 실패만 치명적이다.
    /// 필드 단위 실패와 GUID 소스 실패는 발생 지점에서 흡수된다.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CoreError::Connection(_) | CoreError::Query(_) | CoreError::ItemFetch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classes() {
        assert!(CoreError::Connection("x".into()).is_fatal());
        assert!(CoreError::Query("x".into()).is_fatal());
        assert!(CoreError::ItemFetch {
            index: 3,
            message: "x".into()
        }
        .is_fatal());
    }

    #[test]
    fn non_fatal_classes() {
        assert!(!CoreError::Field {
            name: "LinkSpeed".into(),
            message: "x".into()
        }
        .is_fatal());
        assert!(!CoreError::IdentifierSource("x".into()).is_fatal());
        assert!(!CoreError::Config("x".into()).is_fatal());
    }

    #[test]
    fn item_fetch_message_names_index() {
        let err = CoreError::ItemFetch {
            index: 7,
            message: "범위 초과".into(),
        };
        assert!(err.to_string().contains('7'));
    }
}
