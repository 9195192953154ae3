//! 수집기 설정 구조체.
//!
//! WMI 네임스페이스/클래스, 세션 GUID 레지스트리 경로, 로그 레벨을 정의한다.
//! JSON 파일에서 로드하며 모든 섹션은 생략 시 기본값을 사용한다.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 최상위 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// WMI 제공자 설정
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 세션 GUID 소스 설정
    #[serde(default)]
    pub identifier_source: IdentifierSourceConfig,
    /// 로그 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// WMI 제공자 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// WMI 네임스페이스
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// 조회 대상 WMI 클래스
    #[serde(default = "default_class_name")]
    pub class_name: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            class_name: default_class_name(),
        }
    }
}

fn default_namespace() -> String {
    r"ROOT\Citrix\EUEM".to_string()
}

fn default_class_name() -> String {
    "Citrix_Euem_EndpointMetrics".to_string()
}

/// 세션 GUID 소스 설정 (HKEY_LOCAL_MACHINE 기준)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentifierSourceConfig {
    /// false면 레지스트리를 읽지 않고 빈 매핑을 사용
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// SessionID → SessionGUID 값이 저장된 레지스트리 키
    #[serde(default = "default_registry_path")]
    pub registry_path: String,
}

impl Default for IdentifierSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            registry_path: default_registry_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_registry_path() -> String {
    r"SOFTWARE\vast limits\uberAgent\SessionGuids".to_string()
}

/// 로그 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// 기본 로그 레벨 (RUST_LOG 미지정 시)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 고정 전체 조회 쿼리 (필터/정렬 없음)
    pub fn query(&self) -> String {
        format!("SELECT * FROM {}", self.provider.class_name)
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.provider.namespace.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "provider.namespace".to_string(),
                message: "비어 있을 수 없습니다".to_string(),
            });
        }

        let class_name = &self.provider.class_name;
        if class_name.is_empty()
            || !class_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(CoreError::Validation {
                field: "provider.class_name".to_string(),
                message: format!("WQL 식별자가 아닙니다: {class_name:?}"),
            });
        }

        if self.identifier_source.enabled && self.identifier_source.registry_path.trim().is_empty()
        {
            return Err(CoreError::Validation {
                field: "identifier_source.registry_path".to_string(),
                message: "비어 있을 수 없습니다".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_query_selects_all_from_class() {
        let config = AppConfig::default_config();
        assert_eq!(config.query(), "SELECT * FROM Citrix_Euem_EndpointMetrics");
    }

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default_config().validate().is_ok());
    }

    #[test]
    fn class_name_with_injection_rejected() {
        let mut config = AppConfig::default_config();
        config.provider.class_name = "Foo WHERE 1=1".to_string();
        assert_matches!(
            config.validate(),
            Err(CoreError::Validation { field, .. }) if field == "provider.class_name"
        );
    }

    #[test]
    fn empty_namespace_rejected() {
        let mut config = AppConfig::default_config();
        config.provider.namespace = "  ".to_string();
        assert_matches!(config.validate(), Err(CoreError::Validation { .. }));
    }

    #[test]
    fn empty_registry_path_allowed_when_disabled() {
        let mut config = AppConfig::default_config();
        config.identifier_source.registry_path = String::new();
        assert!(config.validate().is_err());

        config.identifier_source.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "provider": { "class_name": "Custom_Metrics" } }"#).unwrap();
        assert_eq!(config.provider.class_name, "Custom_Metrics");
        assert_eq!(config.provider.namespace, r"ROOT\Citrix\EUEM");
        assert!(config.identifier_source.enabled);
        assert_eq!(config.logging.level, "warn");
    }
}
