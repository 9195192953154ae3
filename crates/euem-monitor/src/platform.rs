//! 플랫폼별 어댑터 선택.
//!
//! Windows에서는 WMI 제공자와 레지스트리 GUID 소스를 사용한다.
//! 다른 플랫폼에서는 연결 단계에서 실패하는 제공자를 돌려주므로
//! 프로세스는 진단 메시지와 함께 0이 아닌 상태로 종료한다.

use euem_core::config::IdentifierSourceConfig;
use euem_core::error::CoreError;
use euem_core::models::session_guid::SessionGuidMap;
use euem_core::ports::instrumentation::{InstrumentationProvider, InstrumentationSession};
use euem_core::ports::session_guid_source::SessionGuidSource;
use tracing::debug;

use crate::snapshot::StaticGuidSource;

/// 현재 플랫폼의 계측 제공자 생성
pub fn create_platform_provider() -> Box<dyn InstrumentationProvider> {
    #[cfg(target_os = "windows")]
    {
        Box::new(crate::windows::WmiProvider::new())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Box::new(UnsupportedProvider)
    }
}

/// 현재 플랫폼의 세션 GUID 소스 생성
///
/// 비활성화된 경우 레지스트리를 건드리지 않고 빈 매핑을 쓴다.
pub fn create_platform_guid_source(
    config: &IdentifierSourceConfig,
) -> Box<dyn SessionGuidSource> {
    if !config.enabled {
        debug!("세션 GUID 조회 비활성화, 빈 매핑 사용");
        return Box::new(StaticGuidSource::empty());
    }

    #[cfg(target_os = "windows")]
    {
        Box::new(crate::registry::RegistryGuidSource::new(
            config.registry_path.clone(),
        ))
    }

    #[cfg(not(target_os = "windows"))]
    {
        Box::new(UnsupportedGuidSource)
    }
}

/// WMI가 없는 플랫폼용 제공자 (항상 연결 실패)
#[derive(Debug, Default)]
pub struct UnsupportedProvider;

impl InstrumentationProvider for UnsupportedProvider {
    fn connect(
        &self,
        namespace: &str,
    ) -> Result<Box<dyn InstrumentationSession + '_>, CoreError> {
        Err(CoreError::Connection(format!(
            "{} 플랫폼에서는 WMI를 사용할 수 없습니다: {namespace}",
            std::env::consts::OS
        )))
    }
}

/// 레지스트리가 없는 플랫폼용 GUID 소스 (항상 실패)
#[derive(Debug, Default)]
pub struct UnsupportedGuidSource;

impl SessionGuidSource for UnsupportedGuidSource {
    fn load_session_guids(&self) -> Result<SessionGuidMap, CoreError> {
        Err(CoreError::IdentifierSource(format!(
            "{} 플랫폼에는 레지스트리가 없습니다",
            std::env::consts::OS
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn unsupported_provider_fails_to_connect() {
        let provider = UnsupportedProvider;
        assert_matches!(
            provider.connect(r"ROOT\Citrix\EUEM").err(),
            Some(CoreError::Connection(_))
        );
    }

    #[test]
    fn unsupported_guid_source_is_non_fatal() {
        let err = UnsupportedGuidSource.load_session_guids().unwrap_err();
        assert_matches!(err, CoreError::IdentifierSource(_));
        assert!(!err.is_fatal());
    }

    #[test]
    fn disabled_source_is_empty() {
        let config = IdentifierSourceConfig {
            enabled: false,
            ..Default::default()
        };
        let source = create_platform_guid_source(&config);
        assert!(source.load_session_guids().unwrap().is_empty());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn non_windows_platform_provider_fails_to_connect() {
        let provider = create_platform_provider();
        assert_matches!(
            provider.connect(r"ROOT\Citrix\EUEM").err(),
            Some(CoreError::Connection(_))
        );
    }
}
