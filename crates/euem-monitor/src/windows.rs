//! Windows 플랫폼 — WMI 계측 제공자.
//!
//! `wmi` crate 기반. COM 초기화 + `IWbemServices` 연결 후
//! `ExecQuery` 결과를 열거하고, 항목별로 `IWbemClassObject::Get`으로 속성을 읽는다.
//! COM 객체는 세션/결과 집합 스코프가 끝날 때 `Drop`으로 해제된다.

#![cfg(target_os = "windows")]

use euem_core::error::CoreError;
use euem_core::models::variant::Variant;
use euem_core::ports::instrumentation::{
    InstrumentationProvider, InstrumentationSession, QueryResultSet, ResultItem,
};
use tracing::debug;
use wmi::result_enumerator::IWbemClassWrapper;
use wmi::{COMLibrary, WMIConnection};

/// WMI 계측 제공자 — `InstrumentationProvider` 포트 구현
#[derive(Debug, Default)]
pub struct WmiProvider;

impl WmiProvider {
    /// 새 제공자 생성
    pub fn new() -> Self {
        Self
    }
}

impl InstrumentationProvider for WmiProvider {
    fn connect(
        &self,
        namespace: &str,
    ) -> Result<Box<dyn InstrumentationSession + '_>, CoreError> {
        let com = COMLibrary::new()
            .map_err(|e| CoreError::Connection(format!("COM 초기화 실패: {e}")))?;
        let connection = WMIConnection::with_namespace_path(namespace, com)
            .map_err(|e| CoreError::Connection(format!("{namespace}: {e}")))?;

        debug!("WMI 서비스 연결: {namespace}");
        Ok(Box::new(WmiSession { connection }))
    }
}

struct WmiSession {
    connection: WMIConnection,
}

impl InstrumentationSession for WmiSession {
    fn exec_query(&self, query: &str) -> Result<Box<dyn QueryResultSet + '_>, CoreError> {
        let enumerator = self
            .connection
            .exec_query_native_wrapper(query)
            .map_err(|e| CoreError::Query(format!("{query}: {e}")))?;

        // 열거자를 끝까지 소비해야 개수를 알 수 있다
        let items = enumerator
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::Query(format!("결과 열거 실패: {e}")))?;

        Ok(Box::new(WmiResultSet { items }))
    }
}

struct WmiResultSet {
    items: Vec<IWbemClassWrapper>,
}

impl QueryResultSet for WmiResultSet {
    fn count(&self) -> Result<usize, CoreError> {
        Ok(self.items.len())
    }

    fn item(&self, index: usize) -> Result<Box<dyn ResultItem + '_>, CoreError> {
        let object = self.items.get(index).ok_or_else(|| CoreError::ItemFetch {
            index,
            message: format!("범위 초과 (항목 {}개)", self.items.len()),
        })?;
        Ok(Box::new(WmiItem { object }))
    }
}

struct WmiItem<'r> {
    object: &'r IWbemClassWrapper,
}

impl ResultItem for WmiItem<'_> {
    fn property(&self, name: &str) -> Result<Variant, CoreError> {
        let value = self
            .object
            .get_property(name)
            .map_err(|e| CoreError::Field {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        from_wmi_variant(name, value)
    }
}

/// `wmi::Variant` → 도메인 [`Variant`]
///
/// 배열, 내장 객체, COM 포인터는 스칼라 필드로 쓸 수 없으므로 필드 에러.
fn from_wmi_variant(name: &str, value: wmi::Variant) -> Result<Variant, CoreError> {
    let variant = match value {
        wmi::Variant::Empty | wmi::Variant::Null => Variant::Null,
        wmi::Variant::String(s) => Variant::String(s),
        wmi::Variant::I1(v) => Variant::I1(v),
        wmi::Variant::I2(v) => Variant::I2(v),
        wmi::Variant::I4(v) => Variant::I4(v),
        wmi::Variant::I8(v) => Variant::I8(v),
        wmi::Variant::UI1(v) => Variant::UI1(v),
        wmi::Variant::UI2(v) => Variant::UI2(v),
        wmi::Variant::UI4(v) => Variant::UI4(v),
        wmi::Variant::UI8(v) => Variant::UI8(v),
        wmi::Variant::R4(v) => Variant::R4(v),
        wmi::Variant::R8(v) => Variant::R8(v),
        wmi::Variant::Bool(v) => Variant::Bool(v),
        other => {
            return Err(CoreError::Field {
                name: name.to_string(),
                message: format!("스칼라가 아닌 값: {other:?}"),
            })
        }
    };
    Ok(variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_variants_map_one_to_one() {
        assert_eq!(
            from_wmi_variant("SessionID", wmi::Variant::I4(5)).unwrap(),
            Variant::I4(5)
        );
        assert_eq!(
            from_wmi_variant("LinkSpeed", wmi::Variant::UI8(u64::MAX)).unwrap(),
            Variant::UI8(u64::MAX)
        );
        assert!(from_wmi_variant("City", wmi::Variant::Null)
            .unwrap()
            .is_null());
    }

    #[test]
    fn array_is_field_error() {
        let result = from_wmi_variant("City", wmi::Variant::Array(vec![]));
        assert!(matches!(result, Err(CoreError::Field { .. })));
    }

    // 실제 WMI 연결 테스트는 Citrix EUEM 제공자가 설치된 호스트에서만 가능
    // 로컬에서 `--replay` 없이 바이너리를 실행해 수동 확인 권장
}
