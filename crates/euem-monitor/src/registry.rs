//! 세션 GUID 레지스트리 소스.
//!
//! `HKEY_LOCAL_MACHINE\<registry_path>` 아래의 값을 열거한다.
//! 값 이름이 SessionID(10진 문자열), 값 데이터(REG_SZ)가 SessionGUID다.
//! 읽을 수 없거나 문자열이 아닌 값은 경고 후 건너뛴다.

/// REG_SZ 바이트열(UTF-16LE)을 문자열로 디코딩
///
/// 끝의 NUL 문자는 제거한다. 홀수 길이의 마지막 바이트는 무시한다.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn decode_reg_sz(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let end = units
        .iter()
        .rposition(|&unit| unit != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf16_lossy(&units[..end])
}

#[cfg(target_os = "windows")]
pub use self::windows::RegistryGuidSource;

// ── Windows 레지스트리 구현 ──

#[cfg(target_os = "windows")]
mod windows {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;

    use euem_core::error::CoreError;
    use euem_core::models::session_guid::SessionGuidMap;
    use euem_core::ports::session_guid_source::SessionGuidSource;
    use tracing::{debug, warn};
    use windows_sys::Win32::Foundation::{ERROR_MORE_DATA, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS};
    use windows_sys::Win32::System::Registry::{
        RegCloseKey, RegEnumValueW, RegOpenKeyExW, HKEY, HKEY_LOCAL_MACHINE, KEY_READ,
        REG_EXPAND_SZ, REG_SZ,
    };

    use super::decode_reg_sz;

    /// 레지스트리 값 이름 최대 길이 (문자, NUL 포함)
    const MAX_VALUE_NAME: usize = 16_384;

    /// 값 데이터 초기 버퍼 (바이트)
    const INITIAL_DATA_LEN: usize = 512;

    /// UTF-16 문자열로 변환 (null-terminated)
    fn to_wide(s: &str) -> Vec<u16> {
        OsStr::new(s)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    }

    /// 열린 키 — `Drop` 시 `RegCloseKey`
    struct OpenKey(HKEY);

    impl Drop for OpenKey {
        fn drop(&mut self) {
            unsafe {
                RegCloseKey(self.0);
            }
        }
    }

    /// 레지스트리 기반 세션 GUID 소스 — `SessionGuidSource` 포트 구현
    #[derive(Debug, Clone)]
    pub struct RegistryGuidSource {
        subkey: String,
    }

    impl RegistryGuidSource {
        /// HKEY_LOCAL_MACHINE 기준 하위 키 경로로 생성
        pub fn new(subkey: impl Into<String>) -> Self {
            Self {
                subkey: subkey.into(),
            }
        }

        fn open(&self) -> Result<OpenKey, CoreError> {
            let subkey_wide = to_wide(&self.subkey);
            let mut hkey: HKEY = std::ptr::null_mut();
            let result = unsafe {
                RegOpenKeyExW(
                    HKEY_LOCAL_MACHINE,
                    subkey_wide.as_ptr(),
                    0,
                    KEY_READ,
                    &mut hkey,
                )
            };
            if result != ERROR_SUCCESS {
                return Err(CoreError::IdentifierSource(format!(
                    "레지스트리 열기 실패: HKLM\\{}: 코드 {result}",
                    self.subkey
                )));
            }
            Ok(OpenKey(hkey))
        }
    }

    impl SessionGuidSource for RegistryGuidSource {
        fn load_session_guids(&self) -> Result<SessionGuidMap, CoreError> {
            let key = self.open()?;
            let mut guids = SessionGuidMap::new();

            let mut name_buf = vec![0u16; MAX_VALUE_NAME];
            let mut data_buf = vec![0u8; INITIAL_DATA_LEN];
            let mut index: u32 = 0;

            loop {
                let mut name_len = name_buf.len() as u32;
                let mut data_len = data_buf.len() as u32;
                let mut value_type: u32 = 0;

                let result = unsafe {
                    RegEnumValueW(
                        key.0,
                        index,
                        name_buf.as_mut_ptr(),
                        &mut name_len,
                        std::ptr::null(),
                        &mut value_type,
                        data_buf.as_mut_ptr(),
                        &mut data_len,
                    )
                };

                match result {
                    ERROR_SUCCESS => {}
                    ERROR_NO_MORE_ITEMS => break,
                    ERROR_MORE_DATA => {
                        // 같은 인덱스를 더 큰 버퍼로 재시도
                        let required = (data_len as usize).max(data_buf.len() * 2);
                        data_buf.resize(required, 0);
                        continue;
                    }
                    code => {
                        warn!("레지스트리 값 {index} 읽기 실패: 코드 {code}");
                        index += 1;
                        continue;
                    }
                }

                let name = String::from_utf16_lossy(&name_buf[..name_len as usize]);
                if value_type == REG_SZ || value_type == REG_EXPAND_SZ {
                    let guid = decode_reg_sz(&data_buf[..data_len as usize]);
                    guids.insert(name, guid);
                } else {
                    warn!("{name} 값이 문자열이 아님 (타입 {value_type}), 건너뜀");
                }
                index += 1;
            }

            debug!("레지스트리 세션 GUID {}개: HKLM\\{}", guids.len(), self.subkey);
            Ok(guids)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    #[test]
    fn decodes_nul_terminated_string() {
        let mut bytes = utf16le("{3F2504E0-4F89-11D3-9A0C-0305E82C3301}");
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(decode_reg_sz(&bytes), "{3F2504E0-4F89-11D3-9A0C-0305E82C3301}");
    }

    #[test]
    fn decodes_without_terminator_and_odd_length() {
        let mut bytes = utf16le("abc");
        assert_eq!(decode_reg_sz(&bytes), "abc");
        bytes.push(0x41);
        assert_eq!(decode_reg_sz(&bytes), "abc");
    }

    #[test]
    fn empty_data_is_empty_string() {
        assert_eq!(decode_reg_sz(&[]), "");
        assert_eq!(decode_reg_sz(&[0, 0, 0, 0]), "");
    }
}
