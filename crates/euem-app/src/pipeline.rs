//! 1회 수집 파이프라인.
//!
//! 수집 → 세션 GUID 로드 → 병합 → 출력. 수집이 실패하면 아무것도 출력하지 않는다.
//! 세션 GUID 소스 실패는 치명적이지 않으며 빈 매핑으로 계속한다.

use std::io::Write;

use euem_core::config::AppConfig;
use euem_core::error::CoreError;
use euem_core::models::session_guid::{assign_session_guids, MergeSummary, SessionGuidMap};
use euem_core::ports::instrumentation::InstrumentationProvider;
use euem_core::ports::session_guid_source::SessionGuidSource;
use euem_monitor::acquisition::MetricsAcquisition;
use euem_output::key_value::KeyValueWriter;
use tracing::{info, warn};

/// 실행 결과 요약
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 출력한 줄 수
    pub written: usize,
    /// 세션 GUID 병합 통계
    pub merge: MergeSummary,
}

/// 수집부터 출력까지 한 번 실행
pub fn run<W: Write>(
    provider: &dyn InstrumentationProvider,
    guid_source: &dyn SessionGuidSource,
    config: &AppConfig,
    out: W,
) -> Result<RunSummary, CoreError> {
    let mut metrics = MetricsAcquisition::from_config(provider, config).acquire()?;

    let guids = guid_source.load_session_guids().unwrap_or_else(|e| {
        warn!("세션 GUID 로드 실패, 빈 매핑으로 계속: {e}");
        SessionGuidMap::new()
    });
    let merge = assign_session_guids(&mut metrics, &guids);

    let mut writer = KeyValueWriter::new(out);
    let written = writer.write_all(&metrics)?;

    info!("메트릭 {written}건 출력");
    Ok(RunSummary { written, merge })
}
