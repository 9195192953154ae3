//! key=value 줄 포맷.
//!
//! 키 집합과 순서는 외부 계약이다. 수집은 되지만 출력하지 않는 필드:
//! AvgPrivilegedTime, AvgProcessorTime, AvgUserTime, City, Country, EndpointIP,
//! ISP, LatencyUnit, RamAvgUsage, SessionID, SpeedUnit, Timestamp.
//!
//! 정수는 구분자 없이, 실수는 Rust 기본 `Display` 표기로 출력한다.
//! 문자열은 이스케이프 없이 그대로 쓴다.

use std::fmt::{Display, Write as _};
use std::io::Write;

use euem_core::error::CoreError;
use euem_core::models::endpoint_metric::EndpointMetric;
use tracing::debug;

/// 출력 키 (순서 고정)
pub const OUTPUT_KEYS: [&str; 16] = [
    "AvgBeaconLatency",
    "AvgThroughputBytesRcvd",
    "AvgThroughputBytesSent",
    "ClientTimestamp",
    "GpuAvgUsage",
    "GpuMaxUsage",
    "LinkSpeed",
    "MaxPrivilegedTime",
    "MaxProcessorTime",
    "MaxThroughputBytesRcvd",
    "MaxThroughputBytesSent",
    "MaxUserTime",
    "NetworkInterfaceType",
    "RamMaxUsage",
    "SessionGUID",
    "SignalStrength",
];

/// 레코드 한 줄 생성 (줄바꿈 제외)
pub fn format_line(metric: &EndpointMetric) -> String {
    // OUTPUT_KEYS와 같은 순서
    let values: [&dyn Display; 16] = [
        &metric.avg_beacon_latency,
        &metric.avg_throughput_bytes_rcvd,
        &metric.avg_throughput_bytes_sent,
        &metric.client_timestamp,
        &metric.gpu_avg_usage,
        &metric.gpu_max_usage,
        &metric.link_speed,
        &metric.max_privileged_time,
        &metric.max_processor_time,
        &metric.max_throughput_bytes_rcvd,
        &metric.max_throughput_bytes_sent,
        &metric.max_user_time,
        &metric.network_interface_type,
        &metric.ram_max_usage,
        &metric.session_guid,
        &metric.signal_strength,
    ];

    let mut line = String::new();
    for (key, value) in OUTPUT_KEYS.iter().zip(values) {
        if !line.is_empty() {
            line.push(' ');
        }
        // String에 쓰기는 실패하지 않는다
        let _ = write!(line, "{key}={value}");
    }
    line
}

/// 줄 단위 key=value 출력기
pub struct KeyValueWriter<W: Write> {
    out: W,
}

impl<W: Write> KeyValueWriter<W> {
    /// 새 출력기 생성
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// 레코드 하나 출력
    pub fn write_metric(&mut self, metric: &EndpointMetric) -> Result<(), CoreError> {
        writeln!(self.out, "{}", format_line(metric))?;
        Ok(())
    }

    /// 레코드 전체를 순서대로 출력하고 flush
    pub fn write_all(&mut self, metrics: &[EndpointMetric]) -> Result<usize, CoreError> {
        for metric in metrics {
            self.write_metric(metric)?;
        }
        self.out.flush()?;
        debug!("{}줄 출력", metrics.len());
        Ok(metrics.len())
    }

    /// 내부 writer 반환
    pub fn into_inner(self) -> W {
        self.out
    }
}
