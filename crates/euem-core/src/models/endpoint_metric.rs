//! 엔드포인트 메트릭 레코드.
//!
//! `Citrix_Euem_EndpointMetrics` 결과 행 하나(세션 스냅샷 하나)에 대응한다.
//! 모든 필드는 기본값(0 또는 빈 문자열)을 가지므로 일부 필드 읽기에
//! 실패해도 레코드가 미완성 상태로 남지 않는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// WMI 클래스가 노출하는 속성 이름 전체 (SessionGUID 제외)
pub const PROPERTY_NAMES: [&str; 27] = [
    "AvgBeaconLatency",
    "AvgPrivilegedTime",
    "AvgProcessorTime",
    "AvgThroughputBytesRcvd",
    "AvgThroughputBytesSent",
    "AvgUserTime",
    "City",
    "ClientTimestamp",
    "Country",
    "EndpointIP",
    "GpuAvgUsage",
    "GpuMaxUsage",
    "ISP",
    "LatencyUnit",
    "LinkSpeed",
    "MaxPrivilegedTime",
    "MaxProcessorTime",
    "MaxThroughputBytesRcvd",
    "MaxThroughputBytesSent",
    "MaxUserTime",
    "NetworkInterfaceType",
    "RamAvgUsage",
    "RamMaxUsage",
    "SessionID",
    "SignalStrength",
    "SpeedUnit",
    "Timestamp",
];

/// 세션별 엔드포인트 메트릭
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EndpointMetric {
    /// 평균 비콘 지연
    pub avg_beacon_latency: f64,
    /// 평균 커널 모드 CPU 시간 (%)
    pub avg_privileged_time: f64,
    /// 평균 CPU 시간 (%)
    pub avg_processor_time: f64,
    /// 평균 수신 처리량
    pub avg_throughput_bytes_rcvd: f64,
    /// 평균 송신 처리량
    pub avg_throughput_bytes_sent: f64,
    /// 평균 사용자 모드 CPU 시간 (%)
    pub avg_user_time: f64,
    pub city: String,
    /// 클라이언트 보고 타임스탬프 카운터
    pub client_timestamp: u64,
    pub country: String,
    #[serde(rename = "EndpointIP")]
    pub endpoint_ip: String,
    pub gpu_avg_usage: f64,
    pub gpu_max_usage: u64,
    #[serde(rename = "ISP")]
    pub isp: String,
    /// 지연 단위 (예: "ms")
    pub latency_unit: String,
    pub link_speed: u64,
    pub max_privileged_time: u64,
    pub max_processor_time: u64,
    pub max_throughput_bytes_rcvd: u64,
    pub max_throughput_bytes_sent: u64,
    pub max_user_time: u64,
    pub network_interface_type: String,
    pub ram_avg_usage: f64,
    pub ram_max_usage: u64,
    /// 0이면 연결된 세션 없음
    #[serde(rename = "SessionID")]
    pub session_id: i64,
    pub signal_strength: u64,
    /// 속도 단위 (예: "bps")
    pub speed_unit: String,
    /// 제공자 보고 시각 (구조화된 값이 없으면 None)
    pub timestamp: Option<DateTime<Utc>>,
    /// 병합 단계에서 한 번만 할당되는 상관관계 문자열
    #[serde(rename = "SessionGUID")]
    pub session_guid: String,
}
