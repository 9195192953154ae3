//! 엔드포인트 메트릭 수집 파이프라인.
//!
//! 네임스페이스 연결 → 고정 쿼리 실행 → 결과 개수 조회 → 인덱스 순서대로 항목 조회 →
//! 필드별 읽기/변환 순서로 [`EndpointMetric`] 목록을 만든다.
//!
//! 연결/쿼리/개수/항목 실패는 수집 전체를 중단한다.
//! 필드 하나의 읽기 실패는 해당 필드를 기본값으로 두고 계속 진행한다.
//! 모든 핸들은 스코프를 벗어날 때 `Drop`으로 해제된다 (조기 반환 포함).

use chrono::{DateTime, Utc};
use euem_core::config::AppConfig;
use euem_core::error::CoreError;
use euem_core::models::endpoint_metric::EndpointMetric;
use euem_core::models::variant::Variant;
use euem_core::ports::instrumentation::{InstrumentationProvider, ResultItem};
use tracing::{debug, info};

/// 메트릭 수집기
pub struct MetricsAcquisition<'a> {
    provider: &'a dyn InstrumentationProvider,
    namespace: String,
    query: String,
}

impl<'a> MetricsAcquisition<'a> {
    /// 새 수집기 생성
    pub fn new(
        provider: &'a dyn InstrumentationProvider,
        namespace: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            namespace: namespace.into(),
            query: query.into(),
        }
    }

    /// 설정의 네임스페이스와 클래스로 수집기 생성
    pub fn from_config(provider: &'a dyn InstrumentationProvider, config: &AppConfig) -> Self {
        Self::new(provider, config.provider.namespace.clone(), config.query())
    }

    /// 현재 스냅샷 수집
    ///
    /// 결과 순서는 제공자가 돌려준 순서 그대로다.
    pub fn acquire(&self) -> Result<Vec<EndpointMetric>, CoreError> {
        let session = self
            .provider
            .connect(&self.namespace)
            .map_err(|e| classify(e, CoreError::Connection))?;
        debug!("WMI 네임스페이스 연결: {}", self.namespace);

        let results = session
            .exec_query(&self.query)
            .map_err(|e| classify(e, CoreError::Query))?;
        let count = results
            .count()
            .map_err(|e| classify(e, CoreError::Query))?;
        debug!("쿼리 결과 {count}개: {}", self.query);

        let mut metrics = Vec::with_capacity(count);
        for index in 0..count {
            let item = results.item(index).map_err(|e| match e {
                CoreError::ItemFetch { .. } => e,
                other => CoreError::ItemFetch {
                    index,
                    message: other.to_string(),
                },
            })?;
            metrics.push(read_metric(item.as_ref(), index));
        }

        info!("엔드포인트 메트릭 {}건 수집", metrics.len());
        Ok(metrics)
    }
}

/// 어댑터 에러를 해당 단계의 에러 클래스로 정규화
fn classify(err: CoreError, class: fn(String) -> CoreError) -> CoreError {
    if err.is_fatal() {
        err
    } else {
        class(err.to_string())
    }
}

/// 결과 항목 하나를 메트릭 레코드로 변환
fn read_metric(item: &dyn ResultItem, index: usize) -> EndpointMetric {
    let mut fields = FieldReader::new(item, index);

    let metric = EndpointMetric {
        avg_beacon_latency: fields.float("AvgBeaconLatency"),
        avg_privileged_time: fields.float("AvgPrivilegedTime"),
        avg_processor_time: fields.float("AvgProcessorTime"),
        avg_throughput_bytes_rcvd: fields.float("AvgThroughputBytesRcvd"),
        avg_throughput_bytes_sent: fields.float("AvgThroughputBytesSent"),
        avg_user_time: fields.float("AvgUserTime"),
        city: fields.text("City"),
        client_timestamp: fields.unsigned("ClientTimestamp"),
        country: fields.text("Country"),
        endpoint_ip: fields.text("EndpointIP"),
        gpu_avg_usage: fields.float("GpuAvgUsage"),
        gpu_max_usage: fields.unsigned("GpuMaxUsage"),
        isp: fields.text("ISP"),
        latency_unit: fields.text("LatencyUnit"),
        link_speed: fields.unsigned("LinkSpeed"),
        max_privileged_time: fields.unsigned("MaxPrivilegedTime"),
        max_processor_time: fields.unsigned("MaxProcessorTime"),
        max_throughput_bytes_rcvd: fields.unsigned("MaxThroughputBytesRcvd"),
        max_throughput_bytes_sent: fields.unsigned("MaxThroughputBytesSent"),
        max_user_time: fields.unsigned("MaxUserTime"),
        network_interface_type: fields.text("NetworkInterfaceType"),
        ram_avg_usage: fields.float("RamAvgUsage"),
        ram_max_usage: fields.unsigned("RamMaxUsage"),
        session_id: fields.signed("SessionID"),
        signal_strength: fields.unsigned("SignalStrength"),
        speed_unit: fields.text("SpeedUnit"),
        timestamp: fields.timestamp("Timestamp"),
        // 병합 단계에서 할당
        session_guid: String::new(),
    };

    if fields.failures > 0 {
        debug!(
            "항목 {index}: 필드 {}개 읽기 실패, 기본값 사용",
            fields.failures
        );
    }
    metric
}

/// 필드 단위 읽기. 실패는 기록만 하고 기본값을 돌려준다
struct FieldReader<'a> {
    item: &'a dyn ResultItem,
    index: usize,
    failures: usize,
}

impl<'a> FieldReader<'a> {
    fn new(item: &'a dyn ResultItem, index: usize) -> Self {
        Self {
            item,
            index,
            failures: 0,
        }
    }

    fn read(&mut self, name: &str) -> Option<Variant> {
        match self.item.property(name) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("항목 {} 필드 {name} 건너뜀: {e}", self.index);
                self.failures += 1;
                None
            }
        }
    }

    fn unsigned(&mut self, name: &str) -> u64 {
        self.read(name).map(|v| v.to_u64()).unwrap_or_default()
    }

    fn signed(&mut self, name: &str) -> i64 {
        self.read(name).map(|v| v.to_i64()).unwrap_or_default()
    }

    fn float(&mut self, name: &str) -> f64 {
        self.read(name).map(|v| v.to_f64()).unwrap_or_default()
    }

    fn text(&mut self, name: &str) -> String {
        let Some(value) = self.read(name) else {
            return String::new();
        };
        if !matches!(value, Variant::String(_) | Variant::Null) {
            debug!(
                "항목 {} 필드 {name}: {} 값은 문자열로 쓰지 않음",
                self.index,
                value.type_name()
            );
        }
        value.to_text()
    }

    fn timestamp(&mut self, name: &str) -> Option<DateTime<Utc>> {
        self.read(name).and_then(|v| v.to_datetime())
    }
}
