//! # euem-app
//!
//! UA 엔드포인트 메트릭 수집기 바이너리 진입점.
//! 한 번 실행되어 Citrix EUEM 엔드포인트 메트릭을 읽고, 세션 GUID를 붙여
//! 레코드당 한 줄씩 표준 출력에 쓴 뒤 종료한다.
//!
//! 표준 출력은 데이터 채널이다. 로그와 진단 메시지는 모두 표준 에러로 보낸다.

mod pipeline;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use euem_core::config::AppConfig;
use euem_core::config_manager::ConfigManager;
use euem_core::ports::instrumentation::InstrumentationProvider;
use euem_core::ports::session_guid_source::SessionGuidSource;
use euem_monitor::platform::{create_platform_guid_source, create_platform_provider};
use euem_monitor::snapshot::{Snapshot, StaticGuidSource};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Citrix EUEM 엔드포인트 메트릭 수집기
///
/// WMI에서 엔드포인트 메트릭을 읽어 key=value 줄로 출력한다.
#[derive(Parser, Debug)]
#[command(name = "ua-endpoint-metrics")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (JSON)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// WMI 네임스페이스 (기본: ROOT\Citrix\EUEM)
    #[arg(long)]
    namespace: Option<String>,

    /// 조회할 WMI 클래스 이름
    #[arg(long = "class")]
    class_name: Option<String>,

    /// 세션 GUID 조회 비활성화
    #[arg(long)]
    no_session_guids: bool,

    /// 라이브 WMI 대신 스냅샷 파일 재생
    #[arg(long)]
    replay: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l')]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("설정 오류: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // 로깅 초기화 (RUST_LOG > --log-level > 설정 파일)
    let log_filter = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    match collect(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("수집 실패: {e:#}");
            eprintln!("ua-endpoint-metrics: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// 설정 파일 로드 후 CLI 인자로 덮어쓰기
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut manager = ConfigManager::load(args.config.as_deref()).context("설정 로드 실패")?;

    let config = manager
        .update_with(|config| {
            if let Some(namespace) = &args.namespace {
                config.provider.namespace = namespace.clone();
            }
            if let Some(class_name) = &args.class_name {
                config.provider.class_name = class_name.clone();
            }
            if args.no_session_guids {
                config.identifier_source.enabled = false;
            }
        })
        .context("CLI 인자 반영 실패")?;

    Ok(config.clone())
}

/// 제공자/GUID 소스를 고르고 파이프라인 실행
fn collect(args: &Args, config: &AppConfig) -> Result<()> {
    let (provider, guid_source): (Box<dyn InstrumentationProvider>, Box<dyn SessionGuidSource>) =
        match &args.replay {
            Some(path) => {
                let snapshot = Snapshot::from_file(path).context("스냅샷 로드 실패")?;
                let (provider, guids) = snapshot.into_parts();
                let guids = if config.identifier_source.enabled {
                    guids
                } else {
                    StaticGuidSource::empty()
                };
                (Box::new(provider), Box::new(guids))
            }
            None => (
                create_platform_provider(),
                create_platform_guid_source(&config.identifier_source),
            ),
        };

    let stdout = io::stdout();
    let summary = pipeline::run(provider.as_ref(), guid_source.as_ref(), config, stdout.lock())
        .context("메트릭 수집 실패")?;

    debug!(
        "완료: {}줄, 매핑 {}, 미매핑 {}, 세션 없음 {}",
        summary.written, summary.merge.mapped, summary.merge.unmapped, summary.merge.without_session
    );
    Ok(())
}
