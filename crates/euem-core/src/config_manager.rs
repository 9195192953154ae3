//! 설정 파일 관리.
//!
//! JSON 설정 파일을 로드한다. 수집기는 실행마다 상태가 없으므로
//! 설정을 파일로 다시 저장하지 않는다.

use crate::config::AppConfig;
use crate::error::CoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 관리자
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 로드된 설정
    config: AppConfig,
    /// 설정 파일 경로 (기본 설정 사용 시 None)
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 설정 로드
    ///
    /// 경로가 주어지면 해당 파일을 읽고, 없으면 기본 설정을 사용한다.
    /// 지정한 파일이 존재하지 않으면 에러.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let Some(path) = path else {
            debug!("설정 파일 미지정, 기본 설정 사용");
            return Ok(Self {
                config: AppConfig::default_config(),
                config_path: None,
            });
        };

        if !path.exists() {
            return Err(CoreError::Config(format!(
                "설정 파일이 존재하지 않습니다: {}",
                path.display()
            )));
        }

        let config = Self::load_from_file(path)?;
        info!("설정 파일 로드: {}", path.display());

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// 현재 설정 반환 (복제본)
    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    /// 특정 필드만 덮어쓰기 (CLI 인자 반영용)
    pub fn update_with<F>(&mut self, updater: F) -> Result<&AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        updater(&mut self.config);
        self.config.validate()?;
        Ok(&self.config)
    }

    /// 설정 파일 경로 반환
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// 파일에서 설정 로드 및 검증
    fn load_from_file(path: &Path) -> Result<AppConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
        })?;

        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
