use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::DEFAULT_STATE_KEY;

const APP_DIR: &str = "nightform";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the {0} directory")]
    NoDirectory(&'static str),
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 状态文档的存储键
    pub storage_key: String,
    /// 覆盖默认数据目录 (~/.local/share/nightform/)
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub double_click_ms: u64,
    pub card_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STATE_KEY.to_string(),
            data_dir: None,
            log_level: "info".to_string(),
            double_click_ms: 400,
            card_width: 18,
        }
    }
}

impl Config {
    pub fn log_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// 数据目录，不存在时创建
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or(ConfigError::NoDirectory("data"))?
                .join(APP_DIR),
        };
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// 配置文件路径 (~/.config/nightform/config.toml)
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir()
        .ok_or(ConfigError::NoDirectory("config"))?
        .join(APP_DIR);
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// 加载配置；文件不存在时写入默认配置
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }
    let config = Config::default();
    save_config(path, &config)?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}
