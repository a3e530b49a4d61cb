#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, warn};
use thiserror::Error;

use crate::models::AppState;

/// 默认存储键
pub const DEFAULT_STATE_KEY: &str = "nightform.v1";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// 字符串键值存储
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// 基于目录的存储，每个键一个文件
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\']);
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }
}

/// 内存存储
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 将整个 AppState 作为一个 JSON 文档存在固定键下
pub struct Store {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl Store {
    pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), DEFAULT_STATE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// 加载状态；缺失或损坏时返回默认数据，从不失败
    pub fn load(&self) -> AppState {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no saved state under {:?}, seeding", self.key);
                return AppState::seed();
            }
            Err(e) => {
                warn!("failed to read saved state: {e}");
                return AppState::seed();
            }
        };

        match parse_state(&raw) {
            Some(state) => state,
            None => {
                warn!("saved state under {:?} is malformed, seeding", self.key);
                AppState::seed()
            }
        }
    }

    /// 完整覆盖写入
    pub fn save(&mut self, state: &AppState) -> Result<(), StorageError> {
        let content = serde_json::to_string(state)?;
        self.backend.set(&self.key, &content)?;
        debug!("saved {} bytes under {:?}", content.len(), self.key);
        Ok(())
    }
}

/// 浅层检查：`days` 必须是数组
fn parse_state(raw: &str) -> Option<AppState> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    if !value.get("days").is_some_and(serde_json::Value::is_array) {
        return None;
    }
    serde_json::from_value(value).ok()
}
