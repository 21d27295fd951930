//! 键值存储 - 基础设施层
//!
//! 只负责按名字读写一段文本，不关心内容格式和版本

use crate::error::{AppResult, StorageError};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// 键值存储能力
pub trait KeyValueStore: Send + Sync {
    /// 读取条目，不存在时返回 None
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// 整体覆盖写入条目
    fn put(&self, key: &str, value: &str) -> AppResult<()>;
}

/// 以目录下的 JSON 文件作为条目的存储
///
/// 条目 `exam_questions` 对应文件 `<dir>/exam_questions.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                source,
            }
            .into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        let write_failed = |source| StorageError::WriteFailed {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_failed)?;

        // 先写临时文件再重命名，避免留下写了一半的条目
        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp_path, value).map_err(write_failed)?;
        fs::rename(&tmp_path, &path).map_err(write_failed)?;

        debug!("已写入存储条目: {}", path.display());
        Ok(())
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.get("exam_questions").unwrap(), None);
    }

    #[test]
    fn test_file_store_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));

        store.put("exam_submissions", "[]").unwrap();
        store.put("exam_submissions", "[1]").unwrap();

        assert_eq!(store.get("exam_submissions").unwrap().as_deref(), Some("[1]"));
        assert!(dir.path().join("nested/exam_submissions.json").exists());
        assert!(!dir.path().join("nested/.exam_submissions.json.tmp").exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
