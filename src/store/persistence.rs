//! 持久化适配器
//!
//! 每个条目保存为带版本号的 JSON：
//!
//! ```json
//! { "version": 3, "savedAt": "2026-01-01T00:00:00Z", "items": [ ... ] }
//! ```
//!
//! 旧格式（直接是数组）按版本 0 读取。

use crate::error::{AppResult, StorageError};
use crate::infrastructure::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const QUESTIONS_KEY: &str = "exam_questions";
pub const SUBMISSIONS_KEY: &str = "exam_submissions";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedBlob<T> {
    version: u64,
    saved_at: DateTime<Utc>,
    items: Vec<T>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedBlobRef<'a, T> {
    version: u64,
    saved_at: DateTime<Utc>,
    items: &'a [T],
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredEntry<T> {
    Versioned(PersistedBlob<T>),
    Legacy(Vec<T>),
}

/// 读取到的条目及其版本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: u64,
    /// 旧格式和不存在的条目没有保存时间
    pub saved_at: Option<DateTime<Utc>>,
    pub items: Vec<T>,
}

/// 持久化适配器
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_shared(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// 读取条目，不存在时返回空集合和版本 0
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> AppResult<Versioned<T>> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(Versioned {
                version: 0,
                saved_at: None,
                items: Vec::new(),
            });
        };

        let entry: StoredEntry<T> = serde_json::from_str(&raw).map_err(|source| StorageError::Corrupted {
            key: key.to_string(),
            source,
        })?;

        Ok(match entry {
            StoredEntry::Versioned(blob) => Versioned {
                version: blob.version,
                saved_at: Some(blob.saved_at),
                items: blob.items,
            },
            StoredEntry::Legacy(items) => Versioned {
                version: 0,
                saved_at: None,
                items,
            },
        })
    }

    /// 写入条目
    ///
    /// 存储中的版本必须仍是 `expected_version`，否则说明有其他写入者，返回版本冲突。
    /// 成功后返回新版本号。
    pub fn save<T: Serialize>(&self, key: &str, items: &[T], expected_version: u64) -> AppResult<u64> {
        let current = self.current_version(key)?;
        if current != expected_version {
            return Err(StorageError::VersionConflict {
                key: key.to_string(),
                expected: expected_version,
                found: current,
            }
            .into());
        }

        let version = expected_version + 1;
        let blob = PersistedBlobRef {
            version,
            saved_at: Utc::now(),
            items,
        };
        let json = serde_json::to_string_pretty(&blob).map_err(|source| StorageError::Corrupted {
            key: key.to_string(),
            source,
        })?;
        self.backend.put(key, &json)?;

        debug!("条目 {} 已保存，版本 {} → {}", key, expected_version, version);
        Ok(version)
    }

    fn current_version(&self, key: &str) -> AppResult<u64> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StoredVersion {
            Versioned { version: u64 },
            // 旧格式的数组没有版本号，视为 0
            Legacy(Vec<serde_json::Value>),
        }

        let Some(raw) = self.backend.get(key)? else {
            return Ok(0);
        };
        let stored: StoredVersion = serde_json::from_str(&raw).map_err(|source| StorageError::Corrupted {
            key: key.to_string(),
            source,
        })?;

        Ok(match stored {
            StoredVersion::Versioned { version } => version,
            StoredVersion::Legacy(_) => 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::infrastructure::MemoryStore;

    #[test]
    fn test_missing_entry_is_empty() {
        let p = Persistence::new(MemoryStore::new());
        let loaded: Versioned<String> = p.load(QUESTIONS_KEY).unwrap();
        assert_eq!(loaded.version, 0);
        assert!(loaded.items.is_empty());
    }

    #[test]
    fn test_save_bumps_version() {
        let p = Persistence::new(MemoryStore::new());
        let v1 = p.save(QUESTIONS_KEY, &["a".to_string()], 0).unwrap();
        let v2 = p.save(QUESTIONS_KEY, &["a".to_string(), "b".to_string()], v1).unwrap();
        assert_eq!((v1, v2), (1, 2));

        let loaded: Versioned<String> = p.load(QUESTIONS_KEY).unwrap();
        assert_eq!(loaded.version, 2);
        assert!(loaded.saved_at.is_some());
        assert_eq!(loaded.items, vec!["a", "b"]);
    }

    #[test]
    fn test_stale_writer_gets_conflict() {
        let p = Persistence::new(MemoryStore::new());
        p.save(SUBMISSIONS_KEY, &[1u32], 0).unwrap();

        let err = p.save(SUBMISSIONS_KEY, &[2u32], 0).unwrap_err();
        assert!(matches!(
            err,
            AppError::Storage(StorageError::VersionConflict { expected: 0, found: 1, .. })
        ));
    }

    #[test]
    fn test_legacy_array_loads_as_version_zero() {
        let store = MemoryStore::new();
        store.put(QUESTIONS_KEY, r#"["x","y"]"#).unwrap();
        let p = Persistence::new(store);

        let loaded: Versioned<String> = p.load(QUESTIONS_KEY).unwrap();
        assert_eq!(loaded.version, 0);
        assert_eq!(loaded.items.len(), 2);
        assert_eq!(p.save(QUESTIONS_KEY, &["z".to_string()], 0).unwrap(), 1);
    }

    #[test]
    fn test_corrupted_entry() {
        let store = MemoryStore::new();
        store.put(QUESTIONS_KEY, "{not json").unwrap();
        let p = Persistence::new(store);

        let err = p.load::<String>(QUESTIONS_KEY).unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::Corrupted { .. })));
    }

    #[test]
    fn test_save_does_not_overwrite_corrupted_entry() {
        let store = Arc::new(MemoryStore::new());
        store.put(QUESTIONS_KEY, "{not json").unwrap();
        let p = Persistence::from_shared(store.clone());

        let err = p.save(QUESTIONS_KEY, &["x".to_string()], 0).unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::Corrupted { .. })));
        assert_eq!(store.get(QUESTIONS_KEY).unwrap().as_deref(), Some("{not json"));
    }
}
