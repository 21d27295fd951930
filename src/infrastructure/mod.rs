//! 基础设施层
//!
//! 持有文档解析库和本地存储，只暴露能力，不认识业务流程

pub mod document_reader;
pub mod storage;

pub use document_reader::{DocumentReader, LopdfReader};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
