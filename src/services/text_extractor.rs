//! 文本提取服务 - 业务能力层
//!
//! 把一个上传的文档变成一段完整文本，页与页之间插入换行分隔

use crate::error::{AppResult, DocumentError};
use crate::infrastructure::{DocumentReader, LopdfReader};
use std::sync::Arc;
use tracing::{debug, info};

/// 页面分隔符，插在每一页文本之前
pub const PAGE_SEPARATOR: &str = "\n";

/// 提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

/// 文本提取服务
///
/// 职责：
/// - 按页码顺序拼接所有页面文本
/// - 文档无法解析时整体失败，不保留部分结果
/// - 解析在阻塞线程池中执行，不阻塞调用方
#[derive(Clone)]
pub struct TextExtractor {
    reader: Arc<dyn DocumentReader>,
}

impl TextExtractor {
    /// 使用 lopdf 创建提取服务
    pub fn new() -> Self {
        Self::with_reader(LopdfReader)
    }

    /// 使用自定义读取器创建
    pub fn with_reader(reader: impl DocumentReader + 'static) -> Self {
        Self {
            reader: Arc::new(reader),
        }
    }

    /// 异步提取文档文本
    pub async fn extract(&self, bytes: Vec<u8>) -> AppResult<ExtractedText> {
        let reader = Arc::clone(&self.reader);
        let size = bytes.len();
        debug!("开始提取文档文本，大小: {} 字节", size);

        let result = tokio::task::spawn_blocking(move || Self::extract_with(reader.as_ref(), &bytes))
            .await
            .map_err(|e| DocumentError::TaskFailed(e.to_string()))??;

        info!(
            "✓ 文本提取完成: {} 页, {} 个字符",
            result.page_count,
            result.text.chars().count()
        );
        Ok(result)
    }

    fn extract_with(reader: &dyn DocumentReader, bytes: &[u8]) -> AppResult<ExtractedText> {
        let pages = reader.read_pages(bytes)?;
        Ok(join_pages(&pages))
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// 拼接页面文本
///
/// 每页内部的空白压缩为单个空格，每页前加一个分隔符
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> ExtractedText {
    let mut text = String::new();
    for page in pages {
        text.push_str(PAGE_SEPARATOR);
        text.push_str(&normalize_whitespace(page.as_ref()));
    }
    ExtractedText {
        text,
        page_count: pages.len(),
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
