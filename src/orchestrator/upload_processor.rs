//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 读取一份待导入的 PDF，提取文本并解析出题目。
//! 只产出解析结果，不修改仓库；写入由 batch_processor 按顺序完成。

use crate::error::{AppError, AppResult};
use crate::models::UploadedDocument;
use crate::services::{ParseReport, QuestionParser, TextExtractor};
use crate::utils::logging::truncate_text;
use tracing::{debug, error, info};

/// 处理单个文档
///
/// # 参数
/// - `extractor`: 文本提取服务
/// - `parser`: 题目解析服务
/// - `document`: 待导入的文档
/// - `doc_index`: 文档序号（从 1 开始，仅用于日志）
pub async fn process_upload(
    extractor: &TextExtractor,
    parser: &QuestionParser,
    document: &UploadedDocument,
    doc_index: usize,
) -> AppResult<ParseReport> {
    log_upload_start(doc_index, document);

    let bytes = tokio::fs::read(&document.path).await.map_err(|e| {
        error!("[文档 {}] 读取文件失败: {}", doc_index, e);
        AppError::document_load_failed(e)
    })?;

    let extracted = extractor.extract(bytes).await.map_err(|e| {
        error!("[文档 {}] ❌ 文本提取失败: {}", doc_index, e);
        e
    })?;
    debug!(
        "[文档 {}] 文本预览: {}",
        doc_index,
        truncate_text(extracted.text.trim(), 80)
    );

    let report = parser.parse(&extracted.text, document.set_name, &document.category);
    log_upload_complete(doc_index, &report, extracted.page_count);

    Ok(report)
}

// ========== 日志辅助函数 ==========

fn log_upload_start(doc_index: usize, document: &UploadedDocument) {
    info!("\n{}", "─".repeat(60));
    info!(
        "[文档 {}] 📄 开始处理: {} (类别 {}, Set {})",
        doc_index,
        document.file_name(),
        document.category,
        document.set_name
    );
}

fn log_upload_complete(doc_index: usize, report: &ParseReport, page_count: usize) {
    info!(
        "[文档 {}] ✓ 解析完成: {} 页, {} 道题目, 跳过 {} 个题块",
        doc_index,
        page_count,
        report.questions.len(),
        report.skipped.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::DocumentReader;
    use crate::models::SetName;

    struct TextReader;

    impl DocumentReader for TextReader {
        fn read_pages(&self, bytes: &[u8]) -> AppResult<Vec<String>> {
            Ok(vec![String::from_utf8_lossy(bytes).to_string()])
        }
    }

    fn document(path: std::path::PathBuf) -> UploadedDocument {
        UploadedDocument {
            path,
            set_name: SetName::B,
            category: "RRB".to_string(),
        }
    }

    #[tokio::test]
    async fn test_process_upload_parses_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RRB_B.pdf");
        std::fs::write(&path, "Q1. Sky colour? A) Red B) Blue C) Green D) Black Answer: B").unwrap();

        let extractor = TextExtractor::with_reader(TextReader);
        let parser = QuestionParser::new().unwrap();
        let report = process_upload(&extractor, &parser, &document(path), 1)
            .await
            .unwrap();

        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].correct_answer(), "Blue");
        assert_eq!(report.questions[0].set_name, SetName::B);
        assert_eq!(report.questions[0].category, "RRB");
    }

    #[tokio::test]
    async fn test_process_upload_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = TextExtractor::with_reader(TextReader);
        let parser = QuestionParser::new().unwrap();

        let result = process_upload(&extractor, &parser, &document(dir.path().join("gone.pdf")), 1).await;
        assert!(result.unwrap_err().is_document_error());
    }
}
