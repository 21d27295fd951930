//! 文档读取器 - 基础设施层
//!
//! 只负责"打开文档、按页取出原始文本"，不认识题目格式

use crate::error::{AppError, AppResult, DocumentError};
use lopdf::Document;
use tracing::debug;

/// 文档读取能力
///
/// 返回的页面文本必须按页码从小到大排列
pub trait DocumentReader: Send + Sync {
    fn read_pages(&self, bytes: &[u8]) -> AppResult<Vec<String>>;
}

/// 基于 lopdf 的 PDF 读取器
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfReader;

impl DocumentReader for LopdfReader {
    fn read_pages(&self, bytes: &[u8]) -> AppResult<Vec<String>> {
        let doc = Document::load_mem(bytes).map_err(AppError::document_load_failed)?;

        // get_pages 返回 BTreeMap，迭代顺序即页码顺序
        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(DocumentError::NoPages.into());
        }
        debug!("文档共 {} 页", pages.len());

        let mut texts = Vec::with_capacity(pages.len());
        for page_num in pages.keys() {
            let text = doc
                .extract_text(&[*page_num])
                .map_err(|e| DocumentError::PageExtractionFailed {
                    page: *page_num,
                    source: Box::new(e),
                })?;
            texts.push(text);
        }

        Ok(texts)
    }
}

/// 生成每页一行文本的 PDF（Courier 字体，WinAnsiEncoding）
#[cfg(test)]
pub(crate) fn build_test_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_come_back_in_order() {
        let bytes = build_test_pdf(&["Q1. What is 2+2? A) 3 B) 4", "C) 5 D) 6 Answer: B"]);
        let pages = LopdfReader.read_pages(&bytes).unwrap();

        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Q1. What is 2+2?"));
        assert!(pages[1].contains("Answer: B"));
        assert!(!pages[0].contains("Answer"));
    }

    #[test]
    fn test_garbage_bytes_fail_to_load() {
        let err = LopdfReader.read_pages(b"definitely not a pdf").unwrap_err();
        assert!(err.is_document_error());
    }

    #[test]
    fn test_empty_payload_fails_to_load() {
        assert!(LopdfReader.read_pages(&[]).is_err());
    }
}
