use crate::models::set_name::SetName;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 待导入的文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub path: PathBuf,
    pub set_name: SetName,
    pub category: String,
}

impl UploadedDocument {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// 从文件名解析类别和套别
///
/// `SSC_A` → (SSC, A)，`RRB-b` → (RRB, B)，只有套别时使用默认类别
pub fn parse_upload_name(stem: &str, default_category: &str) -> Option<(String, SetName)> {
    match stem.rsplit_once(['_', '-']) {
        Some((category, set)) => {
            let set_name = SetName::from_str(set)?;
            let category = category.trim();
            if category.is_empty() {
                return None;
            }
            Some((category.to_string(), set_name))
        }
        None => SetName::from_str(stem).map(|set_name| (default_category.to_string(), set_name)),
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// 扫描文件夹中所有待导入的 PDF，按文件名排序
///
/// 文件名不符合 `<类别>_<套别>.pdf` 规则的文件会被跳过
pub async fn scan_upload_folder(folder_path: &str, default_category: &str) -> Result<Vec<UploadedDocument>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut documents = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_pdf(&path) {
            continue;
        }

        let stem = path.file_stem().unwrap_or_default().to_string_lossy().to_string();
        match parse_upload_name(&stem, default_category) {
            Some((category, set_name)) => {
                tracing::info!("发现文档: {} (类别 {}, Set {})", stem, category, set_name);
                documents.push(UploadedDocument {
                    path,
                    set_name,
                    category,
                });
            }
            None => {
                tracing::warn!("文件名无法识别套别，已跳过: {}", path.display());
            }
        }
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload_name() {
        assert_eq!(
            parse_upload_name("SSC_A", "X"),
            Some(("SSC".to_string(), SetName::A))
        );
        assert_eq!(
            parse_upload_name("RRB-b", "X"),
            Some(("RRB".to_string(), SetName::B))
        );
        assert_eq!(
            parse_upload_name("SSC_CGL_D", "X"),
            Some(("SSC_CGL".to_string(), SetName::D))
        );
        assert_eq!(parse_upload_name("C", "SSC"), Some(("SSC".to_string(), SetName::C)));
        assert_eq!(parse_upload_name("SSC_Z", "X"), None);
        assert_eq!(parse_upload_name("_A", "X"), None);
        assert_eq!(parse_upload_name("notes", "X"), None);
    }

    #[tokio::test]
    async fn test_scan_upload_folder() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["SSC_B.pdf", "SSC_A.PDF", "readme.txt", "unknown.pdf"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let docs = scan_upload_folder(dir.path().to_str().unwrap(), "SSC").await.unwrap();
        let names: Vec<String> = docs.iter().map(|d| d.file_name()).collect();
        assert_eq!(names, vec!["SSC_A.PDF", "SSC_B.pdf"]);
        assert_eq!(docs[0].set_name, SetName::A);
    }

    #[tokio::test]
    async fn test_scan_missing_folder() {
        assert!(scan_upload_folder("/definitely/not/here", "SSC").await.is_err());
    }
}
