use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题目与作答记录的本地存储目录
    pub storage_dir: String,
    /// 待导入的 PDF 试卷所在目录
    pub upload_folder: String,
    /// 同时解析的文档数量
    pub max_concurrent_uploads: usize,
    /// 文件名中未携带类别时使用的考试类别
    pub default_category: String,
    // --- 试卷提交 API 配置 ---
    pub paper_api_base_url: String,
    pub job_post_id: u64,
    pub api_token: Option<String>,
    /// 评分结束后是否把试卷提交到远程服务
    pub submit_papers: bool,
    /// 外部作答记录的 JSON 文件（可选）
    pub submissions_import_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: "exam_storage".to_string(),
            upload_folder: "uploads".to_string(),
            max_concurrent_uploads: 4,
            default_category: "SSC".to_string(),
            paper_api_base_url: "http://localhost:8080".to_string(),
            job_post_id: 1,
            api_token: None,
            submit_papers: false,
            submissions_import_file: None,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 读取 TOML 配置文件，然后再应用环境变量覆盖
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        config.with_env_overrides()
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            storage_dir: std::env::var("EXAM_STORAGE_DIR").unwrap_or(self.storage_dir),
            upload_folder: std::env::var("UPLOAD_FOLDER").unwrap_or(self.upload_folder),
            max_concurrent_uploads: parse_env("MAX_CONCURRENT_UPLOADS", "usize")?.unwrap_or(self.max_concurrent_uploads),
            default_category: std::env::var("DEFAULT_CATEGORY").unwrap_or(self.default_category),
            paper_api_base_url: std::env::var("PAPER_API_BASE_URL").unwrap_or(self.paper_api_base_url),
            job_post_id: parse_env("JOB_POST_ID", "u64")?.unwrap_or(self.job_post_id),
            api_token: std::env::var("API_TOKEN").ok().or(self.api_token),
            submit_papers: parse_env("SUBMIT_PAPERS", "bool")?.unwrap_or(self.submit_papers),
            submissions_import_file: std::env::var("SUBMISSIONS_IMPORT_FILE").ok().or(self.submissions_import_file),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        })
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_dir = \"/tmp/exam\"\njob_post_id = 7\nsubmit_papers = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.storage_dir, "/tmp/exam");
        assert_eq!(config.job_post_id, 7);
        assert!(config.submit_papers);
        assert_eq!(config.upload_folder, "uploads");
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "job_post_id = \"not a number\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, crate::error::AppError::Config(ConfigError::TomlParseFailed { .. })));
    }
}
