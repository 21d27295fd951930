use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档解析错误（上传的文件无法打开或解码）
    #[error("文档错误: {0}")]
    Document(#[from] DocumentError),
    /// 题目文本解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 本地存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 远程 API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 表单校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文档相关错误
#[derive(Debug, Error)]
pub enum DocumentError {
    /// 文档无法加载（格式错误、已损坏、已加密）
    #[error("无法打开文档: {source}")]
    LoadFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 某一页的文本提取失败
    #[error("第 {page} 页文本提取失败: {source}")]
    PageExtractionFailed {
        page: u32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 文档没有任何页面
    #[error("文档不包含任何页面")]
    NoPages,
    /// 后台提取任务异常退出
    #[error("文本提取任务异常退出: {0}")]
    TaskFailed(String),
}

/// 题目文本解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 正则表达式构建失败
    #[error("题目模式构建失败: {0}")]
    PatternFailed(#[from] regex::Error),
}

/// 本地存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 读取存储条目失败
    #[error("读取存储条目失败 ({key}): {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入存储条目失败
    #[error("写入存储条目失败 ({key}): {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// 存储内容不是合法 JSON
    #[error("存储条目 {key} 内容无法解析: {source}")]
    Corrupted {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// 其他写入者已更新该条目
    #[error("存储条目 {key} 版本冲突: 期望 {expected}, 实际 {found}")]
    VersionConflict {
        key: String,
        expected: u64,
        found: u64,
    },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: Option<String>,
    },
    /// JSON 序列化或解析失败
    #[error("JSON解析失败: {0}")]
    JsonParseFailed(#[from] serde_json::Error),
}

/// 表单校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 题干为空
    #[error("题干不能为空")]
    EmptyQuestionText,
    /// 选项为空
    #[error("选项 {label} 不能为空")]
    EmptyOption { label: char },
    /// 正确答案无法对应到任何选项
    #[error("正确答案 '{answer}' 不对应任何选项")]
    UnknownCorrectAnswer { answer: String },
    /// 科目类别为空
    #[error("考试类别不能为空")]
    EmptyCategory,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("配置文件读取失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件 TOML 解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::Document(DocumentError::LoadFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed(err))
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Parse(ParseError::PatternFailed(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文档加载错误
    pub fn document_load_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Document(DocumentError::LoadFailed {
            source: Box::new(source),
        })
    }

    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 是否属于"文档无法解析"这一类错误
    pub fn is_document_error(&self) -> bool {
        matches!(self, AppError::Document(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_conflict_message() {
        let err = AppError::from(StorageError::VersionConflict {
            key: "exam_questions".to_string(),
            expected: 3,
            found: 4,
        });
        let msg = err.to_string();
        assert!(msg.contains("exam_questions"));
        assert!(msg.contains("期望 3"));
        assert!(msg.contains("实际 4"));
    }

    #[test]
    fn test_document_error_classification() {
        assert!(AppError::from(DocumentError::NoPages).is_document_error());
        assert!(!AppError::from(ValidationError::EmptyCategory).is_document_error());
    }
}
