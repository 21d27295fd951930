/// 试卷 API 客户端
///
/// 封装所有与试卷创建接口相关的调用逻辑
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::Paper;
use serde_json::Value;
use tracing::{debug, warn};

const CREATE_PAPER_PATH: &str = "api/question-paper/create";

/// 试卷 API 客户端
pub struct PaperClient {
    http: reqwest::Client,
    base_url: String,
    job_post_id: u64,
    token: Option<String>,
}

impl PaperClient {
    /// 创建新的试卷客户端
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.paper_api_base_url, config.job_post_id, config.api_token.clone())
    }

    pub fn with_base_url(base_url: &str, job_post_id: u64, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            job_post_id,
            token,
        }
    }

    /// 创建试卷的接口地址
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}?jobPostId={}",
            self.base_url, CREATE_PAPER_PATH, self.job_post_id
        )
    }

    /// 提交试卷
    ///
    /// 失败不会重试，由调用方决定如何提示
    pub async fn create_paper(&self, paper: &Paper) -> AppResult<Value> {
        let endpoint = self.endpoint();
        debug!("POST {}", endpoint);

        let mut request = self.http.post(&endpoint).json(paper);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        if !status.is_success() {
            warn!("试卷提交失败: HTTP {}", status);
            return Err(ApiError::BadResponse {
                endpoint,
                status: status.as_u16(),
                body: (!body.is_empty()).then_some(body),
            }
            .into());
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OptionLabel, Question, SetName};
    use crate::services::paper_service::build_paper;

    fn sample_paper() -> Paper {
        let q = Question::new("What is 2+2?", ["3", "4", "5", "6"], OptionLabel::B, SetName::A, "SSC");
        build_paper(&[q], "SSC")
    }

    #[test]
    fn test_endpoint() {
        let client = PaperClient::with_base_url("http://api.example.com/", 1, None);
        assert_eq!(
            client.endpoint(),
            "http://api.example.com/api/question-paper/create?jobPostId=1"
        );
    }

    #[tokio::test]
    async fn test_create_paper_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/question-paper/create")
            .match_query(mockito::Matcher::UrlEncoded("jobPostId".into(), "3".into()))
            .match_header("authorization", "Bearer secret")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({ "category": "SSC" })))
            .with_status(201)
            .with_body(r#"{"id": 42}"#)
            .create_async()
            .await;

        let client = PaperClient::with_base_url(&server.url(), 3, Some("secret".to_string()));
        let value = client.create_paper(&sample_paper()).await.unwrap();

        assert_eq!(value["id"], 42);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_paper_bad_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/question-paper/create")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = PaperClient::with_base_url(&server.url(), 1, None);
        let err = client.create_paper(&sample_paper()).await.unwrap_err();

        match err {
            AppError::Api(ApiError::BadResponse { status, body, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(body.as_deref(), Some("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
