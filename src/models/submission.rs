use crate::models::set_name::SetName;
use serde::{Deserialize, Serialize};

/// 考生作答记录
///
/// 由外部产生，评分时只会被修改一次（`is_graded` 从 false 变为 true）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub question_id: String,
    pub user_answer: String,
    #[serde(default)]
    pub is_graded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub ai_feedback: String,
    pub set_name: SetName,
    #[serde(default)]
    pub category: String,
}

impl Submission {
    /// 创建一条未评分的作答记录
    pub fn new(question_id: &str, user_answer: &str, set_name: SetName, category: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question_id: question_id.to_string(),
            user_answer: user_answer.trim().to_string(),
            is_graded: false,
            is_correct: None,
            ai_feedback: String::new(),
            set_name,
            category: category.to_string(),
        }
    }
}
