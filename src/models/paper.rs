use crate::models::question::Question;
use crate::models::set_name::SetName;
use serde::{Deserialize, Serialize};

/// 提交到远程服务的试卷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub category: String,
    pub sets: Vec<PaperSet>,
}

impl Paper {
    pub fn question_count(&self) -> usize {
        self.sets.iter().map(|s| s.questions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// 试卷中的一套题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperSet {
    pub set_name: SetName,
    pub questions: Vec<PaperQuestion>,
}

/// 导出格式的题目，正确答案只保留字母
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperQuestion {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
}

impl From<&Question> for PaperQuestion {
    fn from(q: &Question) -> Self {
        let [a, b, c, d] = q.options.clone();
        Self {
            question_text: q.question_text.clone(),
            option_a: a,
            option_b: b,
            option_c: c,
            option_d: d,
            correct_answer: q.export_letter().to_string(),
        }
    }
}
