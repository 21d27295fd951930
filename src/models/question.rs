use crate::error::ValidationError;
use crate::models::set_name::SetName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 选项标签与下标的对应关系
static OPTION_LABELS: phf::Map<&'static str, OptionLabel> = phf::phf_map! {
    "A" => OptionLabel::A,
    "B" => OptionLabel::B,
    "C" => OptionLabel::C,
    "D" => OptionLabel::D,
};

/// 选项标签（A→0, B→1, C→2, D→3）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    /// 从标签字母解析，其他任何输入返回 None
    pub fn from_letter(s: &str) -> Option<Self> {
        OPTION_LABELS.get(s).copied()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            OptionLabel::A => 'A',
            OptionLabel::B => 'B',
            OptionLabel::C => 'C',
            OptionLabel::D => 'D',
        }
    }

    /// 根据选项文本反查标签
    ///
    /// 有重复文本时取第一个匹配，仅用于兼容旧数据
    pub fn from_option_text(text: &str, options: &[String; 4]) -> Option<Self> {
        options
            .iter()
            .position(|o| o == text)
            .and_then(Self::from_index)
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// 题目
///
/// 正确答案以选项标签保存，显示文本和导出字母都由它推导
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    pub id: String,
    pub question_text: String,
    pub options: [String; 4],
    pub correct_option: OptionLabel,
    pub set_name: SetName,
    pub category: String,
}

impl Question {
    /// 创建新题目，自动生成ID并去除首尾空白
    pub fn new(
        question_text: &str,
        options: [&str; 4],
        correct_option: OptionLabel,
        set_name: SetName,
        category: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question_text: question_text.trim().to_string(),
            options: options.map(|o| o.trim().to_string()),
            correct_option,
            set_name,
            category: category.trim().to_string(),
        }
    }

    /// 正确选项的文本
    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_option.index()]
    }

    /// 导出格式使用的正确答案字母
    pub fn export_letter(&self) -> char {
        self.correct_option.letter()
    }

    /// 是否属于指定的套别和类别
    pub fn belongs_to(&self, set_name: SetName, category: &str) -> bool {
        self.set_name == set_name && self.category == category
    }
}

/// 持久化格式
///
/// 同时写出 `correctOption` 和 `correctAnswer`，读取时兼容只有 `correctAnswer` 的旧记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    id: String,
    question_text: String,
    options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_option: Option<OptionLabel>,
    #[serde(default)]
    correct_answer: String,
    set_name: SetName,
    #[serde(default)]
    category: String,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = String;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let options: [String; 4] = record
            .options
            .try_into()
            .map_err(|v: Vec<String>| format!("题目 {} 需要 4 个选项，实际 {} 个", record.id, v.len()))?;

        let correct_option = match record.correct_option {
            Some(label) => label,
            None => OptionLabel::from_option_text(&record.correct_answer, &options).ok_or_else(|| {
                format!(
                    "题目 {} 的正确答案 '{}' 不对应任何选项",
                    record.id, record.correct_answer
                )
            })?,
        };

        Ok(Self {
            id: record.id,
            question_text: record.question_text,
            options,
            correct_option,
            set_name: record.set_name,
            category: record.category,
        })
    }
}

impl From<Question> for QuestionRecord {
    fn from(q: Question) -> Self {
        let correct_answer = q.correct_answer().to_string();
        Self {
            id: q.id,
            question_text: q.question_text,
            options: q.options.into(),
            correct_option: Some(q.correct_option),
            correct_answer,
            set_name: q.set_name,
            category: q.category,
        }
    }
}

/// 手动录入题目的表单数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub question_text: String,
    pub options: [String; 4],
    /// 选项字母（A-D）或选项原文
    pub correct_answer: String,
    pub set_name: Option<SetName>,
    pub category: String,
}

impl NewQuestion {
    /// 校验表单并生成题目
    pub fn validate(&self, default_set: SetName) -> Result<Question, ValidationError> {
        if self.question_text.trim().is_empty() {
            return Err(ValidationError::EmptyQuestionText);
        }
        for (label, option) in OptionLabel::ALL.iter().zip(self.options.iter()) {
            if option.trim().is_empty() {
                return Err(ValidationError::EmptyOption {
                    label: label.letter(),
                });
            }
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        let trimmed: [String; 4] = self.options.clone().map(|o| o.trim().to_string());
        let answer = self.correct_answer.trim();
        let correct_option = OptionLabel::from_letter(answer)
            .or_else(|| OptionLabel::from_option_text(answer, &trimmed))
            .ok_or_else(|| ValidationError::UnknownCorrectAnswer {
                answer: self.correct_answer.clone(),
            })?;

        Ok(Question::new(
            &self.question_text,
            [&trimmed[0], &trimmed[1], &trimmed[2], &trimmed[3]],
            correct_option,
            self.set_name.unwrap_or(default_set),
            &self.category,
        ))
    }
}
