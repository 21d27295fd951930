//! 题目解析服务 - 业务能力层
//!
//! 从提取出的文本中识别固定格式的选择题：
//!
//! ```text
//! Q1. 题干 A) 选项 B) 选项 C) 选项 D) 选项 Answer: B
//! ```
//!
//! 每个 `Q<n>.` 标记开启一个题块，题块之间互不跨越。
//! 不完整或答案标签无法识别的题块会被跳过并记录在报告中。
//!
//! 题干中引用其他题号（如 "as in Q2. above"）同样会开启新题块，
//! 引用之前的部分被记为不完整并出现在跳过列表中，引用之后的部分按新题块解析。
//! 题号只按词边界识别，不依赖换行，因为同一页的文本已被压缩为一行。

use crate::error::AppResult;
use crate::models::{OptionLabel, Question, SetName};
use regex::Regex;
use tracing::{debug, warn};

const MARKER_PATTERN: &str = r"\bQ(\d+)\.";
const BLOCK_PATTERN: &str =
    r"(?s)^Q\d+\.\s*(.*?)A\)\s*(.*?)B\)\s*(.*?)C\)\s*(.*?)D\)\s*(.*?)Answer:\s*(\S)";

/// 题块被跳过的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 缺少选项或答案标记
    Incomplete,
    /// 答案标签不是 A-D
    UnrecognizedLabel(String),
}

/// 被跳过的题块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// 题块标记，例如 `Q3`
    pub marker: String,
    /// 题块在文本中的字节偏移
    pub offset: usize,
    pub reason: SkipReason,
}

/// 解析结果
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub questions: Vec<Question>,
    pub skipped: Vec<SkippedBlock>,
}

/// 解析结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// 至少解析出一道题
    Parsed { count: usize, skipped: usize },
    /// 没有任何题块符合格式（警告，不是错误）
    NoQuestionsFound { skipped: usize },
}

impl ParseReport {
    pub fn outcome(&self) -> ParseOutcome {
        if self.questions.is_empty() {
            ParseOutcome::NoQuestionsFound {
                skipped: self.skipped.len(),
            }
        } else {
            ParseOutcome::Parsed {
                count: self.questions.len(),
                skipped: self.skipped.len(),
            }
        }
    }
}

/// 题目解析服务
#[derive(Debug, Clone)]
pub struct QuestionParser {
    marker_re: Regex,
    block_re: Regex,
}

impl QuestionParser {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            marker_re: Regex::new(MARKER_PATTERN)?,
            block_re: Regex::new(BLOCK_PATTERN)?,
        })
    }

    /// 解析文本中的所有题目
    ///
    /// 同样的输入总是得到同样顺序的题目（ID 除外）
    pub fn parse(&self, text: &str, set_name: SetName, category: &str) -> ParseReport {
        let starts: Vec<(usize, String)> = self
            .marker_re
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(0)?;
                Some((m.start(), format!("Q{}", &caps[1])))
            })
            .collect();

        let mut report = ParseReport::default();

        for (i, (start, marker)) in starts.iter().enumerate() {
            let end = starts.get(i + 1).map(|(next, _)| *next).unwrap_or(text.len());
            let block = &text[*start..end];

            match self.parse_block(block, set_name, category) {
                Ok(question) => report.questions.push(question),
                Err(reason) => {
                    debug!("跳过题块 {} (偏移 {}): {:?}", marker, start, reason);
                    report.skipped.push(SkippedBlock {
                        marker: marker.clone(),
                        offset: *start,
                        reason,
                    });
                }
            }
        }

        if !report.skipped.is_empty() {
            warn!(
                "⚠️ Set {} 有 {} 个题块格式不完整，已跳过",
                set_name,
                report.skipped.len()
            );
        }

        report
    }

    fn parse_block(
        &self,
        block: &str,
        set_name: SetName,
        category: &str,
    ) -> Result<Question, SkipReason> {
        let caps = self.block_re.captures(block).ok_or(SkipReason::Incomplete)?;

        let label_text = &caps[6];
        let label = OptionLabel::from_letter(label_text)
            .ok_or_else(|| SkipReason::UnrecognizedLabel(label_text.to_string()))?;

        Ok(Question::new(
            &caps[1],
            [&caps[2], &caps[3], &caps[4], &caps[5]],
            label,
            set_name,
            category,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> QuestionParser {
        QuestionParser::new().unwrap()
    }

    #[test]
    fn test_single_question() {
        let report = parser().parse(
            "Q1. What is 2+2? A) 3 B) 4 C) 5 D) 6 Answer: B",
            SetName::A,
            "SSC",
        );
        assert_eq!(report.questions.len(), 1);
        let q = &report.questions[0];
        assert_eq!(q.question_text, "What is 2+2?");
        assert_eq!(q.options, ["3", "4", "5", "6"].map(String::from));
        assert_eq!(q.correct_answer(), "4");
        assert_eq!(q.set_name, SetName::A);
        assert_eq!(q.category, "SSC");
        assert_eq!(report.outcome(), ParseOutcome::Parsed { count: 1, skipped: 0 });
    }

    #[test]
    fn test_every_label_maps_to_its_option() {
        let p = parser();
        let option_sets: [[&str; 4]; 4] = [
            ["w", "x", "y", "z"],
            ["New Delhi", "Mumbai city", "Port Blair", "Leh"],
            ["same", "same", "other", "same"],
            ["1 & 2 only", "2, 3 and 4", "none of these", "all of the above"],
        ];

        for options in option_sets {
            for label in OptionLabel::ALL {
                let text = format!(
                    "Q1. Pick one A) {} B) {} C) {} D) {} Answer: {}",
                    options[0], options[1], options[2], options[3], label
                );
                let report = p.parse(&text, SetName::B, "RRB");
                let q = &report.questions[0];
                assert_eq!(q.options, options.map(String::from));
                assert_eq!(q.correct_option, label);
                assert_eq!(q.correct_answer(), options[label.index()]);
            }
        }
    }

    #[test]
    fn test_multiple_questions_across_pages() {
        let text = "\nQ1. Capital of India? A) Mumbai B) New Delhi C) Pune D) Goa Answer: B \
                    Q2. Largest planet?\nA) Mars B) Earth C) Jupiter D) Venus Answer: C";
        let report = parser().parse(text, SetName::C, "SSC");
        assert_eq!(report.questions.len(), 2);
        assert_eq!(report.questions[0].correct_answer(), "New Delhi");
        assert_eq!(report.questions[1].question_text, "Largest planet?");
        assert_eq!(report.questions[1].correct_answer(), "Jupiter");
    }

    #[test]
    fn test_no_questions_found() {
        let report = parser().parse("Instructions: answer all questions.", SetName::A, "SSC");
        assert!(report.questions.is_empty());
        assert_eq!(report.outcome(), ParseOutcome::NoQuestionsFound { skipped: 0 });
    }

    #[test]
    fn test_malformed_blocks_are_reported() {
        let text = "Q1. Missing options A) 1 B) 2 Answer: A \
                    Q2. Bad label A) 1 B) 2 C) 3 D) 4 Answer: E \
                    Q3. Good one A) 1 B) 2 C) 3 D) 4 Answer: D";
        let report = parser().parse(text, SetName::D, "SSC");

        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].correct_answer(), "4");

        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].marker, "Q1");
        assert_eq!(report.skipped[0].reason, SkipReason::Incomplete);
        assert_eq!(report.skipped[1].marker, "Q2");
        assert_eq!(
            report.skipped[1].reason,
            SkipReason::UnrecognizedLabel("E".to_string())
        );
        assert_eq!(report.outcome(), ParseOutcome::Parsed { count: 1, skipped: 2 });
    }

    #[test]
    fn test_only_malformed_blocks_is_still_a_warning() {
        let report = parser().parse("Q1. Nothing else here", SetName::A, "SSC");
        assert_eq!(report.outcome(), ParseOutcome::NoQuestionsFound { skipped: 1 });
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let text = "Q1. a A) 1 B) 2 C) 3 D) 4 Answer: A Q2. b A) 5 B) 6 C) 7 D) 8 Answer: C";
        let p = parser();
        let strip = |r: ParseReport| {
            r.questions
                .into_iter()
                .map(|q| (q.question_text, q.options, q.correct_option))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            strip(p.parse(text, SetName::A, "SSC")),
            strip(p.parse(text, SetName::A, "SSC"))
        );
    }

    #[test]
    fn test_question_number_reference_splits_block() {
        let text = "Q1. Same answer as in Q2. above? A) yes B) no C) maybe D) never Answer: A \
                    Q3. Next A) 1 B) 2 C) 3 D) 4 Answer: B";
        let report = parser().parse(text, SetName::A, "SSC");

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].marker, "Q1");
        assert_eq!(report.skipped[0].reason, SkipReason::Incomplete);

        // 引用之后的部分按 Q2 解析，后面的题目不受影响
        assert_eq!(report.questions.len(), 2);
        assert_eq!(report.questions[0].question_text, "above?");
        assert_eq!(report.questions[1].question_text, "Next");
        assert_eq!(report.questions[1].correct_answer(), "2");
    }

    #[test]
    fn test_marker_inside_word_is_ignored() {
        let text = "Q1. Read the FAQ2. section A) yes B) no C) maybe D) never Answer: A";
        let report = parser().parse(text, SetName::A, "SSC");
        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].question_text, "Read the FAQ2. section");
    }
}
