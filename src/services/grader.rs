//! 评分服务 - 业务能力层
//!
//! 按 (题目ID, 套别, 类别) 匹配作答记录和题目，给出评分结果

use crate::models::{Question, Submission};
use std::collections::HashMap;
use tracing::{debug, info};

/// 一次评分的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeSummary {
    /// 本次新评分的数量
    pub graded: usize,
    /// 其中答对的数量
    pub correct: usize,
    /// 找不到对应题目、保持未评分的数量
    pub unmatched: usize,
    /// 之前已评分、本次未处理的数量
    pub already_graded: usize,
}

/// 评分服务
pub struct Grader;

impl Grader {
    pub fn correct_feedback() -> String {
        "✅ Correct!".to_string()
    }

    pub fn incorrect_feedback(correct_answer: &str) -> String {
        format!("❌ Incorrect. Correct: {}", correct_answer)
    }

    /// 对全部作答记录执行一次评分
    ///
    /// 已评分的记录不会被改动，因此重复执行结果不变
    pub fn grade_all(questions: &[Question], submissions: &mut [Submission]) -> GradeSummary {
        let mut by_id: HashMap<&str, Vec<&Question>> = HashMap::new();
        for q in questions {
            by_id.entry(q.id.as_str()).or_default().push(q);
        }

        let mut summary = GradeSummary::default();

        for sub in submissions.iter_mut() {
            if sub.is_graded {
                summary.already_graded += 1;
                continue;
            }

            let matched = by_id.get(sub.question_id.as_str()).and_then(|candidates| {
                candidates
                    .iter()
                    .copied()
                    .find(|q| q.belongs_to(sub.set_name, &sub.category))
            });
            let Some(question) = matched else {
                debug!(
                    "作答 {} 找不到对应题目 (题目 {}, Set {}, {})",
                    sub.id, sub.question_id, sub.set_name, sub.category
                );
                summary.unmatched += 1;
                continue;
            };

            Self::grade_one(question, sub);
            summary.graded += 1;
            if sub.is_correct == Some(true) {
                summary.correct += 1;
            }
        }

        info!(
            "📊 评分完成: 新评分 {}, 答对 {}, 未匹配 {}, 已评分跳过 {}",
            summary.graded, summary.correct, summary.unmatched, summary.already_graded
        );
        summary
    }

    fn grade_one(question: &Question, sub: &mut Submission) {
        let correct_answer = question.correct_answer();
        let is_correct = sub.user_answer == correct_answer;
        sub.is_graded = true;
        sub.is_correct = Some(is_correct);
        sub.ai_feedback = if is_correct {
            Self::correct_feedback()
        } else {
            Self::incorrect_feedback(correct_answer)
        };
    }
}
