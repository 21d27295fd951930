//! 题目与作答记录仓库
//!
//! 内存中的集合由仓库独占，只有调用 `save()` 时才写回存储

use crate::error::{AppResult, ValidationError};
use crate::models::{NewQuestion, Paper, Question, SetName, Submission};
use crate::services::grader::{GradeSummary, Grader};
use crate::services::paper_service;
use crate::store::persistence::{Persistence, QUESTIONS_KEY, SUBMISSIONS_KEY};
use tracing::{debug, info};

/// 题目与作答记录仓库
pub struct ExamStore {
    persistence: Persistence,
    questions: Vec<Question>,
    submissions: Vec<Submission>,
    questions_version: u64,
    submissions_version: u64,
    questions_dirty: bool,
    submissions_dirty: bool,
}

impl ExamStore {
    /// 从存储中加载仓库
    pub fn open(persistence: Persistence) -> AppResult<Self> {
        let questions = persistence.load::<Question>(QUESTIONS_KEY)?;
        let submissions = persistence.load::<Submission>(SUBMISSIONS_KEY)?;

        info!(
            "📁 已加载 {} 道题目 (版本 {}), {} 条作答记录 (版本 {})",
            questions.items.len(),
            questions.version,
            submissions.items.len(),
            submissions.version
        );

        Ok(Self {
            persistence,
            questions: questions.items,
            submissions: submissions.items,
            questions_version: questions.version,
            submissions_version: submissions.version,
            questions_dirty: false,
            submissions_dirty: false,
        })
    }

    // ========== 题目 ==========

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// 指定套别和类别的题目，保持录入顺序
    pub fn questions_for(&self, set_name: SetName, category: &str) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.belongs_to(set_name, category))
            .collect()
    }

    /// 校验表单并添加一道题目
    pub fn add_question(&mut self, form: &NewQuestion, default_set: SetName) -> Result<&Question, ValidationError> {
        let question = form.validate(default_set)?;
        debug!("添加题目 {} (Set {})", question.id, question.set_name);
        self.questions.push(question);
        self.questions_dirty = true;
        Ok(&self.questions[self.questions.len() - 1])
    }

    /// 追加一批已解析的题目
    pub fn add_questions(&mut self, questions: Vec<Question>) -> usize {
        let count = questions.len();
        if count > 0 {
            self.questions.extend(questions);
            self.questions_dirty = true;
        }
        count
    }

    /// 删除题目
    pub fn remove_question(&mut self, id: &str) -> Option<Question> {
        let pos = self.questions.iter().position(|q| q.id == id)?;
        self.questions_dirty = true;
        Some(self.questions.remove(pos))
    }

    // ========== 作答记录 ==========

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// 追加一条作答记录
    ///
    /// 相同 ID 的记录已存在时不做任何改动并返回 false，已评分的记录不会被重新评分
    pub fn add_submission(&mut self, submission: Submission) -> bool {
        if self.submissions.iter().any(|s| s.id == submission.id) {
            debug!("作答记录 {} 已存在，跳过", submission.id);
            return false;
        }
        self.submissions.push(submission);
        self.submissions_dirty = true;
        true
    }

    pub fn pending_submissions(&self) -> usize {
        self.submissions.iter().filter(|s| !s.is_graded).count()
    }

    /// 对全部作答记录执行一次评分
    pub fn grade_all(&mut self) -> GradeSummary {
        let summary = Grader::grade_all(&self.questions, &mut self.submissions);
        if summary.graded > 0 {
            self.submissions_dirty = true;
        }
        summary
    }

    // ========== 导出 ==========

    pub fn build_paper(&self, category: &str) -> Paper {
        paper_service::build_paper(&self.questions, category)
    }

    /// 出现过的全部类别，按首次出现顺序
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for q in &self.questions {
            if !categories.contains(&q.category.as_str()) {
                categories.push(&q.category);
            }
        }
        categories
    }

    // ========== 保存 ==========

    pub fn has_unsaved_changes(&self) -> bool {
        self.questions_dirty || self.submissions_dirty
    }

    /// 写回有改动的集合
    ///
    /// 两个集合分别保存，一个集合冲突不影响另一个。
    /// 若存储中的版本已被其他写入者更新，返回版本冲突错误，该集合保持未保存状态，
    /// 可调用 `reload()` 丢弃改动并读取最新数据。
    pub fn save(&mut self) -> AppResult<()> {
        let questions = self.save_questions();
        let submissions = self.save_submissions();
        questions.and(submissions)
    }

    fn save_questions(&mut self) -> AppResult<()> {
        if self.questions_dirty {
            self.questions_version =
                self.persistence
                    .save(QUESTIONS_KEY, &self.questions, self.questions_version)?;
            self.questions_dirty = false;
        }
        Ok(())
    }

    fn save_submissions(&mut self) -> AppResult<()> {
        if self.submissions_dirty {
            self.submissions_version =
                self.persistence
                    .save(SUBMISSIONS_KEY, &self.submissions, self.submissions_version)?;
            self.submissions_dirty = false;
        }
        Ok(())
    }

    /// 丢弃未保存的改动，从存储重新读取这些集合及其版本
    pub fn reload(&mut self) -> AppResult<()> {
        if self.questions_dirty {
            let loaded = self.persistence.load::<Question>(QUESTIONS_KEY)?;
            info!("🔄 重新加载题目: {} 道 (版本 {})", loaded.items.len(), loaded.version);
            self.questions = loaded.items;
            self.questions_version = loaded.version;
            self.questions_dirty = false;
        }
        if self.submissions_dirty {
            let loaded = self.persistence.load::<Submission>(SUBMISSIONS_KEY)?;
            info!("🔄 重新加载作答记录: {} 条 (版本 {})", loaded.items.len(), loaded.version);
            self.submissions = loaded.items;
            self.submissions_version = loaded.version;
            self.submissions_dirty = false;
        }
        Ok(())
    }
}
