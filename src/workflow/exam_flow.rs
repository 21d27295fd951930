//! 考试题库流程 - 流程层
//!
//! 每个方法对应一次用户操作：执行 → 在保存点写回存储 → 返回提示。
//! 任何错误都在这里转成提示，不会继续向上传播。

use crate::error::{AppError, StorageError};
use crate::models::{NewQuestion, SetName, Submission};
use crate::services::{ParseOutcome, ParseReport, PaperService, QuestionParser, TextExtractor};
use crate::store::ExamStore;
use crate::workflow::notice::Notice;
use tracing::{error, info, warn};

/// 考试题库流程
///
/// - 持有仓库，是唯一修改题目和作答记录的地方
/// - 文档提取不修改状态，可以并发执行，结果再逐个应用
pub struct ExamFlow {
    store: ExamStore,
    extractor: TextExtractor,
    parser: QuestionParser,
    paper_service: Option<PaperService>,
}

impl ExamFlow {
    pub fn new(
        store: ExamStore,
        extractor: TextExtractor,
        parser: QuestionParser,
        paper_service: Option<PaperService>,
    ) -> Self {
        Self {
            store,
            extractor,
            parser,
            paper_service,
        }
    }

    pub fn store(&self) -> &ExamStore {
        &self.store
    }

    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    pub fn parser(&self) -> &QuestionParser {
        &self.parser
    }

    // ========== 上传文档 ==========

    /// 上传一份文档：提取 → 解析 → 保存
    pub async fn upload_document(&mut self, bytes: Vec<u8>, set_name: SetName, category: &str) -> Notice {
        let report = self.extract_questions(bytes, set_name, category).await;
        self.apply_upload(set_name, report)
    }

    /// 提取并解析文档，不修改任何状态
    pub async fn extract_questions(
        &self,
        bytes: Vec<u8>,
        set_name: SetName,
        category: &str,
    ) -> Result<ParseReport, AppError> {
        let extracted = self.extractor.extract(bytes).await?;
        Ok(self.parser.parse(&extracted.text, set_name, category))
    }

    /// 把解析结果写入仓库
    pub fn apply_upload(&mut self, set_name: SetName, report: Result<ParseReport, AppError>) -> Notice {
        let report = match report {
            Ok(report) => report,
            Err(e) => {
                error!("❌ Set {} 文档解析失败: {}", set_name, e);
                return Notice::error(format!("❌ Could not read document for Set {}: {}", set_name, e));
            }
        };

        match report.outcome() {
            ParseOutcome::NoQuestionsFound { skipped } => {
                warn!("⚠️ Set {} 未找到题目 (跳过 {} 个题块)", set_name, skipped);
                Notice::warning("⚠️ No questions found in PDF. Check formatting.")
            }
            ParseOutcome::Parsed { count, skipped } => {
                self.store.add_questions(report.questions);
                if let Err(notice) = self.save() {
                    return notice;
                }
                info!("✓ Set {} 新增 {} 道题目", set_name, count);

                let mut message = format!("✅ Added {} questions from Set {}", count, set_name);
                if skipped > 0 {
                    message.push_str(&format!(" ({} malformed blocks skipped)", skipped));
                }
                Notice::success(message)
            }
        }
    }

    // ========== 手动维护题目 ==========

    pub fn add_question(&mut self, form: &NewQuestion, default_set: SetName) -> Notice {
        if let Err(e) = self.store.add_question(form, default_set) {
            warn!("题目表单校验失败: {}", e);
            return Notice::error("Fill all fields!");
        }
        if let Err(notice) = self.save() {
            return notice;
        }
        Notice::success("Question added successfully!")
    }

    pub fn delete_question(&mut self, id: &str) -> Notice {
        if self.store.remove_question(id).is_none() {
            return Notice::warning(format!("Question {} not found.", id));
        }
        if let Err(notice) = self.save() {
            return notice;
        }
        Notice::success("Question deleted.")
    }

    // ========== 作答与评分 ==========

    /// 接收外部产生的作答记录
    ///
    /// 已存在的记录（按 ID）会被跳过，不会重复评分
    pub fn record_submissions(&mut self, submissions: Vec<Submission>) -> Notice {
        let total = submissions.len();
        let mut recorded = 0;
        for sub in submissions {
            if self.store.add_submission(sub) {
                recorded += 1;
            }
        }
        if let Err(notice) = self.save() {
            return notice;
        }

        let mut message = format!("Recorded {} submissions.", recorded);
        let duplicates = total - recorded;
        if duplicates > 0 {
            info!("跳过 {} 条已存在的作答记录", duplicates);
            message.push_str(&format!(" {} already recorded.", duplicates));
        }
        Notice::success(message)
    }

    pub fn grade_all(&mut self) -> Notice {
        let summary = self.store.grade_all();
        if let Err(notice) = self.save() {
            return notice;
        }

        let mut message = format!("Graded {} submissions.", summary.graded);
        if summary.unmatched > 0 {
            message.push_str(&format!(" {} without a matching question.", summary.unmatched));
        }
        Notice::success(message)
    }

    // ========== 保存 ==========

    /// 保存改动；失败时丢弃本次改动并重新读取存储中的数据
    fn save(&mut self) -> Result<(), Notice> {
        let Err(e) = self.store.save() else {
            return Ok(());
        };
        error!("❌ 保存失败: {}", e);

        if let Err(reload_err) = self.store.reload() {
            error!("❌ 重新加载失败: {}", reload_err);
        }

        let mut message = format!("❌ Failed to save changes: {}", e);
        if matches!(e, AppError::Storage(StorageError::VersionConflict { .. })) {
            message.push_str(" Reloaded the latest saved data, please retry.");
        }
        Err(Notice::error(message))
    }

    // ========== 提交试卷 ==========

    pub async fn submit_paper(&self, category: &str) -> Notice {
        let Some(paper_service) = &self.paper_service else {
            return Notice::warning("Paper submission is not configured.");
        };

        match paper_service.submit(self.store.questions(), category).await {
            Ok(Some(paper)) => Notice::success(format!(
                "✅ Paper for {} submitted ({} questions).",
                category,
                paper.question_count()
            )),
            Ok(None) => Notice::warning(format!("No questions for {} to submit.", category)),
            Err(e) => {
                error!("❌ 试卷提交失败 ({}): {}", category, e);
                Notice::error(format!("❌ Failed to submit paper for {}: {}", category, e))
            }
        }
    }
}

