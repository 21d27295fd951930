//! 批量导入处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整的导入与评分过程。
//!
//! ## 核心流程
//!
//! 1. **应用初始化**：写日志头、打开本地存储、组装 ExamFlow
//! 2. **扫描文档**：从上传目录找出所有 `<类别>_<套别>.pdf`
//! 3. **并发提取**：使用 Semaphore 限制同时提取的文档数量
//! 4. **顺序写入**：按文件名顺序把解析结果交给 ExamFlow
//! 5. **导入作答**：读取外部作答记录文件（可选）
//! 6. **评分**：对所有未评分的作答记录评分
//! 7. **提交试卷**：按类别提交试卷（可选）
//!
//! ## 设计特点
//!
//! - **唯一写入者**：只有 ExamFlow 修改仓库，并发任务只做提取
//! - **错误不中断**：单个文档失败只记入统计，不影响其他文档

use crate::clients::PaperClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::JsonFileStore;
use crate::models::{scan_upload_folder, Submission, UploadedDocument};
use crate::orchestrator::upload_processor;
use crate::services::{PaperService, ParseReport, QuestionParser, TextExtractor};
use crate::store::{ExamStore, Persistence};
use crate::utils::logging::{self, RunStats};
use crate::workflow::{ExamFlow, Notice, NoticeLevel};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: ExamFlow,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法写入日志文件: {}", config.output_log_file))?;

        logging::log_startup(config.max_concurrent_uploads, &config.storage_dir);

        let persistence = Persistence::new(JsonFileStore::new(&config.storage_dir));
        let store = ExamStore::open(persistence).context("无法打开本地题库")?;

        let paper_service = if config.submit_papers {
            info!("🌐 试卷提交已启用: {}", config.paper_api_base_url);
            Some(PaperService::new(PaperClient::new(&config)))
        } else {
            None
        };

        let flow = ExamFlow::new(store, TextExtractor::new(), QuestionParser::new()?, paper_service);

        Ok(Self { config, flow })
    }

    pub fn flow(&self) -> &ExamFlow {
        &self.flow
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<RunStats> {
        let mut stats = RunStats::default();

        let documents = self.load_documents().await?;
        if documents.is_empty() {
            warn!("⚠️ 没有找到待导入的 PDF 文件");
        } else {
            stats.documents = documents.len();
            logging::log_documents_loaded(documents.len(), self.config.max_concurrent_uploads);
            self.process_all_uploads(documents, &mut stats).await?;
        }

        if let Some(path) = self.config.submissions_import_file.clone() {
            self.import_submissions(&path).await?;
        }

        let pending = self.flow.store().pending_submissions();
        log_notice(&self.flow.grade_all());
        stats.submissions_graded = pending.saturating_sub(self.flow.store().pending_submissions());

        if self.config.submit_papers {
            self.submit_papers().await;
        }

        stats.questions_total = self.flow.store().questions().len();
        logging::print_final_stats(&stats, &self.config.output_log_file);

        Ok(stats)
    }

    /// 扫描上传目录
    async fn load_documents(&self) -> Result<Vec<UploadedDocument>> {
        info!("\n📁 正在扫描待导入的文档...");
        if !std::path::Path::new(&self.config.upload_folder).exists() {
            warn!("⚠️ 上传目录不存在: {}", self.config.upload_folder);
            return Ok(Vec::new());
        }
        scan_upload_folder(&self.config.upload_folder, &self.config.default_category).await
    }

    /// 并发提取所有文档，再按顺序写入仓库
    async fn process_all_uploads(
        &mut self,
        documents: Vec<UploadedDocument>,
        stats: &mut RunStats,
    ) -> Result<()> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_uploads.max(1)));
        let extractor = self.flow.extractor().clone();
        let parser = Arc::new(self.flow.parser().clone());

        let mut pending = Vec::with_capacity(documents.len());
        let mut handles = Vec::with_capacity(documents.len());

        for (idx, document) in documents.into_iter().enumerate() {
            let doc_index = idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let extractor = extractor.clone();
            let parser = Arc::clone(&parser);
            let set_name = document.set_name;

            let handle = tokio::spawn(async move {
                let _permit = permit;
                upload_processor::process_upload(&extractor, &parser, &document, doc_index).await
            });
            pending.push((doc_index, set_name));
            handles.push(handle);
        }

        // join_all 保持提交顺序，按文件名顺序逐个写入
        let results = join_all(handles).await;
        for ((doc_index, set_name), joined) in pending.into_iter().zip(results) {
            let report: AppResult<ParseReport> = match joined {
                Ok(result) => result,
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", doc_index, e);
                    stats.failed += 1;
                    continue;
                }
            };

            let notice = self.flow.apply_upload(set_name, report);
            log_notice(&notice);
            match notice.level {
                NoticeLevel::Success => stats.imported += 1,
                NoticeLevel::Warning => stats.warnings += 1,
                NoticeLevel::Error => stats.failed += 1,
            }
        }

        Ok(())
    }

    /// 导入外部作答记录
    async fn import_submissions(&mut self, path: &str) -> Result<()> {
        info!("\n📥 正在导入作答记录: {}", path);
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("无法读取作答记录文件: {}", path))?;
        let submissions: Vec<Submission> = serde_json::from_str(&content)
            .with_context(|| format!("作答记录格式错误: {}", path))?;

        log_notice(&self.flow.record_submissions(submissions));
        Ok(())
    }

    /// 按类别提交试卷
    async fn submit_papers(&self) {
        let categories: Vec<String> = self
            .flow
            .store()
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect();

        if categories.is_empty() {
            warn!("⚠️ 题库为空，没有可提交的试卷");
            return;
        }

        for category in categories {
            info!("📤 提交 {} 试卷", category);
            log_notice(&self.flow.submit_paper(&category).await);
        }
    }
}

/// 把提示输出到日志
fn log_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => info!("{}", notice),
        NoticeLevel::Warning => warn!("{}", notice),
        NoticeLevel::Error => error!("{}", notice),
    }
}
