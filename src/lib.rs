//! # Exam Paper Pipeline
//!
//! 从 PDF 试卷中提取选择题、管理题库、为作答记录评分并按类别组卷提交
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有文档解析库和本地存储，只暴露能力
//! - `DocumentReader` / `LopdfReader` - 按页读取 PDF 文本
//! - `KeyValueStore` / `JsonFileStore` - 按键读写 JSON 条目
//!
//! ### ② 业务能力层（Services / Store）
//! - `services/` - 描述"我能做什么"
//! - `TextExtractor` - 文档 → 文本
//! - `QuestionParser` - 文本 → 题目
//! - `Grader` - 作答记录评分
//! - `PaperService` - 组卷并提交到远程服务
//! - `store/` - `ExamStore` 题库仓库，带版本号的持久化
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义每个用户操作的完整流程
//! - `ExamFlow` - 上传 / 增删题目 / 评分 / 提交，错误都转成 `Notice`
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量导入，管理并发和统计
//! - `orchestrator/upload_processor` - 单个文档的提取与解析
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{NewQuestion, OptionLabel, Paper, Question, SetName, Submission};
pub use orchestrator::App;
pub use store::ExamStore;
pub use workflow::{ExamFlow, Notice, NoticeLevel};
