//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量导入和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量导入处理器
//! - 管理应用生命周期（初始化、运行、统计）
//! - 扫描上传目录（Vec<UploadedDocument>）
//! - 控制并发提取数量（Semaphore）
//! - 按顺序把结果交给 ExamFlow 写入
//! - 导入作答记录、评分、提交试卷
//!
//! ### `upload_processor` - 单个文档处理器
//! - 读取文件字节
//! - 提取文本并解析题目
//! - 输出单个文档的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<UploadedDocument>)
//!     ↓
//! upload_processor (处理单个文档，只读)
//!     ↓
//! workflow::ExamFlow (唯一修改仓库的地方)
//!     ↓
//! services / store (能力层：提取 / 解析 / 评分 / 试卷)
//!     ↓
//! infrastructure (基础设施：lopdf / JSON 文件存储)
//! ```

pub mod batch_processor;
pub mod upload_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use upload_processor::process_upload;
