pub mod exam_flow;
pub mod notice;

pub use exam_flow::ExamFlow;
pub use notice::{Notice, NoticeLevel};
