pub mod grader;
pub mod paper_service;
pub mod question_parser;
pub mod text_extractor;

pub use grader::{GradeSummary, Grader};
pub use paper_service::PaperService;
pub use question_parser::{ParseOutcome, ParseReport, QuestionParser, SkipReason, SkippedBlock};
pub use text_extractor::{ExtractedText, TextExtractor};
