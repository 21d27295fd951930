pub mod exam_store;
pub mod persistence;

pub use exam_store::ExamStore;
pub use persistence::{Persistence, Versioned, QUESTIONS_KEY, SUBMISSIONS_KEY};
