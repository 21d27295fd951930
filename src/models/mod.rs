pub mod loaders;
pub mod paper;
pub mod question;
pub mod set_name;
pub mod submission;

pub use loaders::{scan_upload_folder, UploadedDocument};
pub use paper::{Paper, PaperQuestion, PaperSet};
pub use question::{NewQuestion, OptionLabel, Question};
pub use set_name::SetName;
pub use submission::Submission;
