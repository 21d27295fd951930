pub mod upload_loader;

pub use upload_loader::{parse_upload_name, scan_upload_folder, UploadedDocument};
