// Error types shared by the upload pipeline

pub mod error;

pub use error::{UploadError, UploadResult};
