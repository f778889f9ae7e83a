// src/constants.rs

use std::time::Duration;

pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_MESSAGE_LENGTH: usize = 255;
pub const CODE_LENGTH: usize = 3;
pub const PROGRESS_EVERY: u32 = 50;
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;
pub const ONE_MEG: f64 = 1_048_576.0;

// Reply codes used by the upload session
pub const CODE_READY: &str = "220";
pub const CODE_NEED_PASSWORD: &str = "331";
pub const CODE_LOGGED_IN: &str = "230";
pub const CODE_DIR_CHANGED: &str = "250";
pub const CODE_TYPE_SET: &str = "200";
pub const CODE_NOT_FOUND: &str = "550";
pub const CODE_DIR_CREATED: &str = "257";
pub const CODE_PASSIVE: &str = "227";
pub const CODE_OPENING_DATA: &str = "150";
pub const CODE_TRANSFER_COMPLETE: &str = "226";
