// Errors raised while pushing files to the remote FTP server
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Error opening ftp connection to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    #[error("Timed out waiting for server response")]
    Timeout,

    #[error("Command {command} got wrong response: {code} {message}")]
    UnexpectedReply {
        command: String,
        expected: String,
        code: String,
        message: String,
    },

    #[error("Failed to parse data port from: {0}")]
    MalformedPassive(String),

    #[error("Data connection to port {port} failed: {source}")]
    DataConnect { port: u16, source: std::io::Error },

    #[error("Upload of {0} failed, data connection broken")]
    BrokenDataLink(String),

    #[error("Not a valid file type for upload: {0}")]
    Unsupported(String),

    #[error("Root or null is not allowed: {0:?}")]
    PathTooShort(String),

    #[error("Failed to open {path}: {source}")]
    Storage {
        path: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type UploadResult<T> = Result<T, UploadError>;

impl UploadError {
    /// Files that simply do not qualify for upload are skipped, not treated as a failure.
    pub fn is_skip(&self) -> bool {
        matches!(self, UploadError::Unsupported(_))
    }

    /// Reply code that triggered the error, if any.
    pub fn reply_code(&self) -> Option<&str> {
        match self {
            UploadError::UnexpectedReply { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }
}
