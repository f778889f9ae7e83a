// Fixtures shared by the unit tests
use crate::config::{FtpConfig, UploadConfig};
use crate::core_network::mock::CONTROL_PORT;

pub const LOGIN: &[&str] = &[
    "220 Welcome\r\n",
    "331 Password please\r\n",
    "230 Logged in\r\n",
    "250 CWD ok\r\n",
    "200 Type set to I\r\n",
];

pub fn ftp_config() -> FtpConfig {
    FtpConfig {
        host: "ftp.example".into(),
        port: CONTROL_PORT,
        user: "cam".into(),
        pass: "secret".into(),
        working_dir: "/uploads".into(),
    }
}

pub fn upload_config(root: &str, chunk_size: usize) -> UploadConfig {
    UploadConfig {
        storage_root: root.to_string(),
        extensions: vec!["mjpeg".into()],
        chunk_size,
        response_timeout_secs: 10,
        progress_every: 50,
    }
}

/// Replies for one successful file: PASV, STOR, then the 226 confirmation.
pub fn store_replies(port_hi: u8, port_lo: u8) -> Vec<String> {
    vec![
        format!("227 Entering Passive Mode (10,0,0,1,{},{})\r\n", port_hi, port_lo),
        "150 Ok to send data\r\n".to_string(),
        "226 Transfer complete\r\n".to_string(),
    ]
}

pub fn login_then(replies: Vec<String>) -> Vec<String> {
    LOGIN
        .iter()
        .map(|reply| reply.to_string())
        .chain(replies)
        .collect()
}
