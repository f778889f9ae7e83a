use crate::config::UploadConfig;
use crate::constants::{CODE_OPENING_DATA, CODE_TRANSFER_COMPLETE};
use crate::core_error::{UploadError, UploadResult};
use crate::core_ftpcommand::response::Expect;
use crate::core_network::pasv::open_data_channel;
use crate::core_network::Transport;
use crate::core_storage::StorageEntry;
use crate::core_transform::ContentTransform;
use crate::helpers::{change_extension, matches_extension, megabytes};
use crate::session::Session;
use log::{error, info};
use std::time::{Duration, Instant};

/// Byte and chunk counters for one file.
#[derive(Debug)]
pub struct Progress {
    pub bytes_written: u64,
    pub chunks: u32,
    started: Instant,
    every: u32,
}

impl Progress {
    pub fn new(every: u32) -> Self {
        Self {
            bytes_written: 0,
            chunks: 0,
            started: Instant::now(),
            every,
        }
    }

    /// Counts one written chunk. Every `every` chunks, returns the percentage
    /// of `file_size` sent so far.
    pub fn record(&mut self, written: usize, file_size: u64) -> Option<u64> {
        self.bytes_written += written as u64;
        self.chunks += 1;
        if self.every == 0 || self.chunks % self.every != 0 {
            return None;
        }
        (self.bytes_written * 100).checked_div(file_size)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Uploads one file into the current remote directory, overwriting any
/// existing file of the same name.
///
/// Returns `UploadError::Unsupported` without touching either channel when
/// the entry is a directory or its extension is not configured.
///
/// Once the bytes are out, the server's 226 confirmation is only logged: a
/// missing or wrong confirmation does not turn the upload into a failure.
pub async fn store_file<T: Transport>(
    session: &mut Session<T>,
    entry: &mut dyn StorageEntry,
    transform: &dyn ContentTransform,
    upload: &UploadConfig,
) -> UploadResult<u64> {
    if entry.is_dir() || !matches_extension(entry.name(), &upload.extensions) {
        return Err(UploadError::Unsupported(entry.path().to_string()));
    }

    let remote_name = match transform.remote_extension(&*entry) {
        Some(extension) => change_extension(entry.name(), &extension),
        None => entry.name().to_string(),
    };
    info!(
        "Upload file: {}, size: {:.1}MB",
        remote_name,
        megabytes(entry.size())
    );

    let streamed = stream_file(session, entry, transform, upload, &remote_name).await;
    session.data.stop().await;
    let progress = streamed?;

    match session
        .control
        .send("", "", Expect::Code(CODE_TRANSFER_COMPLETE))
        .await
    {
        Ok(_) => info!(
            "Uploaded {:.1}MB in {} sec",
            megabytes(progress.bytes_written),
            progress.elapsed().as_secs()
        ),
        Err(e) => error!("File transfer not successful: {}", e),
    }
    Ok(progress.bytes_written)
}

async fn stream_file<T: Transport>(
    session: &mut Session<T>,
    entry: &mut dyn StorageEntry,
    transform: &dyn ContentTransform,
    upload: &UploadConfig,
    remote_name: &str,
) -> UploadResult<Progress> {
    open_data_channel(session).await?;
    session
        .control
        .send("STOR", remote_name, Expect::Code(CODE_OPENING_DATA))
        .await?;

    let file_size = entry.size();
    let mut progress = Progress::new(upload.progress_every);
    let mut chunk = vec![0u8; upload.chunk_size.max(1)];
    loop {
        let read = transform.fill_chunk(&mut *entry, &mut chunk).await?;
        if read == 0 {
            break;
        }
        let written = match session.data.write(&chunk[..read]).await {
            Ok(written) => written,
            Err(e) => {
                error!("Data channel write error: {}", e);
                0
            }
        };
        if written == 0 {
            error!("Upload file to ftp failed");
            return Err(UploadError::BrokenDataLink(remote_name.to_string()));
        }
        if let Some(percent) = progress.record(written, file_size) {
            info!("Uploaded {}%", percent);
        }
    }
    Ok(progress)
}
