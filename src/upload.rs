use crate::config::UploadConfig;
use crate::core_error::{UploadError, UploadResult};
use crate::core_ftpcommand::cwd::{ensure_folder, ensure_path};
use crate::core_ftpcommand::stor::store_file;
use crate::core_network::Transport;
use crate::core_storage::Storage;
use crate::core_transform::ContentTransform;
use crate::helpers::parent_path;
use crate::session::Session;
use log::{debug, error, info};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    pub files: usize,
    pub bytes: u64,
}

/// Uploads a single file, or every file directly inside a folder.
///
/// A file keeps its storage directory layout on the server. A folder is
/// recreated by name under the working directory and walked one level
/// deep: entries that do not qualify are skipped, and the first real
/// failure abandons the rest of the folder.
///
/// Leaves the session open whatever happens; closing it is up to the caller.
pub async fn run<T: Transport>(
    session: &mut Session<T>,
    storage: &dyn Storage,
    transform: &dyn ContentTransform,
    upload: &UploadConfig,
    path: &str,
) -> UploadResult<UploadSummary> {
    if path.len() < 2 || path.trim_matches('/').is_empty() {
        debug!("Root or null is not allowed {:?}", path);
        return Err(UploadError::PathTooShort(path.to_string()));
    }
    if let Err(e) = session.connect().await {
        error!("Unable to make ftp connection");
        return Err(e);
    }

    let mut root = match storage.open(path).await {
        Ok(root) => root,
        Err(source) => {
            error!("Failed to open: {}", path);
            return Err(UploadError::Storage {
                path: path.to_string(),
                source,
            });
        }
    };

    let mut summary = UploadSummary::default();
    if !root.is_dir() {
        ensure_path(&mut session.control, parent_path(root.path())).await?;
        summary.bytes = store_file(session, root.as_mut(), transform, upload).await?;
        summary.files = 1;
        return Ok(summary);
    }

    info!("Uploading folder: {}", root.name());
    ensure_folder(&mut session.control, root.name()).await?;
    while let Some(mut entry) = root.next_entry().await? {
        match store_file(session, entry.as_mut(), transform, upload).await {
            Ok(bytes) => {
                summary.files += 1;
                summary.bytes += bytes;
            }
            Err(e) if e.is_skip() => debug!("Skipping {}", entry.path()),
            Err(e) => {
                error!(
                    "Abandoning rest of folder {} at {}: {}",
                    root.path(),
                    entry.path(),
                    e
                );
                return Err(e);
            }
        }
    }
    Ok(summary)
}
