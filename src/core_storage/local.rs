use super::{Storage, StorageEntry};
use crate::helpers::sanitize_input;
use async_trait::async_trait;
use log::trace;
use std::io;
use std::path::PathBuf;
use tokio::fs::{self, File, ReadDir};
use tokio::io::AsyncReadExt;

/// Storage backed by a directory of the local filesystem, e.g. an SD card mount point.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn open(&self, path: &str) -> io::Result<Box<dyn StorageEntry>> {
        let relative = sanitize_input(path)?;
        let full_path = self.root.join(&relative);
        let entry = LocalEntry::open(full_path, format!("/{}", relative)).await?;
        Ok(Box::new(entry))
    }
}

#[derive(Debug)]
enum Kind {
    File(File),
    Dir(ReadDir),
}

#[derive(Debug)]
pub struct LocalEntry {
    name: String,
    path: String,
    size: u64,
    kind: Kind,
}

impl LocalEntry {
    async fn open(full_path: PathBuf, path: String) -> io::Result<Self> {
        let metadata = fs::metadata(&full_path).await?;
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        let kind = if metadata.is_dir() {
            Kind::Dir(fs::read_dir(&full_path).await?)
        } else {
            Kind::File(File::open(&full_path).await?)
        };
        trace!("Opened {:?} as {}", full_path, path);
        Ok(Self {
            name,
            path,
            size: if metadata.is_dir() { 0 } else { metadata.len() },
            kind,
        })
    }
}

#[async_trait]
impl StorageEntry for LocalEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn is_dir(&self) -> bool {
        matches!(self.kind, Kind::Dir(_))
    }

    async fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.kind {
            Kind::File(file) => file.read(buf).await,
            Kind::Dir(_) => Ok(0),
        }
    }

    async fn next_entry(&mut self) -> io::Result<Option<Box<dyn StorageEntry>>> {
        let Kind::Dir(listing) = &mut self.kind else {
            return Ok(None);
        };
        let Some(child) = listing.next_entry().await? else {
            return Ok(None);
        };
        let child_path = format!(
            "{}/{}",
            self.path.trim_end_matches('/'),
            child.file_name().to_string_lossy()
        );
        let entry = LocalEntry::open(child.path(), child_path).await?;
        Ok(Some(Box::new(entry)))
    }
}
