// Hook that may rename or rewrite a file on its way to the server

use crate::config::RemapConfig;
use crate::core_storage::StorageEntry;
use async_trait::async_trait;
use std::io;
use std::sync::Arc;

#[async_trait]
pub trait ContentTransform: Send + Sync {
    /// Extension the file should carry on the server, when it differs from the local one.
    fn remote_extension(&self, _entry: &dyn StorageEntry) -> Option<String> {
        None
    }

    /// Fills `buf` with the next bytes to send and returns how many there are.
    /// Implementations may rewrite the bytes in place.
    async fn fill_chunk(&self, entry: &mut dyn StorageEntry, buf: &mut [u8]) -> io::Result<usize> {
        entry.read_chunk(buf).await
    }
}

/// Sends files as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl ContentTransform for Passthrough {}

/// Renames `*.from` files to `*.to` on the server, bytes untouched.
#[derive(Debug, Clone)]
pub struct ExtensionRemap {
    from: String,
    to: String,
}

impl ExtensionRemap {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl ContentTransform for ExtensionRemap {
    fn remote_extension(&self, entry: &dyn StorageEntry) -> Option<String> {
        let (_, ext) = entry.name().rsplit_once('.')?;
        ext.eq_ignore_ascii_case(&self.from).then(|| self.to.clone())
    }
}

pub fn from_config(remap: Option<&RemapConfig>) -> Arc<dyn ContentTransform> {
    match remap {
        Some(remap) => Arc::new(ExtensionRemap::new(&remap.from, &remap.to)),
        None => Arc::new(Passthrough),
    }
}
