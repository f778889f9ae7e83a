// Read-only view of the local storage device that files are uploaded from

pub mod local;

use async_trait::async_trait;
use std::io;

pub use local::LocalStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Opens a storage-absolute path such as `/DCIM/clip.mjpeg`.
    async fn open(&self, path: &str) -> io::Result<Box<dyn StorageEntry>>;
}

/// An opened file or directory. Dropping it closes it.
#[async_trait]
pub trait StorageEntry: Send {
    fn name(&self) -> &str;
    fn path(&self) -> &str;
    fn size(&self) -> u64;
    fn is_dir(&self) -> bool;

    /// Sequential read; `Ok(0)` at end of file and for directories.
    async fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Next child of a directory, in the order the device yields them.
    async fn next_entry(&mut self) -> io::Result<Option<Box<dyn StorageEntry>>>;
}
