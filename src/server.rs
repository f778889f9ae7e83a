use crate::config::Config;
use crate::core_network::TcpTransport;
use crate::core_storage::LocalStorage;
use crate::core_transform;
use crate::dispatcher::Dispatcher;
use crate::helpers::log_config;
use anyhow::{bail, Result};
use log::{info, warn};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Runs the uploader with the provided configuration.
///
/// Paths are handed to the dispatcher one after the other, each once the
/// previous upload has finished.
///
/// # Arguments
///
/// * `config` - The uploader configuration.
/// * `paths` - Storage paths to upload.
///
/// # Returns
///
/// Result<(), anyhow::Error> indicating whether every path was admitted.
pub async fn run(config: Config, paths: &[String]) -> Result<()> {
    info!("Starting uploader with config:");
    log_config(&config);

    let storage = Arc::new(LocalStorage::new(&config.upload.storage_root));
    let transform = core_transform::from_config(config.remap.as_ref());
    let dispatcher = Dispatcher::start(Arc::new(config), storage, transform, TcpTransport::new);
    let playback = dispatcher.playback();

    let mut rejected = 0;
    for path in paths {
        dispatcher.wait_idle().await;
        if playback.load(Ordering::Acquire) {
            info!("Local playback will be stopped to upload {}", path);
        }
        if !dispatcher.request_upload(path) {
            warn!("Upload request for {} was not accepted", path);
            rejected += 1;
        }
    }
    dispatcher.wait_idle().await;

    if rejected > 0 {
        bail!("{} upload request(s) were not accepted", rejected);
    }
    Ok(())
}
