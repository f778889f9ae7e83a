use crate::config::Config;
use crate::core_network::Transport;
use crate::core_storage::Storage;
use crate::core_transform::ContentTransform;
use crate::session::Session;
use crate::upload;
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

/// Entry point for upload requests. At most one upload runs at a time;
/// requests arriving meanwhile are turned away, not queued.
///
/// The `busy` flag is the only state shared with the worker. It is set here
/// when a request is admitted and cleared by the worker once both channels
/// of that upload are closed.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    busy: Arc<AtomicBool>,
    wake: mpsc::Sender<String>,
    idle: Arc<Notify>,
    playback: Arc<AtomicBool>,
}

impl Dispatcher {
    /// Spawns the upload worker. `new_transport` supplies fresh control and
    /// data connections for every upload.
    pub fn start<T, F>(
        config: Arc<Config>,
        storage: Arc<dyn Storage>,
        transform: Arc<dyn ContentTransform>,
        new_transport: F,
    ) -> Self
    where
        T: Transport + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let (wake, mut requests) = mpsc::channel::<String>(1);
        let busy = Arc::new(AtomicBool::new(false));
        let idle = Arc::new(Notify::new());
        let playback = Arc::new(AtomicBool::new(false));

        let dispatcher = Self {
            busy: Arc::clone(&busy),
            wake,
            idle: Arc::clone(&idle),
            playback: Arc::clone(&playback),
        };

        tokio::spawn(async move {
            while let Some(path) = requests.recv().await {
                // uploads take precedence over local playback
                playback.store(false, Ordering::Release);

                let mut session = Session::new(
                    new_transport(),
                    new_transport(),
                    &config.ftp,
                    config.upload.response_timeout(),
                );
                match upload::run(
                    &mut session,
                    storage.as_ref(),
                    transform.as_ref(),
                    &config.upload,
                    &path,
                )
                .await
                {
                    Ok(summary) => info!(
                        "Upload of {} finished: {} file(s), {} bytes",
                        path, summary.files, summary.bytes
                    ),
                    Err(e) => match e.reply_code() {
                        Some(code) => error!("Upload of {} failed on reply {}: {}", path, code, e),
                        None => error!("Upload of {} failed: {}", path, e),
                    },
                }
                session.close().await;

                busy.store(false, Ordering::Release);
                idle.notify_waiters();
            }
        });

        dispatcher
    }

    /// Admits `path` for upload if nothing else is in flight. Never blocks.
    pub fn request_upload(&self, path: &str) -> bool {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            error!("Unable to upload {} as another upload in progress", path);
            return false;
        }
        if let Err(e) = self.wake.try_send(path.to_string()) {
            error!("Upload worker unavailable for {}: {}", path, e);
            self.busy.store(false, Ordering::Release);
            return false;
        }
        true
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Resolves once no upload is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !self.is_busy() {
                return;
            }
            notified.await;
        }
    }

    /// Preemption hook for a local player. The player sets the flag while it
    /// is reading from storage and must stop once it sees the flag cleared,
    /// which the worker does at the start of every upload.
    pub fn playback(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.playback)
    }
}
