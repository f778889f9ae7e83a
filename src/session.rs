use crate::config::FtpConfig;
use crate::constants::{
    CODE_DIR_CHANGED, CODE_LOGGED_IN, CODE_NEED_PASSWORD, CODE_READY, CODE_TYPE_SET,
};
use crate::core_error::{UploadError, UploadResult};
use crate::core_ftpcommand::exchange::ControlChannel;
use crate::core_ftpcommand::response::Expect;
use crate::core_network::Transport;
use log::{debug, error};
use std::time::Duration;

/// One FTP login, owned by the upload worker for the length of a single upload.
pub struct Session<T: Transport> {
    pub control: ControlChannel<T>,
    pub data: T,
    pub host: String,
    pub port: u16,
    user: String,
    pass: String,
    pub working_dir: String,
}

impl<T: Transport> Session<T> {
    pub fn new(control: T, data: T, config: &FtpConfig, timeout: Duration) -> Self {
        Self {
            control: ControlChannel::new(control, timeout),
            data,
            host: config.host.clone(),
            port: config.port,
            user: config.user.clone(),
            pass: config.pass.clone(),
            working_dir: config.working_dir.clone(),
        }
    }

    /// Connects, logs in, moves to the working directory and switches to binary mode.
    /// Stops at the first step the server rejects.
    pub async fn connect(&mut self) -> UploadResult<()> {
        if let Err(source) = self
            .control
            .transport_mut()
            .connect(&self.host, self.port)
            .await
        {
            error!(
                "Error opening ftp connection to {}:{}: {}",
                self.host, self.port, source
            );
            return Err(UploadError::Connect {
                host: self.host.clone(),
                port: self.port,
                source,
            });
        }
        debug!("FTP connected at {}:{}", self.host, self.port);

        self.control.send("", "", Expect::Code(CODE_READY)).await?;
        self.control
            .send("USER", &self.user, Expect::Code(CODE_NEED_PASSWORD))
            .await?;
        self.control
            .send("PASS", &self.pass, Expect::Code(CODE_LOGGED_IN))
            .await?;
        self.control
            .send("CWD", &self.working_dir, Expect::Code(CODE_DIR_CHANGED))
            .await?;
        self.control
            .send("TYPE", "I", Expect::Code(CODE_TYPE_SET))
            .await?;
        Ok(())
    }

    /// Sends QUIT and closes both channels, whatever state they are in.
    pub async fn close(&mut self) {
        self.control.quit().await;
        self.data.stop().await;
        self.control.stop().await;
    }
}
