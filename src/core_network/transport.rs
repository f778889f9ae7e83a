use async_trait::async_trait;
use log::{debug, trace};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};

/// Reliable byte-stream connection used for both the control and the data channel.
#[async_trait]
pub trait Transport: Send {
    async fn connect(&mut self, host: &str, port: u16) -> io::Result<()>;

    /// Writes `buf` and returns how many bytes the connection accepted.
    /// Zero means the peer stopped taking data.
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Non-blocking check for bytes that can be read right away.
    fn available(&mut self) -> bool;

    /// Blocks until bytes are available or `timeout` elapses.
    async fn wait_available(&mut self, timeout: Duration) -> bool;

    async fn stop(&mut self);

    fn is_open(&self) -> bool;
}

/// `Transport` backed by a tokio `TcpStream`.
///
/// Keeps a small read-ahead buffer so that `available()` can be answered
/// without awaiting.
#[derive(Debug, Default)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    pending: Vec<u8>,
    eof: bool,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn fill_pending(&mut self) -> bool {
        let Some(stream) = self.stream.as_ref() else {
            return false;
        };
        let mut buf = [0u8; 512];
        match stream.try_read(&mut buf) {
            Ok(0) => {
                self.eof = true;
                false
            }
            Ok(n) => {
                self.pending.extend_from_slice(&buf[..n]);
                true
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => false,
            Err(e) => {
                trace!("try_read failed: {}", e);
                self.eof = true;
                false
            }
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true).ok();
        debug!("Connected to {}:{}", host, port);
        self.stream = Some(stream);
        self.pending.clear();
        self.eof = false;
        Ok(())
    }

    async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "not connected"));
        };
        let mut written = 0;
        while written < buf.len() {
            let n = stream.write(&buf[written..]).await?;
            if n == 0 {
                break;
            }
            written += n;
        }
        Ok(written)
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.pending.is_empty() {
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            return Ok(n);
        }
        match self.stream.as_mut() {
            Some(stream) => stream.read(buf).await,
            None => Ok(0),
        }
    }

    fn available(&mut self) -> bool {
        !self.pending.is_empty() || (!self.eof && self.fill_pending())
    }

    async fn wait_available(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.available() {
                return true;
            }
            if self.eof {
                return false;
            }
            let Some(stream) = self.stream.as_ref() else {
                return false;
            };
            match timeout_at(deadline, stream.readable()).await {
                Ok(Ok(())) => continue,
                _ => return false,
            }
        }
    }

    async fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
        self.pending.clear();
        self.eof = false;
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}
