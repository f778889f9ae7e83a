// Scripted in-memory transport for exercising the protocol without sockets
use super::transport::Transport;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CONTROL_PORT: u16 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Control,
    Data,
}

/// State shared by every transport created for one test.
#[derive(Debug, Default)]
pub struct Wire {
    pub replies: VecDeque<Vec<u8>>,
    pub control_sent: Vec<u8>,
    pub data_streams: Vec<Vec<u8>>,
    pub data_write_sizes: Vec<usize>,
    pub connects: Vec<(Channel, String, u16)>,
    pub zero_write_at: Option<usize>,
    pub refuse_control: bool,
    pub refuse_data: bool,
    pub fail_reads: bool,
    pub control_open: bool,
    pub data_open: bool,
}

impl Wire {
    pub fn shared(replies: &[&str]) -> Arc<Mutex<Wire>> {
        Arc::new(Mutex::new(Wire {
            replies: replies.iter().map(|r| r.as_bytes().to_vec()).collect(),
            ..Default::default()
        }))
    }

    pub fn scripted(replies: Vec<String>) -> Arc<Mutex<Wire>> {
        Arc::new(Mutex::new(Wire {
            replies: replies.into_iter().map(String::into_bytes).collect(),
            ..Default::default()
        }))
    }

    pub fn commands(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.control_sent)
            .split("\r\n")
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn data_connects(&self) -> Vec<u16> {
        self.connects
            .iter()
            .filter(|(channel, _, _)| *channel == Channel::Data)
            .map(|(_, _, port)| *port)
            .collect()
    }
}

#[derive(Debug)]
pub struct MockTransport {
    wire: Arc<Mutex<Wire>>,
    channel: Option<Channel>,
    inbound: VecDeque<u8>,
}

impl MockTransport {
    pub fn new(wire: &Arc<Mutex<Wire>>) -> Self {
        Self {
            wire: Arc::clone(wire),
            channel: None,
            inbound: VecDeque::new(),
        }
    }

    /// Control transport with its reply already waiting, for parser-level tests.
    pub fn with_inbound(wire: &Arc<Mutex<Wire>>, bytes: &[u8]) -> Self {
        let mut transport = Self::new(wire);
        transport.channel = Some(Channel::Control);
        transport.inbound.extend(bytes);
        transport
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        let mut wire = self.wire.lock().unwrap();
        let channel = if port == CONTROL_PORT {
            Channel::Control
        } else {
            Channel::Data
        };
        wire.connects.push((channel, host.to_string(), port));
        let refused = match channel {
            Channel::Control => wire.refuse_control,
            Channel::Data => wire.refuse_data,
        };
        if refused {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        match channel {
            Channel::Control => wire.control_open = true,
            Channel::Data => {
                wire.data_open = true;
                wire.data_streams.push(Vec::new());
            }
        }
        self.channel = Some(channel);
        Ok(())
    }

    async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut wire = self.wire.lock().unwrap();
        match self.channel {
            Some(Channel::Control) => {
                wire.control_sent.extend_from_slice(buf);
                Ok(buf.len())
            }
            Some(Channel::Data) => {
                wire.data_write_sizes.push(buf.len());
                if wire.zero_write_at == Some(wire.data_write_sizes.len()) {
                    return Ok(0);
                }
                if let Some(stream) = wire.data_streams.last_mut() {
                    stream.extend_from_slice(buf);
                }
                Ok(buf.len())
            }
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "not connected")),
        }
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.wire.lock().unwrap().fail_reads {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"));
        }
        let n = buf.len().min(self.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(self.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn available(&mut self) -> bool {
        !self.inbound.is_empty()
    }

    async fn wait_available(&mut self, _timeout: Duration) -> bool {
        if self.inbound.is_empty() && self.channel == Some(Channel::Control) {
            let next = self.wire.lock().unwrap().replies.pop_front();
            if let Some(reply) = next {
                self.inbound.extend(reply);
            }
        }
        !self.inbound.is_empty()
    }

    async fn stop(&mut self) {
        let mut wire = self.wire.lock().unwrap();
        match self.channel.take() {
            Some(Channel::Control) => wire.control_open = false,
            Some(Channel::Data) => wire.data_open = false,
            None => {}
        }
        self.inbound.clear();
    }

    fn is_open(&self) -> bool {
        self.channel.is_some()
    }
}
