use crate::core_error::{UploadError, UploadResult};
use crate::core_ftpcommand::response::{read_reply, Expect, Reply};
use crate::core_network::Transport;
use log::{debug, error};
use std::time::Duration;

/// Control connection with strict one-command/one-reply pairing.
#[derive(Debug)]
pub struct ControlChannel<T: Transport> {
    transport: T,
    timeout: Duration,
    last_reply: Reply,
}

impl<T: Transport> ControlChannel<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            last_reply: Reply::default(),
        }
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    #[cfg(test)]
    pub fn last_reply(&self) -> &Reply {
        &self.last_reply
    }

    /// Sends `verb param` (skipped when `verb` is empty) and waits for one reply.
    ///
    /// With `Expect::Any` the call succeeds whatever the code; the reply is
    /// still kept in `last_reply` for the caller to inspect.
    pub async fn send(&mut self, verb: &str, param: &str, expect: Expect) -> UploadResult<&Reply> {
        if !verb.is_empty() {
            let line = if param.is_empty() {
                format!("{}\r\n", verb)
            } else {
                format!("{} {}\r\n", verb, param)
            };
            let written = self.transport.write(line.as_bytes()).await?;
            if written < line.len() {
                return Err(UploadError::Io(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    format!("short write sending {}", verb),
                )));
            }
        }
        if verb == "PASS" {
            debug!("Sent cmd: PASS ****");
        } else {
            debug!("Sent cmd: {} {}", verb, param);
        }

        let reply = match read_reply(&mut self.transport, self.timeout).await {
            Ok(reply) => reply,
            Err(UploadError::Timeout) => {
                error!("Timed out waiting for server response to {:?}", verb);
                return Err(UploadError::Timeout);
            }
            Err(e) => {
                error!("Failed reading response to {:?}: {}", verb, e);
                return Err(e);
            }
        };
        debug!("Rx code: {}, resp: {}", reply.code, reply.message.trim_end());
        self.last_reply = reply;

        if let Expect::Code(expected) = expect {
            if !expect.accepts(&self.last_reply.code) {
                error!(
                    "Command {} got wrong response: {} {}",
                    verb,
                    self.last_reply.code,
                    self.last_reply.message.trim_end()
                );
                return Err(UploadError::UnexpectedReply {
                    command: verb.to_string(),
                    expected: expected.to_string(),
                    code: self.last_reply.code.clone(),
                    message: self.last_reply.message.clone(),
                });
            }
        }
        Ok(&self.last_reply)
    }

    /// Says goodbye without waiting for the server's answer.
    pub async fn quit(&mut self) {
        if self.transport.is_open() {
            if let Err(e) = self.transport.write(b"QUIT\r\n").await {
                debug!("QUIT not delivered: {}", e);
            }
        }
    }

    pub async fn stop(&mut self) {
        self.transport.stop().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_network::mock::{MockTransport, Wire, CONTROL_PORT};

    async fn connected(wire: &std::sync::Arc<std::sync::Mutex<Wire>>) -> ControlChannel<MockTransport> {
        let mut transport = MockTransport::new(wire);
        transport.connect("ftp.example", CONTROL_PORT).await.unwrap();
        ControlChannel::new(transport, Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_send_writes_command_line() {
        let wire = Wire::shared(&["331 Password required\r\n"]);
        let mut control = connected(&wire).await;

        let reply = control.send("USER", "bob", Expect::Code("331")).await.unwrap();
        assert_eq!(reply.code, "331");
        assert_eq!(wire.lock().unwrap().commands(), vec!["USER bob"]);
    }

    #[tokio::test]
    async fn test_mismatch_fails_whatever_the_message() {
        let wire = Wire::shared(&["530 331 looks like the right code\r\n"]);
        let mut control = connected(&wire).await;

        let err = control.send("USER", "bob", Expect::Code("331")).await.unwrap_err();
        assert_eq!(err.reply_code(), Some("530"));
        assert_eq!(control.last_reply().code, "530");
    }

    #[tokio::test]
    async fn test_wildcard_accepts_and_keeps_code() {
        let wire = Wire::shared(&["550 No such directory\r\n"]);
        let mut control = connected(&wire).await;

        control.send("CWD", "DCIM", Expect::Any).await.unwrap();
        assert!(control.last_reply().is("550"));
    }

    #[tokio::test]
    async fn test_empty_verb_only_waits() {
        let wire = Wire::shared(&["226 Transfer complete\r\n"]);
        let mut control = connected(&wire).await;

        control.send("", "", Expect::Code("226")).await.unwrap();
        assert!(wire.lock().unwrap().control_sent.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let wire = Wire::shared(&[]);
        let mut control = connected(&wire).await;

        let err = control.send("TYPE", "I", Expect::Any).await.unwrap_err();
        assert!(matches!(err, UploadError::Timeout));
    }

    #[tokio::test]
    async fn test_read_error_is_not_a_timeout() {
        let wire = Wire::shared(&["200 Type set to I\r\n"]);
        wire.lock().unwrap().fail_reads = true;
        let mut control = connected(&wire).await;

        let err = control.send("TYPE", "I", Expect::Code("200")).await.unwrap_err();
        match err {
            UploadError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_quit_does_not_wait_for_reply() {
        let wire = Wire::shared(&["221 Bye\r\n"]);
        let mut control = connected(&wire).await;

        control.quit().await;
        control.stop().await;
        let wire = wire.lock().unwrap();
        assert_eq!(wire.commands(), vec!["QUIT"]);
        assert_eq!(wire.replies.len(), 1);
        assert!(!wire.control_open);
    }
}
