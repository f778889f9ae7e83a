use crate::constants::{CODE_LENGTH, MAX_MESSAGE_LENGTH};
use crate::core_error::{UploadError, UploadResult};
use crate::core_network::Transport;
use std::time::Duration;

/// Reply code the caller insists on, or `Any` to take whatever the server says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Code(&'static str),
    Any,
}

impl Expect {
    pub fn accepts(&self, code: &str) -> bool {
        match self {
            Expect::Code(expected) => *expected == code,
            Expect::Any => true,
        }
    }
}

/// One reply read from the control channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub code: String,
    pub message: String,
}

impl Reply {
    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}

/// Waits up to `timeout` for the server to answer, then reads the reply.
///
/// The first three bytes are taken verbatim as the code. Up to
/// `MAX_MESSAGE_LENGTH` further bytes form the message; anything else still
/// buffered is discarded so the next command starts from a clean channel.
pub async fn read_reply<T: Transport + ?Sized>(
    transport: &mut T,
    timeout: Duration,
) -> UploadResult<Reply> {
    if !transport.wait_available(timeout).await {
        return Err(UploadError::Timeout);
    }

    let mut code = [0u8; CODE_LENGTH];
    let mut filled = 0;
    while filled < CODE_LENGTH {
        let n = transport.read(&mut code[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    let mut message = vec![0u8; MAX_MESSAGE_LENGTH];
    let read = if transport.available() {
        transport.read(&mut message).await?
    } else {
        0
    };
    message.truncate(read);

    let mut scrap = [0u8; 256];
    while transport.available() {
        if transport.read(&mut scrap).await? == 0 {
            break;
        }
    }

    Ok(Reply {
        code: String::from_utf8_lossy(&code[..filled]).into_owned(),
        message: String::from_utf8_lossy(&message).into_owned(),
    })
}
