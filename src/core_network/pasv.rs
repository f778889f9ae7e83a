use crate::constants::CODE_PASSIVE;
use crate::core_error::{UploadError, UploadResult};
use crate::core_ftpcommand::response::Expect;
use crate::core_network::Transport;
use crate::session::Session;
use log::{debug, error};
use regex::Regex;
use std::sync::OnceLock;

fn pasv_regex() -> &'static Regex {
    static PASV: OnceLock<Regex> = OnceLock::new();
    PASV.get_or_init(|| {
        Regex::new(r"^\(\s*[-+]?\d+,\s*[-+]?\d+,\s*[-+]?\d+,\s*[-+]?\d+,\s*(\d+),\s*(\d+)")
            .expect("PASV pattern is valid")
    })
}

/// Extracts the data port from a 227 reply such as
/// `Entering Passive Mode (10,0,0,1,200,24)`.
///
/// Only the last two numbers matter: the host part is ignored because the
/// data connection goes to the host already used for control.
pub fn parse_passive_port(message: &str) -> UploadResult<u16> {
    let malformed = || UploadError::MalformedPassive(message.trim_end().to_string());

    let start = message.find('(').ok_or_else(malformed)?;
    let caps = pasv_regex().captures(&message[start..]).ok_or_else(malformed)?;
    let p1: u8 = caps[1].parse().map_err(|_| malformed())?;
    let p2: u8 = caps[2].parse().map_err(|_| malformed())?;
    Ok((u16::from(p1) << 8) + u16::from(p2))
}

/// Asks for passive mode and connects the data channel to the announced port.
/// The caller makes sure no data channel is open yet.
pub async fn open_data_channel<T: Transport>(session: &mut Session<T>) -> UploadResult<()> {
    let reply = session
        .control
        .send("PASV", "", Expect::Code(CODE_PASSIVE))
        .await?;

    let port = match parse_passive_port(&reply.message) {
        Ok(port) => port,
        Err(e) => {
            error!("Failed to parse data port");
            return Err(e);
        }
    };
    debug!("Data port: {}", port);

    if let Err(source) = session.data.connect(&session.host, port).await {
        error!("Data connection failed: {}", source);
        return Err(UploadError::DataConnect { port, source });
    }
    Ok(())
}
