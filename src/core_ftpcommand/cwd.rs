use crate::constants::{CODE_DIR_CHANGED, CODE_DIR_CREATED, CODE_NOT_FOUND};
use crate::core_error::UploadResult;
use crate::core_ftpcommand::exchange::ControlChannel;
use crate::core_ftpcommand::response::Expect;
use crate::core_network::Transport;
use log::debug;

/// Moves into `name`, creating it first when the server reports it missing.
///
/// FTP has no "make sure this exists" command, so the CWD reply decides:
/// 550 means create then enter, any other code counts as already there.
pub async fn ensure_folder<T: Transport>(
    control: &mut ControlChannel<T>,
    name: &str,
) -> UploadResult<()> {
    debug!("Check for folder {}", name);
    let probe = control.send("CWD", name, Expect::Any).await?;
    if probe.is(CODE_NOT_FOUND) {
        control
            .send("MKD", name, Expect::Code(CODE_DIR_CREATED))
            .await?;
        control
            .send("CWD", name, Expect::Code(CODE_DIR_CHANGED))
            .await?;
    }
    Ok(())
}

/// Walks `full_path` one segment at a time from the current remote directory.
pub async fn ensure_path<T: Transport>(
    control: &mut ControlChannel<T>,
    full_path: &str,
) -> UploadResult<()> {
    for segment in full_path.split('/').filter(|segment| !segment.is_empty()) {
        ensure_folder(control, segment).await?;
    }
    Ok(())
}
