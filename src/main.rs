mod config;
mod constants;
mod core_cli;
mod core_error;
mod core_ftpcommand;
mod core_network;
mod core_storage;
mod core_transform;
mod dispatcher;
mod helpers;
mod server;
mod session;
mod upload;

#[cfg(test)]
mod test_support;

use crate::config::Config;
use crate::core_cli::Cli;
use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Determine the default config path based on the OS
    let default_config_path = if cfg!(target_os = "windows") {
        "C:\\rouilleup\\etc\\rouilleup.conf"
    } else {
        "/etc/rouilleup.conf"
    };

    let config_path = if args.config.is_empty() {
        default_config_path
    } else {
        args.config.as_str()
    };
    let config = Config::load_from_file(config_path)?;

    server::run(config, &args.paths).await?;

    Ok(())
}
