use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "rouilleup", about = "Uploads files from local storage to an FTP server.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Files or folders to upload, relative to the storage root (e.g. /DCIM/clip.mjpeg)
    #[arg(required = true)]
    pub paths: Vec<String>,
}
