use crate::config::Config;
use crate::constants::ONE_MEG;
use log::info;
use std::io;
use std::path::{Component, Path};

/// Turns a storage path into a path relative to the storage root.
///
/// Only plain name segments are kept. A `..` segment is rejected rather than
/// resolved, so the result never leaves the root.
pub fn sanitize_input(input: &str) -> io::Result<String> {
    let mut segments = Vec::new();
    for component in Path::new(input).components() {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path escapes storage root: {}", input),
                ));
            }
        }
    }
    Ok(segments.join("/"))
}

/// True when `name` ends with `.ext` for one of `extensions`, ignoring case.
pub fn matches_extension(name: &str, extensions: &[String]) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    !stem.is_empty() && extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext))
}

/// `clip.mjpeg` + `avi` gives `clip.avi`.
pub fn change_extension(name: &str, extension: &str) -> String {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    format!("{}.{}", stem, extension)
}

/// Directory part of a storage path, `/` for top-level files.
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(pos) => &path[..pos],
    }
}

pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / ONE_MEG
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  FTP Server: {}:{}", config.ftp.host, config.ftp.port);
    info!("  FTP User: {}", config.ftp.user);
    info!("  FTP Password: {}", "*".repeat(config.ftp.pass.len().min(8)));
    info!("  Working Directory: {}", config.ftp.working_dir);
    info!("  Storage Root: {}", config.upload.storage_root);
    info!("  Extensions: {}", config.upload.extensions.join(", "));
    info!("  Chunk Size: {} KB", config.upload.chunk_size / 1024);
    if let Some(remap) = &config.remap {
        info!("  Remap: .{} -> .{}", remap.from, remap.to);
    }
}
