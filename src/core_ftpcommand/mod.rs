// Client side of the FTP control channel
pub mod cwd;
pub mod exchange;
pub mod response;
pub mod stor;
