pub mod pasv;
pub mod transport;

#[cfg(test)]
pub mod mock;

pub use transport::{TcpTransport, Transport};
