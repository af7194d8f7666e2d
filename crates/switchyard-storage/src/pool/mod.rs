//! Connection handling.

pub mod pragmas;
pub mod serial_connection;

pub use serial_connection::SerialConnection;
