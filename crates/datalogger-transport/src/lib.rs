//! Serial transport for the data logger host link.
//!
//! Opens the device's USB CDC TTY in raw mode and exposes it as a
//! [`DeviceStream`], a plain `Read + Write` byte pipe. Everything above
//! (framing, sessions) is built on that type.
//!
//! Unix socket pairs can stand in for the TTY in tests and simulators.

pub mod error;
pub mod stream;

#[cfg(unix)]
pub mod serial;

pub use error::{Result, TransportError};
pub use stream::DeviceStream;

#[cfg(unix)]
pub use serial::{SerialConfig, SerialPort, DEFAULT_BAUD_RATE};
