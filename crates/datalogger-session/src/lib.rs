//! Command layer for a data logger connection.
//!
//! A [`Session`] owns the link reader, the command writer and the encoder
//! for one device. It enforces command preconditions and performs the one
//! mode transition the decoder cannot see for itself: a positive
//! acknowledgement of a start-sampling command switches the link into
//! streaming mode before the next byte is decoded.

pub mod config;
pub mod error;
pub mod session;

#[cfg(unix)]
pub mod connector;

pub use config::{SessionConfig, DEFAULT_POLL_INTERVAL, DEFAULT_RESPONSE_TIMEOUT};
pub use error::{Result, SessionError};
pub use session::{Session, SessionEvent};

#[cfg(unix)]
pub use connector::{connect, connect_default, DeviceSession};
