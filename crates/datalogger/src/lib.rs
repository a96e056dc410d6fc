//! Host-side link to a USB-serial data logger.
//!
//! The device sends one byte stream that switches between length-prefixed
//! protobuf messages and runs of 32-byte sample frames. This crate gathers
//! the pieces needed to talk to it.
//!
//! # Crate Structure
//!
//! - [`transport`] - Serial TTY setup and the `DeviceStream` byte pipe
//! - [`frame`] - Stream decoder, sample frames and command framing
//! - [`proto`] - Protobuf message contract with the firmware
//! - [`session`] - Command layer with the ack-driven streaming transition

/// Re-export transport types.
pub mod transport {
    pub use datalogger_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use datalogger_frame::*;
}

/// Re-export protobuf schema types.
pub mod proto {
    pub use datalogger_proto::*;
}

/// Re-export session types.
pub mod session {
    pub use datalogger_session::*;
}
