use std::io::ErrorKind;
use std::time::Duration;

use datalogger_frame::FrameError;

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] datalogger_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The command is not allowed while the device is streaming.
    #[error("{0} is not allowed while streaming")]
    Streaming(&'static str),

    /// The device refused the command.
    #[error("device rejected {0}")]
    Rejected(&'static str),

    /// No matching reply arrived in time.
    #[error("no response after {0:?}")]
    Timeout(Duration),

    /// The device closed the connection.
    #[error("device disconnected: {0}")]
    Disconnected(String),
}

impl SessionError {
    /// Returns true for a read that timed out at the transport.
    ///
    /// These are expected while polling and are retried by the waits.
    pub fn is_read_timeout(&self) -> bool {
        matches!(
            self,
            Self::Frame(FrameError::Io(err))
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
        )
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
