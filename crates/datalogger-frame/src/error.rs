use datalogger_transport::TransportError;

/// Errors that can occur during framing and command encoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A command parameter is outside the range the device accepts.
    #[error("invalid {name} {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: i64,
        reason: &'static str,
    },

    /// The payload does not fit behind a one-byte length header.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An empty payload would encode as the idle length byte.
    #[error("empty payload (a zero length header is reserved for an idle link)")]
    EmptyPayload,

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// The reader is paused and has no decoded frames left to hand out.
    #[error("link reader paused")]
    Paused,
}

pub type Result<T> = std::result::Result<T, FrameError>;

pub(crate) fn transport_to_frame_error(err: TransportError) -> FrameError {
    match err {
        TransportError::Io(io) => FrameError::Io(io),
        TransportError::Open { source, .. } | TransportError::Configure { source, .. } => {
            FrameError::Io(source)
        }
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
