use std::time::Duration;

use datalogger_frame::FrameConfig;
#[cfg(unix)]
use datalogger_transport::SerialConfig;

/// How long convenience calls wait for the device's reply.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Read timeout used on the device stream when none is configured, so waits
/// can check their deadline.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a device session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Serial line settings.
    #[cfg(unix)]
    pub serial: SerialConfig,
    /// Framing and stream timeouts.
    pub frame: FrameConfig,
    /// Deadline for acknowledgements, one-off data and the end-of-stream
    /// sentinel.
    pub response_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            #[cfg(unix)]
            serial: SerialConfig::default(),
            frame: FrameConfig::default(),
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}
