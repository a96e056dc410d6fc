use std::path::Path;

use datalogger_frame::{CommandWriter, FrameConfig, LinkReader};
use datalogger_transport::{DeviceStream, SerialPort};
use tracing::info;

use crate::config::{SessionConfig, DEFAULT_POLL_INTERVAL};
use crate::error::Result;
use crate::session::Session;

/// A session over a serial device.
pub type DeviceSession = Session<DeviceStream, DeviceStream>;

/// Open a device with default configuration.
pub fn connect_default(path: impl AsRef<Path>) -> Result<DeviceSession> {
    connect(path, &SessionConfig::default())
}

/// Open a serial device and build a session on it.
///
/// Without a configured read timeout the stream polls every
/// [`DEFAULT_POLL_INTERVAL`] so response deadlines are honoured.
pub fn connect(path: impl AsRef<Path>, config: &SessionConfig) -> Result<DeviceSession> {
    let path = path.as_ref();
    let stream = SerialPort::open(path, &config.serial)?;
    let reader_stream = stream.try_clone()?;

    let frame_config = FrameConfig {
        read_timeout: config.frame.read_timeout.or(Some(DEFAULT_POLL_INTERVAL)),
        ..config.frame.clone()
    };

    let reader = LinkReader::with_config_device(reader_stream, frame_config.clone())?;
    let writer = CommandWriter::with_config_device(stream, frame_config)?;

    info!(path = %path.display(), baud_rate = config.serial.baud_rate, "connected to data logger");
    Session::from_parts(reader, writer, config.response_timeout)
}
