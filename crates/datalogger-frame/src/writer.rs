use std::io::{ErrorKind, Write};

use datalogger_transport::DeviceStream;
use tracing::trace;

use crate::codec::FrameConfig;
use crate::command::{frame, OutboundCommand};
use crate::error::{transport_to_frame_error, FrameError, Result};

/// Writes framed commands to any `Write` stream.
pub struct CommandWriter<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Write> CommandWriter<T> {
    /// Create a new command writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new command writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Write one framed command and flush (blocking).
    pub fn send(&mut self, command: &OutboundCommand) -> Result<()> {
        self.write_all(command.as_bytes())?;
        trace!(bytes = command.len(), "command written");
        self.flush()
    }

    /// Frame and send a raw payload.
    pub fn send_payload(&mut self, payload: &[u8]) -> Result<()> {
        let command = frame(payload)?;
        self.send(&command)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current command writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl CommandWriter<DeviceStream> {
    /// Create a command writer for `DeviceStream` and apply write timeout from config.
    pub fn with_config_device(mut inner: DeviceStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_write_timeout(config.write_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}
