use std::io::{ErrorKind, Read};

use datalogger_transport::DeviceStream;
use tracing::debug;

use crate::codec::FrameConfig;
use crate::decoder::{Frame, FrameDecoder};
use crate::error::{transport_to_frame_error, FrameError, Result};

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads decoded frames from any `Read` stream.
///
/// Chunks reach the [`FrameDecoder`] in the order the transport returned
/// them; callers always get whole frames.
pub struct LinkReader<T> {
    inner: T,
    decoder: FrameDecoder,
    config: FrameConfig,
    paused: bool,
}

impl<T: Read> LinkReader<T> {
    /// Create a new link reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new link reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::with_config(&config),
            config,
            paused: false,
        }
    }

    /// Read the next frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` at EOF and
    /// `Err(FrameError::Paused)` when paused with nothing decoded.
    pub fn read_frame(&mut self) -> Result<Frame> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            if let Some(frame) = self.decoder.next_frame() {
                return Ok(frame);
            }

            if self.paused {
                return Err(FrameError::Paused);
            }

            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                if self.decoder.buffered() > 0 {
                    debug!(
                        buffered = self.decoder.buffered(),
                        "stream closed with undecoded bytes"
                    );
                }
                return Err(FrameError::ConnectionClosed);
            }

            self.decoder.push(&chunk[..read]);
        }
    }

    /// Switch the decoder between message and streaming mode.
    pub fn set_streaming(&mut self, streaming: bool) {
        self.decoder.set_streaming(streaming);
    }

    pub fn is_streaming(&self) -> bool {
        self.decoder.is_streaming()
    }

    /// Stop pulling bytes from the transport.
    ///
    /// Frames already decoded are still handed out.
    pub fn pause(&mut self) {
        if !self.paused {
            debug!("link reader paused");
        }
        self.paused = true;
    }

    /// Resume pulling bytes from the transport.
    pub fn resume(&mut self) {
        if self.paused {
            debug!("link reader resumed");
        }
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Borrow the decoder.
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Mutably borrow the decoder.
    pub fn decoder_mut(&mut self) -> &mut FrameDecoder {
        &mut self.decoder
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current link reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl LinkReader<DeviceStream> {
    /// Create a link reader for `DeviceStream` and apply read timeout from config.
    pub fn with_config_device(mut inner: DeviceStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}
