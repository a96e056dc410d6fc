use std::io::{Read, Write};
use std::time::{Duration, Instant};

use bytes::Bytes;
use datalogger_frame::{
    CommandEncoder, CommandWriter, DecoderStats, Frame, FrameError, LinkReader,
    MessageDeserializer, OutboundCommand, SampleFrame,
};
use datalogger_proto::{DeviceMessage, OneOffSample, ProtoError, ProtobufSchema};
use tracing::{debug, info, warn};

use crate::config::{SessionConfig, DEFAULT_RESPONSE_TIMEOUT};
use crate::error::{Result, SessionError};

/// Something the device sent.
#[derive(Debug)]
pub enum SessionEvent {
    /// A decoded control message.
    Message(DeviceMessage),
    /// One streamed sample frame.
    Sample(SampleFrame),
    /// The device ended the sample stream.
    StreamEnded,
    /// A framed message whose payload failed to decode. The link is intact;
    /// the next event decodes normally.
    DecodeError { payload: Bytes, error: ProtoError },
}

/// A connection to one data logger.
///
/// Single owner, no internal threads. The streaming flag lives in the
/// reader's decoder and only changes on this thread: set by a positive
/// acknowledgement, cleared by the end-of-stream sentinel.
pub struct Session<R, W> {
    reader: LinkReader<R>,
    writer: CommandWriter<W>,
    encoder: CommandEncoder<ProtobufSchema>,
    schema: ProtobufSchema,
    response_timeout: Duration,
}

impl<R: Read, W: Write> Session<R, W> {
    /// Build a session over a reader/writer pair with explicit configuration.
    pub fn new(reader: R, writer: W, config: &SessionConfig) -> Result<Self> {
        Self::from_parts(
            LinkReader::with_config(reader, config.frame.clone()),
            CommandWriter::with_config(writer, config.frame.clone()),
            config.response_timeout,
        )
    }

    /// Build a session with default configuration.
    pub fn with_defaults(reader: R, writer: W) -> Result<Self> {
        Self::from_parts(
            LinkReader::new(reader),
            CommandWriter::new(writer),
            DEFAULT_RESPONSE_TIMEOUT,
        )
    }

    /// Build a session from an already configured link reader and writer.
    pub fn from_parts(
        reader: LinkReader<R>,
        writer: CommandWriter<W>,
        response_timeout: Duration,
    ) -> Result<Self> {
        let schema = ProtobufSchema::new();
        Ok(Self {
            reader,
            writer,
            encoder: CommandEncoder::new(schema)?,
            schema,
            response_timeout,
        })
    }

    /// Receive the next event (blocking).
    ///
    /// Read timeouts surface as errors for which
    /// [`SessionError::is_read_timeout`] is true.
    pub fn recv_event(&mut self) -> Result<SessionEvent> {
        let frame = match self.reader.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) => {
                return Err(SessionError::Disconnected(
                    "connection closed by device".to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        let event = match frame {
            Frame::Control(message) => match self.schema.deserialize(&message.payload) {
                Ok(decoded) => {
                    if matches!(decoded, DeviceMessage::SetPeriodicSamplerAck { ack: true }) {
                        self.reader.set_streaming(true);
                        info!("periodic sampling acknowledged; streaming");
                    }
                    SessionEvent::Message(decoded)
                }
                Err(error) => {
                    warn!(length = message.length, %error, "failed to decode device message");
                    SessionEvent::DecodeError {
                        payload: message.payload,
                        error,
                    }
                }
            },
            Frame::Sample(sample) => SessionEvent::Sample(sample),
            Frame::StreamEnd => SessionEvent::StreamEnded,
        };
        Ok(event)
    }

    /// Send a start-sampling command.
    ///
    /// The reply arrives as a [`SessionEvent::Message`]; streaming starts
    /// when a positive acknowledgement is received.
    pub fn set_periodic_sampling(&mut self, period_micros: i64) -> Result<()> {
        self.ensure_idle("set-periodic-sampling")?;
        let command = self.encoder.encode_set_periodic_sampling(period_micros)?;
        self.send(&command, "set-periodic-sampling")
    }

    /// Send a stop-sampling command. Streaming ends when the sentinel arrives.
    pub fn stop_periodic_sampling(&mut self) -> Result<()> {
        let command = self.encoder.encode_stop_periodic_sampling();
        self.send(&command, "stop-periodic-sampling")
    }

    /// Send a one-off sampling command.
    pub fn execute_one_off_sampling(&mut self) -> Result<()> {
        self.ensure_idle("execute-one-off-sampling")?;
        let command = self.encoder.encode_execute_one_off_sampling();
        self.send(&command, "execute-one-off-sampling")
    }

    /// Start periodic sampling and wait for the acknowledgement.
    pub fn start_streaming(&mut self, period_micros: i64) -> Result<()> {
        self.set_periodic_sampling(period_micros)?;
        self.wait_for(|event| match event {
            SessionEvent::Message(DeviceMessage::SetPeriodicSamplerAck { ack: true }) => {
                Some(Ok(()))
            }
            SessionEvent::Message(DeviceMessage::SetPeriodicSamplerAck { ack: false }) => {
                Some(Err(SessionError::Rejected("set-periodic-sampling")))
            }
            other => {
                debug!(?other, "ignoring event while waiting for acknowledgement");
                None
            }
        })
    }

    /// Take one sample and wait for the data.
    pub fn sample_once(&mut self) -> Result<OneOffSample> {
        self.execute_one_off_sampling()?;
        self.wait_for(|event| match event {
            SessionEvent::Message(DeviceMessage::OneOffSample(sample)) => Some(Ok(sample)),
            other => {
                debug!(?other, "ignoring event while waiting for one-off data");
                None
            }
        })
    }

    /// Stop periodic sampling and drain frames until the sentinel.
    ///
    /// Returns the number of sample frames drained. When not streaming the
    /// command is still sent and nothing is drained.
    pub fn stop_streaming(&mut self) -> Result<u64> {
        self.stop_periodic_sampling()?;
        if !self.is_streaming() {
            return Ok(0);
        }

        let mut drained = 0u64;
        self.wait_for(|event| match event {
            SessionEvent::StreamEnded => Some(Ok(())),
            SessionEvent::Sample(_) => {
                drained += 1;
                None
            }
            other => {
                debug!(?other, "ignoring event while draining stream");
                None
            }
        })?;
        info!(drained, "streaming stopped");
        Ok(drained)
    }

    /// Override the streaming flag, for a link that joined a device already
    /// streaming.
    pub fn set_streaming(&mut self, streaming: bool) {
        self.reader.set_streaming(streaming);
    }

    pub fn is_streaming(&self) -> bool {
        self.reader.is_streaming()
    }

    /// Stop pulling bytes from the device.
    pub fn pause(&mut self) {
        self.reader.pause();
    }

    /// Resume pulling bytes from the device.
    pub fn resume(&mut self) {
        self.reader.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.reader.is_paused()
    }

    /// Decoder counters for this connection.
    pub fn stats(&self) -> DecoderStats {
        self.reader.decoder().stats()
    }

    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    pub fn set_response_timeout(&mut self, timeout: Duration) {
        self.response_timeout = timeout;
    }

    /// Borrow the link reader.
    pub fn reader(&self) -> &LinkReader<R> {
        &self.reader
    }

    /// Borrow the command writer.
    pub fn writer(&self) -> &CommandWriter<W> {
        &self.writer
    }

    /// Consume the session and return the reader and writer.
    pub fn into_parts(self) -> (LinkReader<R>, CommandWriter<W>) {
        (self.reader, self.writer)
    }

    fn ensure_idle(&self, command: &'static str) -> Result<()> {
        if self.is_streaming() {
            return Err(SessionError::Streaming(command));
        }
        Ok(())
    }

    fn send(&mut self, command: &OutboundCommand, name: &'static str) -> Result<()> {
        self.writer.send(command)?;
        debug!(command = name, bytes = command.len(), "command sent");
        Ok(())
    }

    fn wait_for<T>(
        &mut self,
        mut on_event: impl FnMut(SessionEvent) -> Option<Result<T>>,
    ) -> Result<T> {
        let timeout = self.response_timeout;
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() >= deadline {
                return Err(SessionError::Timeout(timeout));
            }

            match self.recv_event() {
                Ok(event) => {
                    if let Some(done) = on_event(event) {
                        return done;
                    }
                }
                Err(err) if err.is_read_timeout() => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

impl<R, W> std::fmt::Debug for Session<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("response_timeout", &self.response_timeout)
            .finish_non_exhaustive()
    }
}
