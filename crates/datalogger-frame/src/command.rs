use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::codec::{encode_frame, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Shortest sampling period the firmware accepts, in microseconds.
pub const MIN_SAMPLING_PERIOD_MICROS: i64 = 20;

/// A host-to-device command before serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start periodic sampling; the device replies with an acknowledgement
    /// and then streams sample frames.
    SetPeriodicSampling { period_micros: u32 },
    /// Stop periodic sampling; the device ends the stream with the sentinel.
    StopPeriodicSampling,
    /// Take one sample; the device replies with a data message.
    ExecuteOneOffSampling,
}

impl Command {
    /// Short name for logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPeriodicSampling { .. } => "set-periodic-sampling",
            Self::StopPeriodicSampling => "stop-periodic-sampling",
            Self::ExecuteOneOffSampling => "execute-one-off-sampling",
        }
    }
}

/// Turns a [`Command`] into payload bytes (a protobuf message on the real
/// device).
pub trait CommandSerializer {
    fn serialize_command(&self, command: &Command) -> Vec<u8>;
}

/// Turns a control message payload into a typed device message.
pub trait MessageDeserializer {
    type Message;
    type Error: std::error::Error + Send + Sync + 'static;

    fn deserialize(&self, payload: &[u8]) -> std::result::Result<Self::Message, Self::Error>;
}

/// A framed command ready for the wire: length byte followed by payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCommand {
    bytes: Bytes,
}

impl OutboundCommand {
    /// The full wire bytes, length prefix included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The serialized payload without the length prefix.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..]
    }

    /// Wire length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; a framed command carries at least one payload byte.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for OutboundCommand {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Prefix a payload with its one-byte length.
pub fn frame(payload: &[u8]) -> Result<OutboundCommand> {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    encode_frame(payload, &mut buf)?;
    Ok(OutboundCommand {
        bytes: buf.freeze(),
    })
}

/// Check a sampling period and narrow it to the `u32` the wire carries.
pub fn validate_sampling_period(period_micros: i64) -> Result<u32> {
    if period_micros < 0 {
        return Err(FrameError::InvalidParameter {
            name: "sampling period",
            value: period_micros,
            reason: "must not be negative",
        });
    }
    if period_micros < MIN_SAMPLING_PERIOD_MICROS {
        return Err(FrameError::InvalidParameter {
            name: "sampling period",
            value: period_micros,
            reason: "must be at least 20 microseconds",
        });
    }
    u32::try_from(period_micros).map_err(|_| FrameError::InvalidParameter {
        name: "sampling period",
        value: period_micros,
        reason: "exceeds the 32-bit wire field",
    })
}

/// Builds framed device commands on top of a payload serializer.
///
/// Stop and one-off commands never change, so they are serialized and framed
/// once at construction; afterwards only the sampling period can fail.
#[derive(Debug, Clone)]
pub struct CommandEncoder<S> {
    serializer: S,
    stop: OutboundCommand,
    one_off: OutboundCommand,
}

impl<S: CommandSerializer> CommandEncoder<S> {
    /// Create an encoder, pre-framing the fixed commands.
    ///
    /// Fails if the serializer produces an empty or oversized payload for
    /// either of them.
    pub fn new(serializer: S) -> Result<Self> {
        let stop = frame(&serializer.serialize_command(&Command::StopPeriodicSampling))?;
        let one_off = frame(&serializer.serialize_command(&Command::ExecuteOneOffSampling))?;
        Ok(Self {
            serializer,
            stop,
            one_off,
        })
    }

    /// Serialize and frame any command.
    pub fn encode(&self, command: &Command) -> Result<OutboundCommand> {
        match command {
            Command::StopPeriodicSampling => Ok(self.stop.clone()),
            Command::ExecuteOneOffSampling => Ok(self.one_off.clone()),
            Command::SetPeriodicSampling { period_micros } => {
                self.encode_set_periodic_sampling(i64::from(*period_micros))
            }
        }
    }

    /// Build a start-sampling command for `period_micros`.
    pub fn encode_set_periodic_sampling(&self, period_micros: i64) -> Result<OutboundCommand> {
        let period_micros = validate_sampling_period(period_micros)?;
        let command = Command::SetPeriodicSampling { period_micros };
        let encoded = frame(&self.serializer.serialize_command(&command))?;
        debug!(period_micros, bytes = encoded.len(), "encoded set-periodic-sampling");
        Ok(encoded)
    }

    pub fn encode_stop_periodic_sampling(&self) -> OutboundCommand {
        self.stop.clone()
    }

    pub fn encode_execute_one_off_sampling(&self) -> OutboundCommand {
        self.one_off.clone()
    }

    /// Borrow the payload serializer.
    pub fn serializer(&self) -> &S {
        &self.serializer
    }
}
