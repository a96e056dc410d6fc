use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: a single length byte.
pub const HEADER_SIZE: usize = 1;

/// Largest payload a one-byte length header can describe.
pub const MAX_PAYLOAD: usize = u8::MAX as usize;

/// Length value that never starts a frame; the link sends it when idle.
pub const IDLE_LENGTH: u8 = 0;

/// A complete length-prefixed message, ready for schema decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    /// The length header as received. Always equal to `payload.len()`.
    pub length: u8,
    /// The serialized application message.
    pub payload: Bytes,
}

impl ControlMessage {
    /// The total wire size of this message (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a payload into the message-mode wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬──────────────────┐
/// │ Length (1B)│ Payload          │
/// │ 1..=255    │ (Length bytes)   │
/// └────────────┴──────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.is_empty() {
        return Err(FrameError::EmptyPayload);
    }
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u8(payload.len() as u8);
    dst.put_slice(payload);
    Ok(())
}

/// Decode one message-mode frame from the head of a buffer.
///
/// Returns `None` if the buffer is empty, starts with the idle length byte,
/// or doesn't contain the complete payload yet. On success, consumes the
/// frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut) -> Option<ControlMessage> {
    let length = *src.first()?;
    if length == IDLE_LENGTH {
        return None;
    }

    let total = HEADER_SIZE + length as usize;
    if src.len() < total {
        return None; // Need more data
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(length as usize).freeze();

    Some(ControlMessage { length, payload })
}

/// What the decoder does with streamed bytes that are neither whole sample
/// frames nor the end-of-stream sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentPolicy {
    /// Drop the buffered fragment and wait for the next aligned chunk.
    #[default]
    Discard,
    /// Decode block by block: every complete 32-byte block is a sample, a
    /// sentinel at the head of a shorter remainder ends the stream, and any
    /// other partial block waits for the next chunk.
    Retain,
}

/// Configuration for the link codec.
#[derive(Debug, Clone, Default)]
pub struct FrameConfig {
    /// Streaming-mode fragment handling. Default: [`FragmentPolicy::Discard`].
    pub fragment_policy: FragmentPolicy,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}
