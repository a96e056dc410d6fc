//! Framing for the data logger host link.
//!
//! The device speaks one interleaved byte stream with two shapes:
//! - Message mode: a 1-byte length followed by that many payload bytes
//! - Streaming mode: back-to-back 32-byte sample frames (eight little-endian
//!   `u32` channels), ended by ten `0xFF` bytes
//!
//! [`FrameDecoder`] turns arbitrarily chunked input into [`Frame`]s and
//! [`CommandEncoder`] builds the length-prefixed commands going the other way.
//! Payload schemas stay opaque here, behind [`CommandSerializer`] and
//! [`MessageDeserializer`].

pub mod codec;
pub mod command;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod sample;
pub mod writer;

#[cfg(feature = "async")]
pub mod tokio_codec;

pub use codec::{
    decode_frame, encode_frame, ControlMessage, FragmentPolicy, FrameConfig, HEADER_SIZE,
    IDLE_LENGTH, MAX_PAYLOAD,
};
pub use command::{
    frame, validate_sampling_period, Command, CommandEncoder, CommandSerializer,
    MessageDeserializer, OutboundCommand, MIN_SAMPLING_PERIOD_MICROS,
};
pub use decoder::{DecoderMode, DecoderStats, Frame, FrameDecoder};
pub use error::{FrameError, Result};
pub use reader::LinkReader;
pub use sample::{
    is_end_of_stream, SampleFrame, CHANNEL_COUNT, END_OF_STREAM, END_OF_STREAM_BYTE,
    END_OF_STREAM_LEN, SAMPLE_FRAME_SIZE,
};
pub use writer::CommandWriter;

#[cfg(feature = "async")]
pub use tokio_codec::LinkCodec;
