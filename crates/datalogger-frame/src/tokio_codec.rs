//! `tokio_util::codec` adapter for async transports.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::FrameConfig;
use crate::command::OutboundCommand;
use crate::decoder::{Frame, FrameDecoder};
use crate::error::FrameError;

/// Async counterpart of [`LinkReader`](crate::LinkReader) and
/// [`CommandWriter`](crate::CommandWriter).
///
/// Incoming bytes move from the framed read buffer into the inner
/// [`FrameDecoder`], so mode switches made through
/// [`set_streaming`](Self::set_streaming) apply to bytes not yet decoded.
#[derive(Debug, Default)]
pub struct LinkCodec {
    decoder: FrameDecoder,
}

impl LinkCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            decoder: FrameDecoder::with_config(config),
        }
    }

    pub fn set_streaming(&mut self, streaming: bool) {
        self.decoder.set_streaming(streaming);
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut FrameDecoder {
        &mut self.decoder
    }
}

impl Decoder for LinkCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if !src.is_empty() {
            let chunk = src.split();
            self.decoder.push(&chunk);
        }
        Ok(self.decoder.next_frame())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if self.decoder.buffered() == 0 || self.decoder.holds_only_idle() => Ok(None),
            None => Err(FrameError::ConnectionClosed),
        }
    }
}

impl Encoder<OutboundCommand> for LinkCodec {
    type Error = FrameError;

    fn encode(&mut self, item: OutboundCommand, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(item.as_bytes());
        Ok(())
    }
}
