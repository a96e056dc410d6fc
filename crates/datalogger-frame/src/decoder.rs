use std::collections::VecDeque;

use bytes::{Buf, BytesMut};
use tracing::{debug, info, trace, warn};

use crate::codec::{decode_frame, ControlMessage, FragmentPolicy, FrameConfig, IDLE_LENGTH};
use crate::sample::{is_end_of_stream, SampleFrame, END_OF_STREAM_LEN, SAMPLE_FRAME_SIZE};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

/// How the decoder interprets incoming bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderMode {
    /// Length-prefixed control messages.
    #[default]
    Message,
    /// Raw sample frames until the end-of-stream sentinel.
    Streaming,
}

/// One decoded unit of the device stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete length-prefixed message.
    Control(ControlMessage),
    /// One 32-byte sample frame.
    Sample(SampleFrame),
    /// The end-of-stream sentinel; the decoder is back in message mode.
    StreamEnd,
}

/// Running counters for one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderStats {
    pub control_messages: u64,
    pub sample_frames: u64,
    pub stream_ends: u64,
    /// Streamed fragments that matched neither frame nor sentinel shape.
    pub anomalies: u64,
    /// Bytes dropped along with those fragments.
    pub discarded_bytes: u64,
    /// Stale idle length bytes skipped in message mode.
    pub idle_bytes: u64,
}

/// Stream decoder for the device link.
///
/// Owns the accumulation buffer and the current [`DecoderMode`]. Bytes go in
/// through [`push`](Self::push) or [`feed`](Self::feed) in the order the
/// transport delivered them; complete frames come out. Partial units stay
/// buffered until the rest arrives.
///
/// The decoder never enters streaming mode by itself. Whoever interprets
/// control messages calls [`set_streaming`](Self::set_streaming) once the
/// device acknowledges a start-sampling command.
#[derive(Debug)]
pub struct FrameDecoder {
    mode: DecoderMode,
    buf: BytesMut,
    pending: VecDeque<Frame>,
    policy: FragmentPolicy,
    stats: DecoderStats,
}

impl FrameDecoder {
    /// Create a decoder in message mode with the default fragment policy.
    pub fn new() -> Self {
        Self::with_policy(FragmentPolicy::default())
    }

    /// Create a decoder using the fragment policy from `config`.
    pub fn with_config(config: &FrameConfig) -> Self {
        Self::with_policy(config.fragment_policy)
    }

    /// Create a decoder with an explicit fragment policy.
    pub fn with_policy(policy: FragmentPolicy) -> Self {
        Self {
            mode: DecoderMode::Message,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            pending: VecDeque::new(),
            policy,
            stats: DecoderStats::default(),
        }
    }

    /// Append a chunk and return every frame that can be completed.
    ///
    /// An empty chunk changes nothing and yields nothing.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.push(chunk);
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame() {
            frames.push(frame);
        }
        frames
    }

    /// Append a chunk without decoding anything yet.
    pub fn push(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        self.buf.extend_from_slice(chunk);
        trace!(
            bytes = chunk.len(),
            buffered = self.buf.len(),
            "chunk buffered"
        );
    }

    /// Decode the next frame, if one is complete.
    ///
    /// Pulling one frame at a time lets the caller switch modes between an
    /// acknowledgement and the bytes that follow it.
    pub fn next_frame(&mut self) -> Option<Frame> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Some(frame);
            }

            match self.mode {
                DecoderMode::Message => return self.next_message().map(Frame::Control),
                DecoderMode::Streaming => {
                    if !self.drain_stream() {
                        return None;
                    }
                }
            }
        }
    }

    /// Switch between message and streaming interpretation.
    pub fn set_streaming(&mut self, streaming: bool) {
        let mode = if streaming {
            DecoderMode::Streaming
        } else {
            DecoderMode::Message
        };
        if self.mode != mode {
            debug!(?mode, buffered = self.buf.len(), "decoder mode changed");
        }
        self.mode = mode;
    }

    /// Current interpretation mode.
    pub fn mode(&self) -> DecoderMode {
        self.mode
    }

    /// Returns true while sample frames are expected.
    pub fn is_streaming(&self) -> bool {
        self.mode == DecoderMode::Streaming
    }

    /// Bytes received but not yet interpreted.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Frames decoded but not yet handed out.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Counters since creation or the last [`reset`](Self::reset).
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Active fragment policy.
    pub fn fragment_policy(&self) -> FragmentPolicy {
        self.policy
    }

    /// Drop all buffered state and return to message mode.
    pub fn reset(&mut self) {
        if !self.buf.is_empty() || !self.pending.is_empty() {
            debug!(
                buffered = self.buf.len(),
                pending = self.pending.len(),
                "discarding decoder state"
            );
        }
        self.buf.clear();
        self.pending.clear();
        self.mode = DecoderMode::Message;
        self.stats = DecoderStats::default();
    }

    fn next_message(&mut self) -> Option<ControlMessage> {
        self.skip_idle();
        let message = decode_frame(&mut self.buf)?;
        self.stats.control_messages += 1;
        debug!(length = message.length, "control message decoded");
        Some(message)
    }

    // A zero length byte stays put while it is the newest byte; anything
    // arriving after it supersedes it.
    fn skip_idle(&mut self) {
        let idle = self.buf.iter().take_while(|&&b| b == IDLE_LENGTH).count();
        let skip = idle.min(self.buf.len().saturating_sub(1));
        if skip > 0 {
            self.buf.advance(skip);
            self.stats.idle_bytes += skip as u64;
            trace!(skipped = skip, "skipped idle length bytes");
        }
    }

    /// One streaming-mode step. Returns false when no progress is possible.
    fn drain_stream(&mut self) -> bool {
        let len = self.buf.len();
        if len == 0 {
            return false;
        }

        if self.policy == FragmentPolicy::Retain {
            return self.drain_block();
        }

        if is_end_of_stream(&self.buf) {
            self.buf.clear();
            self.end_stream();
            return true;
        }

        if len % SAMPLE_FRAME_SIZE == 0 {
            self.queue_samples(len);
            return true;
        }

        self.stats.anomalies += 1;
        self.stats.discarded_bytes += len as u64;
        warn!(
            bytes = len,
            "streamed bytes match neither sample frames nor end-of-stream; discarding"
        );
        self.buf.clear();
        false
    }

    // Retain: walk the buffer one block at a time. A full block is always a
    // sample, even when its first channels are all 0xFF. The sentinel is only
    // recognised at the head of a shorter remainder, and whatever follows it
    // is message-mode data.
    fn drain_block(&mut self) -> bool {
        let len = self.buf.len();

        if len >= SAMPLE_FRAME_SIZE {
            self.queue_samples(SAMPLE_FRAME_SIZE);
            return true;
        }

        if len >= END_OF_STREAM_LEN && is_end_of_stream(&self.buf[..END_OF_STREAM_LEN]) {
            self.buf.advance(END_OF_STREAM_LEN);
            self.end_stream();
            return true;
        }

        trace!(buffered = len, "holding partial sample frame");
        false
    }

    /// True when the only undecoded bytes are idle markers in message mode.
    #[cfg(feature = "async")]
    pub(crate) fn holds_only_idle(&self) -> bool {
        self.mode == DecoderMode::Message
            && !self.buf.is_empty()
            && self.buf.iter().all(|&b| b == IDLE_LENGTH)
    }

    fn queue_samples(&mut self, len: usize) {
        let run = self.buf.split_to(len);
        for block in run.chunks_exact(SAMPLE_FRAME_SIZE) {
            self.pending
                .push_back(Frame::Sample(SampleFrame::from_block(block)));
        }
        let count = (len / SAMPLE_FRAME_SIZE) as u64;
        self.stats.sample_frames += count;
        trace!(frames = count, "sample frames decoded");
    }

    fn end_stream(&mut self) {
        self.stats.stream_ends += 1;
        self.mode = DecoderMode::Message;
        self.pending.push_back(Frame::StreamEnd);
        info!("end-of-stream sentinel received; back to message mode");
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use proptest::collection::vec;
    use proptest::prelude::*;

    use super::*;
    use crate::codec::encode_frame;
    use crate::sample::END_OF_STREAM;

    fn wire(payloads: &[&[u8]]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for payload in payloads {
            encode_frame(payload, &mut buf).unwrap();
        }
        buf.to_vec()
    }

    fn sample_bytes(frames: &[[u32; 8]]) -> Vec<u8> {
        frames
            .iter()
            .flat_map(|channels| SampleFrame::new(*channels).to_bytes())
            .collect()
    }

    fn payloads(frames: &[Frame]) -> Vec<Vec<u8>> {
        frames
            .iter()
            .map(|frame| match frame {
                Frame::Control(message) => message.payload.to_vec(),
                other => panic!("expected control message, got {other:?}"),
            })
            .collect()
    }

    fn streaming_decoder(policy: FragmentPolicy) -> FrameDecoder {
        let mut decoder = FrameDecoder::with_policy(policy);
        decoder.set_streaming(true);
        decoder
    }

    #[test]
    fn starts_in_message_mode() {
        let decoder = FrameDecoder::new();
        assert_eq!(decoder.mode(), DecoderMode::Message);
        assert_eq!(decoder.buffered(), 0);
        assert_eq!(decoder.fragment_policy(), FragmentPolicy::Discard);
    }

    #[test]
    fn single_message_in_one_chunk() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(&wire(&[b"\x0a\x02\x08\x01"]));

        assert_eq!(frames.len(), 1);
        let Frame::Control(message) = &frames[0] else {
            panic!("expected control message");
        };
        assert_eq!(message.length, 4);
        assert_eq!(message.payload.as_ref(), b"\x0a\x02\x08\x01");
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn several_messages_in_one_chunk() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(&wire(&[b"one", b"two", b"three"]));
        assert_eq!(
            payloads(&frames),
            vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]
        );
        assert_eq!(decoder.stats().control_messages, 3);
    }

    #[test]
    fn message_split_across_chunks() {
        let mut decoder = FrameDecoder::new();
        let bytes = wire(&[b"split-me"]);

        assert!(decoder.feed(&bytes[..1]).is_empty());
        assert!(decoder.feed(&bytes[1..4]).is_empty());
        assert_eq!(decoder.buffered(), 4);

        let frames = decoder.feed(&bytes[4..]);
        assert_eq!(payloads(&frames), vec![b"split-me".to_vec()]);
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn trailing_partial_message_is_retained() {
        let mut decoder = FrameDecoder::new();
        let mut bytes = wire(&[b"whole"]);
        bytes.extend_from_slice(&[6, b'p', b'a']);

        let frames = decoder.feed(&bytes);
        assert_eq!(payloads(&frames), vec![b"whole".to_vec()]);
        assert_eq!(decoder.buffered(), 3);

        let frames = decoder.feed(b"rtly");
        assert_eq!(payloads(&frames), vec![b"partly".to_vec()]);
    }

    #[test]
    fn empty_chunk_is_a_no_op() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(&[5, b'a', b'b']);
        let before = (decoder.mode(), decoder.buffered(), decoder.stats());

        assert!(decoder.feed(b"").is_empty());
        assert_eq!((decoder.mode(), decoder.buffered(), decoder.stats()), before);

        let mut streaming = streaming_decoder(FragmentPolicy::Retain);
        streaming.feed(&[1u8; 12]);
        let before = (streaming.mode(), streaming.buffered(), streaming.stats());
        assert!(streaming.feed(b"").is_empty());
        assert_eq!(
            (streaming.mode(), streaming.buffered(), streaming.stats()),
            before
        );
    }

    #[test]
    fn zero_length_byte_never_yields_a_message() {
        let mut decoder = FrameDecoder::new();

        assert!(decoder.feed(&[0]).is_empty());
        assert_eq!(decoder.buffered(), 1);
        assert!(decoder.feed(b"").is_empty());
        assert_eq!(decoder.buffered(), 1);
    }

    #[test]
    fn zero_length_byte_is_superseded_by_later_frame() {
        let mut decoder = FrameDecoder::new();

        assert!(decoder.feed(&[0]).is_empty());
        let frames = decoder.feed(&wire(&[b"abc"]));

        assert_eq!(payloads(&frames), vec![b"abc".to_vec()]);
        assert_eq!(decoder.buffered(), 0);
        assert_eq!(decoder.stats().idle_bytes, 1);
    }

    #[test]
    fn idle_bytes_between_messages_are_skipped() {
        let mut decoder = FrameDecoder::new();
        let mut bytes = wire(&[b"a"]);
        bytes.extend_from_slice(&[0, 0, 0]);
        bytes.extend_from_slice(&wire(&[b"b"]));

        let frames = decoder.feed(&bytes);
        assert_eq!(payloads(&frames), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(decoder.stats().idle_bytes, 3);
    }

    #[test]
    fn max_length_message() {
        let payload = vec![0x42; 255];
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(&wire(&[&payload]));

        let Frame::Control(message) = &frames[0] else {
            panic!("expected control message");
        };
        assert_eq!(message.length, 255);
        assert_eq!(message.payload.len(), 255);
    }

    #[test]
    fn streaming_frame_decodes_little_endian_channels() {
        let mut decoder = streaming_decoder(FragmentPolicy::Discard);
        let bytes: Vec<u8> = (0u32..8).flat_map(u32::to_le_bytes).collect();
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 1, 0, 0, 0]);

        let frames = decoder.feed(&bytes);
        assert_eq!(
            frames,
            vec![Frame::Sample(SampleFrame::new([0, 1, 2, 3, 4, 5, 6, 7]))]
        );
        assert_eq!(decoder.buffered(), 0);
        assert!(decoder.is_streaming());
    }

    #[test]
    fn streaming_multiple_frames_in_one_chunk() {
        let mut decoder = streaming_decoder(FragmentPolicy::Discard);
        let frames = decoder.feed(&sample_bytes(&[[1; 8], [2; 8], [3; 8]]));

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2], Frame::Sample(SampleFrame::new([3; 8])));
        assert_eq!(decoder.stats().sample_frames, 3);
    }

    #[test]
    fn sentinel_ends_stream_and_restores_message_mode() {
        let mut decoder = streaming_decoder(FragmentPolicy::Discard);

        let frames = decoder.feed(&END_OF_STREAM);
        assert_eq!(frames, vec![Frame::StreamEnd]);
        assert_eq!(decoder.mode(), DecoderMode::Message);
        assert_eq!(decoder.buffered(), 0);

        let frames = decoder.feed(&wire(&[b"\x12\x02\x08\x01"]));
        assert_eq!(payloads(&frames), vec![b"\x12\x02\x08\x01".to_vec()]);
    }

    #[test]
    fn sentinel_in_message_mode_is_just_a_length_byte() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(&END_OF_STREAM).is_empty());
        assert_eq!(decoder.buffered(), END_OF_STREAM.len());
    }

    #[test]
    fn ten_non_sentinel_bytes_are_an_anomaly() {
        let mut decoder = streaming_decoder(FragmentPolicy::Discard);
        let mut almost = END_OF_STREAM;
        almost[9] = 0x00;

        assert!(decoder.feed(&almost).is_empty());
        assert!(decoder.is_streaming());
        assert_eq!(decoder.buffered(), 0);
        assert_eq!(decoder.stats().anomalies, 1);
    }

    #[test]
    fn misaligned_fragment_is_discarded() {
        let mut decoder = streaming_decoder(FragmentPolicy::Discard);

        assert!(decoder.feed(&[7u8; 20]).is_empty());
        assert_eq!(decoder.buffered(), 0);

        let stats = decoder.stats();
        assert_eq!(stats.anomalies, 1);
        assert_eq!(stats.discarded_bytes, 20);

        // The next aligned chunk decodes normally.
        let frames = decoder.feed(&sample_bytes(&[[9; 8]]));
        assert_eq!(frames, vec![Frame::Sample(SampleFrame::new([9; 8]))]);
    }

    #[test]
    fn frames_followed_by_sentinel_in_one_chunk_are_discarded() {
        let mut decoder = streaming_decoder(FragmentPolicy::Discard);
        let mut bytes = sample_bytes(&[[1; 8]]);
        bytes.extend_from_slice(&END_OF_STREAM);

        assert!(decoder.feed(&bytes).is_empty());
        assert!(decoder.is_streaming());
        assert_eq!(decoder.stats().discarded_bytes, 42);
    }

    #[test]
    fn retain_policy_completes_split_frames() {
        let mut decoder = streaming_decoder(FragmentPolicy::Retain);
        let bytes = sample_bytes(&[[4; 8], [5; 8]]);

        let frames = decoder.feed(&bytes[..40]);
        assert_eq!(frames, vec![Frame::Sample(SampleFrame::new([4; 8]))]);
        assert_eq!(decoder.buffered(), 8);

        let frames = decoder.feed(&bytes[40..]);
        assert_eq!(frames, vec![Frame::Sample(SampleFrame::new([5; 8]))]);
        assert_eq!(decoder.stats().anomalies, 0);
    }

    #[test]
    fn retain_policy_finds_trailing_sentinel() {
        let mut decoder = streaming_decoder(FragmentPolicy::Retain);
        let mut bytes = sample_bytes(&[[1; 8], [2; 8]]);
        bytes.extend_from_slice(&END_OF_STREAM);
        bytes.extend_from_slice(&wire(&[b"ack"]));

        let frames = decoder.feed(&bytes[..74]);
        assert_eq!(
            frames,
            vec![
                Frame::Sample(SampleFrame::new([1; 8])),
                Frame::Sample(SampleFrame::new([2; 8])),
                Frame::StreamEnd,
            ]
        );
        assert_eq!(decoder.mode(), DecoderMode::Message);

        let frames = decoder.feed(&bytes[74..]);
        assert_eq!(payloads(&frames), vec![b"ack".to_vec()]);
    }

    #[test]
    fn retain_policy_keeps_saturated_channels_as_samples() {
        let mut decoder = streaming_decoder(FragmentPolicy::Retain);
        let saturated = SampleFrame::new([u32::MAX, u32::MAX, u32::MAX, 1, 2, 3, 4, 5]);

        let frames = decoder.feed(&saturated.to_bytes());
        assert_eq!(frames, vec![Frame::Sample(saturated)]);
        assert!(decoder.is_streaming());
        assert_eq!(decoder.buffered(), 0);
        assert_eq!(decoder.stats().stream_ends, 0);
    }

    #[test]
    fn retain_policy_saturated_frame_then_sentinel() {
        let mut decoder = streaming_decoder(FragmentPolicy::Retain);
        let saturated = SampleFrame::new([u32::MAX; 8]);
        let mut bytes = saturated.to_bytes().to_vec();
        bytes.extend_from_slice(&END_OF_STREAM);

        assert_eq!(decoder.feed(&bytes[..40]), vec![Frame::Sample(saturated)]);
        assert_eq!(decoder.buffered(), 8);
        assert_eq!(decoder.feed(&bytes[40..]), vec![Frame::StreamEnd]);
        assert_eq!(decoder.mode(), DecoderMode::Message);
    }

    #[test]
    fn retain_policy_resumes_messages_after_sentinel() {
        let mut decoder = streaming_decoder(FragmentPolicy::Retain);
        let mut bytes = sample_bytes(&[[1; 8]]);
        bytes.extend_from_slice(&END_OF_STREAM);
        bytes.extend_from_slice(&wire(&[b"one-off"]));

        let frames = decoder.feed(&bytes);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1], Frame::StreamEnd);
        assert!(matches!(&frames[2], Frame::Control(m) if m.payload.as_ref() == b"one-off"));
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn retain_policy_joins_split_sentinel() {
        let mut decoder = streaming_decoder(FragmentPolicy::Retain);

        assert!(decoder.feed(&END_OF_STREAM[..4]).is_empty());
        assert_eq!(decoder.feed(&END_OF_STREAM[4..]), vec![Frame::StreamEnd]);
    }

    #[test]
    fn pull_api_allows_mode_switch_mid_chunk() {
        let mut decoder = FrameDecoder::new();
        let mut bytes = wire(&[b"ack"]);
        bytes.extend_from_slice(&sample_bytes(&[[6; 8]]));
        decoder.push(&bytes);

        let first = decoder.next_frame().unwrap();
        assert!(matches!(first, Frame::Control(_)));

        decoder.set_streaming(true);
        assert_eq!(
            decoder.next_frame(),
            Some(Frame::Sample(SampleFrame::new([6; 8])))
        );
        assert_eq!(decoder.next_frame(), None);
    }

    #[test]
    fn reset_discards_partial_data() {
        let mut decoder = streaming_decoder(FragmentPolicy::Retain);
        decoder.feed(&[1u8; 12]);
        assert_eq!(decoder.buffered(), 12);

        decoder.reset();
        assert_eq!(decoder.buffered(), 0);
        assert_eq!(decoder.mode(), DecoderMode::Message);
        assert_eq!(decoder.stats(), DecoderStats::default());
    }

    #[test]
    fn with_config_uses_fragment_policy() {
        let config = FrameConfig {
            fragment_policy: FragmentPolicy::Retain,
            ..FrameConfig::default()
        };
        assert_eq!(
            FrameDecoder::with_config(&config).fragment_policy(),
            FragmentPolicy::Retain
        );
    }

    proptest! {
        #[test]
        fn frame_then_decode_returns_payload(payload in vec(any::<u8>(), 1..=255)) {
            let mut decoder = FrameDecoder::new();
            let frames = decoder.feed(&wire(&[&payload]));
            prop_assert_eq!(payloads(&frames), vec![payload]);
            prop_assert_eq!(decoder.buffered(), 0);
        }

        #[test]
        fn chunk_boundaries_do_not_change_messages(
            messages in vec(vec(any::<u8>(), 1..=255), 1..6),
            cuts in vec(any::<usize>(), 0..12),
        ) {
            let refs: Vec<&[u8]> = messages.iter().map(Vec::as_slice).collect();
            let bytes = wire(&refs);

            let mut whole = FrameDecoder::new();
            let expected = whole.feed(&bytes);

            let mut points: Vec<usize> = cuts.iter().map(|c| c % (bytes.len() + 1)).collect();
            points.push(0);
            points.push(bytes.len());
            points.sort_unstable();
            points.dedup();

            let mut chunked = FrameDecoder::new();
            let mut actual = Vec::new();
            for window in points.windows(2) {
                actual.extend(chunked.feed(&bytes[window[0]..window[1]]));
            }

            prop_assert_eq!(&actual, &expected);
            prop_assert_eq!(payloads(&actual), messages);
            prop_assert_eq!(chunked.buffered(), 0);
        }

        #[test]
        fn aligned_sample_runs_decode_in_order(
            frames in vec(any::<[u32; 8]>(), 1..16),
        ) {
            let mut decoder = streaming_decoder(FragmentPolicy::Discard);
            let decoded = decoder.feed(&sample_bytes(&frames));
            let expected: Vec<Frame> = frames
                .iter()
                .map(|channels| Frame::Sample(SampleFrame::new(*channels)))
                .collect();
            prop_assert_eq!(decoded, expected);
        }
    }
}
