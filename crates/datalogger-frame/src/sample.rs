//! Streaming-mode sample frames.
//!
//! While the periodic sampler runs, the device writes raw 32-byte frames
//! with no length header. Each frame carries one little-endian `u32` per
//! channel, channel 0 first. The run ends with [`END_OF_STREAM`].

/// Channels per sample frame.
pub const CHANNEL_COUNT: usize = 8;

/// Bytes per sample frame.
pub const SAMPLE_FRAME_SIZE: usize = CHANNEL_COUNT * 4;

/// Length of the end-of-stream sentinel.
pub const END_OF_STREAM_LEN: usize = 10;

/// Every byte of the sentinel has this value.
pub const END_OF_STREAM_BYTE: u8 = 0xFF;

/// The sentinel the device sends after the sampler stops.
pub const END_OF_STREAM: [u8; END_OF_STREAM_LEN] = [END_OF_STREAM_BYTE; END_OF_STREAM_LEN];

/// One decoded sample frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleFrame {
    /// Channel values, index 0..8 in stream order.
    pub channels: [u32; CHANNEL_COUNT],
}

impl SampleFrame {
    /// Create a sample frame from channel values.
    pub fn new(channels: [u32; CHANNEL_COUNT]) -> Self {
        Self { channels }
    }

    /// Parse exactly one 32-byte block.
    pub fn parse(block: &[u8]) -> Option<Self> {
        if block.len() != SAMPLE_FRAME_SIZE {
            return None;
        }
        Some(Self::from_block(block))
    }

    /// Decode a block already known to be `SAMPLE_FRAME_SIZE` bytes.
    pub(crate) fn from_block(block: &[u8]) -> Self {
        let mut channels = [0u32; CHANNEL_COUNT];
        for (value, bytes) in channels.iter_mut().zip(block.chunks_exact(4)) {
            *value = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        Self { channels }
    }

    /// Wire representation of this frame.
    pub fn to_bytes(&self) -> [u8; SAMPLE_FRAME_SIZE] {
        let mut out = [0u8; SAMPLE_FRAME_SIZE];
        for (bytes, value) in out.chunks_exact_mut(4).zip(self.channels) {
            bytes.copy_from_slice(&value.to_le_bytes());
        }
        out
    }

    /// Value of one channel.
    pub fn channel(&self, index: usize) -> Option<u32> {
        self.channels.get(index).copied()
    }

    /// `(channel index, value)` pairs in channel order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.channels.iter().copied().enumerate()
    }
}

/// Returns true if `bytes` is exactly the end-of-stream sentinel.
pub fn is_end_of_stream(bytes: &[u8]) -> bool {
    bytes.len() == END_OF_STREAM_LEN && bytes.iter().all(|&b| b == END_OF_STREAM_BYTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential_block() -> Vec<u8> {
        (0u32..8).flat_map(u32::to_le_bytes).collect()
    }

    #[test]
    fn parse_little_endian_channels() {
        let frame = SampleFrame::parse(&sequential_block()).unwrap();
        assert_eq!(frame.channels, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn channel_order_follows_byte_order() {
        let mut block = [0u8; SAMPLE_FRAME_SIZE];
        block[28..32].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        block[0] = 0x01;
        block[1] = 0x02;

        let frame = SampleFrame::parse(&block).unwrap();
        assert_eq!(frame.channel(0), Some(0x0201));
        assert_eq!(frame.channel(7), Some(0xDEAD_BEEF));
        assert_eq!(frame.channel(8), None);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(SampleFrame::parse(&[0u8; 31]).is_none());
        assert!(SampleFrame::parse(&[0u8; 33]).is_none());
    }

    #[test]
    fn to_bytes_matches_wire_layout() {
        let frame = SampleFrame::new([0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(frame.to_bytes().to_vec(), sequential_block());
    }

    #[test]
    fn iter_yields_indexed_values() {
        let frame = SampleFrame::new([10, 11, 12, 13, 14, 15, 16, 17]);
        let pairs: Vec<_> = frame.iter().collect();
        assert_eq!(pairs.first(), Some(&(0, 10)));
        assert_eq!(pairs.last(), Some(&(7, 17)));
    }

    #[test]
    fn sentinel_detection() {
        assert!(is_end_of_stream(&END_OF_STREAM));
        assert!(!is_end_of_stream(&[0xFF; 9]));
        assert!(!is_end_of_stream(&[0xFF; 11]));

        let mut almost = END_OF_STREAM;
        almost[4] = 0xFE;
        assert!(!is_end_of_stream(&almost));
    }
}
