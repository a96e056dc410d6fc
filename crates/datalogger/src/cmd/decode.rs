use std::io::Read;

use datalogger_frame::{Frame, FrameDecoder, MessageDeserializer};
use datalogger_proto::{DeviceMessage, ProtobufSchema};
use tracing::{debug, warn};

use crate::cmd::{fragment_policy, DecodeArgs};
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_record, to_hex, OutputFormat, Record};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(&args)?;
    let bytes = if args.hex { parse_hex(&input)? } else { input };
    debug!(bytes = bytes.len(), "decoding capture");

    let mut decoder = FrameDecoder::with_policy(fragment_policy(args.retain_fragments));
    decoder.set_streaming(args.streaming);

    let records = decode_capture(&mut decoder, &bytes);
    let failures = records
        .iter()
        .filter(|record| matches!(record, Record::DecodeError { .. }))
        .count();

    for record in &records {
        print_record(record, format);
    }
    print_record(&Record::summary(decoder.stats(), decoder.buffered()), format);

    if decoder.buffered() > 0 {
        warn!(bytes = decoder.buffered(), "capture ends inside a frame");
    }
    if failures > 0 {
        return Err(CliError::new(
            DATA_INVALID,
            format!("{failures} message(s) failed to decode"),
        ));
    }
    Ok(SUCCESS)
}

/// Decode a whole capture, following acknowledgements into streaming mode
/// the same way a live session does.
fn decode_capture(decoder: &mut FrameDecoder, bytes: &[u8]) -> Vec<Record> {
    let schema = ProtobufSchema::new();
    let mut records = Vec::new();
    let mut samples = 0u64;

    decoder.push(bytes);
    while let Some(frame) = decoder.next_frame() {
        let record = match frame {
            Frame::Control(message) => match schema.deserialize(&message.payload) {
                Ok(decoded) => {
                    if matches!(decoded, DeviceMessage::SetPeriodicSamplerAck { ack: true }) {
                        decoder.set_streaming(true);
                        samples = 0;
                    }
                    Record::Message { message: decoded }
                }
                Err(err) => {
                    warn!(length = message.length, %err, "failed to decode device message");
                    Record::DecodeError {
                        payload: to_hex(&message.payload),
                        error: err.to_string(),
                    }
                }
            },
            Frame::Sample(sample) => {
                let record = Record::sample(samples, &sample);
                samples += 1;
                record
            }
            Frame::StreamEnd => Record::StreamEnd { frames: samples },
        };
        records.push(record);
    }
    records
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    match &args.file {
        Some(path) => std::fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        None => {
            let mut input = Vec::new();
            std::io::stdin()
                .read_to_end(&mut input)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(input)
        }
    }
}

/// Parse hex text, ignoring whitespace between bytes.
fn parse_hex(input: &[u8]) -> CliResult<Vec<u8>> {
    let digits: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(CliError::new(DATA_INVALID, "hex input has an odd number of digits"));
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|text| u8::from_str_radix(text, 16).ok())
                .ok_or_else(|| {
                    CliError::new(
                        DATA_INVALID,
                        format!("invalid hex byte: {}", String::from_utf8_lossy(pair)),
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use datalogger_frame::{frame, FragmentPolicy, SampleFrame, END_OF_STREAM};
    use datalogger_proto::{encode_device_message, OneOffSample};

    use super::*;

    fn framed(message: DeviceMessage) -> Vec<u8> {
        frame(&encode_device_message(&message))
            .unwrap()
            .as_bytes()
            .to_vec()
    }

    #[test]
    fn parse_hex_accepts_spaced_and_packed_input() {
        assert_eq!(parse_hex(b"04 0a 02\n08 01").unwrap(), vec![4, 0x0a, 2, 8, 1]);
        assert_eq!(parse_hex(b"ff00").unwrap(), vec![0xff, 0]);
        assert_eq!(parse_hex(b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert_eq!(parse_hex(b"0").unwrap_err().code, DATA_INVALID);
        assert_eq!(parse_hex(b"zz").unwrap_err().code, DATA_INVALID);
    }

    #[test]
    fn capture_with_full_stream_cycle() {
        let mut bytes = framed(DeviceMessage::SetPeriodicSamplerAck { ack: true });
        bytes.extend_from_slice(&SampleFrame::new([1; 8]).to_bytes());
        bytes.extend_from_slice(&SampleFrame::new([2; 8]).to_bytes());
        bytes.extend_from_slice(&END_OF_STREAM);
        bytes.extend_from_slice(&framed(DeviceMessage::OneOffSample(OneOffSample::default())));

        let mut decoder = FrameDecoder::with_policy(FragmentPolicy::Retain);
        let records = decode_capture(&mut decoder, &bytes);

        let kinds: Vec<&str> = records.iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec!["message", "sample", "sample", "stream_end", "message"]
        );
        assert!(matches!(records[3], Record::StreamEnd { frames: 2 }));
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn saturated_sample_does_not_end_the_stream() {
        let saturated = SampleFrame::new([u32::MAX, u32::MAX, u32::MAX, 0, 0, 0, 0, 0]);
        let mut bytes = framed(DeviceMessage::SetPeriodicSamplerAck { ack: true });
        bytes.extend_from_slice(&saturated.to_bytes());
        bytes.extend_from_slice(&SampleFrame::new([3; 8]).to_bytes());
        bytes.extend_from_slice(&END_OF_STREAM);

        let mut decoder = FrameDecoder::with_policy(FragmentPolicy::Retain);
        let records = decode_capture(&mut decoder, &bytes);

        let kinds: Vec<&str> = records.iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, vec!["message", "sample", "sample", "stream_end"]);
        assert!(matches!(records[3], Record::StreamEnd { frames: 2 }));
        assert_eq!(decoder.stats().anomalies, 0);
    }

    #[test]
    fn discard_policy_drops_unaligned_capture_tail() {
        let mut bytes = framed(DeviceMessage::SetPeriodicSamplerAck { ack: true });
        bytes.extend_from_slice(&SampleFrame::new([1; 8]).to_bytes());
        bytes.extend_from_slice(&END_OF_STREAM);

        let mut decoder = FrameDecoder::new();
        let records = decode_capture(&mut decoder, &bytes);

        assert_eq!(records.len(), 1);
        assert_eq!(decoder.stats().anomalies, 1);
        assert_eq!(decoder.stats().discarded_bytes, 42);
    }

    #[test]
    fn undecodable_message_becomes_error_record() {
        let bytes = frame(&[0x0a, 0x05, 0x08]).unwrap().as_bytes().to_vec();
        let records = decode_capture(&mut FrameDecoder::new(), &bytes);
        assert!(matches!(
            &records[..],
            [Record::DecodeError { payload, .. }] if payload == "0a 05 08"
        ));
    }
}
