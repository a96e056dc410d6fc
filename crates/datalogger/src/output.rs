use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use datalogger_frame::{DecoderStats, OutboundCommand, SampleFrame, CHANNEL_COUNT};
use datalogger_proto::{DeviceMessage, OneOffSample};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One line of command output.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Command {
        name: &'static str,
        length: usize,
        hex: String,
    },
    Message {
        message: DeviceMessage,
    },
    Sample {
        index: u64,
        channels: [u32; CHANNEL_COUNT],
    },
    StreamEnd {
        frames: u64,
    },
    DecodeError {
        payload: String,
        error: String,
    },
    Summary {
        control_messages: u64,
        sample_frames: u64,
        stream_ends: u64,
        anomalies: u64,
        discarded_bytes: u64,
        idle_bytes: u64,
        undecoded_bytes: usize,
    },
}

impl Record {
    pub fn command(name: &'static str, command: &OutboundCommand) -> Self {
        Self::Command {
            name,
            length: command.len(),
            hex: to_hex(command.as_bytes()),
        }
    }

    pub fn sample(index: u64, sample: &SampleFrame) -> Self {
        Self::Sample {
            index,
            channels: sample.channels,
        }
    }

    pub fn one_off(sample: OneOffSample) -> Self {
        Self::Message {
            message: DeviceMessage::OneOffSample(sample),
        }
    }

    pub fn summary(stats: DecoderStats, undecoded_bytes: usize) -> Self {
        Self::Summary {
            control_messages: stats.control_messages,
            sample_frames: stats.sample_frames,
            stream_ends: stats.stream_ends,
            anomalies: stats.anomalies,
            discarded_bytes: stats.discarded_bytes,
            idle_bytes: stats.idle_bytes,
            undecoded_bytes,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command { .. } => "command",
            Self::Message { .. } => "message",
            Self::Sample { .. } => "sample",
            Self::StreamEnd { .. } => "stream_end",
            Self::DecodeError { .. } => "decode_error",
            Self::Summary { .. } => "summary",
        }
    }

    /// Name/value pairs for the table and pretty renderings.
    fn columns(&self) -> Vec<(String, String)> {
        match self {
            Self::Command { name, length, hex } => vec![
                ("command".into(), (*name).into()),
                ("length".into(), length.to_string()),
                ("bytes".into(), hex.clone()),
            ],
            Self::Message {
                message: DeviceMessage::SetPeriodicSamplerAck { ack },
            } => vec![("ack".into(), ack.to_string())],
            Self::Message {
                message: DeviceMessage::OneOffSample(sample),
            } => channel_columns(sample.sensor_values.iter()),
            Self::Sample { index, channels } => {
                let mut columns = vec![("index".into(), index.to_string())];
                columns.extend(channel_columns(channels.iter()));
                columns
            }
            Self::StreamEnd { frames } => vec![("frames".into(), frames.to_string())],
            Self::DecodeError { payload, error } => vec![
                ("payload".into(), payload.clone()),
                ("error".into(), error.clone()),
            ],
            Self::Summary {
                control_messages,
                sample_frames,
                stream_ends,
                anomalies,
                discarded_bytes,
                idle_bytes,
                undecoded_bytes,
            } => vec![
                ("messages".into(), control_messages.to_string()),
                ("samples".into(), sample_frames.to_string()),
                ("stream_ends".into(), stream_ends.to_string()),
                ("anomalies".into(), anomalies.to_string()),
                ("discarded".into(), discarded_bytes.to_string()),
                ("idle".into(), idle_bytes.to_string()),
                ("undecoded".into(), undecoded_bytes.to_string()),
            ],
        }
    }
}

pub fn print_record(record: &Record, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let (header, row): (Vec<String>, Vec<String>) = record.columns().into_iter().unzip();
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(header.iter().map(|name| name.to_uppercase()))
                .add_row(row);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let fields: Vec<String> = record
                .columns()
                .into_iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            println!("{} {}", record.kind(), fields.join(" "));
        }
    }
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn channel_columns<T: ToString>(values: impl Iterator<Item = T>) -> Vec<(String, String)> {
    values
        .enumerate()
        .map(|(index, value)| (format!("ch{index}"), value.to_string()))
        .collect()
}
