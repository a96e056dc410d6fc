use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use datalogger_frame::{FragmentPolicy, FrameConfig};
use datalogger_session::{connect, DeviceSession, SessionConfig};
use datalogger_transport::{SerialConfig, DEFAULT_BAUD_RATE};

use crate::exit::{session_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod sample;
pub mod stop;
pub mod stream;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Take a single one-off sample and print each channel.
    Sample(SampleArgs),
    /// Start periodic sampling and print sample frames.
    Stream(StreamArgs),
    /// Stop periodic sampling and wait for the end of the stream.
    Stop(StopArgs),
    /// Print the framed bytes of a command without sending it.
    Encode(EncodeArgs),
    /// Decode a captured byte stream.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Sample(args) => sample::run(args, format),
        Command::Stream(args) => stream::run(args, format),
        Command::Stop(args) => stop::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Serial device path (e.g. /dev/ttyACM0).
    pub port: PathBuf,
    /// Line rate in bits per second.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Leave RTS asserted after opening the port.
    #[arg(long)]
    pub keep_rts: bool,
    /// How long to wait for device replies (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
    /// Keep partial sample frames across reads instead of dropping them.
    #[arg(long)]
    pub retain_fragments: bool,
}

impl ConnectionArgs {
    pub fn session_config(&self) -> CliResult<SessionConfig> {
        Ok(SessionConfig {
            serial: SerialConfig {
                baud_rate: self.baud,
                deassert_rts: !self.keep_rts,
            },
            frame: FrameConfig {
                fragment_policy: fragment_policy(self.retain_fragments),
                ..FrameConfig::default()
            },
            response_timeout: parse_duration(&self.timeout)?,
        })
    }

    pub fn connect(&self) -> CliResult<DeviceSession> {
        let config = self.session_config()?;
        connect(&self.port, &config).map_err(|err| {
            session_error(&format!("failed to open {}", self.port.display()), err)
        })
    }
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// Sampling period in microseconds (minimum 20).
    #[arg(long, allow_negative_numbers = true)]
    pub period: i64,
    /// Stop after N sample frames.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct StopArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub command: EncodeCommand,
}

#[derive(Subcommand, Debug)]
pub enum EncodeCommand {
    /// Start periodic sampling.
    SetPeriodicSampling {
        /// Sampling period in microseconds.
        #[arg(allow_negative_numbers = true)]
        period: i64,
    },
    /// Stop periodic sampling.
    StopPeriodicSampling,
    /// Take one sample.
    ExecuteOneOffSampling,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Read the capture from a file instead of stdin.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Input is hex text (as printed by `encode`) instead of raw bytes.
    #[arg(long)]
    pub hex: bool,
    /// Start in streaming mode, for captures taken mid-stream.
    #[arg(long)]
    pub streaming: bool,
    /// Keep partial sample frames across chunks instead of dropping them.
    #[arg(long)]
    pub retain_fragments: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn fragment_policy(retain: bool) -> FragmentPolicy {
    if retain {
        FragmentPolicy::Retain
    } else {
        FragmentPolicy::Discard
    }
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(match unit {
        "ms" => Duration::from_millis(value),
        _ => Duration::from_secs(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
    }

    #[test]
    fn connection_args_build_session_config() {
        let args = ConnectionArgs {
            port: PathBuf::from("/dev/ttyACM0"),
            baud: 9_600,
            keep_rts: true,
            timeout: "250ms".to_string(),
            retain_fragments: true,
        };
        let config = args.session_config().unwrap();
        assert_eq!(config.serial.baud_rate, 9_600);
        assert!(!config.serial.deassert_rts);
        assert_eq!(config.frame.fragment_policy, FragmentPolicy::Retain);
        assert_eq!(config.response_timeout, Duration::from_millis(250));
    }
}
