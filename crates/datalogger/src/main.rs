mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "datalogger", version, about = "USB-serial data logger host CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::EncodeCommand;

    #[test]
    fn parses_stream_subcommand() {
        let cli = Cli::try_parse_from([
            "datalogger",
            "stream",
            "/dev/ttyACM0",
            "--period",
            "1000",
            "--count",
            "10",
        ])
        .expect("stream args should parse");

        let Command::Stream(args) = cli.command else {
            panic!("expected stream command");
        };
        assert_eq!(args.period, 1000);
        assert_eq!(args.count, Some(10));
        assert_eq!(args.connection.baud, 115_200);
    }

    #[test]
    fn stream_requires_period() {
        let err = Cli::try_parse_from(["datalogger", "stream", "/dev/ttyACM0"])
            .expect_err("missing period should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_encode_with_negative_period() {
        let cli = Cli::try_parse_from(["datalogger", "encode", "set-periodic-sampling", "-5"])
            .expect("negative period should reach validation");
        assert!(matches!(
            cli.command,
            Command::Encode(args) if matches!(args.command, EncodeCommand::SetPeriodicSampling { period: -5 })
        ));
    }

    #[test]
    fn parses_global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["datalogger", "decode", "--streaming", "--format", "pretty"])
            .expect("decode args should parse");
        assert_eq!(cli.format, Some(OutputFormat::Pretty));
        assert!(matches!(cli.command, Command::Decode(_)));
    }
}
