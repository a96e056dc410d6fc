use datalogger_frame::{validate_sampling_period, Command, CommandEncoder};
use datalogger_proto::ProtobufSchema;

use crate::cmd::{EncodeArgs, EncodeCommand};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat, Record};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let command = match args.command {
        EncodeCommand::SetPeriodicSampling { period } => Command::SetPeriodicSampling {
            period_micros: validate_sampling_period(period)
                .map_err(|err| frame_error("invalid command", err))?,
        },
        EncodeCommand::StopPeriodicSampling => Command::StopPeriodicSampling,
        EncodeCommand::ExecuteOneOffSampling => Command::ExecuteOneOffSampling,
    };

    let encoder = CommandEncoder::new(ProtobufSchema::new())
        .map_err(|err| frame_error("encoder setup failed", err))?;
    let encoded = encoder
        .encode(&command)
        .map_err(|err| frame_error("invalid command", err))?;

    print_record(&Record::command(command.name(), &encoded), format);
    Ok(SUCCESS)
}
