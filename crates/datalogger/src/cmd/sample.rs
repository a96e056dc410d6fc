use crate::cmd::SampleArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat, Record};

pub fn run(args: SampleArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = args.connection.connect()?;
    let sample = session
        .sample_once()
        .map_err(|err| session_error("one-off sampling failed", err))?;

    print_record(&Record::one_off(sample), format);
    Ok(SUCCESS)
}
