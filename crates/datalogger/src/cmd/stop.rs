use datalogger_session::SessionError;
use tracing::warn;

use crate::cmd::StopArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat, Record};

pub fn run(args: StopArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = args.connection.connect()?;

    // A fresh connection cannot know whether a previous run left the device
    // streaming; assume it did and drain towards the sentinel.
    session.set_streaming(true);

    match session.stop_streaming() {
        Ok(drained) => {
            print_record(&Record::StreamEnd { frames: drained }, format);
            Ok(SUCCESS)
        }
        Err(SessionError::Timeout(waited)) => {
            warn!(?waited, "no end-of-stream received; device was likely idle");
            Ok(SUCCESS)
        }
        Err(err) => Err(session_error("stop failed", err)),
    }
}
