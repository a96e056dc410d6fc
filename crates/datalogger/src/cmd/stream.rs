use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use datalogger_frame::validate_sampling_period;
use datalogger_session::SessionEvent;
use tracing::{info, warn};

use crate::cmd::StreamArgs;
use crate::exit::{frame_error, session_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_record, to_hex, OutputFormat, Record};

pub fn run(args: StreamArgs, format: OutputFormat) -> CliResult<i32> {
    // Reject a bad period before touching the device.
    validate_sampling_period(args.period).map_err(|err| frame_error("invalid --period", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut session = args.connection.connect()?;
    session
        .start_streaming(args.period)
        .map_err(|err| session_error("start sampling failed", err))?;
    info!(period_micros = args.period, "sampling started");

    let mut received = 0u64;
    while running.load(Ordering::SeqCst) {
        if args.count.is_some_and(|count| received >= count) {
            break;
        }

        match session.recv_event() {
            Ok(SessionEvent::Sample(sample)) => {
                print_record(&Record::sample(received, &sample), format);
                received += 1;
            }
            Ok(SessionEvent::StreamEnded) => {
                warn!("device ended the stream");
                print_record(&Record::StreamEnd { frames: received }, format);
                return Ok(SUCCESS);
            }
            Ok(SessionEvent::Message(message)) => {
                print_record(&Record::Message { message }, format);
            }
            Ok(SessionEvent::DecodeError { payload, error }) => {
                print_record(
                    &Record::DecodeError {
                        payload: to_hex(&payload),
                        error: error.to_string(),
                    },
                    format,
                );
            }
            Err(err) if err.is_read_timeout() => continue,
            Err(err) => return Err(session_error("receive failed", err)),
        }
    }

    let drained = session
        .stop_streaming()
        .map_err(|err| session_error("stop sampling failed", err))?;
    info!(received, drained, "sampling stopped");
    print_record(
        &Record::StreamEnd {
            frames: received + drained,
        },
        format,
    );
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
