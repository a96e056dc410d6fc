use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("datalogger {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!(
        "target: {}",
        option_env!("DATALOGGER_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("os: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    println!(
        "baud_rate_default: {}",
        datalogger_transport::DEFAULT_BAUD_RATE
    );
    println!(
        "min_sampling_period_us: {}",
        datalogger_frame::MIN_SAMPLING_PERIOD_MICROS
    );
    println!("features: async={}, cli=true", cfg!(feature = "async"));

    Ok(SUCCESS)
}
