use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::DeviceStream;

/// Baud rate used by the data logger firmware.
///
/// USB CDC ignores the line rate, but some bridges do not.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Line settings applied when opening a serial port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// Line rate in bits per second.
    pub baud_rate: u32,
    /// Drop RTS after opening. The device firmware expects RTS low.
    pub deassert_rts: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            deassert_rts: true,
        }
    }
}

/// Serial TTY transport.
///
/// Opens a character device in raw 8N1 mode so every byte the device emits
/// reaches the decoder untouched (no line discipline, no echo, no flow
/// control translation).
pub struct SerialPort;

impl SerialPort {
    /// Open a serial port with default settings (115200 baud, RTS low).
    pub fn open_default(path: impl AsRef<Path>) -> Result<DeviceStream> {
        Self::open(path, &SerialConfig::default())
    }

    /// Open and configure a serial port.
    pub fn open(path: impl AsRef<Path>, config: &SerialConfig) -> Result<DeviceStream> {
        let path = path.as_ref();
        let speed = baud_constant(config.baud_rate)
            .ok_or(TransportError::UnsupportedBaudRate(config.baud_rate))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(path)
            .map_err(|source| TransportError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        configure_raw(&file, speed).map_err(|source| TransportError::Configure {
            path: path.to_path_buf(),
            source,
        })?;

        if config.deassert_rts {
            clear_rts(&file).map_err(|source| TransportError::Configure {
                path: path.to_path_buf(),
                source,
            })?;
        }

        debug!(?path, baud_rate = config.baud_rate, "opened serial port");
        Ok(DeviceStream::from_tty(file))
    }
}

fn configure_raw(file: &File, speed: libc::speed_t) -> std::io::Result<()> {
    let fd = file.as_raw_fd();

    // SAFETY: termios is a plain C struct; an all-zero value is a valid
    // placeholder that tcgetattr fully overwrites on success.
    let mut tio: libc::termios = unsafe { std::mem::zeroed() };

    // SAFETY: `fd` is an open descriptor owned by `file` and `tio` is a valid
    // writable termios.
    if unsafe { libc::tcgetattr(fd, &mut tio) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    // SAFETY: `tio` was initialized by tcgetattr above.
    unsafe { libc::cfmakeraw(&mut tio) };
    tio.c_cflag |= libc::CLOCAL | libc::CREAD;
    tio.c_cflag &= !(libc::CSTOPB | libc::PARENB);
    tio.c_cc[libc::VMIN] = 1;
    tio.c_cc[libc::VTIME] = 0;

    // SAFETY: `tio` is a valid termios; the speed constant comes from libc.
    let rc = unsafe {
        let rc_in = libc::cfsetispeed(&mut tio, speed);
        let rc_out = libc::cfsetospeed(&mut tio, speed);
        rc_in | rc_out
    };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }

    // SAFETY: `fd` is open and `tio` is fully initialized.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tio) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    // Drop anything that arrived before the line was configured.
    // SAFETY: `fd` is an open terminal descriptor.
    if unsafe { libc::tcflush(fd, libc::TCIOFLUSH) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(())
}

fn clear_rts(file: &File) -> std::io::Result<()> {
    let bits: libc::c_int = libc::TIOCM_RTS;
    // SAFETY: TIOCMBIC reads one c_int through the pointer, which outlives the call.
    let rc = unsafe {
        libc::ioctl(
            file.as_raw_fd(),
            libc::TIOCMBIC,
            &bits as *const libc::c_int,
        )
    };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

fn baud_constant(baud_rate: u32) -> Option<libc::speed_t> {
    let speed = match baud_rate {
        9_600 => libc::B9600,
        19_200 => libc::B19200,
        38_400 => libc::B38400,
        57_600 => libc::B57600,
        115_200 => libc::B115200,
        230_400 => libc::B230400,
        #[cfg(target_os = "linux")]
        460_800 => libc::B460800,
        #[cfg(target_os = "linux")]
        921_600 => libc::B921600,
        _ => return None,
    };
    Some(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_firmware() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert!(config.deassert_rts);
    }

    #[test]
    fn common_rates_map_to_termios_constants() {
        assert_eq!(baud_constant(115_200), Some(libc::B115200));
        assert_eq!(baud_constant(9_600), Some(libc::B9600));
        assert_eq!(baud_constant(12_345), None);
    }

    #[test]
    fn unsupported_baud_rate_rejected_before_open() {
        let config = SerialConfig {
            baud_rate: 1_234,
            ..SerialConfig::default()
        };
        let err = SerialPort::open("/nonexistent/tty", &config).unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedBaudRate(1_234)));
    }

    #[test]
    fn missing_device_reports_open_error() {
        let err = SerialPort::open_default("/nonexistent/ttyACM-datalogger").unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
    }

    #[test]
    fn regular_file_is_not_a_terminal() {
        let path = std::env::temp_dir().join(format!(
            "datalogger-serial-notatty-{}",
            std::process::id()
        ));
        std::fs::write(&path, b"").unwrap();

        let err = SerialPort::open_default(&path).unwrap_err();
        assert!(matches!(err, TransportError::Configure { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
