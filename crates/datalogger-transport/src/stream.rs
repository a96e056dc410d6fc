use std::io::{Read, Write};
use std::time::Duration;

use crate::error::{Result, TransportError};

/// A connected device link that implements Read + Write.
///
/// On a real host this wraps the device's TTY node. Tests and device
/// simulators use a Unix socket pair instead.
pub struct DeviceStream {
    inner: DeviceStreamInner,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

enum DeviceStreamInner {
    Tty(std::fs::File),
    #[cfg(unix)]
    Socket(std::os::unix::net::UnixStream),
}

impl Read for DeviceStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            DeviceStreamInner::Tty(file) => {
                wait_ready(file, Readiness::Read, self.read_timeout)?;
                file.read(buf)
            }
            #[cfg(unix)]
            DeviceStreamInner::Socket(stream) => stream.read(buf),
        }
    }
}

impl Write for DeviceStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            DeviceStreamInner::Tty(file) => {
                wait_ready(file, Readiness::Write, self.write_timeout)?;
                file.write(buf)
            }
            #[cfg(unix)]
            DeviceStreamInner::Socket(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            DeviceStreamInner::Tty(file) => file.flush(),
            #[cfg(unix)]
            DeviceStreamInner::Socket(stream) => stream.flush(),
        }
    }
}

impl DeviceStream {
    /// Wrap an already configured TTY file.
    pub(crate) fn from_tty(file: std::fs::File) -> Self {
        Self {
            inner: DeviceStreamInner::Tty(file),
            read_timeout: None,
            write_timeout: None,
        }
    }

    /// Wrap one end of a Unix socket, e.g. a device simulator connection.
    #[cfg(unix)]
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: DeviceStreamInner::Socket(stream),
            read_timeout: None,
            write_timeout: None,
        }
    }

    /// A connected in-memory link: one end for the host, one for a simulated device.
    #[cfg(unix)]
    pub fn pair() -> Result<(Self, Self)> {
        let (host, device) = std::os::unix::net::UnixStream::pair()?;
        Ok((Self::from_unix(host), Self::from_unix(device)))
    }

    /// Set read timeout on the underlying stream.
    ///
    /// `None` blocks indefinitely. A zero duration is rejected.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        reject_zero(timeout)?;
        match &self.inner {
            DeviceStreamInner::Tty(_) => {}
            #[cfg(unix)]
            DeviceStreamInner::Socket(stream) => stream.set_read_timeout(timeout)?,
        }
        self.read_timeout = timeout;
        Ok(())
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        reject_zero(timeout)?;
        match &self.inner {
            DeviceStreamInner::Tty(_) => {}
            #[cfg(unix)]
            DeviceStreamInner::Socket(stream) => stream.set_write_timeout(timeout)?,
        }
        self.write_timeout = timeout;
        Ok(())
    }

    /// Current read timeout.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// Current write timeout.
    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout
    }

    /// Try to clone this stream (creates a new file descriptor).
    ///
    /// The clone starts with the same timeouts.
    pub fn try_clone(&self) -> Result<Self> {
        let inner = match &self.inner {
            DeviceStreamInner::Tty(file) => DeviceStreamInner::Tty(file.try_clone()?),
            #[cfg(unix)]
            DeviceStreamInner::Socket(stream) => DeviceStreamInner::Socket(stream.try_clone()?),
        };
        Ok(Self {
            inner,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
        })
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        match &self.inner {
            DeviceStreamInner::Tty(_) => "serial-tty",
            #[cfg(unix)]
            DeviceStreamInner::Socket(_) => "unix-socket",
        }
    }
}

impl std::fmt::Debug for DeviceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStream")
            .field("type", &self.transport_name())
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .finish()
    }
}

fn reject_zero(timeout: Option<Duration>) -> Result<()> {
    if timeout == Some(Duration::ZERO) {
        return Err(TransportError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "timeout must be greater than zero",
        )));
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Readiness {
    Read,
    Write,
}

/// Block until the TTY is readable/writable or the timeout elapses.
#[cfg(unix)]
fn wait_ready(
    file: &std::fs::File,
    readiness: Readiness,
    timeout: Option<Duration>,
) -> std::io::Result<()> {
    use std::os::fd::AsRawFd;

    let Some(timeout) = timeout else {
        return Ok(());
    };

    let events = match readiness {
        Readiness::Read => libc::POLLIN,
        Readiness::Write => libc::POLLOUT,
    };
    let mut fds = libc::pollfd {
        fd: file.as_raw_fd(),
        events,
        revents: 0,
    };
    let millis = timeout.as_millis().clamp(1, libc::c_int::MAX as u128) as libc::c_int;

    loop {
        // SAFETY: `fds` points to exactly one initialized pollfd whose descriptor is
        // kept open by `file` for the duration of the call.
        let rc = unsafe { libc::poll(&mut fds, 1, millis) };
        if rc > 0 {
            return Ok(());
        }
        if rc == 0 {
            return Err(std::io::Error::from(std::io::ErrorKind::TimedOut));
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(not(unix))]
fn wait_ready(
    _file: &std::fs::File,
    _readiness: Readiness,
    _timeout: Option<Duration>,
) -> std::io::Result<()> {
    Ok(())
}
