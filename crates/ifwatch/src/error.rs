//! Error types for decoding and filter configuration.

use std::io;

/// Result type for ifwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding notifications or configuring filters.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input at the boundary (bad filter spec, bad socket handle,
    /// or a kernel event buffer whose declared size does not match).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Message payload too short for the fields the event carries.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// The class/subclass/event code combination is not recognized.
    #[error("unhandled event (code {0})")]
    UnhandledEvent(u32),

    /// The kernel configuration call failed.
    #[error("system error: {name} (errno {errno})")]
    System {
        /// Raw errno value.
        errno: i32,
        /// Portable symbolic errno name, e.g. `eacces`.
        name: &'static str,
    },
}

impl Error {
    /// Create a system error from an errno value.
    pub fn from_errno(errno: i32) -> Self {
        Self::System {
            errno,
            name: errno_name(errno),
        }
    }

    /// Convert an I/O error from a syscall.
    ///
    /// Errors without an OS code become `System` with errno 0 and name `unknown`.
    pub fn from_io(err: io::Error) -> Self {
        Self::from_errno(err.raw_os_error().unwrap_or(0))
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::System { errno, .. } => *errno == libc::EPERM || *errno == libc::EACCES,
            _ => false,
        }
    }

    /// Check if this is an input error.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Self::InvalidArgument(_) => true,
            Self::System { errno, .. } => *errno == libc::EINVAL,
            _ => false,
        }
    }

    /// Check if this is an unrecognized event.
    pub fn is_unhandled(&self) -> bool {
        matches!(self, Self::UnhandledEvent(_))
    }

    /// Get the errno value if this is a system error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::System { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::from_io(err)
    }
}

/// Portable lowercase identifier for an errno value.
///
/// Uses the host platform's errno numbering, so the same name is produced on
/// Linux and Darwin even where the numeric values differ.
pub fn errno_name(errno: i32) -> &'static str {
    match errno {
        libc::EPERM => "eperm",
        libc::ENOENT => "enoent",
        libc::EINTR => "eintr",
        libc::EIO => "eio",
        libc::EBADF => "ebadf",
        libc::EAGAIN => "eagain",
        libc::ENOMEM => "enomem",
        libc::EACCES => "eacces",
        libc::EFAULT => "efault",
        libc::EBUSY => "ebusy",
        libc::EEXIST => "eexist",
        libc::ENODEV => "enodev",
        libc::EINVAL => "einval",
        libc::ENOTTY => "enotty",
        libc::ENOTSOCK => "enotsock",
        libc::EPROTONOSUPPORT => "eprotonosupport",
        libc::EOPNOTSUPP => "eopnotsupp",
        libc::EAFNOSUPPORT => "eafnosupport",
        libc::EADDRINUSE => "eaddrinuse",
        libc::EADDRNOTAVAIL => "eaddrnotavail",
        libc::ENOBUFS => "enobufs",
        _ => "unknown",
    }
}
