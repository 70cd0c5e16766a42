/*
 * This module defines the portable error vocabulary surfaced by all filesystem
 * operations in this crate, together with the mapping from low-level OS error
 * codes into that vocabulary. Failures are translated immediately at the OS
 * boundary and returned as values; nothing in this module ever panics or
 * fails itself. Misuse of the crate's APIs (bad scope characters, worker
 * lifecycle violations) lives in a separate universe of panicking assertions
 * and is deliberately NOT representable as an `FsErrorKind`.
 */
use std::fmt;
use std::io;

/*
 * The closed set of portable filesystem error kinds. Every OS-level error
 * code maps to exactly one of these; codes without a dedicated variant
 * normalize to `Unknown` rather than being dropped or passed through raw.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsErrorKind {
    Ok,
    FileDoesNotExist,
    AccessFailed,
    DirectoryNotEmpty,
    FileAlreadyExists,
    NameTooLong,
    NotADirectory,
    SymlinkLoop,
    IoError,
    Unknown,
}

impl FsErrorKind {
    pub fn is_ok(self) -> bool {
        self == FsErrorKind::Ok
    }

    /*
     * Translates an `std::io::Error` into the portable kind. On Unix targets
     * the raw errno value is consulted first, which keeps the mapping total
     * even for codes that std leaves uncategorized (EIO in particular); on
     * other targets, and for synthetic errors without an OS code, the
     * `std::io::ErrorKind` classification is used. Total function: anything
     * unrecognized becomes `Unknown`.
     */
    pub fn from_io(err: &io::Error) -> Self {
        #[cfg(unix)]
        {
            if let Some(code) = err.raw_os_error() {
                return Self::from_errno(code);
            }
        }
        Self::from_io_kind(err.kind())
    }

    /*
     * Reads the thread-local last OS failure code and maps it. The caller
     * must invoke this immediately after the failing OS call, with no
     * intervening OS operation, or the captured code is meaningless.
     */
    pub fn from_last_os_error() -> Self {
        Self::from_io(&io::Error::last_os_error())
    }

    #[cfg(unix)]
    fn from_errno(code: i32) -> Self {
        match code {
            libc::ENOENT => FsErrorKind::FileDoesNotExist,
            libc::EACCES => FsErrorKind::AccessFailed,
            libc::ENOTEMPTY => FsErrorKind::DirectoryNotEmpty,
            libc::EEXIST => FsErrorKind::FileAlreadyExists,
            libc::ENAMETOOLONG => FsErrorKind::NameTooLong,
            libc::ENOTDIR => FsErrorKind::NotADirectory,
            libc::ELOOP => FsErrorKind::SymlinkLoop,
            libc::EIO => FsErrorKind::IoError,
            _ => FsErrorKind::Unknown,
        }
    }

    fn from_io_kind(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => FsErrorKind::FileDoesNotExist,
            io::ErrorKind::PermissionDenied => FsErrorKind::AccessFailed,
            io::ErrorKind::DirectoryNotEmpty => FsErrorKind::DirectoryNotEmpty,
            io::ErrorKind::AlreadyExists => FsErrorKind::FileAlreadyExists,
            io::ErrorKind::InvalidFilename => FsErrorKind::NameTooLong,
            io::ErrorKind::NotADirectory => FsErrorKind::NotADirectory,
            io::ErrorKind::FilesystemLoop => FsErrorKind::SymlinkLoop,
            _ => FsErrorKind::Unknown,
        }
    }
}

impl fmt::Display for FsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsErrorKind::Ok => write!(f, "Ok"),
            FsErrorKind::FileDoesNotExist => write!(f, "File does not exist."),
            FsErrorKind::AccessFailed => write!(f, "Access failed."),
            FsErrorKind::DirectoryNotEmpty => write!(f, "Directory not empty."),
            FsErrorKind::FileAlreadyExists => write!(f, "File already exists."),
            FsErrorKind::NameTooLong => write!(
                f,
                "The length of a component of path exceeds {{NAME_MAX}} characters."
            ),
            FsErrorKind::NotADirectory => write!(
                f,
                "A component of the path prefix of Path is not a directory."
            ),
            FsErrorKind::SymlinkLoop => write!(
                f,
                "Too many symbolic links were encountered in translating path."
            ),
            FsErrorKind::IoError => write!(f, "An I/O error occurred."),
            FsErrorKind::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::error::Error for FsErrorKind {}

/// A specialized `Result` type for portable filesystem operations.
pub type FsResult<T> = std::result::Result<T, FsErrorKind>;
