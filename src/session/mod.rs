//! The remote end of a transfer
//!
//! The uploader only ever talks to the remote host through [`TransferSession`].
//! [`SftpSession`] is the real thing; tests substitute an in-memory recorder.
// (c) 2026 The sftp-put authors

use std::io::Read;

mod sftp;
pub use sftp::{ConnectError, SftpSession};

#[cfg(test)]
pub(crate) mod testing;

/// What a remote path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RemoteKind {
    /// A directory
    Directory,
    /// A regular file
    File,
    /// Anything else (symlink, device, ...)
    Other,
}

/// Metadata about a remote path, as reported by `stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteAttributes {
    /// Object type, taken from the file-type bits of the reported mode
    pub kind: RemoteKind,
    /// Size in bytes, if the server reported one
    pub size: Option<u64>,
    /// Permission bits, if the server reported them
    pub permissions: Option<u32>,
}

impl RemoteAttributes {
    /// Is this a directory?
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == RemoteKind::Directory
    }
}

/// A remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RemoteOp {
    /// Query metadata
    Stat,
    /// Create a directory
    Mkdir,
    /// Write a file
    Put,
}

/// Failure of a remote operation
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The path does not exist on the remote host
    #[error("{path}: no such file or directory")]
    NotFound {
        /// Remote path
        path: String,
    },
    /// Any other failure, with its underlying cause
    #[error("remote {op} of {path} failed")]
    Failed {
        /// What we were doing
        op: RemoteOp,
        /// Remote path
        path: String,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
    /// The remote file does not have the size we wrote
    #[error("{path}: remote size {remote} does not match the {written} bytes written")]
    SizeMismatch {
        /// Remote path
        path: String,
        /// Bytes we sent
        written: u64,
        /// Size the server reports
        remote: u64,
    },
}

impl RemoteError {
    /// Did this fail because the path does not exist?
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound { .. })
    }
}

/// The operations the uploader needs from an open file-transfer channel.
///
/// Paths are remote path strings (`/`-separated). Implementations block until the
/// operation has completed.
#[allow(clippy::module_name_repetitions)]
pub trait TransferSession {
    /// Queries the metadata of a remote path.
    /// A path that does not exist must be reported as [`RemoteError::NotFound`].
    fn stat(&mut self, path: &str) -> Result<RemoteAttributes, RemoteError>;

    /// Creates a single remote directory. Intermediate directories are not created.
    fn mkdir(&mut self, path: &str) -> Result<(), RemoteError>;

    /// Creates or truncates the remote file at `path` and fills it from `source`.
    ///
    /// Returns the number of bytes written.
    fn put(&mut self, source: &mut dyn Read, path: &str) -> Result<u64, RemoteError>;
}
