//! In-memory [`TransferSession`] that records every call
// (c) 2026 The sftp-put authors

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use super::{RemoteAttributes, RemoteError, RemoteKind, RemoteOp, TransferSession};
use crate::util::remote_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Stat(String),
    Mkdir(String),
    Put(String),
}

/// A fake remote filesystem.
///
/// `mkdir` fails on anything that already exists, or when the parent is missing,
/// the way a real SFTP server does.
#[derive(Debug)]
pub(crate) struct RecordingSession {
    pub(crate) calls: Vec<Call>,
    directories: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
    failing_put: BTreeSet<String>,
    failing_stat: BTreeSet<String>,
}

impl RecordingSession {
    /// A remote host with only the root and working directories
    pub(crate) fn new() -> Self {
        Self {
            calls: Vec::new(),
            directories: ["/", "."].into_iter().map(String::from).collect(),
            files: BTreeMap::new(),
            failing_put: BTreeSet::new(),
            failing_stat: BTreeSet::new(),
        }
    }

    pub(crate) fn with_directory(mut self, path: &str) -> Self {
        let _ = self.directories.insert(path.to_string());
        self
    }

    pub(crate) fn with_file(mut self, path: &str, contents: &[u8]) -> Self {
        let _ = self.files.insert(path.to_string(), contents.to_vec());
        self
    }

    pub(crate) fn failing_put(mut self, path: &str) -> Self {
        let _ = self.failing_put.insert(path.to_string());
        self
    }

    pub(crate) fn failing_stat(mut self, path: &str) -> Self {
        let _ = self.failing_stat.insert(path.to_string());
        self
    }

    /// Remote paths passed to `put`, in call order
    pub(crate) fn puts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Put(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Remote paths passed to `mkdir`, in call order
    pub(crate) fn mkdirs(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Mkdir(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }

    /// `mkdir` and `put` calls only, in order
    pub(crate) fn mutations(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, Call::Stat(_)))
            .cloned()
            .collect()
    }

    pub(crate) fn file(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub(crate) fn has_directory(&self, path: &str) -> bool {
        self.directories.contains(path)
    }

    fn failure(op: RemoteOp, path: &str, message: &str) -> RemoteError {
        RemoteError::Failed {
            op,
            path: path.to_string(),
            source: std::io::Error::other(message.to_string()),
        }
    }
}

impl TransferSession for RecordingSession {
    fn stat(&mut self, path: &str) -> Result<RemoteAttributes, RemoteError> {
        self.calls.push(Call::Stat(path.to_string()));
        if self.failing_stat.contains(path) {
            return Err(Self::failure(RemoteOp::Stat, path, "permission denied"));
        }
        let path = remote_path::trim_trailing_separator(path);
        if self.directories.contains(path) {
            Ok(RemoteAttributes {
                kind: RemoteKind::Directory,
                size: Some(4096),
                permissions: Some(0o755),
            })
        } else if let Some(contents) = self.files.get(path) {
            Ok(RemoteAttributes {
                kind: RemoteKind::File,
                size: Some(contents.len() as u64),
                permissions: Some(0o644),
            })
        } else {
            Err(RemoteError::NotFound {
                path: path.to_string(),
            })
        }
    }

    fn mkdir(&mut self, path: &str) -> Result<(), RemoteError> {
        self.calls.push(Call::Mkdir(path.to_string()));
        if self.directories.contains(path) || self.files.contains_key(path) {
            return Err(Self::failure(RemoteOp::Mkdir, path, "failure"));
        }
        if !self.directories.contains(remote_path::parent(path)) {
            return Err(Self::failure(RemoteOp::Mkdir, path, "no such file"));
        }
        let _ = self.directories.insert(path.to_string());
        Ok(())
    }

    fn put(&mut self, source: &mut dyn Read, path: &str) -> Result<u64, RemoteError> {
        self.calls.push(Call::Put(path.to_string()));
        if self.failing_put.contains(path) {
            return Err(Self::failure(RemoteOp::Put, path, "permission denied"));
        }
        if !self.directories.contains(remote_path::parent(path)) {
            return Err(RemoteError::NotFound {
                path: path.to_string(),
            });
        }
        let mut contents = Vec::new();
        let _ = source
            .read_to_end(&mut contents)
            .map_err(|source| RemoteError::Failed {
                op: RemoteOp::Put,
                path: path.to_string(),
                source,
            })?;
        let written = contents.len() as u64;
        let _ = self.files.insert(path.to_string(), contents);
        Ok(written)
    }
}
