//! Recursive upload of a local file or directory tree
//!
//! The rules, applied at every level of the tree:
//!
//! * A **directory** `D` uploaded to remote `R` is created as `R` (with any trailing `/` removed),
//!   then each of its entries `E` is uploaded to `R/E`, in name order.
//!   The parent of `R` must already exist remotely.
//!   Failure to create `R` itself is not fatal; it usually means the directory already exists.
//!   If it really could not be created, the first file written into it will fail instead.
//! * A **file** `F` uploaded to remote `R` is written to `R/<name of F>` if `R` ends with `/`
//!   or is an existing remote directory. Otherwise it is written to `R` itself, replacing any
//!   file already there.
//! * Anything else (device nodes, sockets, dangling symlinks) is skipped with a warning.
//!
//! The first failure to write a file aborts the whole upload; nothing is rolled back.
// (c) 2026 The sftp-put authors

use std::{
    fmt::Display,
    fs::File,
    path::{Path, PathBuf},
};

use human_repr::HumanCount as _;
use indicatif::{MultiProgress, ProgressDrawTarget};
use tracing::{debug, info, trace, warn};

use crate::session::{RemoteError, TransferSession};
use crate::util::remote_path;

/// Failure of an upload
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum UploadError {
    /// The remote directory a file was to be written into does not exist
    #[error("remote directory {parent} does not exist")]
    RemoteParentMissing {
        /// The missing directory
        parent: String,
        /// Underlying cause
        #[source]
        source: RemoteError,
    },
    /// Writing a file failed
    #[error("failed to upload {} to {remote}", .local.display())]
    Put {
        /// Local file
        local: PathBuf,
        /// Remote destination
        remote: String,
        /// Underlying cause
        #[source]
        source: RemoteError,
    },
    /// A local path could not be examined
    #[error("could not read metadata of {}", .path.display())]
    LocalMetadata {
        /// Local path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
    /// A local directory could not be listed
    #[error("could not list directory {}", .path.display())]
    ListLocal {
        /// Local directory
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
    /// A local name cannot be expressed as a remote path
    #[error("{}: file name is not valid UTF-8", .path.display())]
    NonUtf8Name {
        /// Local path
        path: PathBuf,
    },
    /// A local file could not be opened
    #[error("could not open {}", .path.display())]
    OpenLocal {
        /// Local file
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
}

/// What an upload did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct UploadStats {
    /// Files written
    pub files: u64,
    /// Directories visited (whether or not they had to be created)
    pub directories: u64,
    /// Local entries that were neither files nor directories
    pub skipped: u64,
    /// Payload bytes written
    pub bytes: u64,
}

impl Display for UploadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files in {} directories, {}",
            self.files,
            self.directories,
            self.bytes.human_count_bytes()
        )?;
        if self.skipped > 0 {
            write!(f, " ({} skipped)", self.skipped)?;
        }
        Ok(())
    }
}

/// Walks a local tree, recreating it through a [`TransferSession`]
#[derive(Debug)]
pub struct Uploader<'a, S: TransferSession + ?Sized> {
    session: &'a mut S,
    display: MultiProgress,
    stats: UploadStats,
}

impl<'a, S: TransferSession + ?Sized> Uploader<'a, S> {
    /// Constructor. By default no progress is shown.
    #[must_use]
    pub fn new(session: &'a mut S) -> Self {
        Self {
            session,
            display: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            stats: UploadStats::default(),
        }
    }

    /// Shows a progress bar for each file on the given display
    #[must_use]
    pub fn with_display(mut self, display: &MultiProgress) -> Self {
        self.display = display.clone();
        self
    }

    /// Uploads `local` to `remote`, returning what was done.
    pub fn run(mut self, local: &Path, remote: &str) -> Result<UploadStats, UploadError> {
        self.upload(local, remote)?;
        Ok(self.stats)
    }

    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), UploadError> {
        // Follows symlinks
        let metadata = match std::fs::metadata(local) {
            Ok(m) => m,
            Err(e) if local.symlink_metadata().is_ok() => {
                warn!("Skipping {}: dangling symlink ({e})", local.display());
                self.stats.skipped += 1;
                return Ok(());
            }
            Err(source) => {
                return Err(UploadError::LocalMetadata {
                    path: local.to_path_buf(),
                    source,
                })
            }
        };

        if metadata.is_dir() {
            self.upload_directory(local, remote)
        } else if metadata.is_file() {
            self.upload_file(local, remote, metadata.len())
        } else {
            warn!(
                "Skipping {}: not a regular file or directory",
                local.display()
            );
            self.stats.skipped += 1;
            Ok(())
        }
    }

    /// Where a file bound for `remote` actually goes
    fn file_target(&mut self, local: &Path, remote: &str) -> Result<String, UploadError> {
        let into_directory = remote_path::has_trailing_separator(remote)
            || match self.session.stat(remote) {
                Ok(attributes) => attributes.is_dir(),
                Err(e) => {
                    trace!("stat {remote}: {e}");
                    false
                }
            };
        if into_directory {
            let name = local
                .file_name()
                .unwrap_or_default()
                .to_str()
                .ok_or_else(|| UploadError::NonUtf8Name {
                    path: local.to_path_buf(),
                })?;
            Ok(remote_path::join(remote, name))
        } else {
            Ok(remote.to_string())
        }
    }

    fn upload_file(&mut self, local: &Path, remote: &str, size: u64) -> Result<(), UploadError> {
        let target = self.file_target(local, remote)?;
        let file = File::open(local).map_err(|source| UploadError::OpenLocal {
            path: local.to_path_buf(),
            source,
        })?;

        info!("Uploading {} to {target}", local.display());
        let progress = crate::client::progress_bar_for(&self.display, local, size);
        let mut reader = progress.wrap_read(file);
        let result = self.session.put(&mut reader, &target);
        progress.finish_and_clear();

        let written = result.map_err(|source| {
            if source.is_not_found() {
                UploadError::RemoteParentMissing {
                    parent: remote_path::parent(&target).to_string(),
                    source,
                }
            } else {
                UploadError::Put {
                    local: local.to_path_buf(),
                    remote: target.clone(),
                    source,
                }
            }
        })?;
        debug!("wrote {written} bytes to {target}");
        self.stats.files += 1;
        self.stats.bytes += written;
        Ok(())
    }

    fn upload_directory(&mut self, local: &Path, remote: &str) -> Result<(), UploadError> {
        let remote = remote_path::trim_trailing_separator(remote);
        let parent = remote_path::parent(remote);
        if let Err(source) = self.session.stat(parent) {
            return Err(UploadError::RemoteParentMissing {
                parent: parent.to_string(),
                source,
            });
        }
        match self.session.mkdir(remote) {
            Ok(()) => info!("Created directory {remote}"),
            Err(e) => debug!("mkdir {remote}: {e} (assuming it exists)"),
        }
        self.stats.directories += 1;

        for (name, path) in list_directory(local)? {
            self.upload(&path, &remote_path::join(remote, &name))?;
        }
        Ok(())
    }
}

/// The entries of a local directory, sorted by name.
///
/// Every name must be valid UTF-8; lossy conversion could send two local files to one remote path.
fn list_directory(local: &Path) -> Result<Vec<(String, PathBuf)>, UploadError> {
    let list_error = |source| UploadError::ListLocal {
        path: local.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(local).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|_| UploadError::NonUtf8Name { path: entry.path() })?;
        entries.push((name, entry.path()));
    }
    entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Convenience wrapper: uploads `local` to `remote` without a progress display
pub fn upload<S: TransferSession + ?Sized>(
    session: &mut S,
    local: &Path,
    remote: &str,
) -> Result<UploadStats, UploadError> {
    Uploader::new(session).run(local, remote)
}
