//! SFTP over SSH, via libssh2
// (c) 2026 The sftp-put authors

use std::{io::Read, net::TcpStream, path::Path};

use ssh2::{ErrorCode, Session, Sftp};
use tracing::{debug, trace};

use super::{RemoteAttributes, RemoteError, RemoteKind, RemoteOp, TransferSession};
use crate::config::Config;

/// SFTP status code `SSH_FX_NO_SUCH_FILE`
const SFTP_NO_SUCH_FILE: i32 = 2;

/// Mode for directories we create; the server applies its umask.
const DIRECTORY_MODE: i32 = 0o777;

/// Failure to establish an SFTP session
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The TCP connection could not be made
    #[error("could not connect to {host}:{port}")]
    Tcp {
        /// Remote host
        host: String,
        /// Remote port
        port: u16,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
    /// libssh2 could not allocate a session
    #[error("could not create SSH session")]
    Session(#[source] ssh2::Error),
    /// The SSH handshake failed
    #[error("SSH handshake with {host} failed")]
    Handshake {
        /// Remote host
        host: String,
        /// Underlying cause
        #[source]
        source: ssh2::Error,
    },
    /// The server rejected our credentials
    #[error("authentication as {username} failed")]
    Authentication {
        /// User we tried to log in as
        username: String,
        /// Underlying cause
        #[source]
        source: ssh2::Error,
    },
    /// Password authentication completed but the session is not authenticated
    #[error("server did not accept authentication as {username}")]
    NotAuthenticated {
        /// User we tried to log in as
        username: String,
    },
    /// The SFTP subsystem could not be started
    #[error("could not start SFTP subsystem")]
    Subsystem(#[source] ssh2::Error),
}

/// An authenticated SFTP session.
///
/// The SSH connection is closed when this is dropped (or explicitly, with [`SftpSession::close`]).
#[allow(clippy::module_name_repetitions)]
pub struct SftpSession {
    /// Only `None` while closing; the channel must go before the session is disconnected.
    sftp: Option<Sftp>,
    session: Session,
}

impl std::fmt::Debug for SftpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpSession")
            .field("authenticated", &self.session.authenticated())
            .finish_non_exhaustive()
    }
}

impl SftpSession {
    /// Connects to the host described by `config`, authenticates with its password
    /// and opens the SFTP subsystem.
    pub fn connect(config: &Config) -> Result<Self, ConnectError> {
        debug!("Opening TCP connection to {}:{}", config.host, config.port);
        let tcp = TcpStream::connect((config.host.as_str(), config.port)).map_err(|source| {
            ConnectError::Tcp {
                host: config.host.clone(),
                port: config.port,
                source,
            }
        })?;

        let mut session = Session::new().map_err(ConnectError::Session)?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|source| ConnectError::Handshake {
                host: config.host.clone(),
                source,
            })?;
        if let Some((_, key_type)) = session.host_key() {
            debug!("Server host key type is {key_type:?}");
        }

        session
            .userauth_password(&config.username, config.password.expose())
            .map_err(|source| ConnectError::Authentication {
                username: config.username.clone(),
                source,
            })?;
        if !session.authenticated() {
            return Err(ConnectError::NotAuthenticated {
                username: config.username.clone(),
            });
        }
        trace!("authenticated as {}", config.username);

        let sftp = session.sftp().map_err(ConnectError::Subsystem)?;
        Ok(Self {
            sftp: Some(sftp),
            session,
        })
    }

    /// Closes the session.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for SftpSession {
    fn drop(&mut self) {
        drop(self.sftp.take());
        match self.session.disconnect(None, "transfer finished", None) {
            Ok(()) => trace!("SSH session closed"),
            Err(e) => debug!("error closing SSH session: {e}"),
        }
    }
}

/// Converts a libssh2 error, picking out "no such file"
fn remote_error(op: RemoteOp, path: &str, err: ssh2::Error) -> RemoteError {
    if matches!(err.code(), ErrorCode::SFTP(SFTP_NO_SUCH_FILE)) {
        RemoteError::NotFound {
            path: path.to_string(),
        }
    } else {
        RemoteError::Failed {
            op,
            path: path.to_string(),
            source: err.into(),
        }
    }
}

impl SftpSession {
    fn channel(&self, op: RemoteOp, path: &str) -> Result<&Sftp, RemoteError> {
        self.sftp.as_ref().ok_or_else(|| RemoteError::Failed {
            op,
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotConnected, "SFTP channel closed"),
        })
    }
}

impl TransferSession for SftpSession {
    fn stat(&mut self, path: &str) -> Result<RemoteAttributes, RemoteError> {
        let stat = self
            .channel(RemoteOp::Stat, path)?
            .stat(Path::new(path))
            .map_err(|e| remote_error(RemoteOp::Stat, path, e))?;
        let file_type = stat.file_type();
        let kind = if file_type.is_dir() {
            RemoteKind::Directory
        } else if file_type.is_file() {
            RemoteKind::File
        } else {
            RemoteKind::Other
        };
        Ok(RemoteAttributes {
            kind,
            size: stat.size,
            permissions: stat.perm,
        })
    }

    fn mkdir(&mut self, path: &str) -> Result<(), RemoteError> {
        self.channel(RemoteOp::Mkdir, path)?
            .mkdir(Path::new(path), DIRECTORY_MODE)
            .map_err(|e| remote_error(RemoteOp::Mkdir, path, e))
    }

    fn put(&mut self, source: &mut dyn Read, path: &str) -> Result<u64, RemoteError> {
        let mut remote = self
            .channel(RemoteOp::Put, path)?
            .create(Path::new(path))
            .map_err(|e| remote_error(RemoteOp::Put, path, e))?;
        let written =
            std::io::copy(source, &mut remote).map_err(|source| RemoteError::Failed {
                op: RemoteOp::Put,
                path: path.to_string(),
                source,
            })?;
        drop(remote);

        // Confirm the server agrees about what it received.
        let attributes = self.stat(path)?;
        match attributes.size {
            Some(size) if size != written => Err(RemoteError::SizeMismatch {
                path: path.to_string(),
                written,
                remote: size,
            }),
            _ => Ok(written),
        }
    }
}
