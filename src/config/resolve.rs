//! Validation of merged settings
// (c) 2026 The sftp-put authors

use std::path::PathBuf;

use tracing::debug;

use super::Settings;
use crate::util::remote_path;

/// A secret which is never shown in `Debug` output
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Returns the secret itself
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(super::mask(&self.0))
    }
}

/// Validated configuration for one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Remote host name or address
    pub host: String,
    /// Remote account name
    pub username: String,
    /// Password for the remote account
    pub password: Password,
    /// Remote SSH port
    pub port: u16,
    /// Local file or directory to upload
    pub source: PathBuf,
    /// Remote destination path
    pub destination: String,
}

/// The type of destination a source requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DestinationKind {
    /// Destination must end with `/`
    Directory,
    /// Destination must not end with `/`
    File,
}

impl DestinationKind {
    fn requirement(self) -> &'static str {
        match self {
            DestinationKind::Directory => "must end with '/'",
            DestinationKind::File => "must not end with '/'",
        }
    }
}

/// Reasons the configuration is not usable
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One or more required values were not provided
    #[error("missing configuration values: {}", .names.join(", "))]
    MissingConfig {
        /// All the missing variable names
        names: Vec<&'static str>,
    },
    /// `SSH` was not of the form `user@host`
    #[error("SSH must be in the format user@host (got `{0}`)")]
    MalformedConnectionString(String),
    /// `SOURCE` does not exist locally
    #[error("SOURCE path does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// `SOURCE` is neither a regular file nor a directory
    #[error("SOURCE is neither a regular file nor a directory: {}", .0.display())]
    UnsupportedSource(PathBuf),
    /// `DESTINATION` does not suit the type of `SOURCE`
    #[error("expected {expected} destination: DESTINATION `{destination}` {}", .expected.requirement())]
    DestinationTypeMismatch {
        /// What the source requires
        expected: DestinationKind,
        /// The destination given
        destination: String,
    },
    /// A value could not be parsed
    #[error(transparent)]
    Invalid(#[from] figment::Error),
}

/// Splits `user@host`
fn split_connection_string(ssh: &str) -> Result<(&str, &str), ConfigError> {
    match ssh.split_once('@') {
        Some((user, host)) if !user.is_empty() && !host.is_empty() && !host.contains('@') => {
            Ok((user, host))
        }
        _ => Err(ConfigError::MalformedConnectionString(ssh.to_string())),
    }
}

fn expand_source(source: &str) -> PathBuf {
    expanduser::expanduser(source).unwrap_or_else(|_| PathBuf::from(source))
}

impl TryFrom<&Settings> for Config {
    type Error = ConfigError;

    /// Applies the validation rules in order, stopping at the first that fails.
    fn try_from(settings: &Settings) -> Result<Self, Self::Error> {
        let names: Vec<&'static str> = [
            ("PASSWORD", &settings.password),
            ("SSH", &settings.ssh),
            ("SOURCE", &settings.source),
            ("DESTINATION", &settings.destination),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.is_empty().then_some(name))
        .collect();
        if !names.is_empty() {
            return Err(ConfigError::MissingConfig { names });
        }

        let (username, host) = split_connection_string(&settings.ssh)?;

        let source = expand_source(&settings.source);
        let Ok(metadata) = std::fs::metadata(&source) else {
            return Err(ConfigError::SourceNotFound(source));
        };

        let destination = settings.destination.clone();
        let directory_destination = remote_path::has_trailing_separator(&destination);
        if metadata.is_dir() {
            if !directory_destination {
                return Err(ConfigError::DestinationTypeMismatch {
                    expected: DestinationKind::Directory,
                    destination,
                });
            }
        } else if metadata.is_file() {
            if directory_destination {
                return Err(ConfigError::DestinationTypeMismatch {
                    expected: DestinationKind::File,
                    destination,
                });
            }
        } else {
            return Err(ConfigError::UnsupportedSource(source));
        }

        debug!("configuration is valid");
        Ok(Self {
            host: host.to_string(),
            username: username.to_string(),
            password: Password(settings.password.clone()),
            port: settings.port.get(),
            source,
            destination,
        })
    }
}
