//! # Configuration management
//!
//! sftp-put obtains its settings from the following sources, in order of precedence:
//! 1. Command-line options (`--ssh`, `--source`, `--destination`, `--port`)
//! 2. The process environment
//! 3. A dotenv file (by default `.env` in the current directory)
//! 4. Hard-wired defaults
//!
//! Each setting may appear in multiple places, but only the highest-precedence value is used.
//! The password can only be provided through the environment or the dotenv file.
//!
//! ## Recognised settings
//!
//! | Variable      | Required | Meaning |
//! |---------------|----------|---------|
//! | `PASSWORD`    | yes      | password for the remote account |
//! | `SSH`         | yes      | `user@host` |
//! | `SOURCE`      | yes      | local file or directory to upload (`~` is expanded) |
//! | `DESTINATION` | yes      | remote path; a trailing `/` means "directory" |
//! | `PORT`        | no       | remote SSH port, default 22 |
//!
//! ## Dotenv format
//!
//! ```text
//! # comments and blank lines are ignored
//! SSH=deploy@www.example.com
//! PASSWORD='correct horse battery staple'
//! SOURCE=./public
//! DESTINATION=/srv/www/
//! export PORT=2222
//! ```
//!
//! Run `sftp-put --show-config` to see the merged result and where each value came from.
//!
//! ## Validation
//!
//! [`Manager::resolve`] turns the merged [`Settings`] into an immutable [`Config`],
//! or a [`ConfigError`] describing the first rule that failed. No network access happens
//! until this has succeeded.
// (c) 2026 The sftp-put authors

mod manager;
pub use manager::{EnvFile, Manager, DEFAULT_ENV_FILE};

mod resolve;
pub use resolve::{Config, ConfigError, DestinationKind, Password};

mod sources;

mod structure;
pub use structure::{Overrides, Settings};

/// Replacement text for secrets in output
fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "********"
    }
}
