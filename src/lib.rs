//! # sftp-put
//!
//! Uploads a local file or directory tree to a remote host over SFTP, authenticating with a password.
//!
//! ## Usage
//!
//! Everything is configured through environment variables, optionally kept in a dotenv file:
//!
//! ```text
//! $ cat .env
//! SSH=deploy@www.example.com
//! PASSWORD=correct-horse-battery-staple
//! SOURCE=./public
//! DESTINATION=/srv/www/
//! $ sftp-put
//! ```
//!
//! A directory `SOURCE` needs a `DESTINATION` ending in `/`; a file `SOURCE` needs one that doesn't.
//! See [`config`] for the full set of variables and how they are merged with the command line,
//! and [`upload`] for how a local tree maps onto remote paths.
//!
//! ## Structure
//!
//! * [`config`] resolves and validates the settings into a [`config::Config`]
//! * [`session`] holds the [`session::TransferSession`] abstraction and its SFTP implementation
//! * [`upload`] walks the local tree and drives the session
// (c) 2026 The sftp-put authors

mod cli;
pub use cli::cli;
mod client;
pub mod config;
pub mod session;
pub mod upload;
/// Utilities
pub mod util;
