//! Command Line Interface for sftp-put
// (c) 2026 The sftp-put authors
mod args;
mod cli_main;
pub(crate) mod styles;
pub use cli_main::cli;
