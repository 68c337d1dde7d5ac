// sftp-put top-level command-line arguments
// (c) 2026 The sftp-put authors

use std::path::PathBuf;

use clap::Parser;

use crate::config::{EnvFile, Overrides};

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version(env!("SFTP_PUT_VERSION_STRING")),
    about,
    before_help = "e.g.   SSH=deploy@www.example.com PASSWORD=... sftp-put --source ./public --destination /srv/www/",
    infer_long_args(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CliArgs {
    // MODE SELECTION ======================================================================
    /// Outputs the merged configuration, with the source of each value, then exits.
    ///
    /// The password is masked.
    #[arg(long, help_heading("Configuration"))]
    pub show_config: bool,

    // CONFIGURATION SOURCES ===============================================================
    /// Reads settings from the given dotenv file, which must exist
    /// [default: `.env` in the current directory, if present]
    #[arg(
        short,
        long,
        value_name("FILE"),
        help_heading("Configuration"),
        conflicts_with("no_env_file")
    )]
    pub env_file: Option<PathBuf>,

    /// Does not read any dotenv file
    #[arg(long, action, help_heading("Configuration"))]
    pub no_env_file: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    // OUTPUT ==============================================================================
    /// Quiet mode
    ///
    /// Switches off progress display and statistics; reports only errors
    #[arg(short, long, action, conflicts_with("debug"))]
    pub quiet: bool,

    /// Outputs transfer statistics on completion
    #[arg(short = 's', long, alias("stats"), action, conflicts_with("quiet"))]
    pub statistics: bool,

    // DEBUG ===============================================================================
    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=sftp_put=trace` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, help_heading("Debug"))]
    pub debug: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(short('l'), long, action, help_heading("Debug"), value_name("FILE"))]
    pub log_file: Option<String>,
}

impl CliArgs {
    /// Which dotenv file the user asked for
    pub(crate) fn env_file(&self) -> EnvFile {
        if self.no_env_file {
            EnvFile::None
        } else if let Some(path) = &self.env_file {
            EnvFile::Explicit(path.clone())
        } else {
            EnvFile::Default
        }
    }

    pub(crate) fn trace_level(&self) -> &'static str {
        if self.debug {
            "trace"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}
