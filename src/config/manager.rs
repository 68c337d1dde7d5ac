//! Configuration source wrangling
// (c) 2026 The sftp-put authors

use super::{sources::EnvSource, Config, ConfigError, Settings};
use crate::cli::styles::ERROR;

use anyhow::Result;
use figment::{providers::Serialized, value::Value, Figment, Metadata, Provider};
use serde::Deserialize;
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use struct_field_names_as_array::FieldNamesAsSlice as _;
use tabled::{settings::style::Style, Table, Tabled};
use tracing::trace;

/// The dotenv file read when no other is specified
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Which dotenv file to read, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvFile {
    /// Do not read a dotenv file
    None,
    /// Read [`DEFAULT_ENV_FILE`] from the current directory, if it exists
    #[default]
    Default,
    /// Read the given file, which must exist
    Explicit(PathBuf),
}

// SYSTEM DEFAULTS //////////////////////////////////////////////////////////////////////////////////////////////

/// A `figment::Provider` that holds our set of fixed system default options
#[derive(Debug, Default, Clone, Copy)]
struct SystemDefault {}

impl SystemDefault {
    const META_NAME: &'static str = "default";
}

impl Provider for SystemDefault {
    fn metadata(&self) -> Metadata {
        Metadata::named(Self::META_NAME)
    }

    fn data(
        &self,
    ) -> std::result::Result<
        figment::value::Map<figment::Profile, figment::value::Dict>,
        figment::Error,
    > {
        Serialized::defaults(Settings::default()).data()
    }
}

// CONFIG MANAGER /////////////////////////////////////////////////////////////////////////////////////////////

/// Processes and merges all configuration sources.
///
/// In increasing order of precedence:
/// 1. Hard-wired defaults
/// 2. The dotenv file
/// 3. The process environment
/// 4. Anything merged in afterwards with [`Manager::merge_provider`] (i.e. the command line)
#[derive(Debug)]
pub struct Manager {
    /// Configuration data
    data: Figment,
}

impl Default for Manager {
    /// Initialises this structure fully-empty (for new(), or testing)
    fn default() -> Self {
        Self {
            data: Figment::default(),
        }
    }
}

impl Manager {
    /// Initialises this structure from the defaults, the requested dotenv file
    /// and the process environment.
    pub fn new(env_file: &EnvFile) -> Result<Self> {
        let mut mgr = Self::without_files();
        match env_file {
            EnvFile::None => (),
            EnvFile::Default => mgr.merge_env_file(Path::new(DEFAULT_ENV_FILE), false)?,
            EnvFile::Explicit(path) => mgr.merge_env_file(path, true)?,
        }
        mgr.merge_provider(EnvSource::from_process());
        Ok(mgr)
    }

    /// Testing/internal constructor: defaults only, does not read files or the environment
    #[must_use]
    pub fn without_files() -> Self {
        Self {
            data: Figment::new().merge(SystemDefault::default()),
        }
    }

    /// Merges in a data set, which is some sort of `figment::Provider`.
    pub fn merge_provider<T>(&mut self, provider: T)
    where
        T: Provider,
    {
        let f = std::mem::take(&mut self.data);
        self.data = f.merge(provider); // in the error case, this leaves the provider in a fused state
    }

    /// Merges in the recognised settings from a dotenv file.
    ///
    /// If `required` is false, a file that does not exist is silently skipped.
    pub fn merge_env_file(&mut self, path: &Path, required: bool) -> Result<()> {
        if !required && !path.exists() {
            trace!("env file {} not present", path.display());
            return Ok(());
        }
        self.merge_provider(EnvSource::from_file(path)?);
        Ok(())
    }

    /// Attempts to extract a particular struct from the data.
    ///
    /// Within sftp-put, `T` is usually [Settings], but it isn't intrinsically required to be.
    pub fn get<'de, T>(&self) -> Result<T, figment::Error>
    where
        T: Deserialize<'de>,
    {
        self.data.extract::<T>()
    }

    /// Extracts the merged [Settings] and validates them.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let settings: Settings = self.get()?;
        Config::try_from(&settings)
    }
}

// PRETTY PRINT SUPPORT ///////////////////////////////////////////////////////////////////////////////////////

#[derive(Tabled)]
struct PrettyConfig {
    field: String,
    value: String,
    source: String,
}

impl PrettyConfig {
    fn render_source(meta: Option<&Metadata>) -> String {
        if let Some(m) = meta {
            m.source
                .as_ref()
                .map_or_else(|| m.name.to_string(), figment::Source::to_string)
        } else {
            String::new()
        }
    }

    fn render_value(value: &Value) -> String {
        match value {
            Value::String(_tag, s) => s.to_string(),
            Value::Char(_tag, c) => c.to_string(),
            Value::Bool(_tag, b) => b.to_string(),
            Value::Num(_tag, num) => num
                .to_u128()
                .map(|u| u.to_string())
                .or_else(|| num.to_i128().map(|i| i.to_string()))
                .unwrap_or_else(|| format!("{num:?}")),
            Value::Empty(_tag, _) => "<empty>".into(),
            Value::Dict(..) | Value::Array(..) => "<unsupported>".into(),
        }
    }

    fn new(field: &str, value: &Value, meta: Option<&Metadata>) -> Self {
        let value = if field == "password" {
            match value {
                Value::String(_tag, s) => super::mask(s).to_string(),
                _ => PrettyConfig::render_value(value),
            }
        } else {
            PrettyConfig::render_value(value)
        };
        Self {
            field: field.to_uppercase(),
            value,
            source: PrettyConfig::render_source(meta),
        }
    }
}

impl Display for Manager {
    /// Formats the merged settings, with their sources, as a table.
    /// The password is masked.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields = Vec::<PrettyConfig>::new();

        for field in Settings::FIELD_NAMES_AS_SLICE {
            let value = match self.data.find_value(field) {
                Ok(v) => v,
                Err(e) => {
                    writeln!(
                        f,
                        "{}error{} on field {field}: {e}",
                        ERROR.render(),
                        ERROR.render_reset()
                    )?;
                    continue;
                }
            };
            let meta = self.data.find_metadata(field);
            fields.push(PrettyConfig::new(field, &value, meta));
        }
        write!(f, "{}", Table::new(fields).with(Style::sharp()))
    }
}
