//! Configuration structure
// (c) 2026 The sftp-put authors

use clap::Args;
use figment::{
    value::{Dict, Map},
    Metadata, Profile, Provider,
};
use heck::ToKebabCase as _;
use serde::{Deserialize, Serialize};
use struct_field_names_as_array::FieldNamesAsSlice;

use super::sources::insert_if_some;
use crate::util::Port;

/// The set of settings recognised by sftp-put, as merged from all sources but not yet validated.
///
/// Each field is read from the environment variable of the same name in upper case
/// (`PASSWORD`, `SSH`, `SOURCE`, `DESTINATION`, `PORT`).
/// An empty string means the value was not provided.
///
/// **Note:** The implementation of `default()` for this struct returns the hard-wired defaults.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize, FieldNamesAsSlice)]
pub struct Settings {
    /// Password for the remote account
    pub password: String,
    /// Remote account and host, as `user@host`
    pub ssh: String,
    /// Local file or directory to upload
    pub source: String,
    /// Remote destination. A trailing `/` marks a directory.
    pub destination: String,
    /// Remote SSH port
    pub port: Port,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("password", &super::mask(&self.password))
            .field("ssh", &self.ssh)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("port", &self.port)
            .finish()
    }
}

/// Settings which may be overridden on the command line.
///
/// The password is deliberately absent; it may only come from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct Overrides {
    /// Remote account and host, as `user@host` [env: SSH]
    #[arg(long, value_name("USER@HOST"), help_heading("Connection"))]
    pub ssh: Option<String>,

    /// Remote SSH port [env: PORT; default: 22]
    #[arg(short, long, value_name("PORT"), help_heading("Connection"))]
    pub port: Option<Port>,

    /// Local file or directory to upload [env: SOURCE]
    #[arg(long, value_name("PATH"), help_heading("Transfer"))]
    pub source: Option<String>,

    /// Remote destination [env: DESTINATION]
    ///
    /// This must end with `/` when SOURCE is a directory, and must not when SOURCE is a file.
    #[arg(long, value_name("PATH"), help_heading("Transfer"))]
    pub destination: Option<String>,
}

impl Provider for Overrides {
    fn metadata(&self) -> Metadata {
        Metadata::named("command-line").interpolater(|_profile, path| {
            let key = path
                .last()
                .map_or("<unknown>".to_string(), |s| s.to_kebab_case());
            format!("--{key}")
        })
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        insert_if_some(&mut dict, "ssh", self.ssh.as_ref())?;
        insert_if_some(&mut dict, "port", self.port)?;
        insert_if_some(&mut dict, "source", self.source.as_ref())?;
        insert_if_some(&mut dict, "destination", self.destination.as_ref())?;
        Ok(Profile::Default.collect(dict))
    }
}
