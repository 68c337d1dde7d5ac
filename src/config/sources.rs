//! Environment-style configuration sources
//!
//! Settings come from `KEY=VALUE` pairs, either in the process environment (read through
//! figment's [`Env`]) or in a dotenv file. Both are exposed to figment through [`EnvSource`].
// (c) 2026 The sftp-put authors

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use figment::{
    providers::Env,
    value::{Dict, Map, Value},
    Metadata, Profile, Provider,
};
use heck::ToShoutySnakeCase as _;
use struct_field_names_as_array::FieldNamesAsSlice as _;
use tracing::trace;

use super::Settings;

/// Helper function for `figment::Provider` implementations
///
/// If the given `arg` is not None, inserts it into `dict` with key `arg_name`.
pub(crate) fn insert_if_some<T>(
    dict: &mut Dict,
    arg_name: &str,
    arg: Option<T>,
) -> Result<(), figment::Error>
where
    T: serde::Serialize,
{
    if let Some(a) = arg {
        let _ = dict.insert(arg_name.to_string(), Value::serialize(a)?);
    }
    Ok(())
}

/// Maps an environment variable name to the [`Settings`] field it sets, if any
fn field_for(key: &str) -> Option<&'static str> {
    Settings::FIELD_NAMES_AS_SLICE
        .iter()
        .find(|field| field.to_shouty_snake_case() == key)
        .copied()
}

/// A figment provider holding the recognised settings from one environment-style source.
///
/// Values are kept as strings; typed fields (e.g. the port) parse them on extraction.
#[derive(Debug, Clone)]
pub(crate) struct EnvSource {
    metadata: Metadata,
    /// Field name -> raw value
    values: BTreeMap<String, String>,
}

impl EnvSource {
    fn new(metadata: Metadata) -> Self {
        Self {
            metadata: metadata.interpolater(|_profile, path| {
                path.last()
                    .map_or("<unknown>".to_string(), |s| s.to_shouty_snake_case())
            }),
            values: BTreeMap::new(),
        }
    }

    fn insert(&mut self, key: &str, value: String) {
        if let Some(field) = field_for(key) {
            let _ = self.values.insert(field.to_string(), value);
        } else {
            trace!("ignoring unrecognised variable {key}");
        }
    }

    /// Reads the recognised variables from the process environment
    pub(crate) fn from_process() -> Self {
        let keys: Vec<String> = Settings::FIELD_NAMES_AS_SLICE
            .iter()
            .map(|f| f.to_shouty_snake_case())
            .collect();
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        Self::from_env(&Env::raw().only(&keys).lowercase(false))
    }

    /// Takes the variables selected by `env`, verbatim.
    ///
    /// `Env` itself would parse each value (`PASSWORD=1234` becomes a number), so only its
    /// key selection and metadata are used.
    pub(crate) fn from_env(env: &Env) -> Self {
        let mut source = Self::new(env.metadata());
        for (key, value) in env.iter() {
            source.insert(key.as_str(), value);
        }
        source
    }

    /// Reads a dotenv file
    pub(crate) fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading env file {}", path.display()))?;
        let mut source = Self::new(
            Metadata::named("env file").source(figment::Source::File(PathBuf::from(path))),
        );
        for (key, value) in
            parse_dotenv(&contents).with_context(|| format!("in env file {}", path.display()))?
        {
            source.insert(&key, value);
        }
        Ok(source)
    }

    #[cfg(test)]
    fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

impl Provider for EnvSource {
    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        for (field, value) in &self.values {
            let _ = dict.insert(field.clone(), Value::from(value.clone()));
        }
        Ok(Profile::Default.collect(dict))
    }
}

///////////////////////////////////////////////////////////////////////////////////////

/// Parses the contents of a dotenv file into `(KEY, value)` pairs, in file order.
///
/// Supported syntax:
/// * `KEY=value`, optionally preceded by `export `
/// * blank lines and `#` comment lines
/// * `"double quoted"` values, with `\"`, `\\` and `\n` escapes
/// * `'single quoted'` values, taken literally
/// * unquoted values, which end at a `#` preceded by whitespace
///
/// Values may not span lines.
pub(crate) fn parse_dotenv(contents: &str) -> Result<Vec<(String, String)>> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(n, line)| {
            parse_line(line)
                .with_context(|| format!("line {}", n + 1))
                .transpose()
        })
        .collect()
}

fn parse_line(line: &str) -> Result<Option<(String, String)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let line = line.strip_prefix("export ").map_or(line, str::trim_start);
    let (key, value) = line
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected KEY=VALUE"))?;
    let key = key.trim_end();
    anyhow::ensure!(
        !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        "invalid variable name `{key}`"
    );
    Ok(Some((key.to_string(), parse_value(value.trim_start())?)))
}

fn parse_value(raw: &str) -> Result<String> {
    let Some(quote @ ('"' | '\'')) = raw.chars().next() else {
        let end = raw
            .char_indices()
            .find(|&(i, c)| c == '#' && raw[..i].ends_with(char::is_whitespace))
            .map_or(raw.len(), |(i, _)| i);
        return Ok(raw[..end].trim_end().to_string());
    };

    let mut value = String::new();
    let mut chars = raw[1..].chars();
    loop {
        match chars.next() {
            None => anyhow::bail!("unterminated quote"),
            Some('\\') if quote == '"' => match chars.next() {
                Some('n') => value.push('\n'),
                Some(c @ ('"' | '\\')) => value.push(c),
                Some(c) => {
                    value.push('\\');
                    value.push(c);
                }
                None => anyhow::bail!("unterminated quote"),
            },
            Some(c) if c == quote => break,
            Some(c) => value.push(c),
        }
    }
    let rest = chars.as_str().trim_start();
    anyhow::ensure!(
        rest.is_empty() || rest.starts_with('#'),
        "unexpected text after closing quote"
    );
    Ok(value)
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context, Result};
    use assertables::{assert_contains, assert_contains_as_result, assert_eq_as_result};
    use figment::Jail;

    use super::{parse_dotenv, EnvSource};
    use crate::util::make_test_tempfile;

    #[test]
    fn line_parsing() -> Result<()> {
        for (input, expected) in [
            ("", vec![]),
            ("# just a comment", vec![]),
            ("A=1", vec![("A", "1")]),
            ("  A = 1  ", vec![("A", "1")]),
            ("export A=1", vec![("A", "1")]),
            ("A=", vec![("A", "")]),
            ("A=x # comment", vec![("A", "x")]),
            ("A=x#y", vec![("A", "x#y")]),
            ("A=p@ss=word", vec![("A", "p@ss=word")]),
            (r#"A="a b # c""#, vec![("A", "a b # c")]),
            (r#"A="a \"b\" \\ \n""#, vec![("A", "a \"b\" \\ \n")]),
            (r"A='a \n b'", vec![("A", r"a \n b")]),
            (r#"A="x" # trailing"#, vec![("A", "x")]),
            ("A=1\n\nB=2\n", vec![("A", "1"), ("B", "2")]),
        ] {
            let msg = || format!("input {input:?} failed");
            let expected: Vec<(String, String)> = expected
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            assert_eq_as_result!(parse_dotenv(input).with_context(msg)?, expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
        }
        Ok(())
    }

    #[test]
    fn line_errors() -> Result<()> {
        for (input, expected_msg) in [
            ("A", "expected KEY=VALUE"),
            ("=1", "invalid variable name"),
            ("MY-KEY=1", "invalid variable name"),
            ("A=\"abc", "unterminated quote"),
            ("A='abc", "unterminated quote"),
            ("A=\"abc\" def", "unexpected text after closing quote"),
        ] {
            let err = parse_dotenv(input).unwrap_err();
            assert_contains_as_result!(format!("{err:#}"), expected_msg)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input {input:?} failed"))?;
        }
        Ok(())
    }

    #[test]
    fn error_reports_line_number() {
        let err = parse_dotenv("A=1\nB\n").unwrap_err();
        assert_contains!(format!("{err:#}"), "line 2");
    }

    #[test]
    fn file_keeps_recognised_keys() {
        let (path, _tempdir) = make_test_tempfile(
            r#"
            # deployment target
            SSH=deploy@example.com
            PASSWORD="s3cret # not a comment"
            SOURCE=./public
            DESTINATION=/srv/www/
            PORT=2222
            EDITOR=vim
        "#,
            ".env",
        );
        let source = EnvSource::from_file(&path).unwrap();
        assert_eq!(source.get("ssh"), Some("deploy@example.com"));
        assert_eq!(source.get("password"), Some("s3cret # not a comment"));
        assert_eq!(source.get("source"), Some("./public"));
        assert_eq!(source.get("destination"), Some("/srv/www/"));
        assert_eq!(source.get("port"), Some("2222"));
        assert_eq!(source.get("editor"), None);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EnvSource::from_file(&dir.path().join("nope.env")).unwrap_err();
        assert_contains!(err.to_string(), "reading env file");
    }

    #[test]
    fn process_environment() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("SSH", "a@b");
            jail.set_env("PORT", "22");
            jail.set_env("EDITOR", "vim");
            let source = EnvSource::from_process();
            assert_eq!(source.get("ssh"), Some("a@b"));
            assert_eq!(source.get("port"), Some("22"));
            assert_eq!(source.get("password"), None);
            assert_eq!(source.values.len(), 2);
            Ok(())
        });
    }

    #[test]
    fn environment_values_are_not_parsed() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("PASSWORD", "1234");
            jail.set_env("SOURCE", "[site]");
            jail.set_env("DESTINATION", "\"/srv/www/\"");
            let source = EnvSource::from_process();
            assert_eq!(source.get("password"), Some("1234"));
            assert_eq!(source.get("source"), Some("[site]"));
            assert_eq!(source.get("destination"), Some("\"/srv/www/\""));
            Ok(())
        });
    }
}
