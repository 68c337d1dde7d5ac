//! Configuration helper - SSH port number
// (c) 2026 The sftp-put authors

use serde::{
    de::{self, Error as _, Unexpected, Visitor},
    Deserialize, Serialize,
};
use std::{fmt::Display, str::FromStr};

/// The TCP port of the remote SSH service.
///
/// The environment supplies this as a string (`PORT=2222`), the command line and the
/// built-in defaults as an integer; both are accepted when deserializing.
/// Port 0 is not a usable destination and is rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u16")]
pub struct Port(u16);

impl Port {
    /// The standard SSH port
    pub const SSH: Port = Port(22);

    /// Returns the port number
    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for Port {
    fn default() -> Self {
        Self::SSH
    }
}

impl Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Port> for u16 {
    fn from(value: Port) -> Self {
        value.0
    }
}

static EXPECTED: &str = "a port number [1..65535]";

impl TryFrom<u64> for Port {
    type Error = figment::Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match u16::try_from(value) {
            Ok(0) | Err(_) => Err(figment::Error::invalid_value(
                Unexpected::Unsigned(value),
                &EXPECTED,
            )),
            Ok(n) => Ok(Self(n)),
        }
    }
}

impl FromStr for Port {
    type Err = figment::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(n) => Self::try_from(n),
            Err(_) => Err(figment::Error::invalid_value(Unexpected::Str(s), &EXPECTED)),
        }
    }
}

/// Forwards strings to `FromStr` and integers to `TryFrom<u64>`
struct PortVisitor;

impl Visitor<'_> for PortVisitor {
    type Value = Port;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a port number as an integer or string")
    }

    fn visit_str<E>(self, value: &str) -> Result<Port, E>
    where
        E: de::Error,
    {
        Port::from_str(value).map_err(E::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Port, E>
    where
        E: de::Error,
    {
        Port::try_from(value).map_err(E::custom)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Port, E>
    where
        E: de::Error,
    {
        let u = u64::try_from(value)
            .map_err(|_| E::invalid_value(Unexpected::Signed(value), &EXPECTED))?;
        Port::try_from(u).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(PortVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::Port;
    use figment::{providers::Serialized, Figment};
    use std::str::FromStr;

    #[test]
    fn default_is_ssh() {
        assert_eq!(Port::default().get(), 22);
    }

    #[test]
    fn parse_strings() {
        assert_eq!(Port::from_str("2222").unwrap().get(), 2222);
        assert_eq!(Port::from_str(" 22 ").unwrap().get(), 22);
        for bad in ["", "0", "65536", "-1", "ssh", "22x"] {
            assert!(Port::from_str(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn error_message() {
        let err = Port::from_str("70000").unwrap_err();
        assert!(err.to_string().contains("a port number"), "{err}");
    }

    #[test]
    fn int_or_string() {
        let f = Figment::new()
            .merge(Serialized::default("a", "2200"))
            .merge(Serialized::default("b", 2201))
            .merge(Serialized::default("c", "nope"))
            .merge(Serialized::default("d", 0));
        assert_eq!(f.extract_inner::<Port>("a").unwrap().get(), 2200);
        assert_eq!(f.extract_inner::<Port>("b").unwrap().get(), 2201);
        assert!(f.extract_inner::<Port>("c").is_err());
        assert!(f.extract_inner::<Port>("d").is_err());
    }

    #[test]
    fn serializes_as_integer() {
        let f = Figment::new().merge(Serialized::default("p", Port::SSH));
        assert_eq!(f.extract_inner::<u16>("p").unwrap(), 22);
    }
}
