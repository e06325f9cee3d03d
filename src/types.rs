//! Defines fundamental types used throughout the driver.

use crate::Result;
use serde_derive::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Enumerates the errors this driver can report. The resolver
/// supplied by the host should map its bus failures into
/// `TransportError`; the driver propagates those unchanged and never
/// retries.

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// A bad parameter was given in a configuration or a
    /// configuration was missing a required parameter. Raised during
    /// setup; the device must not be registered.
    ConfigError(String),

    /// A command or read was aimed at an optional channel that wasn't
    /// configured. The operation is aborted and no write occurs.
    ChannelUnavailable(String),

    /// The underlying bus reported a failure. The description comes
    /// from the resolver.
    TransportError(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ConfigError(v) => write!(f, "config error: {}", &v),
            Error::ChannelUnavailable(v) => {
                write!(f, "channel unavailable: {}", &v)
            }
            Error::TransportError(v) => write!(f, "transport error: {}", &v),
        }
    }
}

/// Holds a validated group address. Group addresses are opaque
/// strings at this layer -- the resolver gives them meaning -- so
/// validation only rejects strings that can't possibly name an
/// address: empty ones and ones containing whitespace.

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct GroupAddress(String);

impl GroupAddress {
    pub fn create(s: &str) -> Result<Self> {
        if s.is_empty() {
            Err(Error::ConfigError(String::from("empty group address")))
        } else if s.chars().any(|ch| ch.is_whitespace()) {
            Err(Error::ConfigError(format!(
                "group address '{}' contains whitespace",
                s
            )))
        } else {
            Ok(GroupAddress(String::from(s)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// This trait is defined so the .TOML parser builds a `GroupAddress`
// directly from the string value of an `address` field.

impl TryFrom<String> for GroupAddress {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        GroupAddress::create(&s)
    }
}

// This trait allows one to use `.parse::<GroupAddress>()`.

impl FromStr for GroupAddress {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        GroupAddress::create(s)
    }
}

impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_address() {
        assert!("".parse::<GroupAddress>().is_err());
        assert!(" ".parse::<GroupAddress>().is_err());
        assert!("1/ 0/9".parse::<GroupAddress>().is_err());
        assert!("1/0/9".parse::<GroupAddress>().is_ok());
        assert!("1.0.9".parse::<GroupAddress>().is_ok());
        assert_eq!(
            format!("{}", "1/0/9".parse::<GroupAddress>().unwrap()),
            "1/0/9"
        );
        assert_eq!("1/0/9".parse::<GroupAddress>().unwrap().as_str(), "1/0/9");
    }

    #[test]
    fn test_group_address_errors() {
        assert!(matches!(
            "".parse::<GroupAddress>(),
            Err(Error::ConfigError(_))
        ));
    }
}
