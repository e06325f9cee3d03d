//! Configuration for the driver.

use crate::{Error, GroupAddress, Result};
use serde::de::DeserializeOwned;
use std::ops::Deref;
use toml::value::{Table, Value};

/// The display name used when the configuration doesn't provide one.
pub const DEFAULT_NAME: &str = "KNX Light";

/// Represents how configuration information is given to the driver.
/// A `DriverConfig` type is a map with `String` keys and
/// `toml::Value` values, as handed over by the host's config file.

#[derive(Clone, Debug, Default)]
pub struct DriverConfig(Table);

impl DriverConfig {
    /// Return a reference to the underlying toml::Value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn parse_into<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        Value::Table(self.0.clone()).try_into().map_err(|e| {
            Error::ConfigError(format!("config parse error: {}", e))
        })
    }
}

impl From<Table> for DriverConfig {
    fn from(t: Table) -> Self {
        DriverConfig(t)
    }
}

impl From<DriverConfig> for Table {
    fn from(dc: DriverConfig) -> Self {
        dc.0
    }
}

impl Deref for DriverConfig {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.0
    }
}

/// Describes one channel of the light: the group address that
/// receives commands and, optionally, the group address that reports
/// the actuator's state.

#[derive(Clone, Debug, PartialEq, Eq, serde_derive::Deserialize)]
pub struct ChannelConfig {
    pub address: GroupAddress,
    pub state_address: Option<GroupAddress>,
}

fn default_name() -> String {
    String::from(DEFAULT_NAME)
}

/// The validated platform configuration. `on_off` is mandatory; a
/// light without a brightness channel is a plain switch.

#[derive(Debug, serde_derive::Deserialize)]
pub struct Params {
    pub on_off: ChannelConfig,
    pub brightness: Option<ChannelConfig>,
    #[serde(default = "default_name")]
    pub name: String,
}

impl TryFrom<DriverConfig> for Params {
    type Error = Error;

    fn try_from(cfg: DriverConfig) -> std::result::Result<Self, Self::Error> {
        cfg.parse_into()
    }
}

#[cfg(test)]
mod tests {
    use super::{Params, DEFAULT_NAME};
    use crate::{config::DriverConfig, Error, Result};

    // Helper function to build a config from a string view.

    fn mk_cfg(text: &str) -> Result<Params> {
        Into::<DriverConfig>::into(
            toml::from_str::<toml::value::Table>(text)
                .map_err(|e| Error::ConfigError(format!("{}", e)))?,
        )
        .parse_into()
    }

    #[test]
    fn test_config() {
        // The on/off channel and its command address are mandatory.

        assert!(mk_cfg("").is_err());
        assert!(mk_cfg("on_off = 5").is_err());
        assert!(mk_cfg("[on_off]\nstate_address = \"1/4/9\"").is_err());
        assert!(mk_cfg("[on_off]\naddress = \"\"").is_err());
        assert!(mk_cfg("[on_off]\naddress = 9").is_err());

        assert!(matches!(
            mk_cfg("[on_off]\nstate_address = \"1/4/9\""),
            Err(Error::ConfigError(_))
        ));

        let cfg = mk_cfg("[on_off]\naddress = \"1/0/9\"").unwrap();

        assert_eq!(cfg.on_off.address.as_str(), "1/0/9");
        assert_eq!(cfg.on_off.state_address, None);
        assert!(cfg.brightness.is_none());
        assert_eq!(cfg.name, DEFAULT_NAME);
    }

    #[test]
    fn test_full_config() {
        let cfg = mk_cfg(
            "name = \"Kitchen\"\n\
	     [on_off]\n\
	     address = \"1/0/9\"\n\
	     state_address = \"1/4/9\"\n\
	     [brightness]\n\
	     address = \"1/0/11\"\n\
	     state_address = \"1/4/11\"",
        )
        .unwrap();

        assert_eq!(cfg.name, "Kitchen");
        assert_eq!(
            cfg.on_off.state_address.as_ref().map(|v| v.as_str()),
            Some("1/4/9")
        );

        let br = cfg.brightness.unwrap();

        assert_eq!(br.address.as_str(), "1/0/11");
        assert_eq!(
            br.state_address.as_ref().map(|v| v.as_str()),
            Some("1/4/11")
        );
    }

    #[test]
    fn test_bad_brightness_config() {
        // A brightness table, if present, needs a command address.

        assert!(mk_cfg(
            "[on_off]\n\
	     address = \"1/0/9\"\n\
	     [brightness]\n\
	     state_address = \"1/4/11\""
        )
        .is_err());
    }
}
