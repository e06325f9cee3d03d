//! The light itself.

use crate::{
    bus::{AddressResolver, ChannelId, StateNotifier},
    config::{ChannelConfig, DriverConfig, Params},
    Error, Result,
};
use std::collections::HashMap;
use tracing::{debug, error};

/// Capability flags reported to the host. The only optional
/// capability a dimmable light has is brightness control.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features(u32);

impl Features {
    pub const NONE: Features = Features(0);
    pub const BRIGHTNESS: Features = Features(1 << 0);

    pub fn contains(self, other: Features) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Features {
    type Output = Features;

    fn bitor(self, rhs: Features) -> Features {
        Features(self.0 | rhs.0)
    }
}

/// Options accepted by `turn_on` and `turn_off`. A `brightness`
/// level, if given, is sent to the brightness channel instead of
/// switching the on/off channel.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub brightness: Option<u8>,
}

// A channel bound to the bus. `has_status` remembers whether the
// configuration carried a status address; it decides whether the
// channel participates in polling.

struct Channel<H> {
    handle: H,
    has_status: bool,
}

impl<H> Channel<H> {
    fn bind<R>(resolver: &mut R, cfg: &ChannelConfig) -> Result<Self>
    where
        R: AddressResolver<Handle = H>,
    {
        Ok(Channel {
            handle: resolver.bind(cfg)?,
            has_status: cfg.state_address.is_some(),
        })
    }
}

/// One dimmable light. Translates on/off/brightness intents into
/// group writes through the resolver and derives its reported state
/// from the last raw bytes observed on each channel -- status
/// feedback when a channel has a status address, the last written
/// value otherwise.

pub struct LightActuator<R: AddressResolver> {
    name: String,
    resolver: R,
    on_off: Channel<R::Handle>,
    brightness: Option<Channel<R::Handle>>,
    raw_state: HashMap<ChannelId, Vec<u8>>,
    notify: StateNotifier,
}

impl<R: AddressResolver> LightActuator<R> {
    pub const NAME: &'static str = "knx-light";

    pub const SUMMARY: &'static str =
        "controls a dimmable light over KNX group addresses";

    pub const DESCRIPTION: &'static str = include_str!("../README.md");

    /// Creates the light from a validated configuration. Binds the
    /// on/off channel and, when configured, the brightness channel
    /// through the resolver. No bus traffic is generated.
    pub fn create(
        cfg: &Params,
        mut resolver: R,
        notify: StateNotifier,
    ) -> Result<Self> {
        let on_off = Channel::bind(&mut resolver, &cfg.on_off)?;
        let brightness = match &cfg.brightness {
            Some(ch) => Some(Channel::bind(&mut resolver, ch)?),
            None => None,
        };

        Ok(LightActuator {
            name: cfg.name.clone(),
            resolver,
            on_off,
            brightness,
            raw_state: HashMap::new(),
            notify,
        })
    }

    /// Creates the light straight from the host's config table.
    pub fn from_config(
        cfg: &DriverConfig,
        resolver: R,
        notify: StateNotifier,
    ) -> Result<Self> {
        Self::create(&cfg.parse_into::<Params>()?, resolver, notify)
    }

    /// The display name of the light.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the host should poll this light for its state. True
    /// iff some channel has a status address; without one, the driver
    /// pushes a refresh request after every successful write instead.
    pub fn should_poll(&self) -> bool {
        self.on_off.has_status
            || self.brightness.as_ref().is_some_and(|ch| ch.has_status)
    }

    /// Capability flags for this light. Fixed at construction:
    /// `BRIGHTNESS` is present iff a brightness channel was
    /// configured.
    pub fn supported_features(&self) -> Features {
        if self.brightness.is_some() {
            Features::NONE | Features::BRIGHTNESS
        } else {
            Features::NONE
        }
    }

    // Writes one byte to the channel's command address. Only a
    // successful write updates the cached raw state and, when the
    // light isn't polled, asks the host for a state refresh. A failed
    // write leaves the prior state untouched.

    fn write_channel(&mut self, id: ChannelId, value: u8) -> Result<()> {
        let result = match id {
            ChannelId::OnOff => {
                self.resolver.write(&self.on_off.handle, value)
            }
            ChannelId::Brightness => match &self.brightness {
                Some(ch) => self.resolver.write(&ch.handle, value),
                None => {
                    return Err(Error::ChannelUnavailable(format!(
                        "no {} channel configured",
                        id
                    )))
                }
            },
        };

        if let Err(e) = result {
            error!("writing {} channel : {}", id, &e);
            return Err(e);
        }

        self.raw_state.insert(id, vec![value]);

        if !self.should_poll() {
            (self.notify)()
        }
        Ok(())
    }

    /// Turns the light on.
    ///
    /// With a brightness level in the command, the level is written
    /// to the brightness channel and the on/off address is left
    /// alone. Without one, 1 is written to the on/off channel.
    pub fn turn_on(&mut self, cmd: Command) -> Result<()> {
        if let Some(level) = cmd.brightness {
            debug!("setting brightness to {}", level);
            self.write_channel(ChannelId::Brightness, level)
        } else {
            debug!("turning on");
            self.write_channel(ChannelId::OnOff, 1)
        }
    }

    /// Turns the light off by writing 0 to the on/off channel. Any
    /// brightness level in the command is ignored.
    pub fn turn_off(&mut self, _cmd: Command) -> Result<()> {
        debug!("turning off");
        self.write_channel(ChannelId::OnOff, 0)
    }

    /// Whether the light reports on. Off is exactly the single raw
    /// byte 0; every other raw state -- a never-observed one included
    /// -- reports on. Exact equality, not a truthiness test: changing
    /// it would alter the reported status on cold start.
    pub fn is_on(&self) -> bool {
        self.raw_state.get(&ChannelId::OnOff).map(Vec::as_slice)
            != Some([0u8].as_slice())
    }

    /// The brightness of the light, 0 to 255. Big-endian decode of
    /// the cached raw bytes; the default raw value is a single zero
    /// byte. Oversized feedback saturates at 255.
    pub fn brightness(&self) -> u8 {
        const DEFAULT_BRIGHTNESS: &[u8] = &[0];

        self.raw_state
            .get(&ChannelId::Brightness)
            .map(Vec::as_slice)
            .unwrap_or(DEFAULT_BRIGHTNESS)
            .iter()
            .fold(0u64, |acc, &b| {
                acc.saturating_mul(256) | u64::from(b)
            })
            .min(255) as u8
    }

    /// Refreshes the cached raw state from the status addresses. The
    /// host calls this on its polling schedule when `should_poll` is
    /// true. Channels without a status address keep their last
    /// written value; a channel whose resolver has no feedback yet is
    /// left untouched.
    pub fn update(&mut self) -> Result<()> {
        if self.on_off.has_status {
            if let Some(raw) = self.resolver.read(&self.on_off.handle)? {
                debug!("on_off feedback : {:?}", &raw);
                self.raw_state.insert(ChannelId::OnOff, raw);
            }
        }

        if let Some(ch) = &self.brightness {
            if ch.has_status {
                if let Some(raw) = self.resolver.read(&ch.handle)? {
                    debug!("brightness feedback : {:?}", &raw);
                    self.raw_state.insert(ChannelId::Brightness, raw);
                }
            }
        }
        Ok(())
    }
}
