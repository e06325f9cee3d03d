//! The seam between this driver and the host's KNX library.

use crate::{config::ChannelConfig, Result};
use std::fmt;

/// Identifies one controllable aspect of the light. Used to key the
/// cached raw state.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    OnOff,
    Brightness,
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::OnOff => write!(f, "on_off"),
            ChannelId::Brightness => write!(f, "brightness"),
        }
    }
}

/// Maps a configured address pair onto the shared bus connection.
///
/// `bind` is called once per channel during setup and returns an
/// opaque handle the driver passes back on every operation. The
/// resolver owns all telegram encoding, transport, and serialization
/// of access to the bus; it should report bus failures as
/// `Error::TransportError`. Calls may block -- the driver never
/// retries or times out on its own.

pub trait AddressResolver {
    type Handle;

    /// Binds a command/status address pair to a bus handle.
    fn bind(&mut self, cfg: &ChannelConfig) -> Result<Self::Handle>;

    /// Writes a single-byte value to the channel's command address.
    fn write(&mut self, handle: &Self::Handle, value: u8) -> Result<()>;

    /// Reads the raw bytes last seen on the channel's status address.
    /// `Ok(None)` means no feedback has been observed yet; it is not
    /// an error.
    fn read(&mut self, handle: &Self::Handle) -> Result<Option<Vec<u8>>>;
}

/// Invoked after a successful, state-changing write when the light
/// isn't polled. The host should schedule a state refresh for the
/// entity.

pub type StateNotifier = Box<dyn FnMut() + Send>;
