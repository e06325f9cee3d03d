//! Controls a dimmable light over KNX group addresses.
//!
//! A light is described by two channels: a required on/off channel
//! and an optional brightness channel. Each channel pairs a command
//! group address with an optional status group address. The driver
//! translates on/off/brightness intents into single-byte group writes
//! and derives the light's reported state from the last raw bytes it
//! observed on each channel.
//!
//! Everything that touches the bus -- telegram encoding, transport,
//! connection sharing -- lives behind the [`bus::AddressResolver`]
//! trait, which the host implements using its KNX library.

mod types;

pub mod bus;
pub mod config;
pub mod device;

// Pull types up to the crate namespace.

pub use types::{Error, GroupAddress};

/// A specialization of `std::result::Result<>` where the error value
/// is `Error`.

pub type Result<T> = std::result::Result<T, Error>;
