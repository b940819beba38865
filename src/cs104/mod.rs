//! IEC 60870-5-104: the TCP transport profile.
//!
//! - [`apci`] - the I/S/U control header model
//! - [`codec`] - APDU framing as a tokio-util codec
//! - [`config`] - k/w windows and the t0..t3 timers
//! - [`connection`] - the link engine with its activation state machine

pub mod apci;
pub mod codec;
pub mod config;
pub mod connection;

pub use apci::{Apci, UFunction, START_BYTE};
pub use codec::{Apdu, ApduCodec};
pub use config::{Config, PORT, PORT_SECURE};
pub use connection::{CloseReason, Connection, DtState, Event, LinkStatus, Role};
