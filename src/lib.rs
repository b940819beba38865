//! # iec60870
//!
//! IEC 60870-5 telecontrol protocol stack for Rust: the -101 application
//! layer (ASDU codec) and the -104 TCP transport (APCI framing plus the
//! sliding-window link engine), as used in electric-power SCADA systems.
//!
//! ## Layers
//!
//! - [`asdu`] - typed message builders and parsers over the ASDU
//!   container, covering monitoring, control, system and parameter
//!   directions with their bit-level element codecs and CP16/24/56 time
//!   tags.
//! - [`cs104`] - the TCP profile: I/S/U frame codec, k/w send windows,
//!   the t0..t3 timers and the STARTDT/STOPDT/TESTFR state machine.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use iec60870::asdu::{system, Cause, CauseOfTransmission, Params, QualifierOfInterrogation};
//! use iec60870::cs104::{Config, Connection, Event};
//!
//! #[tokio::main]
//! async fn main() -> iec60870::Result<()> {
//!     let mut conn =
//!         Connection::connect("192.168.1.100:2404", Config::default(), Params::wide()).await?;
//!     let mut events = conn.subscribe().expect("first subscriber");
//!
//!     while let Some(event) = events.recv().await {
//!         match event {
//!             Event::DataTransferStarted => {
//!                 // general interrogation of station 1
//!                 system::interrogation_cmd(
//!                     &conn,
//!                     CauseOfTransmission::new(Cause::ACTIVATION),
//!                     1,
//!                     QualifierOfInterrogation::STATION,
//!                 )?;
//!             }
//!             Event::Asdu { asdu, .. } => println!("{asdu}"),
//!             Event::Closed(reason) => {
//!                 eprintln!("connection closed: {reason:?}");
//!                 break;
//!             }
//!             _ => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Wire format
//!
//! Every APDU is `0x68, length, CF1..CF4` followed by an ASDU of at most
//! 249 octets. Sequence numbers are 15 bits; all multi-octet fields are
//! little-endian. See the module docs for the exact layouts.

pub mod asdu;
pub mod cs104;
pub mod error;

pub use error::{Error, Result};
