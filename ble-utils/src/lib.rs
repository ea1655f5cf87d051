//! Typed building blocks for BLE GATT services.
//!
//! Instead of filling in attribute tables by hand, applications declare their services and
//! characteristics as Rust values and let this crate compose the table the host stack expects:
//!
//! * [`gatt`] contains characteristics, services and the entry points the host calls on peer
//!   access.
//! * [`host`] defines the small interface this crate needs from the underlying BLE host stack.
//! * [`uuid`] provides UUID types and derives characteristic UUIDs from a service base UUID.
//! * [`adv`] builds the scan response announcing the services.
//!
//! The crate does not implement a BLE stack itself. Connections, the ATT server and the delivery
//! of notifications and indications are up to the host.
//!
//! [`gatt`]: gatt/index.html
//! [`host`]: host/index.html
//! [`uuid`]: uuid/index.html
//! [`adv`]: adv/index.html

// We're `#[no_std]`, except when we're testing
#![cfg_attr(not(test), no_std)]
// Deny a few warnings in doctests, since rustdoc `allow`s many warnings by default
#![doc(test(attr(deny(unused_imports, unused_must_use))))]
#![warn(rust_2018_idioms)]
#![allow(clippy::trivially_copy_pass_by_ref)]

#[macro_use]
mod log;
#[macro_use]
mod utils;
pub mod adv;
pub mod att;
pub mod bytes;
pub mod config;
mod error;
pub mod gatt;
pub mod host;
pub mod uuid;

pub use self::error::Error;
