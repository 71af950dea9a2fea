//! # ios-intent
//!
//! Intent-driven configuration of Cisco IOS routers and switches over SSH.
//!
//! Devices, addresses and access lists are declared in YAML files; the
//! operations in [`ops`] log in to each device in turn, read its state
//! through `show` commands and push only what differs from the intent.
//!
//! ## Layers
//!
//! - [`transport`]: SSH connection and PTY shell via russh
//! - [`channel`]: tail-search prompt matching over an ANSI-stripped buffer
//! - [`platform`]: prompt patterns and the privilege graph of a device type
//! - [`driver`]: commands, privilege navigation and configuration pushes
//! - [`intent`]: typed YAML intent documents and their validation
//! - [`parse`]: records from `show ip interface brief` and `show cdp neighbors`
//! - [`ops`]: the automation procedures and their per-device outcomes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ios_intent::{Driver, DriverBuilder};
//! use ios_intent::parse::{CommandParser, InterfaceBriefParser};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ios_intent::Error> {
//!     let mut driver = DriverBuilder::new("192.168.99.1")
//!         .username("admin")
//!         .password("cisco")
//!         .build()?;
//!
//!     driver.open().await?;
//!
//!     let parser = InterfaceBriefParser;
//!     let response = driver.send_command(parser.command()).await?;
//!     for (name, status) in parser.parse(&response.result)?.iter() {
//!         println!("{name}: {status:?}");
//!     }
//!
//!     driver.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod intent;
pub mod ops;
pub mod parse;
pub mod platform;
pub mod progress;
pub mod transport;

// Re-export main types for convenience
pub use config::Settings;
pub use driver::{Driver, DriverBuilder, GenericDriver, Response};
pub use error::{Error, Result};
pub use platform::{Platform, PlatformDefinition};
