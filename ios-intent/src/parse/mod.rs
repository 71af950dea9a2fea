//! Structured records from IOS `show` command output.
//!
//! Parsers only see text, so they are tested without a device.

mod cdp;
mod interfaces;

pub use cdp::{CdpNeighbor, CdpNeighborParser, DEFAULT_DOMAIN_SUFFIX};
pub use interfaces::{InterfaceBriefParser, InterfaceStatus, InterfaceTable, abbreviate_interface};

use crate::error::ParseError;

/// A parser bound to the command whose output it reads.
pub trait CommandParser {
    type Output;

    /// The command to run on the device.
    fn command(&self) -> &'static str;

    /// Turn the command output into records.
    fn parse(&self, output: &str) -> Result<Self::Output, ParseError>;
}
