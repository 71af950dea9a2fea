//! Device type definitions.
//!
//! A platform bundles prompt patterns, the privilege graph, failure
//! markers and session setup commands for one device type.

pub mod cisco_ios;
mod definition;

use std::fmt;
use std::str::FromStr;

pub use definition::{PlatformDefinition, PrivilegeLevel};

use crate::error::PlatformError;

/// User EXEC level name.
pub const EXEC: &str = "exec";
/// Privileged EXEC level name.
pub const PRIVILEGE_EXEC: &str = "privilege_exec";
/// Configuration level name.
pub const CONFIGURATION: &str = "configuration";

/// Supported device types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Platform {
    /// Cisco IOS / IOS-XE routers and Catalyst switches.
    #[default]
    CiscoIos,
}

impl Platform {
    /// Build the definition for this device type.
    pub fn definition(self) -> PlatformDefinition {
        match self {
            Platform::CiscoIos => cisco_ios::platform(),
        }
    }

    /// The device type identifier used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::CiscoIos => cisco_ios::NAME,
        }
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cisco_ios" | "cisco_iosxe" | "ios" => Ok(Platform::CiscoIos),
            _ => Err(PlatformError::UnknownPlatform {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
