//! `show cdp neighbors` parsing.

use super::CommandParser;
use crate::error::ParseError;

const COMMAND: &str = "show cdp neighbors";
const HEADER: &str = "Device ID";
const TRAILER: &str = "Total cdp entries";
const MIN_FIELDS: usize = 6;

/// Domain suffix of the lab devices.
pub const DEFAULT_DOMAIN_SUFFIX: &str = ".npa.com";

/// A directly connected device seen over CDP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdpNeighbor {
    /// Local port, e.g. `Gig0/1`.
    pub local_interface: String,
    /// Port on the neighbor, e.g. `Gig 0/0`.
    pub remote_port: String,
    /// Neighbor hostname without its domain.
    pub remote_device: String,
}

impl CdpNeighbor {
    /// Interface description naming the far end.
    pub fn description(&self) -> String {
        format!("connect to {} of {}", self.remote_port, self.remote_device)
    }
}

/// Parser for `show cdp neighbors`.
///
/// Only rows whose device ID contains `domain_suffix` are kept, which
/// leaves out phones and other devices outside the managed domain.
#[derive(Debug, Clone)]
pub struct CdpNeighborParser {
    domain_suffix: String,
}

impl CdpNeighborParser {
    pub fn new(domain_suffix: impl Into<String>) -> Self {
        Self {
            domain_suffix: domain_suffix.into(),
        }
    }
}

impl Default for CdpNeighborParser {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN_SUFFIX)
    }
}

impl CommandParser for CdpNeighborParser {
    type Output = Vec<CdpNeighbor>;

    fn command(&self) -> &'static str {
        COMMAND
    }

    fn parse(&self, output: &str) -> Result<Vec<CdpNeighbor>, ParseError> {
        let mut lines = output.lines().enumerate();
        lines
            .by_ref()
            .find(|(_, line)| line.trim_start().starts_with(HEADER))
            .ok_or(ParseError::MissingHeader {
                command: COMMAND,
                header: HEADER,
            })?;

        let mut neighbors = Vec::new();
        let mut pending: Option<(usize, String)> = None;

        for (index, line) in lines {
            if line.trim_start().starts_with(TRAILER) {
                break;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            // Long device IDs sit alone on a line; the rest of the row follows
            let (line_no, row) = match pending.take() {
                Some((first_no, device_id)) => (first_no, format!("{device_id} {}", line.trim())),
                None if tokens.len() == 1 => {
                    pending = Some((index + 1, tokens[0].to_string()));
                    continue;
                }
                None => (index + 1, line.to_string()),
            };
            let tokens: Vec<&str> = row.split_whitespace().collect();

            if !tokens[0].contains(self.domain_suffix.as_str()) {
                continue;
            }
            if tokens.len() < MIN_FIELDS {
                return Err(ParseError::MalformedRow {
                    command: COMMAND,
                    line_no,
                    expected: MIN_FIELDS,
                    found: tokens.len(),
                    line: tokens.join(" "),
                });
            }

            let n = tokens.len();
            neighbors.push(CdpNeighbor {
                local_interface: format!("{}{}", tokens[1], tokens[2]),
                remote_port: format!("{} {}", tokens[n - 2], tokens[n - 1]),
                remote_device: tokens[0].split('.').next().unwrap_or(tokens[0]).to_string(),
            });
        }

        // A managed device ID with no row after it
        if let Some((line_no, device_id)) = pending {
            if device_id.contains(self.domain_suffix.as_str()) {
                return Err(ParseError::MalformedRow {
                    command: COMMAND,
                    line_no,
                    expected: MIN_FIELDS,
                    found: 1,
                    line: device_id,
                });
            }
        }

        Ok(neighbors)
    }
}
