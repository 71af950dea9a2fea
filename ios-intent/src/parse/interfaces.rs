//! `show ip interface brief` parsing.

use std::net::Ipv4Addr;

use indexmap::IndexMap;

use super::CommandParser;
use crate::error::ParseError;

const COMMAND: &str = "show ip interface brief";
const HEADER: &str = "Interface";
const FIELDS: usize = 6;

/// Replacements applied before tokenizing, longest names first.
const SUBSTITUTIONS: [(&str, &str); 4] = [
    ("administratively down", "down"),
    ("GigabitEthernet", "g"),
    ("FastEthernet", "f"),
    ("Loopback", "lo"),
];

/// Accepted spellings of the abbreviated prefixes, longest first.
const SHORT_FORMS: [(&str, &str); 8] = [
    ("GigabitEthernet", "g"),
    ("Gig", "g"),
    ("Gi", "g"),
    ("FastEthernet", "f"),
    ("Fas", "f"),
    ("Fa", "f"),
    ("Loopback", "lo"),
    ("Lo", "lo"),
];

/// Shorten an interface name the way the parsed table does.
///
/// `GigabitEthernet0/1`, `Gig0/1` and `Gi 0/1` all become `g0/1`. A prefix
/// only counts when a port number follows it, so names such as `Vlan99`
/// are returned unchanged.
pub fn abbreviate_interface(name: &str) -> String {
    let name = name.trim();
    for (long, short) in SHORT_FORMS {
        let Some(prefix) = name.get(..long.len()) else {
            continue;
        };
        let port = name[long.len()..].trim_start();
        if prefix.eq_ignore_ascii_case(long) && port.starts_with(|c: char| c.is_ascii_digit()) {
            return format!("{short}{port}");
        }
    }
    name.to_string()
}

/// One row of the interface table, without the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceStatus {
    /// `None` when the device reports `unassigned`.
    pub ip: Option<Ipv4Addr>,
    pub ok: String,
    pub method: String,
    pub status: String,
    pub protocol: String,
}

/// Interface name to status, in device order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceTable {
    entries: IndexMap<String, InterfaceStatus>,
}

impl InterfaceTable {
    /// Look an interface up by full or abbreviated name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&InterfaceStatus> {
        let wanted = abbreviate_interface(name);
        self.entries.get(&wanted).or_else(|| {
            self.entries
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(&wanted))
                .map(|(_, status)| status)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InterfaceStatus)> {
        self.entries.iter().map(|(name, status)| (name.as_str(), status))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parser for `show ip interface brief`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceBriefParser;

impl CommandParser for InterfaceBriefParser {
    type Output = InterfaceTable;

    fn command(&self) -> &'static str {
        COMMAND
    }

    fn parse(&self, output: &str) -> Result<InterfaceTable, ParseError> {
        let text = SUBSTITUTIONS
            .iter()
            .fold(output.to_string(), |text, (long, short)| text.replace(long, short));

        let mut lines = text.lines().enumerate();
        lines
            .by_ref()
            .find(|(_, line)| {
                let mut tokens = line.split_whitespace();
                tokens.next() == Some(HEADER) && tokens.next() == Some("IP-Address")
            })
            .ok_or(ParseError::MissingHeader {
                command: COMMAND,
                header: HEADER,
            })?;

        let mut table = InterfaceTable::default();
        for (index, line) in lines {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            let line_no = index + 1;
            let [name, ip, ok, method, status, protocol] = tokens[..] else {
                return Err(ParseError::MalformedRow {
                    command: COMMAND,
                    line_no,
                    expected: FIELDS,
                    found: tokens.len(),
                    line: line.trim().to_string(),
                });
            };

            let ip = match ip {
                "unassigned" => None,
                value => Some(value.parse().map_err(|_| ParseError::InvalidAddress {
                    command: COMMAND,
                    line_no,
                    value: value.to_string(),
                })?),
            };

            table.entries.insert(
                name.to_string(),
                InterfaceStatus {
                    ip,
                    ok: ok.to_string(),
                    method: method.to_string(),
                    status: status.to_string(),
                    protocol: protocol.to_string(),
                },
            );
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTER: &str = "\
Interface                  IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0         198.51.100.11   YES NVRAM  up                    up
GigabitEthernet0/1         10.0.12.1       YES manual up                    up
GigabitEthernet0/2         unassigned      YES unset  administratively down down
FastEthernet1/0            unassigned      YES unset  down                  down
Loopback0                  1.1.1.1         YES manual up                    up
";

    #[test]
    fn test_parse_rows_after_substitution() {
        let table = InterfaceBriefParser.parse(ROUTER).unwrap();
        assert_eq!(table.len(), 5);

        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["g0/0", "g0/1", "g0/2", "f1/0", "lo0"]);

        let g01 = table.get("g0/1").unwrap();
        assert_eq!(
            g01,
            &InterfaceStatus {
                ip: Some(Ipv4Addr::new(10, 0, 12, 1)),
                ok: "YES".to_string(),
                method: "manual".to_string(),
                status: "up".to_string(),
                protocol: "up".to_string(),
            }
        );

        let g02 = table.get("g0/2").unwrap();
        assert_eq!(g02.ip, None);
        assert_eq!(g02.status, "down");
    }

    #[test]
    fn test_lookup_accepts_long_names() {
        let table = InterfaceBriefParser.parse(ROUTER).unwrap();
        assert!(table.get("GigabitEthernet0/0").is_some());
        assert!(table.get("loopback0").is_some());
        assert!(table.get("G0/1").is_some());
        assert!(table.get("g0/9").is_none());
    }

    #[test]
    fn test_switch_svi_and_echo_before_header() {
        let output = "\
show ip interface brief
Interface              IP-Address      OK? Method Status                Protocol
Vlan1                  unassigned      YES NVRAM  administratively down down
Vlan99                 198.51.100.21   YES NVRAM  up                    up
";
        let table = InterfaceBriefParser.parse(output).unwrap();
        assert_eq!(
            table.get("vlan99").unwrap().ip,
            Some(Ipv4Addr::new(198, 51, 100, 21))
        );
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            InterfaceBriefParser.parse("").unwrap_err(),
            ParseError::MissingHeader {
                command: COMMAND,
                header: HEADER
            }
        );
    }

    #[test]
    fn test_malformed_row() {
        let output = "\
Interface              IP-Address      OK? Method Status                Protocol
Vlan99                 198.51.100.21   YES NVRAM  up
";
        match InterfaceBriefParser.parse(output).unwrap_err() {
            ParseError::MalformedRow {
                line_no, found, ..
            } => {
                assert_eq!(line_no, 2);
                assert_eq!(found, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_address() {
        let output = "\
Interface              IP-Address      OK? Method Status                Protocol
Vlan99                 198.51.100.300  YES NVRAM  up                    up
";
        assert!(matches!(
            InterfaceBriefParser.parse(output).unwrap_err(),
            ParseError::InvalidAddress { .. }
        ));
    }

    #[test]
    fn test_abbreviate_interface() {
        assert_eq!(abbreviate_interface("GigabitEthernet0/0"), "g0/0");
        assert_eq!(abbreviate_interface("fastethernet1/0"), "f1/0");
        assert_eq!(abbreviate_interface("Loopback0"), "lo0");
        assert_eq!(abbreviate_interface("Vlan99"), "Vlan99");
        assert_eq!(abbreviate_interface("g0/0"), "g0/0");
    }

    #[test]
    fn test_abbreviate_short_forms() {
        assert_eq!(abbreviate_interface("Gi0/1"), "g0/1");
        assert_eq!(abbreviate_interface("Gig0/1"), "g0/1");
        assert_eq!(abbreviate_interface("Gig 0/1"), "g0/1");
        assert_eq!(abbreviate_interface("Fa0/3"), "f0/3");
        assert_eq!(abbreviate_interface("Fas 0/3"), "f0/3");
        assert_eq!(abbreviate_interface("Lo0"), "lo0");
        // Not a port number after the prefix
        assert_eq!(abbreviate_interface("Gigantic0"), "Gigantic0");
        assert_eq!(abbreviate_interface("Local1"), "Local1");

        let table = InterfaceBriefParser.parse(ROUTER).unwrap();
        assert_eq!(
            table.get("Gi0/1").unwrap().ip,
            Some(Ipv4Addr::new(10, 0, 12, 1))
        );
        assert!(table.get("Fa1/0").is_some());
        assert!(table.get("Lo0").is_some());
    }
}
