//! Access list definitions and their bindings to devices.

use std::fmt;
use std::net::Ipv4Addr;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use super::device::null_as_empty;

/// Named access list flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclType {
    Standard,
    Extended,
}

impl fmt::Display for AclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AclType::Standard => "standard",
            AclType::Extended => "extended",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Permit,
    Deny,
    Remark,
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleAction::Permit => "permit",
            RuleAction::Deny => "deny",
            RuleAction::Remark => "remark",
        })
    }
}

/// One access list entry: `<cmd> <src> [<wcd>]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AclRule {
    pub cmd: RuleAction,
    pub src: String,
    #[serde(default)]
    pub wcd: Option<String>,
}

impl AclRule {
    /// The configuration line for this entry.
    pub fn to_command(&self) -> String {
        match &self.wcd {
            Some(wcd) => format!("{} {} {}", self.cmd, self.src, wcd),
            None => format!("{} {}", self.cmd, self.src),
        }
    }
}

/// A named access list with its entries in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclDefinition {
    pub name: String,
    pub acl_type: AclType,
    pub rules: Vec<AclRule>,
}

#[derive(Deserialize)]
struct AclBody {
    #[serde(rename = "type")]
    acl_type: AclType,
    #[serde(default, deserialize_with = "null_as_empty")]
    list: Vec<AclRule>,
}

#[derive(Deserialize)]
struct NamedAcl {
    name: String,
    #[serde(flatten)]
    body: AclBody,
}

/// All known access lists, keyed by name in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclCatalog {
    definitions: IndexMap<String, AclDefinition>,
}

impl AclCatalog {
    /// Build the catalog from a YAML document.
    ///
    /// Accepts a mapping of name to `{type, list}` or a sequence of
    /// `{name, type, list}`. Duplicate names are an error.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let mut catalog = Self::default();
        match value {
            Value::Mapping(mapping) => {
                for (key, body) in mapping {
                    let name = match key {
                        Value::String(name) => name,
                        Value::Number(number) => number.to_string(),
                        other => return Err(format!("invalid access list name {other:?}")),
                    };
                    let body: AclBody = serde_yaml::from_value(body)
                        .map_err(|e| format!("access list '{name}': {e}"))?;
                    catalog.insert(name, body)?;
                }
            }
            Value::Sequence(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    let named: NamedAcl = serde_yaml::from_value(item)
                        .map_err(|e| format!("access list #{}: {e}", index + 1))?;
                    catalog.insert(named.name, named.body)?;
                }
            }
            Value::Null => {}
            _ => return Err("expected a mapping or a sequence of access lists".to_string()),
        }
        Ok(catalog)
    }

    fn insert(&mut self, name: String, body: AclBody) -> Result<(), String> {
        if self.definitions.contains_key(&name) {
            return Err(format!("access list '{name}' is defined twice"));
        }
        let definition = AclDefinition {
            name: name.clone(),
            acl_type: body.acl_type,
            rules: body.list,
        };
        self.definitions.insert(name, definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AclDefinition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AclDefinition> {
        self.definitions.values()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::In => "in",
            Direction::Out => "out",
        })
    }
}

/// Where an access list is applied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AclTarget {
    /// Interface name, or `vty` for the management lines.
    pub name: String,
    pub direction: Direction,
}

impl AclTarget {
    pub fn is_vty(&self) -> bool {
        self.name.eq_ignore_ascii_case("vty")
    }
}

/// An access list attached to a device, with its targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AclBinding {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interfaces: Vec<AclTarget>,
}

/// The access lists one device should carry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceAcls {
    pub name: String,
    pub management_ip: Ipv4Addr,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub acl: Vec<AclBinding>,
}
