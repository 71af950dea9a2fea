//! Device and interface intent records.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Deserializer};

/// A dotted-quad subnet mask whose one bits are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Ipv4Addr")]
pub struct SubnetMask(Ipv4Addr);

impl TryFrom<Ipv4Addr> for SubnetMask {
    type Error = String;

    fn try_from(addr: Ipv4Addr) -> Result<Self, Self::Error> {
        let bits = u32::from(addr);
        if bits.leading_ones() + bits.trailing_zeros() == 32 {
            Ok(Self(addr))
        } else {
            Err(format!("'{addr}' is not a contiguous subnet mask"))
        }
    }
}

impl fmt::Display for SubnetMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Desired address of one interface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterfaceIntent {
    pub name: String,
    pub ip: Ipv4Addr,
    pub subnet: SubnetMask,
}

/// One device and the addresses its interfaces should carry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceIntent {
    pub name: String,
    pub management_ip: Ipv4Addr,

    /// Interface that carries `management_ip`; inferred from the name when absent.
    #[serde(default)]
    pub management_interface: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub interfaces: Vec<InterfaceIntent>,
}

impl DeviceIntent {
    /// The management interface, explicit or by naming convention:
    /// routers (`R*`) use `g0/0`, switches (`S*`) use `Vlan99`.
    pub fn management_interface(&self) -> Option<&str> {
        if let Some(explicit) = &self.management_interface {
            return Some(explicit);
        }
        match self.name.chars().next() {
            Some('R' | 'r') => Some("g0/0"),
            Some('S' | 's') => Some("Vlan99"),
            _ => None,
        }
    }
}

/// A device reached only for its management address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManagedDevice {
    pub name: String,
    pub management_ip: Ipv4Addr,
}

pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subnet_mask_contiguity() {
        let mask = SubnetMask::try_from(Ipv4Addr::new(255, 255, 255, 0)).unwrap();
        assert_eq!(mask.to_string(), "255.255.255.0");

        assert!(SubnetMask::try_from(Ipv4Addr::new(255, 255, 255, 255)).is_ok());
        assert!(SubnetMask::try_from(Ipv4Addr::UNSPECIFIED).is_ok());
        assert!(SubnetMask::try_from(Ipv4Addr::new(255, 0, 255, 0)).is_err());
        assert!(SubnetMask::try_from(Ipv4Addr::new(0, 0, 0, 255)).is_err());
    }

    #[test]
    fn test_device_from_yaml() {
        let yaml = r#"
- name: R1
  management_ip: 198.51.100.11
  interfaces:
    - name: g0/1
      ip: 10.0.12.1
      subnet: 255.255.255.252
- name: S1
  management_ip: 198.51.100.21
  interfaces:
"#;
        let devices: Vec<DeviceIntent> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].interfaces[0].subnet.to_string(), "255.255.255.252");
        assert!(devices[1].interfaces.is_empty());
        assert_eq!(devices[0].management_interface(), Some("g0/0"));
        assert_eq!(devices[1].management_interface(), Some("Vlan99"));
    }

    #[test]
    fn test_explicit_management_interface_wins() {
        let device = DeviceIntent {
            name: "core".to_string(),
            management_ip: Ipv4Addr::new(10, 0, 0, 1),
            management_interface: Some("lo0".to_string()),
            interfaces: Vec::new(),
        };
        assert_eq!(device.management_interface(), Some("lo0"));

        let unnamed = DeviceIntent {
            management_interface: None,
            ..device
        };
        assert_eq!(unnamed.management_interface(), None);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let bad_ip = "name: R1\nmanagement_ip: 10.0.0.300\n";
        assert!(serde_yaml::from_str::<DeviceIntent>(bad_ip).is_err());

        let bad_mask = "name: g0/1\nip: 10.0.0.1\nsubnet: 255.0.255.0\n";
        let err = serde_yaml::from_str::<InterfaceIntent>(bad_mask).unwrap_err();
        assert!(err.to_string().contains("contiguous"));

        let missing = "name: R1\n";
        assert!(serde_yaml::from_str::<ManagedDevice>(missing).is_err());
    }
}
