//! Declarative intent read from YAML files.
//!
//! Each loader reads one document from the configuration directory and
//! validates it completely, so a bad file is reported before any device
//! is contacted.

mod acl;
mod device;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;

pub use acl::{
    AclBinding, AclCatalog, AclDefinition, AclRule, AclTarget, AclType, DeviceAcls, Direction,
    RuleAction,
};
pub use device::{DeviceIntent, InterfaceIntent, ManagedDevice, SubnetMask};

use crate::error::IntentError;

/// Devices with their interface addresses.
pub const INTERFACES_FILE: &str = "devices_interface_info.yml";
/// Devices reached by management address only.
pub const MANAGEMENT_FILE: &str = "devices_management_info.yml";
/// Access lists bound per device.
pub const DEVICE_ACLS_FILE: &str = "devices_access-lists_info.yml";
/// Access list definitions.
pub const ACL_CATALOG_FILE: &str = "acl_list_info.yml";

/// Read and deserialize one YAML document.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, IntentError> {
    let text = fs::read_to_string(path).map_err(|source| IntentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| IntentError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path, message: impl Into<String>) -> IntentError {
    IntentError::Invalid {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn ensure_unique_names<'a>(
    path: &Path,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), IntentError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(invalid(path, format!("device '{name}' is listed more than once")));
        }
    }
    Ok(())
}

/// Load the interface address intent.
pub fn load_interface_intent(dir: &Path) -> Result<Vec<DeviceIntent>, IntentError> {
    let path = dir.join(INTERFACES_FILE);
    let devices: Vec<DeviceIntent> = read_yaml(&path)?;

    ensure_unique_names(&path, devices.iter().map(|d| d.name.as_str()))?;
    for device in &devices {
        if device.management_interface().is_none() {
            return Err(invalid(
                &path,
                format!(
                    "device '{}' needs a management_interface (only R* and S* names are inferred)",
                    device.name
                ),
            ));
        }
    }

    debug!("{}: {} devices", path.display(), devices.len());
    Ok(devices)
}

/// Load the management address list.
pub fn load_managed_devices(dir: &Path) -> Result<Vec<ManagedDevice>, IntentError> {
    let path = dir.join(MANAGEMENT_FILE);
    let devices: Vec<ManagedDevice> = read_yaml(&path)?;
    ensure_unique_names(&path, devices.iter().map(|d| d.name.as_str()))?;

    debug!("{}: {} devices", path.display(), devices.len());
    Ok(devices)
}

/// Access list definitions together with the devices they go to.
#[derive(Debug, Clone)]
pub struct AclPlan {
    pub catalog: AclCatalog,
    pub devices: Vec<DeviceAcls>,
}

impl AclPlan {
    /// Load both access list documents and check every binding resolves.
    pub fn load(dir: &Path) -> Result<Self, IntentError> {
        let catalog_path = dir.join(ACL_CATALOG_FILE);
        let catalog = AclCatalog::from_value(read_yaml(&catalog_path)?)
            .map_err(|message| invalid(&catalog_path, message))?;

        let devices_path = dir.join(DEVICE_ACLS_FILE);
        let devices: Vec<DeviceAcls> = read_yaml(&devices_path)?;
        ensure_unique_names(&devices_path, devices.iter().map(|d| d.name.as_str()))?;

        for device in &devices {
            for binding in &device.acl {
                if catalog.get(&binding.name).is_none() {
                    return Err(invalid(
                        &devices_path,
                        format!(
                            "device '{}' uses access list '{}' which {} does not define",
                            device.name, binding.name, ACL_CATALOG_FILE
                        ),
                    ));
                }
            }
        }

        debug!(
            "{}: {} access lists for {} devices",
            dir.display(),
            catalog.len(),
            devices.len()
        );
        Ok(Self { catalog, devices })
    }

    /// The definitions a device uses, in binding order.
    pub fn definitions_for<'a>(
        &'a self,
        device: &'a DeviceAcls,
    ) -> impl Iterator<Item = (&'a AclBinding, &'a AclDefinition)> + 'a {
        device
            .acl
            .iter()
            .filter_map(|binding| Some((binding, self.catalog.get(&binding.name)?)))
    }
}

/// Every intent document in a configuration directory.
#[derive(Debug, Clone)]
pub struct IntentSet {
    pub dir: PathBuf,
    pub interfaces: Vec<DeviceIntent>,
    pub managed: Vec<ManagedDevice>,
    pub acls: AclPlan,
}

impl IntentSet {
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, IntentError> {
        let dir = dir.into();
        Ok(Self {
            interfaces: load_interface_intent(&dir)?,
            managed: load_managed_devices(&dir)?,
            acls: AclPlan::load(&dir)?,
            dir,
        })
    }
}
