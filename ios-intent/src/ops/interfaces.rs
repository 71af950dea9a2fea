//! Interface address verification and correction.

use std::net::Ipv4Addr;

use log::{debug, info, warn};

use super::{Connector, DeviceOutcome, DeviceStatus, RunSummary, Runner, failure_line, finish};
use crate::driver::Driver;
use crate::error::Result;
use crate::intent::{DeviceIntent, InterfaceIntent};
use crate::parse::{CommandParser, InterfaceBriefParser, InterfaceTable, abbreviate_interface};
use crate::progress::Progress;

const OPERATION: &str = "interfaces";

/// Configuration lines putting one interface at its intended address.
pub fn build_interface_commands(intent: &InterfaceIntent) -> Vec<String> {
    vec![
        format!("interface {}", intent.name),
        format!("ip address {} {}", intent.ip, intent.subnet),
        "no shutdown".to_string(),
    ]
}

impl<C: Connector> Runner<C> {
    /// Check every device's interface addresses and correct the ones that
    /// differ from intent.
    pub async fn configure_interfaces(&mut self, devices: &[DeviceIntent]) -> RunSummary {
        let mut summary = RunSummary::new(OPERATION);
        self.progress
            .banner("Start configuring IP addresses to all devices...")
            .await;

        for (index, device) in devices.iter().enumerate() {
            let name = device.name.as_str();
            self.progress.step(&format!("[*] Verifying: {name}")).await;

            let outcome = match self.connector.connect(name, device.management_ip).await {
                Ok(mut driver) => {
                    let result = verify_device(&mut driver, device, &mut self.progress).await;
                    finish(name, driver, result).await
                }
                Err(e) => {
                    warn!("{name}: {e}");
                    DeviceOutcome::failed(name, &e)
                }
            };

            let line = match outcome.status {
                DeviceStatus::Ok => format!("[+] {name} status: [OK]"),
                DeviceStatus::Fixed => format!("[-] {name} status: [Fixed]"),
                DeviceStatus::Mismatch => format!(
                    "[-] {name} status: [Mismatch] {}",
                    outcome.detail.as_deref().unwrap_or_default()
                ),
                DeviceStatus::Failed => failure_line(name, &outcome),
            };
            self.progress.done(&line).await;

            if self.record(&mut summary, outcome, devices.len() - index - 1) {
                break;
            }
        }

        summary
    }
}

fn same_interface(a: &str, b: &str) -> bool {
    abbreviate_interface(a).eq_ignore_ascii_case(&abbreviate_interface(b))
}

fn show_address(ip: Option<Ipv4Addr>) -> String {
    ip.map_or_else(|| "no address".to_string(), |ip| ip.to_string())
}

async fn read_interfaces<D: Driver>(driver: &mut D) -> Result<InterfaceTable> {
    let parser = InterfaceBriefParser;
    let response = driver.send_command(parser.command()).await?.ensure_success()?;
    Ok(parser.parse(&response.result)?)
}

async fn verify_device<D: Driver>(
    driver: &mut D,
    device: &DeviceIntent,
    progress: &mut Progress,
) -> Result<DeviceOutcome> {
    let name = device.name.as_str();
    let table = read_interfaces(driver).await?;
    let management = device.management_interface();

    let mut notes = Vec::new();
    let mut mismatch = false;

    if let Some(mgmt) = management {
        let live = table.get(mgmt).and_then(|status| status.ip);
        if live != Some(device.management_ip) {
            warn!(
                "{name}: management interface {mgmt} has {}, expected {}",
                show_address(live),
                device.management_ip
            );
            notes.push(format!(
                "{mgmt} has {}, expected {}",
                show_address(live),
                device.management_ip
            ));
            mismatch = true;
        }
    }

    let mut drift: Vec<&InterfaceIntent> = Vec::new();
    for intent in &device.interfaces {
        let live = table.get(&intent.name).and_then(|status| status.ip);
        if live == Some(intent.ip) {
            debug!("{name}: {} at {}", intent.name, intent.ip);
            continue;
        }

        // The session runs over the management interface
        if management.is_some_and(|mgmt| same_interface(mgmt, &intent.name)) {
            if !mismatch {
                notes.push(format!(
                    "{} has {}, expected {}",
                    intent.name,
                    show_address(live),
                    intent.ip
                ));
                mismatch = true;
            }
            continue;
        }

        info!(
            "{name}: {} has {}, intent is {}",
            intent.name,
            show_address(live),
            intent.ip
        );
        drift.push(intent);
    }

    if drift.is_empty() {
        let status = if mismatch {
            DeviceStatus::Mismatch
        } else {
            DeviceStatus::Ok
        };
        let outcome = DeviceOutcome::new(name, status);
        return Ok(if notes.is_empty() {
            outcome
        } else {
            outcome.with_detail(notes.join("; "))
        });
    }

    for intent in &drift {
        progress
            .step(&format!("[*] Configuring: {name} interface {}", intent.name))
            .await;
        let commands = build_interface_commands(intent);
        let commands: Vec<&str> = commands.iter().map(String::as_str).collect();
        driver.send_config(&commands).await?;
    }
    driver.save_config().await?;

    let table = read_interfaces(driver).await?;
    let unresolved: Vec<&str> = drift
        .iter()
        .filter(|intent| table.get(&intent.name).and_then(|status| status.ip) != Some(intent.ip))
        .map(|intent| intent.name.as_str())
        .collect();
    if !unresolved.is_empty() {
        return Ok(DeviceOutcome::new(name, DeviceStatus::Failed).with_detail(format!(
            "still not at the intended address after correction: {}",
            unresolved.join(", ")
        )));
    }

    let corrected: Vec<&str> = drift.iter().map(|intent| intent.name.as_str()).collect();
    notes.push(format!("corrected {}", corrected.join(", ")));

    let status = if mismatch {
        DeviceStatus::Mismatch
    } else {
        DeviceStatus::Fixed
    };
    Ok(DeviceOutcome::new(name, status).with_detail(notes.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::SubnetMask;

    #[test]
    fn test_interface_commands() {
        let intent = InterfaceIntent {
            name: "g0/1".to_string(),
            ip: Ipv4Addr::new(10, 0, 12, 1),
            subnet: SubnetMask::try_from(Ipv4Addr::new(255, 255, 255, 252)).unwrap(),
        };
        assert_eq!(
            build_interface_commands(&intent),
            vec![
                "interface g0/1",
                "ip address 10.0.12.1 255.255.255.252",
                "no shutdown"
            ]
        );
    }

    #[test]
    fn test_same_interface() {
        assert!(same_interface("GigabitEthernet0/0", "g0/0"));
        assert!(same_interface("vlan99", "Vlan99"));
        assert!(!same_interface("g0/0", "g0/1"));
    }
}
