//! Access list push.

use log::{info, warn};

use super::{Connector, DeviceOutcome, DeviceStatus, RunSummary, Runner, failure_line, finish};
use crate::driver::Driver;
use crate::error::Result;
use crate::intent::{AclPlan, DeviceAcls};

const OPERATION: &str = "acl";

/// Configuration lines that rebuild a device's access lists and apply them.
///
/// Every list is removed and recreated so the device ends up with exactly
/// the declared entries, in order. Bindings follow once all lists exist.
pub fn build_acl_commands(plan: &AclPlan, device: &DeviceAcls) -> Vec<String> {
    let mut commands = Vec::new();

    for (_, definition) in plan.definitions_for(device) {
        let header = format!("ip access-list {} {}", definition.acl_type, definition.name);
        commands.push(format!("no {header}"));
        commands.push(header);
        commands.extend(definition.rules.iter().map(|rule| rule.to_command()));
        commands.push("exit".to_string());
    }

    for binding in &device.acl {
        for target in &binding.interfaces {
            if target.is_vty() {
                commands.push("line vty 0 4".to_string());
                commands.push(format!("access-class {} {}", binding.name, target.direction));
            } else {
                commands.push(format!("interface {}", target.name));
                commands.push(format!("ip access-group {} {}", binding.name, target.direction));
            }
            commands.push("exit".to_string());
        }
    }

    commands
}

impl<C: Connector> Runner<C> {
    /// Rebuild and bind the declared access lists on every device.
    pub async fn configure_acls(&mut self, plan: &AclPlan) -> RunSummary {
        let mut summary = RunSummary::new(OPERATION);
        self.progress
            .banner("Start configuring access-lists to all devices...")
            .await;

        let save = self.settings.save;
        for (index, device) in plan.devices.iter().enumerate() {
            let name = device.name.as_str();
            self.progress
                .step(&format!("[*] Configuring: {name}'s ACLs and apply to interfaces"))
                .await;

            let commands = build_acl_commands(plan, device);
            let outcome = match self.connector.connect(name, device.management_ip).await {
                Ok(mut driver) => {
                    let result = push(&mut driver, name, &commands, save).await;
                    finish(name, driver, result).await
                }
                Err(e) => {
                    warn!("{name}: {e}");
                    DeviceOutcome::failed(name, &e)
                }
            };

            let line = match outcome.status {
                DeviceStatus::Failed => failure_line(name, &outcome),
                _ => format!("[+] Configured: ACLs in {name} is applied"),
            };
            self.progress.done(&line).await;

            if self.record(&mut summary, outcome, plan.devices.len() - index - 1) {
                break;
            }
        }

        summary
    }
}

async fn push<D: Driver>(
    driver: &mut D,
    name: &str,
    commands: &[String],
    save: bool,
) -> Result<DeviceOutcome> {
    if commands.is_empty() {
        info!("{name}: no access lists bound");
        return Ok(DeviceOutcome::new(name, DeviceStatus::Ok).with_detail("no access lists bound"));
    }

    let lines: Vec<&str> = commands.iter().map(String::as_str).collect();
    info!("{name}: pushing {} access list lines", lines.len());
    driver.send_config(&lines).await?;
    if save {
        driver.save_config().await?;
    }

    Ok(DeviceOutcome::new(name, DeviceStatus::Ok))
}
