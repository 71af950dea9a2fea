//! Interface descriptions from CDP neighbors.

use log::{info, warn};

use super::{Connector, DeviceOutcome, DeviceStatus, RunSummary, Runner, failure_line, finish};
use crate::driver::Driver;
use crate::error::Result;
use crate::intent::ManagedDevice;
use crate::parse::{CdpNeighbor, CdpNeighborParser, CommandParser};
use crate::progress::Progress;

const OPERATION: &str = "descriptions";

/// Configuration lines describing each local port by its neighbor.
pub fn build_description_commands(neighbors: &[CdpNeighbor]) -> Vec<String> {
    neighbors
        .iter()
        .flat_map(|neighbor| {
            [
                format!("interface {}", neighbor.local_interface),
                format!("description {}", neighbor.description()),
                "exit".to_string(),
            ]
        })
        .collect()
}

impl<C: Connector> Runner<C> {
    /// Describe every device's interfaces after the CDP neighbors on them.
    pub async fn describe_interfaces(&mut self, devices: &[ManagedDevice]) -> RunSummary {
        let mut summary = RunSummary::new(OPERATION);
        let parser = CdpNeighborParser::new(self.settings.domain_suffix.clone());
        let save = self.settings.save;
        self.progress
            .banner("Start Configure all interfaces description based on CDP information...")
            .await;

        for (index, device) in devices.iter().enumerate() {
            let name = device.name.as_str();

            let outcome = match self.connector.connect(name, device.management_ip).await {
                Ok(mut driver) => {
                    let result = describe(&mut driver, name, &parser, save, &mut self.progress).await;
                    finish(name, driver, result).await
                }
                Err(e) => {
                    warn!("{name}: {e}");
                    DeviceOutcome::failed(name, &e)
                }
            };

            let line = match outcome.status {
                DeviceStatus::Failed => failure_line(name, &outcome),
                _ => format!("[+] Added description to all interfaces of {name}"),
            };
            self.progress.done(&line).await;

            if self.record(&mut summary, outcome, devices.len() - index - 1) {
                break;
            }
        }

        summary
    }
}

async fn describe<D: Driver>(
    driver: &mut D,
    name: &str,
    parser: &CdpNeighborParser,
    save: bool,
    progress: &mut Progress,
) -> Result<DeviceOutcome> {
    progress
        .step(&format!("[*] Fetching data: CDP information from {name}"))
        .await;
    let response = driver.send_command(parser.command()).await?.ensure_success()?;
    let neighbors = parser.parse(&response.result)?;

    if neighbors.is_empty() {
        info!("{name}: no CDP neighbors in the managed domain");
        return Ok(DeviceOutcome::new(name, DeviceStatus::Ok).with_detail("no neighbors"));
    }

    progress
        .step(&format!("[*] Configuring: Add description to {name}'s interfaces"))
        .await;
    let commands = build_description_commands(&neighbors);
    let commands: Vec<&str> = commands.iter().map(String::as_str).collect();
    driver.send_config(&commands).await?;

    if save {
        driver.save_config().await?;
    }

    info!("{name}: described {} interfaces", neighbors.len());
    Ok(DeviceOutcome::new(name, DeviceStatus::Ok))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_commands() {
        let neighbors = vec![CdpNeighbor {
            local_interface: "Gig0/1".to_string(),
            remote_port: "Gig 1/0/1".to_string(),
            remote_device: "S1".to_string(),
        }];
        assert_eq!(
            build_description_commands(&neighbors),
            vec![
                "interface Gig0/1",
                "description connect to Gig 1/0/1 of S1",
                "exit"
            ]
        );
    }
}
