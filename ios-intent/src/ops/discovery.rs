//! Neighbor discovery enablement.

use log::warn;

use super::{Connector, DeviceOutcome, DeviceStatus, RunSummary, Runner, failure_line, finish};
use crate::driver::Driver;
use crate::error::Result;
use crate::intent::ManagedDevice;
use crate::progress::Progress;

const OPERATION: &str = "discovery";

impl<C: Connector> Runner<C> {
    /// Turn on CDP and LLDP globally on every device.
    pub async fn enable_discovery(&mut self, devices: &[ManagedDevice]) -> RunSummary {
        let mut summary = RunSummary::new(OPERATION);
        self.progress
            .banner("Start to running CDP and LLDP in all devices...")
            .await;

        let save = self.settings.save;
        for (index, device) in devices.iter().enumerate() {
            let name = device.name.as_str();

            let outcome = match self.connector.connect(name, device.management_ip).await {
                Ok(mut driver) => {
                    let result = enable(&mut driver, name, save, &mut self.progress).await;
                    finish(name, driver, result).await
                }
                Err(e) => {
                    warn!("{name}: {e}");
                    DeviceOutcome::failed(name, &e)
                }
            };

            let line = match outcome.status {
                DeviceStatus::Failed => failure_line(name, &outcome),
                _ => format!("[+] CDP and LLDP in {name} is running up"),
            };
            self.progress.done(&line).await;

            if self.record(&mut summary, outcome, devices.len() - index - 1) {
                break;
            }
        }

        summary
    }
}

async fn enable<D: Driver>(
    driver: &mut D,
    name: &str,
    save: bool,
    progress: &mut Progress,
) -> Result<DeviceOutcome> {
    progress
        .step(&format!("[*] Configuring: Enabling CDP in {name}"))
        .await;
    driver.send_config(&["cdp run"]).await?;

    progress
        .step(&format!("[*] Configuring: Enabling LLDP in {name}"))
        .await;
    driver.send_config(&["lldp run"]).await?;

    if save {
        driver.save_config().await?;
    }
    Ok(DeviceOutcome::new(name, DeviceStatus::Ok))
}
