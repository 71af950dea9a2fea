//! Automation procedures run against every device in an intent document.
//!
//! Devices are handled one at a time over their own session. A device
//! that fails is reported and the run moves on, unless
//! [`Settings::fail_fast`] is set.
//!
//! Sessions come from a [`Connector`], so the procedures can be driven
//! against anything that implements [`Driver`].

mod acl;
mod descriptions;
mod discovery;
mod interfaces;
mod report;

use std::future::Future;
use std::net::Ipv4Addr;

use log::{debug, info, warn};

pub use acl::build_acl_commands;
pub use descriptions::build_description_commands;
pub use interfaces::build_interface_commands;
pub use report::{DeviceOutcome, DeviceStatus, RunSummary};

use crate::config::Settings;
use crate::driver::{Driver, GenericDriver};
use crate::error::Result;
use crate::intent::IntentSet;
use crate::progress::Progress;

/// Opens sessions to devices.
pub trait Connector: Send + Sync {
    type Driver: Driver;

    /// Return an open session to the device at `address`.
    fn connect(
        &self,
        device: &str,
        address: Ipv4Addr,
    ) -> impl Future<Output = Result<Self::Driver>> + Send;
}

/// Connects over SSH with the shared login from [`Settings`].
#[derive(Debug, Clone)]
pub struct SshConnector {
    settings: Settings,
}

impl SshConnector {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl Connector for SshConnector {
    type Driver = GenericDriver;

    async fn connect(&self, device: &str, address: Ipv4Addr) -> Result<GenericDriver> {
        let mut driver = self.settings.driver_builder(address.to_string()).build()?;
        debug!("{device}: connecting to {address}:{}", self.settings.port);

        if let Err(e) = driver.open().await {
            if let Err(cleanup) = driver.close().await {
                debug!("{device}: close after failed login: {cleanup}");
            }
            return Err(e);
        }
        Ok(driver)
    }
}

/// Runs the automation procedures and prints their progress.
pub struct Runner<C> {
    connector: C,
    settings: Settings,
    progress: Progress,
}

impl<C: Connector> Runner<C> {
    pub fn new(connector: C, settings: Settings, progress: Progress) -> Self {
        Self {
            connector,
            settings,
            progress,
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Run interfaces, ACLs, discovery and descriptions in that order.
    ///
    /// With [`Settings::fail_fast`], an operation with a failed device is
    /// the last one run. Mismatches never stop the run.
    pub async fn run_all(&mut self, set: &IntentSet) -> Vec<RunSummary> {
        let mut summaries = Vec::with_capacity(4);

        summaries.push(self.configure_interfaces(&set.interfaces).await);
        if self.stops_after(&summaries) {
            return summaries;
        }
        summaries.push(self.configure_acls(&set.acls).await);
        if self.stops_after(&summaries) {
            return summaries;
        }
        summaries.push(self.enable_discovery(&set.managed).await);
        if self.stops_after(&summaries) {
            return summaries;
        }
        summaries.push(self.describe_interfaces(&set.managed).await);
        summaries
    }

    fn stops_after(&self, summaries: &[RunSummary]) -> bool {
        let Some(last) = summaries.last() else {
            return false;
        };
        let stop = self.settings.fail_fast && last.count(DeviceStatus::Failed) > 0;
        if stop {
            warn!("{}: stopping the run at a failed device", last.operation);
        }
        stop
    }

    /// Record an outcome; returns true when the run should stop here.
    fn record(&self, summary: &mut RunSummary, outcome: DeviceOutcome, remaining: usize) -> bool {
        let stop = self.settings.fail_fast && outcome.status == DeviceStatus::Failed;
        if stop && remaining > 0 {
            warn!(
                "{}: stopping {} after failure, {} devices not attempted",
                outcome.device, summary.operation, remaining
            );
            summary.skipped = remaining;
        }
        summary.outcomes.push(outcome);
        stop
    }
}

/// Close the session and turn the device's result into an outcome.
async fn finish<D: Driver>(device: &str, mut driver: D, result: Result<DeviceOutcome>) -> DeviceOutcome {
    if let Err(e) = driver.close().await {
        warn!("{device}: closing session: {e}");
    }

    match result {
        Ok(outcome) => {
            info!("{device}: {}", outcome.status);
            outcome
        }
        Err(e) => {
            warn!("{device}: {e}");
            DeviceOutcome::failed(device, &e)
        }
    }
}

/// Progress line for a failed device.
fn failure_line(device: &str, outcome: &DeviceOutcome) -> String {
    match &outcome.detail {
        Some(detail) => format!("[-] {device} status: [Failed] {detail}"),
        None => format!("[-] {device} status: [Failed]"),
    }
}
