//! Per-device outcomes and the run summary.

use std::fmt;

use crate::error::Error;

/// How one device ended up after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    /// Already matched intent; nothing was pushed.
    Ok,
    /// Drift was corrected and the correction confirmed.
    Fixed,
    /// The management interface does not carry the management address.
    Mismatch,
    /// Connection, command or parse failure, or a correction that did not take.
    Failed,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceStatus::Ok => "OK",
            DeviceStatus::Fixed => "Fixed",
            DeviceStatus::Mismatch => "Mismatch",
            DeviceStatus::Failed => "Failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOutcome {
    pub device: String,
    pub status: DeviceStatus,
    /// What went wrong or what was changed.
    pub detail: Option<String>,
    /// Error category for failures, see [`Error::kind`].
    pub error_kind: Option<&'static str>,
}

impl DeviceOutcome {
    pub fn new(device: impl Into<String>, status: DeviceStatus) -> Self {
        Self {
            device: device.into(),
            status,
            detail: None,
            error_kind: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn failed(device: impl Into<String>, error: &Error) -> Self {
        Self {
            device: device.into(),
            status: DeviceStatus::Failed,
            detail: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, DeviceStatus::Ok | DeviceStatus::Fixed)
    }
}

/// Outcomes of one operation across the device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub operation: &'static str,
    pub outcomes: Vec<DeviceOutcome>,
    /// Devices not attempted because the run stopped at a failure.
    pub skipped: usize,
}

impl RunSummary {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            outcomes: Vec::new(),
            skipped: 0,
        }
    }

    pub fn count(&self, status: DeviceStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// True when every device was handled and none failed or mismatched.
    pub fn is_success(&self) -> bool {
        self.skipped == 0 && self.outcomes.iter().all(DeviceOutcome::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeviceOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} devices, {} OK, {} Fixed, {} Mismatch, {} Failed",
            self.operation,
            self.outcomes.len(),
            self.count(DeviceStatus::Ok),
            self.count(DeviceStatus::Fixed),
            self.count(DeviceStatus::Mismatch),
            self.count(DeviceStatus::Failed),
        )?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}
