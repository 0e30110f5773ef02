//! Remote device descriptors and least-busy selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// A device offered by a remote provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name.
    pub name: String,
    /// Number of qubits.
    pub num_qubits: u32,
    /// Whether the device is a simulator.
    pub simulator: bool,
    /// Whether the device currently accepts jobs.
    pub operational: bool,
    /// Jobs waiting in the device queue, if reported.
    pub pending_jobs: Option<u32>,
    /// Free-form status message from the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_msg: Option<String>,
}

/// Declarative device filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFilter {
    /// Minimum number of qubits.
    pub min_qubits: u32,
    /// Skip simulators.
    pub exclude_simulators: bool,
    /// Skip devices that are not operational.
    pub require_operational: bool,
}

impl DeviceFilter {
    /// Devices able to run the password register: real, operational, 5+ qubits.
    pub fn password_devices() -> Self {
        Self {
            min_qubits: qrpg_ir::PASSWORD_QUBITS,
            exclude_simulators: true,
            require_operational: true,
        }
    }

    /// Whether a device passes the filter.
    pub fn matches(&self, device: &DeviceInfo) -> bool {
        device.num_qubits >= self.min_qubits
            && !(self.exclude_simulators && device.simulator)
            && !(self.require_operational && !device.operational)
    }
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self::password_devices()
    }
}

impl fmt::Display for DeviceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n_qubits >= {}", self.min_qubits)?;
        if self.exclude_simulators {
            write!(f, ", simulator = false")?;
        }
        if self.require_operational {
            write!(f, ", operational = true")?;
        }
        Ok(())
    }
}

/// Pick the matching device with the shortest queue.
///
/// Devices that do not report a queue length rank after every device that
/// does. Ties are broken by name.
pub fn least_busy<'a>(
    devices: &'a [DeviceInfo],
    filter: &DeviceFilter,
) -> HalResult<&'a DeviceInfo> {
    devices
        .iter()
        .filter(|d| filter.matches(d))
        .min_by(|a, b| {
            queue_rank(a)
                .cmp(&queue_rank(b))
                .then_with(|| a.name.cmp(&b.name))
        })
        .ok_or_else(|| {
            HalError::NoEligibleBackend(format!(
                "none of {} devices satisfy {filter}",
                devices.len()
            ))
        })
}

fn queue_rank(device: &DeviceInfo) -> (bool, u32) {
    (device.pending_jobs.is_none(), device.pending_jobs.unwrap_or(0))
}
