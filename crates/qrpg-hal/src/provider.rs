//! Remote providers: authenticated device catalogs.
//!
//! A [`ProviderConnector`] turns a credential into a [`Provider`] session;
//! the provider lists devices and hands out a [`Backend`] for any of them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::auth::ApiToken;
use crate::backend::Backend;
use crate::device::{DeviceFilter, DeviceInfo, least_busy};
use crate::error::HalResult;

/// An authenticated session with a remote service.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name, e.g. `"ibm_quantum"`.
    fn name(&self) -> &str;

    /// All devices visible to this account.
    async fn devices(&self) -> HalResult<Vec<DeviceInfo>>;

    /// A backend that runs jobs on `device`.
    fn backend_for(&self, device: &DeviceInfo) -> HalResult<Arc<dyn Backend>>;

    /// Select the least busy device matching `filter` and open a backend for it.
    async fn select_least_busy(
        &self,
        filter: &DeviceFilter,
    ) -> HalResult<(DeviceInfo, Arc<dyn Backend>)> {
        let devices = self.devices().await?;
        debug!(provider = self.name(), count = devices.len(), "listed devices");

        let chosen = least_busy(&devices, filter)?.clone();
        info!(
            device = %chosen.name,
            pending_jobs = ?chosen.pending_jobs,
            "selected least busy device"
        );

        let backend = self.backend_for(&chosen)?;
        Ok((chosen, backend))
    }
}

/// Opens provider sessions from credentials.
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    /// Authenticate and open a session.
    ///
    /// Invalid or expired credentials yield `HalError::AuthenticationFailed`.
    async fn connect(&self, token: &ApiToken) -> HalResult<Arc<dyn Provider>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::error::HalError;
    use crate::job::{JobId, JobStatus};
    use crate::result::ExecutionResult;
    use qrpg_ir::Circuit;

    struct NamedBackend {
        capabilities: Capabilities,
    }

    #[async_trait]
    impl Backend for NamedBackend {
        fn name(&self) -> &str {
            &self.capabilities.name
        }

        fn capabilities(&self) -> &Capabilities {
            &self.capabilities
        }

        async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
            Err(HalError::Backend("not used".into()))
        }

        async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
            Err(HalError::JobNotFound(job_id.0.clone()))
        }

        async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
            Err(HalError::JobNotFound(job_id.0.clone()))
        }
    }

    struct StaticProvider {
        devices: Vec<DeviceInfo>,
    }

    #[async_trait]
    impl Provider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }

        async fn devices(&self) -> HalResult<Vec<DeviceInfo>> {
            Ok(self.devices.clone())
        }

        fn backend_for(&self, device: &DeviceInfo) -> HalResult<Arc<dyn Backend>> {
            Ok(Arc::new(NamedBackend {
                capabilities: Capabilities::ibm(&device.name, device.num_qubits),
            }))
        }
    }

    fn device(name: &str, pending: u32) -> DeviceInfo {
        DeviceInfo {
            name: name.into(),
            num_qubits: 27,
            simulator: false,
            operational: true,
            pending_jobs: Some(pending),
            status_msg: None,
        }
    }

    #[tokio::test]
    async fn test_select_least_busy() {
        let provider = StaticProvider {
            devices: vec![device("ibm_busy", 90), device("ibm_idle", 1)],
        };
        let (chosen, backend) = provider
            .select_least_busy(&DeviceFilter::password_devices())
            .await
            .unwrap();
        assert_eq!(chosen.name, "ibm_idle");
        assert_eq!(backend.name(), "ibm_idle");
    }

    #[tokio::test]
    async fn test_select_least_busy_no_devices() {
        let provider = StaticProvider { devices: vec![] };
        let err = provider
            .select_least_busy(&DeviceFilter::password_devices())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, HalError::NoEligibleBackend(_)));
    }
}
