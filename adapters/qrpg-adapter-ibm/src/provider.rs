//! IBM Quantum account session and connector.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument};

use qrpg_hal::{ApiToken, Backend, DeviceInfo, HalResult, Provider, ProviderConnector};

use crate::api::{BackendInfo, IbmClient, LEGACY_ENDPOINT};
use crate::backend::IbmBackend;
use crate::error::IbmResult;

/// Opens IBM Quantum sessions from an account token.
#[derive(Debug, Clone)]
pub struct IbmConnector {
    endpoint: String,
}

impl IbmConnector {
    /// Connector for the default endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(LEGACY_ENDPOINT)
    }

    /// Connector for a custom endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint sessions will use.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for IbmConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderConnector for IbmConnector {
    /// Builds a client and lists backends once; a rejected token fails here.
    #[instrument(skip(self, token), fields(endpoint = %self.endpoint))]
    async fn connect(&self, token: &ApiToken) -> HalResult<Arc<dyn Provider>> {
        let client = IbmClient::new(&self.endpoint, token)?;
        let backends = client.list_backends().await?;
        info!(count = backends.len(), "IBM Quantum account loaded");

        let provider = IbmProvider::new(Arc::new(client));
        provider.remember(&backends);
        Ok(Arc::new(provider))
    }
}

/// An authenticated IBM Quantum session.
pub struct IbmProvider {
    client: Arc<IbmClient>,
    /// Backend info from the latest listing, keyed by name.
    catalog: Mutex<FxHashMap<String, BackendInfo>>,
}

impl IbmProvider {
    /// Session over an already authenticated client.
    pub fn new(client: Arc<IbmClient>) -> Self {
        Self {
            client,
            catalog: Mutex::new(FxHashMap::default()),
        }
    }

    fn remember(&self, backends: &[BackendInfo]) {
        let mut catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        catalog.clear();
        catalog.extend(backends.iter().map(|b| (b.name.clone(), b.clone())));
    }

    async fn fetch_devices(&self) -> IbmResult<Vec<DeviceInfo>> {
        let backends = self.client.list_backends().await?;
        self.remember(&backends);
        Ok(backends.iter().map(BackendInfo::to_device_info).collect())
    }
}

#[async_trait]
impl Provider for IbmProvider {
    fn name(&self) -> &str {
        "ibm_quantum"
    }

    async fn devices(&self) -> HalResult<Vec<DeviceInfo>> {
        let devices = self.fetch_devices().await?;
        debug!(count = devices.len(), "listed IBM Quantum devices");
        Ok(devices)
    }

    fn backend_for(&self, device: &DeviceInfo) -> HalResult<Arc<dyn Backend>> {
        let info = self
            .catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&device.name)
            .cloned();

        let backend = match info {
            Some(info) => IbmBackend::from_info(Arc::clone(&self.client), info),
            None => IbmBackend::new(Arc::clone(&self.client), &device.name, device.num_qubits),
        };
        Ok(Arc::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> IbmProvider {
        let token = ApiToken::new("test-token").unwrap();
        IbmProvider::new(Arc::new(IbmClient::new(LEGACY_ENDPOINT, &token).unwrap()))
    }

    fn device(name: &str, num_qubits: u32) -> DeviceInfo {
        DeviceInfo {
            name: name.into(),
            num_qubits,
            simulator: false,
            operational: true,
            pending_jobs: Some(0),
            status_msg: None,
        }
    }

    #[test]
    fn test_connector_endpoints() {
        assert_eq!(IbmConnector::new().endpoint(), LEGACY_ENDPOINT);
        assert_eq!(
            IbmConnector::with_endpoint("http://localhost:9000").endpoint(),
            "http://localhost:9000"
        );
    }

    #[test]
    fn test_backend_for_uses_catalog_entry() {
        let provider = provider();
        let info: BackendInfo = serde_json::from_str(
            r#"{"name": "ibm_sherbrooke", "num_qubits": 127, "max_shots": 4000}"#,
        )
        .unwrap();
        provider.remember(&[info]);

        let backend = provider.backend_for(&device("ibm_sherbrooke", 127)).unwrap();
        assert_eq!(backend.name(), "ibm_sherbrooke");
        assert_eq!(backend.capabilities().max_shots, 4000);
    }

    #[test]
    fn test_backend_for_unknown_device() {
        let provider = provider();
        let backend = provider.backend_for(&device("ibm_new", 156)).unwrap();
        assert_eq!(backend.name(), "ibm_new");
        assert_eq!(backend.capabilities().num_qubits, 156);
    }
}
