//! Gateway configuration.
//!
//! A [`GatewayConfig`] carries every value the generator needs: the project identity,
//! the externally visible service name and the backend services to route to. It is
//! read from a YAML (or JSON) file and passed explicitly to the builder.
//!
//! ```yaml
//! projectId: my-gcp-project
//! backendServices:
//!   - hello
//! routes:
//!   /items/{id}: https://items-abc123-uc.a.run.app
//! ```

use crate::error::{Error, Result};
use crate::openapi_builder::Info;
use crate::path_params::{find_operation_id_clash, operation_id_base};
use crate::routes::RouteTable;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Placeholder replaced by the lower-cased service name in [`GatewayConfig::backend_url_template`]
pub const SERVICE_PLACEHOLDER: &str = "{service}";

/// Default backend address pattern for deployed services
pub const DEFAULT_BACKEND_URL_TEMPLATE: &str = "https://{service}-HASH-uc.a.run.app";

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Project identity; token issuer and audience are derived from it
    pub project_id: String,
    /// Service name override, defaults to `api.endpoints.<projectId>.cloud.goog`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints_service_name: Option<String>,
    /// Backend services, each exposed at `/<name>`
    #[serde(default)]
    pub backend_services: Vec<String>,
    /// Address pattern for backend services
    #[serde(default = "default_backend_url_template")]
    pub backend_url_template: String,
    /// Explicit routes, added after the backend service routes
    #[serde(default)]
    pub routes: RouteTable,
    /// Info section override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
}

fn default_backend_url_template() -> String {
    DEFAULT_BACKEND_URL_TEMPLATE.to_string()
}

impl GatewayConfig {
    /// Create a config for `project_id` with no routes
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            endpoints_service_name: None,
            backend_services: Vec::new(),
            backend_url_template: default_backend_url_template(),
            routes: RouteTable::new(),
            info: None,
        }
    }

    /// Load a config file. JSON files are accepted too, being valid YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading gateway config from {}", path.display());
        let content = fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check the values the builder trusts blindly.
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(Error::InvalidConfig("projectId must not be empty".to_string()));
        }

        if let Some(name) = &self.endpoints_service_name {
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "endpointsServiceName must not be empty".to_string(),
                ));
            }
        }

        if self.backend_services.iter().any(|svc| svc.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "backendServices must not contain empty names".to_string(),
            ));
        }

        if !self.backend_services.is_empty() && !self.backend_url_template.contains(SERVICE_PLACEHOLDER) {
            return Err(Error::InvalidConfig(format!(
                "backendUrlTemplate must contain {}",
                SERVICE_PLACEHOLDER
            )));
        }

        if let Some(path) = self.routes.iter().map(|(path, _)| path).find(|p| !p.starts_with('/')) {
            return Err(Error::InvalidConfig(format!(
                "route path '{}' must start with '/'",
                path
            )));
        }

        let table = self.route_table();
        if let Some((first, second)) = find_operation_id_clash(table.iter().map(|(path, _)| path)) {
            return Err(Error::InvalidConfig(format!(
                "routes {} and {} produce the same operationId base '{}'",
                first,
                second,
                operation_id_base(second)
            )));
        }

        Ok(())
    }

    /// Externally visible service name of the gateway
    pub fn service_name(&self) -> String {
        match &self.endpoints_service_name {
            Some(name) => name.clone(),
            None => format!("api.endpoints.{}.cloud.goog", self.project_id),
        }
    }

    /// Backend address for a named service
    pub fn backend_address(&self, service: &str) -> String {
        self.backend_url_template
            .replace(SERVICE_PLACEHOLDER, &service.to_lowercase())
    }

    /// Build the route table: one `/<service>` route per backend service, then the explicit routes.
    pub fn route_table(&self) -> RouteTable {
        let mut table: RouteTable = self
            .backend_services
            .iter()
            .map(|svc| (format!("/{}", svc), self.backend_address(svc)))
            .collect();
        table.extend(self.routes.iter());

        info!(
            "Built route table with {} route(s) for {}",
            table.len(),
            self.service_name()
        );
        table
    }
}
