use serde::{Deserialize, Serialize};

use crate::error::ProvisionError;

/// HTTP method registered on every gateway resource.
pub const HTTP_METHOD: &str = "POST";

/// Runtime used when the caller does not pick one.
pub const DEFAULT_RUNTIME: &str = "nodejs18.x";

/// Immutable input for one provisioning run.
///
/// The function name must be non-empty before any provisioning call; a role
/// name is only required when a new compute function has to be created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisioningConfig {
    pub function_name: String,
    pub role_name: Option<String>,
    pub region: String,
    /// Local path or `http(s)` URL of the code bundle. `None` selects the
    /// built-in echo bundle.
    pub code_source: Option<String>,
    pub authentication: String,
    pub http_method: String,
    pub api_key_required: bool,
    pub runtime: String,
    /// Stop after ensuring the function exists; skip the gateway entirely.
    pub no_gateway: bool,
}

impl ProvisioningConfig {
    /// Minimal configuration addressing a function by name, with defaults for
    /// everything else.
    pub fn for_function(function_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            role_name: None,
            region: region.into(),
            code_source: None,
            authentication: "NONE".to_string(),
            http_method: HTTP_METHOD.to_string(),
            api_key_required: false,
            runtime: DEFAULT_RUNTIME.to_string(),
            no_gateway: false,
        }
    }

    /// Lower-cased function name, used for the resource path segment, the
    /// container name and the endpoint URL suffix.
    pub fn path_name(&self) -> String {
        self.function_name.to_lowercase()
    }

    /// Whether the configured code source points at a remote bundle. Detection
    /// is by scheme prefix; anything else is treated as a local path verbatim.
    pub fn has_remote_source(&self) -> bool {
        matches!(
            self.code_source.as_deref(),
            Some(source) if source.starts_with("http:") || source.starts_with("https:")
        )
    }

    /// Rejects configurations that cannot start a provisioning run.
    pub fn validate(&self) -> Result<(), ProvisionError> {
        if self.function_name.trim().is_empty() {
            return Err(ProvisionError::Config(
                "a function name is required".to_string(),
            ));
        }
        Ok(())
    }

    /// The role required when a new function must be created.
    pub fn creation_role(&self) -> Result<&str, ProvisionError> {
        match self.role_name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(ProvisionError::Config(
                "creating a new function requires a role; pass one with --role".to_string(),
            )),
        }
    }
}
