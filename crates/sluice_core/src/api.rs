//! Seams over the remote resource-management API family.
//!
//! Adapters are synchronous by contract: every orchestration step is a
//! blocking remote call, and the next step only begins after the previous one
//! returns. The AWS-backed implementations live in the CLI crate; tests
//! inject recording fakes.

use serde::{Deserialize, Serialize};

use crate::error::ProvisionError;

/// A compute function as reported by the remote service. Once looked up or
/// created it is immutable for the remainder of the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputeFunctionRecord {
    pub name: String,
    /// ARN-style remote identifier.
    pub arn: String,
    pub runtime: String,
}

/// Inputs for creating a function the remote service does not yet know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFunctionRequest {
    pub name: String,
    pub handler: String,
    pub role_arn: String,
    pub runtime: String,
    pub code: Vec<u8>,
}

/// One invoke-permission grant on a compute function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionGrant {
    pub function_name: String,
    pub statement_id: String,
    pub principal: String,
    pub action: String,
    pub source_arn: String,
}

/// Method registration on the gateway's child resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub rest_api_id: String,
    pub resource_id: String,
    pub http_method: String,
    pub authorization: String,
    pub api_key_required: bool,
}

/// Proxy integration pointing the method at the function's invoke URI,
/// translating bodies of `content_type` through `request_template`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationSpec {
    pub rest_api_id: String,
    pub resource_id: String,
    pub http_method: String,
    pub uri: String,
    pub content_type: String,
    pub request_template: String,
}

/// Function lookup, creation and invoke-permission grants.
pub trait ComputeApi {
    /// Looks a function up by name. `Ok(None)` is reserved for the
    /// resource-not-found case; every other lookup failure is an error.
    fn function_by_name(&self, name: &str)
        -> Result<Option<ComputeFunctionRecord>, ProvisionError>;

    fn create_function(
        &self,
        request: &CreateFunctionRequest,
    ) -> Result<ComputeFunctionRecord, ProvisionError>;

    fn add_invoke_permission(&self, grant: &PermissionGrant) -> Result<(), ProvisionError>;
}

/// Resolves a role name to its execution-role identifier.
pub trait RoleResolver {
    fn execution_role_arn(&self, role_name: &str) -> Result<String, ProvisionError>;
}

/// Container, resource, wiring and deployment calls on the gateway service.
pub trait GatewayApi {
    /// Creates a REST API container and returns its id.
    fn create_rest_api(&self, name: &str, description: &str) -> Result<String, ProvisionError>;

    /// Id of the container's single top-level resource.
    fn root_resource_id(&self, rest_api_id: &str) -> Result<String, ProvisionError>;

    /// Creates a child resource under `parent_id` and returns its id.
    fn create_resource(
        &self,
        rest_api_id: &str,
        parent_id: &str,
        path_part: &str,
    ) -> Result<String, ProvisionError>;

    fn put_method(&self, method: &MethodSpec) -> Result<(), ProvisionError>;

    fn put_integration(&self, integration: &IntegrationSpec) -> Result<(), ProvisionError>;

    fn put_integration_response(
        &self,
        rest_api_id: &str,
        resource_id: &str,
        http_method: &str,
        status_code: &str,
        selection_pattern: &str,
    ) -> Result<(), ProvisionError>;

    /// Registers a method response for `status_code` with no response models.
    fn put_method_response(
        &self,
        rest_api_id: &str,
        resource_id: &str,
        http_method: &str,
        status_code: &str,
    ) -> Result<(), ProvisionError>;

    fn create_deployment(&self, rest_api_id: &str, stage: &str) -> Result<(), ProvisionError>;
}

/// Rule creation and target attachment on the scheduler service.
pub trait ScheduleApi {
    /// Creates or overwrites a named rule with the raw schedule expression.
    fn put_rule(&self, name: &str, schedule_expression: &str) -> Result<(), ProvisionError>;

    fn put_target(
        &self,
        rule_name: &str,
        target_id: &str,
        target_arn: &str,
    ) -> Result<(), ProvisionError>;
}
