//! The HTTP front door: container, resource, wiring, deployment and grants.

use serde::{Deserialize, Serialize};

use crate::api::{
    ComputeApi, ComputeFunctionRecord, GatewayApi, IntegrationSpec, MethodSpec, PermissionGrant,
};
use crate::config::ProvisioningConfig;
use crate::error::ProvisionError;
use crate::identifiers;

/// Content type translated into the JSON envelope before invocation.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Mapping template wrapping a form-encoded body into `{"body": ...}`.
const FORM_TEMPLATE: &str = r#"{"body": $input.json("$")}"#;
/// Every response the integration produces maps to HTTP 200.
const MATCH_ANY_PATTERN: &str = ".*";
const OK_STATUS: &str = "200";

/// A gateway created by one run. Repeated runs create fresh containers; there
/// are no ensure semantics here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayRecord {
    pub rest_api_id: String,
    pub root_resource_id: String,
    pub resource_id: String,
    endpoint: String,
    invoke_source_arn: String,
}

impl GatewayRecord {
    /// Public URL of the deployed endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// ARN-style pattern under which the gateway invokes the function.
    pub fn remote_identifier(&self) -> &str {
        &self.invoke_source_arn
    }
}

/// Creates and deploys the gateway for `function`, then wires the two
/// invoke-permission grants. The steps are ordered and non-idempotent: the
/// first failure aborts the run and leaves everything created so far in
/// place.
pub fn provision_gateway(
    gateway: &dyn GatewayApi,
    compute: &dyn ComputeApi,
    function: &ComputeFunctionRecord,
    config: &ProvisioningConfig,
) -> Result<GatewayRecord, ProvisionError> {
    let path_name = config.path_name();

    let rest_api_id = gateway.create_rest_api(
        &format!("{path_name}API"),
        &format!("API for function {}", config.function_name),
    )?;
    log::info!("created gateway container {rest_api_id}");

    let root_resource_id = gateway.root_resource_id(&rest_api_id)?;
    let resource_id = gateway.create_resource(&rest_api_id, &root_resource_id, &path_name)?;

    configure_resource(gateway, &rest_api_id, &resource_id, function, config)?;
    gateway.create_deployment(&rest_api_id, identifiers::STAGE)?;

    let invoke_source_arn = identifiers::invoke_source_arn(&function.arn, &rest_api_id)?;
    grant_invoke(compute, &invoke_source_arn, &resource_id, function, config)?;

    let endpoint = identifiers::endpoint_url(&rest_api_id, &config.region, &path_name);
    log::info!("endpoint deployed at {endpoint}");
    Ok(GatewayRecord {
        rest_api_id,
        root_resource_id,
        resource_id,
        endpoint,
        invoke_source_arn,
    })
}

/// The four registration sub-steps on the child resource. All four must
/// succeed; the first failure is surfaced verbatim.
fn configure_resource(
    gateway: &dyn GatewayApi,
    rest_api_id: &str,
    resource_id: &str,
    function: &ComputeFunctionRecord,
    config: &ProvisioningConfig,
) -> Result<(), ProvisionError> {
    gateway.put_method(&MethodSpec {
        rest_api_id: rest_api_id.to_string(),
        resource_id: resource_id.to_string(),
        http_method: config.http_method.clone(),
        authorization: config.authentication.clone(),
        api_key_required: config.api_key_required,
    })?;
    gateway.put_integration(&IntegrationSpec {
        rest_api_id: rest_api_id.to_string(),
        resource_id: resource_id.to_string(),
        http_method: config.http_method.clone(),
        uri: identifiers::invocation_uri(&config.region, &function.arn),
        content_type: FORM_CONTENT_TYPE.to_string(),
        request_template: FORM_TEMPLATE.to_string(),
    })?;
    gateway.put_integration_response(
        rest_api_id,
        resource_id,
        &config.http_method,
        OK_STATUS,
        MATCH_ANY_PATTERN,
    )?;
    gateway.put_method_response(rest_api_id, resource_id, &config.http_method, OK_STATUS)?;
    Ok(())
}

/// Issues the test-stage and prod-stage grants. Either failing aborts the run
/// with the function and gateway fully created but uninvokable.
fn grant_invoke(
    compute: &dyn ComputeApi,
    invoke_source_arn: &str,
    resource_id: &str,
    function: &ComputeFunctionRecord,
    config: &ProvisioningConfig,
) -> Result<(), ProvisionError> {
    for (stage, statement_suffix) in [("*", "test"), (identifiers::STAGE, "prod")] {
        compute.add_invoke_permission(&PermissionGrant {
            function_name: function.name.clone(),
            statement_id: format!("apigateway-{resource_id}-{statement_suffix}"),
            principal: "apigateway.amazonaws.com".to_string(),
            action: "lambda:InvokeFunction".to_string(),
            source_arn: format!(
                "{invoke_source_arn}/{stage}/{}/{}",
                config.http_method, config.function_name
            ),
        })?;
    }
    Ok(())
}
