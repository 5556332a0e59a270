//! AWS SDK adapters behind the core provisioning seams.
//!
//! The orchestration contract is synchronous, so every adapter method hops
//! onto the ambient runtime with `block_in_place` + `block_on`, the same way
//! the rest of this workspace bridges sync call sites to the async SDK.

use aws_sdk_lambda::error::DisplayErrorContext;

use sluice_core::api::{
    ComputeApi, ComputeFunctionRecord, CreateFunctionRequest, GatewayApi, IntegrationSpec,
    MethodSpec, PermissionGrant, RoleResolver, ScheduleApi,
};
use sluice_core::error::ProvisionError;
use sluice_core::identifiers::STAGE;

/// One client handle per remote service, built once per run from the shared
/// SDK config and reused for its duration. Nothing is shared across runs.
pub struct AwsApis {
    lambda: aws_sdk_lambda::Client,
    apigateway: aws_sdk_apigateway::Client,
    events: aws_sdk_cloudwatchevents::Client,
    iam: aws_sdk_iam::Client,
}

impl AwsApis {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            lambda: aws_sdk_lambda::Client::new(sdk_config),
            apigateway: aws_sdk_apigateway::Client::new(sdk_config),
            events: aws_sdk_cloudwatchevents::Client::new(sdk_config),
            iam: aws_sdk_iam::Client::new(sdk_config),
        }
    }

    /// Names of all roles the caller has access to.
    pub fn role_names(&self) -> Result<Vec<String>, ProvisionError> {
        run_blocking(async {
            let output = self
                .iam
                .list_roles()
                .send()
                .await
                .map_err(|err| remote_error("role list", err))?;
            Ok(output.roles.into_iter().map(|role| role.role_name).collect())
        })
    }

    /// Creates a role under the fixed trust document and attaches `policy` as
    /// its inline policy.
    pub fn create_role(&self, role_name: &str, policy: &str) -> Result<(), ProvisionError> {
        run_blocking(async {
            self.iam
                .create_role()
                .role_name(role_name)
                .assume_role_policy_document(sluice_core::bundle::TRUST_DOCUMENT)
                .send()
                .await
                .map_err(|err| remote_error("role create", err))?;
            self.iam
                .put_role_policy()
                .role_name(role_name)
                .policy_name("sluice-inline-policy")
                .policy_document(policy)
                .send()
                .await
                .map(|_| ())
                .map_err(|err| remote_error("role policy attach", err))
        })
    }

    /// Lists API keys as (id, name) pairs.
    pub fn api_keys(&self) -> Result<Vec<(String, String)>, ProvisionError> {
        run_blocking(async {
            let output = self
                .apigateway
                .get_api_keys()
                .send()
                .await
                .map_err(|err| remote_error("api key list", err))?;
            Ok(output
                .items
                .unwrap_or_default()
                .into_iter()
                .map(|key| (key.id.unwrap_or_default(), key.name.unwrap_or_default()))
                .collect())
        })
    }

    /// Creates an API key, optionally bound to a container's prod stage, and
    /// returns its id.
    pub fn create_api_key(
        &self,
        name: &str,
        description: &str,
        enabled: bool,
        rest_api_id: Option<&str>,
    ) -> Result<String, ProvisionError> {
        run_blocking(async {
            let mut call = self
                .apigateway
                .create_api_key()
                .name(name)
                .description(description)
                .enabled(enabled);
            if let Some(id) = rest_api_id {
                call = call.stage_keys(
                    aws_sdk_apigateway::types::StageKey::builder()
                        .rest_api_id(id)
                        .stage_name(STAGE)
                        .build(),
                );
            }
            let output = call
                .send()
                .await
                .map_err(|err| remote_error("api key create", err))?;
            output.id.ok_or_else(|| {
                ProvisionError::remote("api key create", "response carried no key id")
            })
        })
    }
}

fn run_blocking<T, F>(future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn remote_error<E>(operation: &'static str, err: E) -> ProvisionError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ProvisionError::remote(operation, DisplayErrorContext(err).to_string())
}

impl ComputeApi for AwsApis {
    fn function_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ComputeFunctionRecord>, ProvisionError> {
        run_blocking(async {
            match self
                .lambda
                .get_function_configuration()
                .function_name(name)
                .send()
                .await
            {
                Ok(output) => Ok(Some(ComputeFunctionRecord {
                    name: output.function_name.unwrap_or_else(|| name.to_string()),
                    arn: output.function_arn.unwrap_or_default(),
                    runtime: output
                        .runtime
                        .map(|runtime| runtime.as_str().to_string())
                        .unwrap_or_default(),
                })),
                Err(err) => {
                    // Not-found is the signal to create, every other lookup
                    // failure aborts the run.
                    let service_error = err.into_service_error();
                    if service_error.is_resource_not_found_exception() {
                        Ok(None)
                    } else {
                        Err(remote_error("function lookup", service_error))
                    }
                }
            }
        })
    }

    fn create_function(
        &self,
        request: &CreateFunctionRequest,
    ) -> Result<ComputeFunctionRecord, ProvisionError> {
        run_blocking(async {
            let code = aws_sdk_lambda::types::FunctionCode::builder()
                .zip_file(aws_sdk_lambda::primitives::Blob::new(request.code.clone()))
                .build();
            let output = self
                .lambda
                .create_function()
                .function_name(&request.name)
                .handler(&request.handler)
                .role(&request.role_arn)
                .runtime(aws_sdk_lambda::types::Runtime::from(request.runtime.as_str()))
                .code(code)
                .send()
                .await
                .map_err(|err| remote_error("function create", err))?;
            Ok(ComputeFunctionRecord {
                name: output.function_name.unwrap_or_else(|| request.name.clone()),
                arn: output.function_arn.unwrap_or_default(),
                runtime: output
                    .runtime
                    .map(|runtime| runtime.as_str().to_string())
                    .unwrap_or_else(|| request.runtime.clone()),
            })
        })
    }

    fn add_invoke_permission(&self, grant: &PermissionGrant) -> Result<(), ProvisionError> {
        run_blocking(async {
            self.lambda
                .add_permission()
                .function_name(&grant.function_name)
                .statement_id(&grant.statement_id)
                .action(&grant.action)
                .principal(&grant.principal)
                .source_arn(&grant.source_arn)
                .send()
                .await
                .map(|_| ())
                .map_err(|err| remote_error("permission grant", err))
        })
    }
}

impl RoleResolver for AwsApis {
    fn execution_role_arn(&self, role_name: &str) -> Result<String, ProvisionError> {
        run_blocking(async {
            let output = self
                .iam
                .get_role()
                .role_name(role_name)
                .send()
                .await
                .map_err(|err| remote_error("role lookup", err))?;
            output.role.map(|role| role.arn).ok_or_else(|| {
                ProvisionError::remote("role lookup", format!("no role named {role_name}"))
            })
        })
    }
}

impl GatewayApi for AwsApis {
    fn create_rest_api(&self, name: &str, description: &str) -> Result<String, ProvisionError> {
        run_blocking(async {
            let output = self
                .apigateway
                .create_rest_api()
                .name(name)
                .description(description)
                .send()
                .await
                .map_err(|err| remote_error("gateway container create", err))?;
            output.id.ok_or_else(|| {
                ProvisionError::remote("gateway container create", "response carried no id")
            })
        })
    }

    fn root_resource_id(&self, rest_api_id: &str) -> Result<String, ProvisionError> {
        run_blocking(async {
            let output = self
                .apigateway
                .get_resources()
                .rest_api_id(rest_api_id)
                .limit(1)
                .send()
                .await
                .map_err(|err| remote_error("root resource lookup", err))?;
            output
                .items
                .unwrap_or_default()
                .into_iter()
                .next()
                .and_then(|resource| resource.id)
                .ok_or_else(|| {
                    ProvisionError::remote("root resource lookup", "container has no root resource")
                })
        })
    }

    fn create_resource(
        &self,
        rest_api_id: &str,
        parent_id: &str,
        path_part: &str,
    ) -> Result<String, ProvisionError> {
        run_blocking(async {
            let output = self
                .apigateway
                .create_resource()
                .rest_api_id(rest_api_id)
                .parent_id(parent_id)
                .path_part(path_part)
                .send()
                .await
                .map_err(|err| remote_error("resource create", err))?;
            output.id.ok_or_else(|| {
                ProvisionError::remote("resource create", "response carried no resource id")
            })
        })
    }

    fn put_method(&self, method: &MethodSpec) -> Result<(), ProvisionError> {
        run_blocking(async {
            self.apigateway
                .put_method()
                .rest_api_id(&method.rest_api_id)
                .resource_id(&method.resource_id)
                .http_method(&method.http_method)
                .authorization_type(&method.authorization)
                .api_key_required(method.api_key_required)
                .send()
                .await
                .map(|_| ())
                .map_err(|err| remote_error("method registration", err))
        })
    }

    fn put_integration(&self, integration: &IntegrationSpec) -> Result<(), ProvisionError> {
        run_blocking(async {
            self.apigateway
                .put_integration()
                .rest_api_id(&integration.rest_api_id)
                .resource_id(&integration.resource_id)
                .http_method(&integration.http_method)
                .r#type(aws_sdk_apigateway::types::IntegrationType::Aws)
                .integration_http_method(&integration.http_method)
                .uri(&integration.uri)
                .request_templates(&integration.content_type, &integration.request_template)
                .send()
                .await
                .map(|_| ())
                .map_err(|err| remote_error("integration registration", err))
        })
    }

    fn put_integration_response(
        &self,
        rest_api_id: &str,
        resource_id: &str,
        http_method: &str,
        status_code: &str,
        selection_pattern: &str,
    ) -> Result<(), ProvisionError> {
        run_blocking(async {
            self.apigateway
                .put_integration_response()
                .rest_api_id(rest_api_id)
                .resource_id(resource_id)
                .http_method(http_method)
                .status_code(status_code)
                .selection_pattern(selection_pattern)
                .send()
                .await
                .map(|_| ())
                .map_err(|err| remote_error("integration response registration", err))
        })
    }

    fn put_method_response(
        &self,
        rest_api_id: &str,
        resource_id: &str,
        http_method: &str,
        status_code: &str,
    ) -> Result<(), ProvisionError> {
        run_blocking(async {
            self.apigateway
                .put_method_response()
                .rest_api_id(rest_api_id)
                .resource_id(resource_id)
                .http_method(http_method)
                .status_code(status_code)
                .set_response_models(Some(std::collections::HashMap::new()))
                .send()
                .await
                .map(|_| ())
                .map_err(|err| remote_error("method response registration", err))
        })
    }

    fn create_deployment(&self, rest_api_id: &str, stage: &str) -> Result<(), ProvisionError> {
        run_blocking(async {
            self.apigateway
                .create_deployment()
                .rest_api_id(rest_api_id)
                .stage_name(stage)
                .send()
                .await
                .map(|_| ())
                .map_err(|err| remote_error("deployment create", err))
        })
    }
}

impl ScheduleApi for AwsApis {
    fn put_rule(&self, name: &str, schedule_expression: &str) -> Result<(), ProvisionError> {
        run_blocking(async {
            self.events
                .put_rule()
                .name(name)
                .schedule_expression(schedule_expression)
                .send()
                .await
                .map(|_| ())
                .map_err(|err| remote_error("rule create", err))
        })
    }

    fn put_target(
        &self,
        rule_name: &str,
        target_id: &str,
        target_arn: &str,
    ) -> Result<(), ProvisionError> {
        run_blocking(async {
            let target = aws_sdk_cloudwatchevents::types::Target::builder()
                .id(target_id)
                .arn(target_arn)
                .build()
                .map_err(|err| ProvisionError::remote("rule target attach", err.to_string()))?;
            self.events
                .put_targets()
                .rule(rule_name)
                .targets(target)
                .send()
                .await
                .map(|_| ())
                .map_err(|err| remote_error("rule target attach", err))
        })
    }
}
