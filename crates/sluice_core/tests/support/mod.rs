//! Recording fakes for the remote API seams.
#![allow(dead_code)] // each integration test crate uses a different subset

use std::sync::Mutex;

use sluice_core::api::{
    ComputeApi, ComputeFunctionRecord, CreateFunctionRequest, GatewayApi, IntegrationSpec,
    MethodSpec, PermissionGrant, RoleResolver, ScheduleApi,
};
use sluice_core::error::ProvisionError;

pub fn function_record(name: &str) -> ComputeFunctionRecord {
    ComputeFunctionRecord {
        name: name.to_string(),
        arn: format!("arn:aws:lambda:us-east-1:123456789012:function:{name}"),
        runtime: "nodejs18.x".to_string(),
    }
}

// ── compute ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeComputeApi {
    pub existing: Vec<ComputeFunctionRecord>,
    /// When set, every lookup fails with this message (a non-not-found error).
    pub lookup_failure: Option<String>,
    /// When set, the grant with this statement id fails.
    pub failing_grant: Option<String>,
    pub lookups: Mutex<Vec<String>>,
    pub creates: Mutex<Vec<CreateFunctionRequest>>,
    pub grants: Mutex<Vec<PermissionGrant>>,
}

impl FakeComputeApi {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_function(name: &str) -> Self {
        Self {
            existing: vec![function_record(name)],
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("poisoned mutex").clone()
    }

    pub fn creates(&self) -> Vec<CreateFunctionRequest> {
        self.creates.lock().expect("poisoned mutex").clone()
    }

    pub fn grants(&self) -> Vec<PermissionGrant> {
        self.grants.lock().expect("poisoned mutex").clone()
    }
}

impl ComputeApi for FakeComputeApi {
    fn function_by_name(
        &self,
        name: &str,
    ) -> Result<Option<ComputeFunctionRecord>, ProvisionError> {
        self.lookups
            .lock()
            .expect("poisoned mutex")
            .push(name.to_string());
        if let Some(message) = &self.lookup_failure {
            return Err(ProvisionError::remote("function lookup", message.clone()));
        }
        Ok(self
            .existing
            .iter()
            .find(|function| function.name == name)
            .cloned())
    }

    fn create_function(
        &self,
        request: &CreateFunctionRequest,
    ) -> Result<ComputeFunctionRecord, ProvisionError> {
        self.creates
            .lock()
            .expect("poisoned mutex")
            .push(request.clone());
        Ok(ComputeFunctionRecord {
            name: request.name.clone(),
            arn: format!(
                "arn:aws:lambda:us-east-1:123456789012:function:{}",
                request.name
            ),
            runtime: request.runtime.clone(),
        })
    }

    fn add_invoke_permission(&self, grant: &PermissionGrant) -> Result<(), ProvisionError> {
        self.grants
            .lock()
            .expect("poisoned mutex")
            .push(grant.clone());
        if self.failing_grant.as_deref() == Some(grant.statement_id.as_str()) {
            return Err(ProvisionError::remote(
                "permission grant",
                "injected grant failure",
            ));
        }
        Ok(())
    }
}

// ── roles ──────────────────────────────────────────────────────────

pub struct FakeRoleResolver {
    pub arn: String,
    pub resolutions: Mutex<Vec<String>>,
}

impl FakeRoleResolver {
    pub fn resolving_to(arn: &str) -> Self {
        Self {
            arn: arn.to_string(),
            resolutions: Mutex::new(Vec::new()),
        }
    }

    pub fn resolutions(&self) -> Vec<String> {
        self.resolutions.lock().expect("poisoned mutex").clone()
    }
}

impl RoleResolver for FakeRoleResolver {
    fn execution_role_arn(&self, role_name: &str) -> Result<String, ProvisionError> {
        self.resolutions
            .lock()
            .expect("poisoned mutex")
            .push(role_name.to_string());
        Ok(self.arn.clone())
    }
}

// ── gateway ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    CreateRestApi {
        name: String,
        description: String,
    },
    RootResource {
        rest_api_id: String,
    },
    CreateResource {
        rest_api_id: String,
        parent_id: String,
        path_part: String,
    },
    PutMethod(MethodSpec),
    PutIntegration(IntegrationSpec),
    PutIntegrationResponse {
        http_method: String,
        status_code: String,
        selection_pattern: String,
    },
    PutMethodResponse {
        http_method: String,
        status_code: String,
    },
    CreateDeployment {
        rest_api_id: String,
        stage: String,
    },
}

pub const REST_API_ID: &str = "rest-api-1";
pub const ROOT_RESOURCE_ID: &str = "root-1";
pub const RESOURCE_ID: &str = "res-1";

#[derive(Default)]
pub struct FakeGatewayApi {
    /// Name of the step that fails after being recorded, if any.
    pub fail_at: Option<&'static str>,
    pub calls: Mutex<Vec<GatewayCall>>,
}

impl FakeGatewayApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(step: &'static str) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    fn step(&self, name: &'static str, call: GatewayCall) -> Result<(), ProvisionError> {
        self.calls.lock().expect("poisoned mutex").push(call);
        if self.fail_at == Some(name) {
            return Err(ProvisionError::remote(name, "injected gateway failure"));
        }
        Ok(())
    }
}

impl GatewayApi for FakeGatewayApi {
    fn create_rest_api(&self, name: &str, description: &str) -> Result<String, ProvisionError> {
        self.step(
            "container create",
            GatewayCall::CreateRestApi {
                name: name.to_string(),
                description: description.to_string(),
            },
        )?;
        Ok(REST_API_ID.to_string())
    }

    fn root_resource_id(&self, rest_api_id: &str) -> Result<String, ProvisionError> {
        self.step(
            "root resource lookup",
            GatewayCall::RootResource {
                rest_api_id: rest_api_id.to_string(),
            },
        )?;
        Ok(ROOT_RESOURCE_ID.to_string())
    }

    fn create_resource(
        &self,
        rest_api_id: &str,
        parent_id: &str,
        path_part: &str,
    ) -> Result<String, ProvisionError> {
        self.step(
            "resource create",
            GatewayCall::CreateResource {
                rest_api_id: rest_api_id.to_string(),
                parent_id: parent_id.to_string(),
                path_part: path_part.to_string(),
            },
        )?;
        Ok(RESOURCE_ID.to_string())
    }

    fn put_method(&self, method: &MethodSpec) -> Result<(), ProvisionError> {
        self.step("method registration", GatewayCall::PutMethod(method.clone()))
    }

    fn put_integration(&self, integration: &IntegrationSpec) -> Result<(), ProvisionError> {
        self.step(
            "integration registration",
            GatewayCall::PutIntegration(integration.clone()),
        )
    }

    fn put_integration_response(
        &self,
        _rest_api_id: &str,
        _resource_id: &str,
        http_method: &str,
        status_code: &str,
        selection_pattern: &str,
    ) -> Result<(), ProvisionError> {
        self.step(
            "integration response registration",
            GatewayCall::PutIntegrationResponse {
                http_method: http_method.to_string(),
                status_code: status_code.to_string(),
                selection_pattern: selection_pattern.to_string(),
            },
        )
    }

    fn put_method_response(
        &self,
        _rest_api_id: &str,
        _resource_id: &str,
        http_method: &str,
        status_code: &str,
    ) -> Result<(), ProvisionError> {
        self.step(
            "method response registration",
            GatewayCall::PutMethodResponse {
                http_method: http_method.to_string(),
                status_code: status_code.to_string(),
            },
        )
    }

    fn create_deployment(&self, rest_api_id: &str, stage: &str) -> Result<(), ProvisionError> {
        self.step(
            "deployment create",
            GatewayCall::CreateDeployment {
                rest_api_id: rest_api_id.to_string(),
                stage: stage.to_string(),
            },
        )
    }
}

// ── scheduler ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeScheduleApi {
    pub rules: Mutex<Vec<(String, String)>>,
    pub targets: Mutex<Vec<(String, String, String)>>,
}

impl FakeScheduleApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> Vec<(String, String)> {
        self.rules.lock().expect("poisoned mutex").clone()
    }

    pub fn targets(&self) -> Vec<(String, String, String)> {
        self.targets.lock().expect("poisoned mutex").clone()
    }
}

impl ScheduleApi for FakeScheduleApi {
    fn put_rule(&self, name: &str, schedule_expression: &str) -> Result<(), ProvisionError> {
        self.rules
            .lock()
            .expect("poisoned mutex")
            .push((name.to_string(), schedule_expression.to_string()));
        Ok(())
    }

    fn put_target(
        &self,
        rule_name: &str,
        target_id: &str,
        target_arn: &str,
    ) -> Result<(), ProvisionError> {
        self.targets.lock().expect("poisoned mutex").push((
            rule_name.to_string(),
            target_id.to_string(),
            target_arn.to_string(),
        ));
        Ok(())
    }
}
