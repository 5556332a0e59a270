//! Idempotent get-or-create for the backing compute function.

use crate::api::{ComputeApi, ComputeFunctionRecord, CreateFunctionRequest, RoleResolver};
use crate::bundle::{self, HANDLER};
use crate::config::ProvisioningConfig;
use crate::error::ProvisionError;

/// Returns the function named in `config`, creating it first if the remote
/// service does not know it.
///
/// An existing function is returned unchanged: no update-in-place, no drift
/// correction. Only a resource-not-found lookup result proceeds to creation;
/// any other lookup failure aborts the run. Creation requires a role name,
/// checked before the role lookup, the bundle acquisition and the create call
/// are attempted.
pub fn ensure_function(
    compute: &dyn ComputeApi,
    roles: &dyn RoleResolver,
    config: &ProvisioningConfig,
) -> Result<ComputeFunctionRecord, ProvisionError> {
    config.validate()?;
    if let Some(existing) = compute.function_by_name(&config.function_name)? {
        log::info!("function {} already exists, leaving it untouched", existing.name);
        return Ok(existing);
    }
    create_function(compute, roles, config)
}

fn create_function(
    compute: &dyn ComputeApi,
    roles: &dyn RoleResolver,
    config: &ProvisioningConfig,
) -> Result<ComputeFunctionRecord, ProvisionError> {
    let role_name = config.creation_role()?;
    let role_arn = roles.execution_role_arn(role_name)?;
    let code = bundle::code_bytes(config)?;
    log::info!(
        "creating function {} with a {} byte bundle",
        config.function_name,
        code.len()
    );
    compute.create_function(&CreateFunctionRequest {
        name: config.function_name.clone(),
        handler: HANDLER.to_string(),
        role_arn,
        runtime: config.runtime.clone(),
        code,
    })
}
