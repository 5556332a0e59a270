//! Attaches a time-based trigger rule to an existing function.

use crate::api::{ComputeApi, PermissionGrant, ScheduleApi};
use crate::config::ProvisioningConfig;
use crate::error::ProvisionError;
use crate::identifiers;

/// Fixed id of the single target attached to each rule.
const TARGET_ID: &str = "1";

/// Grants the scheduler service invoke permission, creates or overwrites the
/// rule named by the alphanumeric reduction of `expression`, and attaches the
/// function as the rule's sole target.
///
/// The function must already exist; this workflow never creates one. Any step
/// failing aborts with no cleanup of grants or rules already created.
pub fn create_schedule(
    compute: &dyn ComputeApi,
    scheduler: &dyn ScheduleApi,
    config: &ProvisioningConfig,
    expression: &str,
) -> Result<(), ProvisionError> {
    config.validate()?;
    let function = compute
        .function_by_name(&config.function_name)?
        .ok_or_else(|| {
            ProvisionError::remote(
                "function lookup",
                format!("function {} does not exist", config.function_name),
            )
        })?;

    compute.add_invoke_permission(&PermissionGrant {
        function_name: function.name.clone(),
        statement_id: format!("scheduler-{}", function.name),
        principal: "events.amazonaws.com".to_string(),
        action: "lambda:InvokeFunction".to_string(),
        source_arn: identifiers::scheduler_source_arn(&function.arn)?,
    })?;

    let rule = identifiers::rule_name(expression);
    scheduler.put_rule(&rule, expression)?;
    scheduler.put_target(&rule, TARGET_ID, &function.arn)?;
    log::info!("schedule {expression:?} attached to {} as rule {rule}", function.name);
    Ok(())
}
