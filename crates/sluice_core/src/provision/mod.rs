//! End-to-end provisioning workflows over injected API seams.

mod compute;
mod gateway;
mod schedule;

pub use compute::ensure_function;
pub use gateway::{provision_gateway, GatewayRecord};
pub use schedule::create_schedule;

use crate::api::{ComputeApi, ComputeFunctionRecord, GatewayApi, RoleResolver, ScheduleApi};
use crate::config::ProvisioningConfig;
use crate::error::ProvisionError;

/// Sequences the provisioning workflows over caller-constructed API handles.
///
/// Every step is a blocking remote call; the first failure aborts the run
/// with no compensating cleanup. All state accumulated by a run lives in the
/// returned records; nothing is persisted and nothing is shared across runs.
pub struct Provisioner<'a> {
    pub compute: &'a dyn ComputeApi,
    pub gateway: &'a dyn GatewayApi,
    pub scheduler: &'a dyn ScheduleApi,
    pub roles: &'a dyn RoleResolver,
}

/// Result of a completed endpoint run.
#[derive(Debug, Clone)]
pub struct EndpointOutcome {
    pub function: ComputeFunctionRecord,
    /// `None` when the run was configured to skip the gateway.
    pub gateway: Option<GatewayRecord>,
}

impl Provisioner<'_> {
    /// The end-to-end endpoint workflow: ensure the function exists, then
    /// (unless the gateway is disabled) create, wire and deploy the front
    /// door and grant it invoke permission.
    pub fn create_endpoint(
        &self,
        config: &ProvisioningConfig,
    ) -> Result<EndpointOutcome, ProvisionError> {
        let function = ensure_function(self.compute, self.roles, config)?;
        if config.no_gateway {
            log::info!("gateway disabled, stopping after function setup");
            return Ok(EndpointOutcome {
                function,
                gateway: None,
            });
        }
        let gateway = provision_gateway(self.gateway, self.compute, &function, config)?;
        Ok(EndpointOutcome {
            function,
            gateway: Some(gateway),
        })
    }

    /// Attaches a time-based trigger rule to an existing function. The
    /// function is never created implicitly here.
    pub fn create_schedule(
        &self,
        config: &ProvisioningConfig,
        expression: &str,
    ) -> Result<(), ProvisionError> {
        create_schedule(self.compute, self.scheduler, config, expression)
    }
}
