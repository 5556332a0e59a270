//! Pure identifier derivations shared by the gateway and schedule workflows.
//!
//! Remote identifiers are parsed into their colon-separated fields and
//! substituted by field, so a function name that happens to appear inside the
//! account or region segment can never be clobbered by the rewrite.

use std::fmt;

use crate::error::ProvisionError;

/// Deployment stage every gateway is published onto.
pub const STAGE: &str = "prod";

/// A cross-service resource identifier split into its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account: String,
    pub resource: String,
}

impl Arn {
    /// Parses `arn:<partition>:<service>:<region>:<account>:<resource>`. The
    /// resource field keeps any further colons verbatim.
    pub fn parse(raw: &str) -> Result<Self, ProvisionError> {
        let mut parts = raw.splitn(6, ':');
        match (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) {
            (Some("arn"), Some(partition), Some(service), Some(region), Some(account), Some(resource)) => {
                Ok(Self {
                    partition: partition.to_string(),
                    service: service.to_string(),
                    region: region.to_string(),
                    account: account.to_string(),
                    resource: resource.to_string(),
                })
            }
            _ => Err(ProvisionError::remote(
                "identifier derivation",
                format!("malformed resource identifier: {raw}"),
            )),
        }
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, self.resource
        )
    }
}

/// Identifier pattern under which the gateway's execute-api service invokes
/// the function: the function ARN with the service swapped to `execute-api`
/// and the `function:<name>` resource swapped to the container id.
pub fn invoke_source_arn(function_arn: &str, rest_api_id: &str) -> Result<String, ProvisionError> {
    let mut arn = Arn::parse(function_arn)?;
    arn.service = "execute-api".to_string();
    arn.resource = rest_api_id.to_string();
    Ok(arn.to_string())
}

/// Identifier the scheduler rule fires under: the function ARN with the
/// service swapped to `events` and the `function:` prefix swapped to `rule/`.
pub fn scheduler_source_arn(function_arn: &str) -> Result<String, ProvisionError> {
    let mut arn = Arn::parse(function_arn)?;
    let name = arn.resource.strip_prefix("function:").ok_or_else(|| {
        ProvisionError::remote(
            "identifier derivation",
            format!("not a function identifier: {function_arn}"),
        )
    })?;
    arn.resource = format!("rule/{name}");
    arn.service = "events".to_string();
    Ok(arn.to_string())
}

/// URI the gateway integration invokes the function through.
pub fn invocation_uri(region: &str, function_arn: &str) -> String {
    format!("arn:aws:apigateway:{region}:lambda:path/2015-03-31/functions/{function_arn}/invocations")
}

/// Public URL of the deployed endpoint.
pub fn endpoint_url(rest_api_id: &str, region: &str, path_name: &str) -> String {
    format!("https://{rest_api_id}.execute-api.{region}.amazonaws.com/{STAGE}/{path_name}")
}

/// Rule names keep only the ASCII alphanumerics of the raw schedule
/// expression. The reduction is idempotent, and expressions differing only in
/// punctuation deliberately collide: the last rule written wins.
pub fn rule_name(expression: &str) -> String {
    expression
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
