//! Code-bundle acquisition and the built-in templates.

use std::path::PathBuf;

use crate::config::ProvisioningConfig;
use crate::error::ProvisionError;
use crate::fetch;

/// Zip of a minimal NodeJS function that echoes the request body back. Used
/// whenever no code source is configured.
pub const DEFAULT_BUNDLE: &[u8] = include_bytes!("../assets/echo.zip");

/// Entry point registered for every function this tool creates.
pub const HANDLER: &str = "index.handler";

/// Trust document allowing the compute service to assume a created role.
pub const TRUST_DOCUMENT: &str = r#"{
  "Version": "2012-10-17",
  "Statement": {
    "Effect": "Allow",
    "Principal": {"Service": "lambda.amazonaws.com"},
    "Action": "sts:AssumeRole"
  }
}
"#;

/// Inline policy for a role that may only write its own logs.
pub const BASIC_POLICY: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [
    {
      "Effect": "Allow",
      "Action": [
        "logs:CreateLogGroup",
        "logs:CreateLogStream",
        "logs:PutLogEvents"
      ],
      "Resource": "arn:aws:logs:*:*:*"
    }
  ]
}
"#;

/// Basic policy plus object-storage read/write access.
pub const S3_POLICY: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [
    {
      "Effect": "Allow",
      "Action": [
        "logs:CreateLogGroup",
        "logs:CreateLogStream",
        "logs:PutLogEvents"
      ],
      "Resource": "arn:aws:logs:*:*:*"
    },
    {
      "Effect": "Allow",
      "Action": [
        "s3:GetObject",
        "s3:PutObject"
      ],
      "Resource": [
        "arn:aws:s3:::*"
      ]
    }
  ]
}
"#;

/// Everything the provisioner itself needs when installed as a function.
pub const PROVISIONER_POLICY: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [
    {
      "Effect": "Allow",
      "Action": [
        "logs:CreateLogGroup",
        "logs:CreateLogStream",
        "logs:PutLogEvents",
        "apigateway:*",
        "lambda:AddPermission",
        "lambda:CreateFunction",
        "lambda:GetFunctionConfiguration"
      ],
      "Resource": "*"
    },
    {
      "Effect": "Allow",
      "Action": [
        "iam:GetRole",
        "iam:PassRole"
      ],
      "Resource": "arn:aws:iam::*:role/*"
    }
  ]
}
"#;

/// Resolves the configured code source to the bytes handed to the create call:
/// a local file, a downloaded remote bundle, or the built-in echo bundle when
/// nothing was configured.
pub fn code_bytes(config: &ProvisioningConfig) -> Result<Vec<u8>, ProvisionError> {
    let Some(source) = config.code_source.as_deref() else {
        log::debug!("no code source configured, using the built-in echo bundle");
        return Ok(DEFAULT_BUNDLE.to_vec());
    };
    let path = if config.has_remote_source() {
        fetch::download_bundle(source)?
    } else {
        PathBuf::from(source)
    };
    Ok(std::fs::read(path)?)
}
