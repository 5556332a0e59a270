use std::fmt;

/// Failure surface for a provisioning run.
///
/// Two classes matter to callers: `Config` failures are raised before the
/// offending remote call is attempted, everything else surfaces a remote or
/// local failure verbatim. Nothing is retried, and a run that fails midway
/// leaves already-created resources in place.
#[derive(Debug)]
pub enum ProvisionError {
    /// Rejected input, detected without touching the remote service.
    Config(String),
    /// A remote call failed; the service message is passed through verbatim.
    Remote {
        operation: &'static str,
        message: String,
    },
    /// Downloading a remote code bundle failed.
    Fetch(String),
    /// Reading or writing a local code bundle failed.
    Io(std::io::Error),
}

impl ProvisionError {
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        ProvisionError::Remote {
            operation,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionError::Config(message) => write!(f, "{message}"),
            ProvisionError::Remote { operation, message } => {
                write!(f, "{operation} failed: {message}")
            }
            ProvisionError::Fetch(message) => write!(f, "bundle download failed: {message}"),
            ProvisionError::Io(err) => write!(f, "bundle file error: {err}"),
        }
    }
}

impl std::error::Error for ProvisionError {}

impl From<std::io::Error> for ProvisionError {
    fn from(err: std::io::Error) -> Self {
        ProvisionError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_name_the_failed_operation() {
        let err = ProvisionError::remote("method registration", "access denied");
        assert_eq!(err.to_string(), "method registration failed: access denied");
    }

    #[test]
    fn config_errors_pass_the_message_through() {
        let err = ProvisionError::Config("a function name is required".to_string());
        assert_eq!(err.to_string(), "a function name is required");
    }
}
