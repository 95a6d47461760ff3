//! Error types for the agent factory

use thiserror::Error;

/// Errors surfaced by the external control plane, as seen through a port.
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    /// A resource with the same name already exists
    #[error("resource already exists: {0}")]
    Conflict(String),

    /// The referenced resource does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The control plane rejected the request
    #[error("control plane error: {0}")]
    Api(String),

    /// The control plane could not be reached
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ControlPlaneError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ControlPlaneError::Transport("request timed out".to_string())
        } else if err.is_connect() {
            ControlPlaneError::Transport(format!("connection error: {}", err))
        } else {
            ControlPlaneError::Transport(err.to_string())
        }
    }
}

/// Classification of deployment failures, each with its own remediation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentErrorKind {
    /// The execution role lacks the permissions the control plane requires
    PermissionDenied,
    /// The generic agent container image is missing from the registry
    ContainerNotFound,
    /// A required configuration value was not set
    ConfigurationMissing,
    /// Anything else
    Other,
}

impl std::fmt::Display for DeploymentErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentErrorKind::PermissionDenied => write!(f, "Permission Denied"),
            DeploymentErrorKind::ContainerNotFound => write!(f, "Container Not Found"),
            DeploymentErrorKind::ConfigurationMissing => write!(f, "Configuration Error"),
            DeploymentErrorKind::Other => write!(f, "Deployment Error"),
        }
    }
}

/// Errors that can occur during factory operations
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Malformed input, detected before any external call
    #[error("Validation error: {0}")]
    Validation(String),

    /// A2A connection setup failed
    #[error("A2A connection error: {0}")]
    Connection(String),

    /// Agent discovery failed
    #[error("Agent discovery error: {0}")]
    Discovery(String),

    /// Code synthesis or function packaging failed
    #[error("Tool packaging error: {0}")]
    Packaging(String),

    /// Runtime or gateway provisioning failed
    #[error("{kind}: {message}")]
    Deployment {
        kind: DeploymentErrorKind,
        message: String,
    },
}

impl FactoryError {
    /// Classify a control-plane failure message into a deployment error.
    ///
    /// Mirrors the control plane's error vocabulary: access failures and
    /// missing container images get dedicated remediation guidance.
    pub fn deployment_from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = if message.contains("AccessDenied") || message.contains("UnauthorizedOperation")
        {
            DeploymentErrorKind::PermissionDenied
        } else if message.contains("RepositoryNotFound") || message.contains("ImageNotFound") {
            DeploymentErrorKind::ContainerNotFound
        } else {
            DeploymentErrorKind::Other
        };
        FactoryError::Deployment { kind, message }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        FactoryError::Deployment {
            kind: DeploymentErrorKind::ConfigurationMissing,
            message: message.into(),
        }
    }

    /// Short label used in operator-facing reports.
    pub fn error_type(&self) -> String {
        match self {
            FactoryError::Validation(_) => "Validation Error".to_string(),
            FactoryError::Connection(_) => "A2A Connection Error".to_string(),
            FactoryError::Discovery(_) => "Agent Discovery Error".to_string(),
            FactoryError::Packaging(_) => "Tool Packaging Error".to_string(),
            FactoryError::Deployment { kind, .. } => kind.to_string(),
        }
    }

    /// Remediation hints rendered alongside the error message.
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            FactoryError::Validation(_) => vec![
                "Check the request fields against the documented format",
                "Tool schemas must be JSON objects with at least one property",
            ],
            FactoryError::Connection(_) => vec![
                "Verify the target agent id with the discovery endpoint",
                "A2A endpoints must be HTTPS URLs with a hostname",
            ],
            FactoryError::Discovery(_) => vec![
                "Check that the agent registry is reachable",
                "Confirm agents were deployed with A2A serving enabled",
            ],
            FactoryError::Packaging(_) => vec![
                "Check the tool definition and handler code",
                "Verify the function execution role is valid",
            ],
            FactoryError::Deployment { kind, .. } => match kind {
                DeploymentErrorKind::PermissionDenied => vec![
                    "Attach the factory policy to the execution role",
                    "Verify the execution role trusts the runtime service",
                ],
                DeploymentErrorKind::ContainerNotFound => vec![
                    "Push the generic agent container to the configured repository",
                    "Verify the container repository setting points at an existing image",
                ],
                DeploymentErrorKind::ConfigurationMissing => vec![
                    "Set the execution role ARN in the configuration file or environment",
                ],
                DeploymentErrorKind::Other => vec![
                    "Check credentials for the control plane",
                    "Verify the execution role has the necessary permissions",
                    "Check the control plane logs for more detail",
                ],
            },
        }
    }
}

/// Result type alias for factory operations
pub type FactoryResult<T> = Result<T, FactoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_classification() {
        let err = FactoryError::deployment_from_message("User is not authorized: AccessDenied");
        assert!(matches!(
            err,
            FactoryError::Deployment {
                kind: DeploymentErrorKind::PermissionDenied,
                ..
            }
        ));

        let err = FactoryError::deployment_from_message("RepositoryNotFoundException: no repo");
        assert!(matches!(
            err,
            FactoryError::Deployment {
                kind: DeploymentErrorKind::ContainerNotFound,
                ..
            }
        ));

        let err = FactoryError::deployment_from_message("something else went wrong");
        assert!(matches!(
            err,
            FactoryError::Deployment {
                kind: DeploymentErrorKind::Other,
                ..
            }
        ));
    }

    #[test]
    fn test_suggestions_never_empty() {
        let errors = [
            FactoryError::Validation("bad".into()),
            FactoryError::Connection("bad".into()),
            FactoryError::Discovery("bad".into()),
            FactoryError::Packaging("bad".into()),
            FactoryError::configuration("missing role"),
        ];
        for err in errors {
            assert!(!err.suggestions().is_empty());
        }
    }
}
