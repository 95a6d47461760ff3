use thiserror::Error;
use url::Url;

use crate::config::{ControlPlaneMode, Settings};
use crate::domain::validate::{validate_arn, validate_model_id};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if settings.server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }
        if settings.server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let platform = &settings.platform;
        if !platform.execution_role_arn.is_empty() {
            if let Err(e) = validate_arn(&platform.execution_role_arn, Some("role")) {
                errors.push(ValidationError::InvalidValue {
                    field: "platform.execution_role_arn".to_string(),
                    reason: e.to_string(),
                });
            }
        }
        if let Some(role) = &platform.lambda_execution_role_arn {
            if let Err(e) = validate_arn(role, Some("role")) {
                errors.push(ValidationError::InvalidValue {
                    field: "platform.lambda_execution_role_arn".to_string(),
                    reason: e.to_string(),
                });
            }
        }
        if let Err(e) = validate_model_id(&platform.model_id) {
            errors.push(ValidationError::InvalidValue {
                field: "platform.model_id".to_string(),
                reason: e.to_string(),
            });
        }

        if settings.control_plane.mode == ControlPlaneMode::Http {
            match &settings.control_plane.base_url {
                None => errors.push(ValidationError::MissingField(
                    "control_plane.base_url".to_string(),
                )),
                Some(base_url) => {
                    if Url::parse(base_url).is_err() {
                        errors.push(ValidationError::InvalidValue {
                            field: "control_plane.base_url".to_string(),
                            reason: "Not a valid URL".to_string(),
                        });
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControlPlaneSettings, PlatformSettings, ServerSettings};

    fn settings() -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            platform: PlatformSettings::default(),
            control_plane: ControlPlaneSettings::default(),
        }
    }

    #[test]
    fn test_valid_defaults() {
        assert!(ConfigValidator::validate(&settings()).is_ok());
    }

    #[test]
    fn test_http_mode_requires_base_url() {
        let mut s = settings();
        s.control_plane.mode = ControlPlaneMode::Http;
        assert!(ConfigValidator::validate(&s).is_err());

        s.control_plane.base_url = Some("https://control.example.com".to_string());
        assert!(ConfigValidator::validate(&s).is_ok());

        s.control_plane.base_url = Some("not a url".to_string());
        assert!(ConfigValidator::validate(&s).is_err());
    }

    #[test]
    fn test_bad_execution_role_rejected() {
        let mut s = settings();
        s.platform.execution_role_arn = "not-an-arn".to_string();
        assert!(ConfigValidator::validate(&s).is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut s = settings();
        s.server.port = 0;
        assert!(ConfigValidator::validate(&s).is_err());
    }
}
