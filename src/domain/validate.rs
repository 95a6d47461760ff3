//! Input validation for factory operations
//!
//! Every check here runs before any control-plane call; failures are
//! `FactoryError::Validation` with a reason the caller can surface directly.

use url::Url;

use super::error::{FactoryError, FactoryResult};

/// Validate an agent name against managed-resource naming rules:
/// 1-63 characters, starts with a letter, alphanumeric plus hyphens,
/// no trailing or consecutive hyphens.
pub fn validate_agent_name(name: &str) -> FactoryResult<()> {
    if name.is_empty() {
        return Err(FactoryError::Validation("Agent name cannot be empty".into()));
    }
    if name.len() > 63 {
        return Err(FactoryError::Validation(format!(
            "Agent name must be at most 63 characters long, got {}",
            name.len()
        )));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(FactoryError::Validation(format!(
            "Agent name must start with a letter, got '{}'",
            name.chars().next().unwrap_or_default()
        )));
    }
    if name.ends_with('-') {
        return Err(FactoryError::Validation(
            "Agent name cannot end with a hyphen".into(),
        ));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
    {
        return Err(FactoryError::Validation(format!(
            "Agent name contains invalid character '{}': only alphanumeric characters and hyphens are allowed",
            bad
        )));
    }
    if name.contains("--") {
        return Err(FactoryError::Validation(
            "Agent name cannot contain consecutive hyphens".into(),
        ));
    }
    Ok(())
}

/// Validate a system prompt: non-blank, 10 to 10,000 characters of content.
pub fn validate_system_prompt(prompt: &str) -> FactoryResult<()> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(FactoryError::Validation(
            "System prompt cannot be empty or only whitespace".into(),
        ));
    }
    if trimmed.len() < 10 {
        return Err(FactoryError::Validation(format!(
            "System prompt must be at least 10 characters long, got {}",
            trimmed.len()
        )));
    }
    if trimmed.len() > 10_000 {
        return Err(FactoryError::Validation(format!(
            "System prompt must be at most 10000 characters long, got {}",
            trimmed.len()
        )));
    }
    Ok(())
}

/// Validate a model id. Ids are `provider.model-name` (optionally prefixed
/// with a routing scope), so a bare word is rejected early.
pub fn validate_model_id(model_id: &str) -> FactoryResult<()> {
    if model_id.trim().is_empty() {
        return Err(FactoryError::Validation("Model ID cannot be empty".into()));
    }
    if !model_id.contains('.') {
        return Err(FactoryError::Validation(format!(
            "Model ID appears invalid: {}. Expected format: provider.model-name",
            model_id
        )));
    }
    Ok(())
}

/// Validate a capability list: at least one entry, none blank.
pub fn validate_capabilities(capabilities: &[String]) -> FactoryResult<()> {
    if capabilities.is_empty() {
        return Err(FactoryError::Validation(
            "Agent must have at least one capability".into(),
        ));
    }
    for (i, capability) in capabilities.iter().enumerate() {
        if capability.trim().is_empty() {
            return Err(FactoryError::Validation(format!(
                "Capability at index {} cannot be empty",
                i
            )));
        }
    }
    Ok(())
}

/// Validate an ARN: `arn:aws:service:region:account-id:resource` with a
/// 12-digit account. `resource_type` narrows the check to e.g. `role`.
pub fn validate_arn(arn: &str, resource_type: Option<&str>) -> FactoryResult<()> {
    if arn.is_empty() {
        return Err(FactoryError::Validation("ARN cannot be empty".into()));
    }
    let parts: Vec<&str> = arn.splitn(6, ':').collect();
    let well_formed = parts.len() == 6
        && parts[0] == "arn"
        && parts[1].starts_with("aws")
        && !parts[2].is_empty()
        && parts[4].len() == 12
        && parts[4].chars().all(|c| c.is_ascii_digit())
        && !parts[5].is_empty();
    if !well_formed {
        return Err(FactoryError::Validation(format!(
            "Invalid ARN format: {}. Expected format: arn:aws:service:region:account-id:resource",
            arn
        )));
    }
    if let Some(resource_type) = resource_type {
        let resource = parts[5];
        if !resource.starts_with(&format!("{}/", resource_type)) && resource != resource_type {
            return Err(FactoryError::Validation(format!(
                "ARN does not appear to be for resource type '{}': {}",
                resource_type, arn
            )));
        }
    }
    Ok(())
}

/// Validate an A2A endpoint URL: absolute, HTTPS, with a hostname.
pub fn validate_a2a_url(raw: &str) -> FactoryResult<()> {
    if raw.trim().is_empty() {
        return Err(FactoryError::Validation("A2A URL cannot be empty".into()));
    }
    let parsed = Url::parse(raw)
        .map_err(|e| FactoryError::Validation(format!("Invalid A2A URL format: {}", e)))?;
    if parsed.scheme() != "https" {
        return Err(FactoryError::Validation(format!(
            "A2A URL must use HTTPS protocol, got: {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().map_or(true, |h| h.is_empty()) {
        return Err(FactoryError::Validation(
            "A2A URL must have a valid hostname".into(),
        ));
    }
    Ok(())
}
