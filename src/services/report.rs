//! Operator-facing result rendering
//!
//! Every public operation answers in natural language plus
//! machine-checkable identifiers. These renderers produce the text blocks
//! shown in the builder conversation.

use crate::domain::{A2AConnection, DeploymentSummary, DiscoveredAgent, FactoryError, RuntimeSummary};

use super::deployment::DeployOutcome;
use super::gateway::GatewayOutcome;
use super::tools::{BatchOutcome, RegistrationReport};

const BOX_WIDTH: usize = 78;

fn banner(title: &str) -> String {
    let inner = BOX_WIDTH - 2;
    format!(
        "╔{line}╗\n║{title:^inner$}║\n╚{line}╝",
        line = "═".repeat(inner),
        title = title,
        inner = inner,
    )
}

fn rule() -> String {
    "━".repeat(BOX_WIDTH)
}

/// Render a gateway creation outcome.
pub fn render_gateway_outcome(outcome: &GatewayOutcome) -> String {
    match outcome {
        GatewayOutcome::Created {
            gateway_id,
            gateway_name,
            description,
            gateway_url,
        } => format!(
            "{banner}\n\n\
             Gateway: {name}\n\
             Gateway ID: {id}\n\
             Description: {description}\n\
             Endpoint: {url}\n\n\
             {rule}\n\n\
             Next steps:\n\
             \x20 1. Create tools and register them with this gateway\n\
             \x20 2. Deploy agents with gateway_id='{id}'\n\
             \x20 3. Agents will have access to all tools in this gateway\n\n\
             {rule}",
            banner = banner("GATEWAY CREATED SUCCESSFULLY"),
            name = gateway_name,
            id = gateway_id,
            description = description,
            url = gateway_url.as_deref().unwrap_or("N/A"),
            rule = rule(),
        ),
        GatewayOutcome::DuplicateBlocked {
            gateway_id,
            gateway_name,
        } => format!(
            "{banner}\n\n\
             A gateway has already been created in this session: {name}\n\
             Gateway ID: {id}\n\n\
             Use this gateway_id for creating tools and deploying the agent.\n\n\
             {rule}",
            banner = banner("DUPLICATE GATEWAY CREATION BLOCKED"),
            name = gateway_name,
            id = gateway_id,
            rule = rule(),
        ),
    }
}

/// Render a deployment outcome.
pub fn render_deploy_outcome(outcome: &DeployOutcome) -> String {
    match outcome {
        DeployOutcome::Deployed(summary) => render_deployment_success(summary),
        DeployOutcome::Updated { agent_id, name } => format!(
            "{banner}\n\n\
             Agent: {name}\n\
             Agent ID: {id}\n\
             Status: UPDATED\n\n\
             The existing agent has been updated with the new configuration.\n\n\
             {rule}",
            banner = banner("AGENT UPDATED SUCCESSFULLY"),
            name = name,
            id = agent_id,
            rule = rule(),
        ),
        DeployOutcome::DuplicateBlocked { agent_name } => format!(
            "{banner}\n\n\
             An agent has already been deployed in this session: {name}\n\n\
             To create another agent, please start a new conversation.\n\n\
             {rule}",
            banner = banner("DUPLICATE DEPLOYMENT BLOCKED"),
            name = agent_name,
            rule = rule(),
        ),
    }
}

fn render_deployment_success(summary: &DeploymentSummary) -> String {
    let mut tools = Vec::new();
    if summary.enable_code_interpreter {
        tools.push("Code Interpreter".to_string());
    }
    if summary.enable_browser {
        tools.push("Browser".to_string());
    }
    if let Some(gateway_id) = &summary.gateway_id {
        tools.push(format!("Gateway Tools ({})", gateway_id));
    }
    let tools = if tools.is_empty() {
        "None".to_string()
    } else {
        tools.join(", ")
    };
    let capabilities = if summary.capabilities.is_empty() {
        "General".to_string()
    } else {
        summary.capabilities.join(", ")
    };

    format!(
        "{banner}\n\n\
         Agent: {name}\n\
         Purpose: {purpose}\n\
         Agent ID: {id}\n\
         Mode: {mode}\n\
         Status: {status}\n\n\
         Capabilities: {capabilities}\n\
         Tools: {tools}\n\n\
         {rule}\n\n\
         The agent is ready to use. Invoke it with:\n\n\
         \x20 Agent ARN: {arn}\n\n\
         {rule}",
        banner = banner("AGENT DEPLOYED SUCCESSFULLY"),
        name = summary.name,
        purpose = summary.purpose,
        id = summary.agent_id,
        mode = summary.mode,
        status = summary.status,
        capabilities = capabilities,
        tools = tools,
        arn = summary.agent_arn,
        rule = rule(),
    )
}

/// Render a batch tool registration report with its three distinguishable
/// outcomes.
pub fn render_registration_report(report: &RegistrationReport) -> String {
    match report.outcome() {
        BatchOutcome::AllSucceeded => {
            let tools: Vec<String> = report
                .created
                .iter()
                .map(|t| format!("  • {}: {}", t.name, t.description))
                .collect();
            format!(
                "{banner}\n\n\
                 Gateway ID: {gateway}\n\
                 Tools created: {count}\n\n\
                 {tools}\n\n\
                 {rule}\n\n\
                 Next step:\n\
                 \x20 Deploy an agent with gateway_id='{gateway}' to use these tools\n\n\
                 {rule}",
                banner = banner("TOOLS CREATED SUCCESSFULLY"),
                gateway = report.gateway_id,
                count = report.created.len(),
                tools = tools.join("\n"),
                rule = rule(),
            )
        }
        BatchOutcome::PartialFailure => {
            let errors: Vec<String> = report
                .failed
                .iter()
                .map(|t| format!("  • {}: {}", t.name, t.error))
                .collect();
            render_error(
                "Partial Failure",
                &format!(
                    "Created {} tools, {} failed\n\nFailed:\n{}",
                    report.created.len(),
                    report.failed.len(),
                    errors.join("\n")
                ),
                &["Check the failed tool definitions", "Verify execution role permissions"],
            )
        }
        BatchOutcome::AllFailed => {
            let errors: Vec<String> = report
                .failed
                .iter()
                .map(|t| format!("  • {}: {}", t.name, t.error))
                .collect();
            render_error(
                "All Tools Failed",
                &format!("No tools were created successfully\n\n{}", errors.join("\n")),
                &[
                    "Check tool definitions",
                    "Verify function permissions",
                    "Check the control plane logs",
                ],
            )
        }
    }
}

/// Render an error with its type, message, and numbered remediation
/// suggestions.
pub fn render_error(error_type: &str, message: &str, suggestions: &[&str]) -> String {
    let mut out = format!(
        "{banner}\n\nError: {error_type}\n\n{message}\n",
        banner = banner("OPERATION FAILED"),
        error_type = error_type,
        message = message,
    );
    if !suggestions.is_empty() {
        out.push('\n');
        out.push_str(&rule());
        out.push_str("\n\nSuggestions:\n");
        for (i, suggestion) in suggestions.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, suggestion));
        }
    }
    out.push('\n');
    out.push_str(&rule());
    out
}

/// Render a factory error with its built-in remediation hints.
pub fn render_factory_error(error: &FactoryError) -> String {
    render_error(&error.error_type(), &error.to_string(), &error.suggestions())
}

/// Render the deployed-agent listing with the delegation tip.
pub fn render_agent_listing(agents: &[RuntimeSummary]) -> String {
    if agents.is_empty() {
        return "No READY agents found. Some agents may still be deploying.".to_string();
    }
    let mut out = vec!["Deployed agents:".to_string(), String::new()];
    for (i, agent) in agents.iter().enumerate() {
        out.push(format!("{}. {}", i + 1, agent.runtime_name));
        out.push(format!("   Agent ID: {}", agent.runtime_id));
        out.push(String::new());
    }
    out.push(
        "Tip: use these agent IDs in the known_agent_ids parameter when deploying delegator agents."
            .to_string(),
    );
    out.join("\n")
}

/// Render a connection confirmation.
pub fn render_connection_added(connection: &A2AConnection) -> String {
    format!(
        "Connected {} -> {} ({})\nEndpoint: {}",
        connection.source_agent_id,
        connection.target_agent_name,
        connection.target_agent_id,
        connection.target_a2a_url,
    )
}

/// Render the discovery listing.
pub fn render_discovered_agents(agents: &[DiscoveredAgent]) -> String {
    if agents.is_empty() {
        return "No A2A-enabled agents found.".to_string();
    }
    let mut out = vec![format!("Discovered {} A2A-enabled agent(s):", agents.len())];
    for agent in agents {
        out.push(format!(
            "  • {} ({}): {} [{}]",
            agent.agent_name,
            agent.agent_id,
            agent.a2a_url,
            agent.capabilities.join(", "),
        ));
    }
    out.join("\n")
}
