//! Resource name sanitization
//!
//! Every managed resource kind enforces its own character set and length
//! limit. `sanitize` maps free-form names onto those rules, always producing
//! a usable identifier even from degenerate input.

/// Resource kinds with distinct naming rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Generic cloud resource: lowercase, hyphenated, starts with a letter
    Generic,
    /// Memory store: lowercase identifier style (letters, digits, underscores)
    Memory,
    /// Runtime instance: case-preserving identifier style
    Runtime,
    /// Gateway: case-preserving, hyphenated, starts alphanumeric
    Gateway,
    /// Gateway target (tool registration): case-preserving, hyphenated
    GatewayTarget,
}

impl ResourceKind {
    fn max_length(self) -> usize {
        match self {
            ResourceKind::Generic => 63,
            ResourceKind::Memory => 48,
            ResourceKind::Runtime => 48,
            ResourceKind::Gateway => 48,
            ResourceKind::GatewayTarget => 100,
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            ResourceKind::Generic => "agent",
            ResourceKind::Memory => "agent_memory",
            ResourceKind::Runtime => "agent",
            ResourceKind::Gateway => "gateway",
            ResourceKind::GatewayTarget => "tool",
        }
    }
}

/// Sanitize a free-form name into an identifier valid for `kind`.
///
/// Deterministic and idempotent: feeding the output back in returns it
/// unchanged. There is no error path; empty or punctuation-only input
/// degrades to a kind-specific fallback.
pub fn sanitize(raw: &str, kind: ResourceKind) -> String {
    let sanitized = match kind {
        ResourceKind::Generic => sanitize_hyphenated_lower(raw),
        ResourceKind::Memory => sanitize_identifier_lower(raw),
        ResourceKind::Runtime => sanitize_identifier(raw),
        ResourceKind::Gateway => sanitize_hyphenated(raw, true),
        ResourceKind::GatewayTarget => sanitize_hyphenated(raw, false),
    };

    let truncated = truncate_trimmed(&sanitized, kind.max_length(), kind);
    if truncated.is_empty() {
        kind.fallback().to_string()
    } else {
        truncated
    }
}

/// Lowercase, spaces/underscores to hyphens, leading letter enforced.
fn sanitize_hyphenated_lower(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced: String = lowered
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    let mut collapsed = collapse_repeats(&replaced, '-');
    if !collapsed.is_empty() && !collapsed.starts_with(|c: char| c.is_ascii_alphabetic()) {
        collapsed = format!("a-{}", collapsed);
    }
    collapsed.trim_matches('-').to_string()
}

/// Lowercase, spaces/hyphens to underscores, leading letter enforced.
fn sanitize_identifier_lower(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced: String = lowered
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    let mut collapsed = collapse_repeats(&replaced, '_');
    if !collapsed.is_empty() && !collapsed.starts_with(|c: char| c.is_ascii_alphabetic()) {
        collapsed = format!("a_{}", collapsed);
    }
    collapsed.trim_matches('_').to_string()
}

/// Case-preserving identifier: every non-alphanumeric becomes an underscore.
fn sanitize_identifier(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let collapsed = collapse_repeats(&replaced, '_');
    let trimmed = collapsed.trim_matches('_');
    if !trimmed.is_empty() && !trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
        format!("agent_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Case-preserving hyphenated name; gateways additionally require a leading
/// alphanumeric character.
fn sanitize_hyphenated(raw: &str, force_leading_alnum: bool) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    let collapsed = collapse_repeats(&replaced, '-');
    let trimmed = collapsed.trim_matches('-').to_string();
    if force_leading_alnum
        && !trimmed.is_empty()
        && !trimmed.starts_with(|c: char| c.is_ascii_alphanumeric())
    {
        format!("gw-{}", trimmed.trim_start_matches('-'))
    } else {
        trimmed
    }
}

fn collapse_repeats(input: &str, sep: char) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_sep = false;
    for c in input.chars() {
        if c == sep {
            if !last_was_sep {
                out.push(c);
            }
            last_was_sep = true;
        } else {
            out.push(c);
            last_was_sep = false;
        }
    }
    out
}

fn truncate_trimmed(input: &str, max_length: usize, kind: ResourceKind) -> String {
    if input.len() <= max_length {
        return input.to_string();
    }
    let sep = match kind {
        ResourceKind::Memory | ResourceKind::Runtime => '_',
        _ => '-',
    };
    input[..max_length].trim_end_matches(sep).to_string()
}
