//! Text-rewriting rules for handler fragments
//!
//! The synthesizer accepts untrusted, possibly partial handler code and has
//! to adapt it before wrapping it in the entry-point skeleton. The rules
//! here are deliberately narrow: a documented set of import shapes, a fixed
//! list of numeric field names, and nothing resembling a general parser.

use regex::Regex;

/// Field names whose store-write values must be exact decimals. Backing
/// stores reject binary floats for these, so the synthesizer wraps them.
pub const NUMERIC_FIELDS: &[&str] = &[
    "amount", "price", "cost", "total", "quantity", "days", "hours", "count", "value", "balance",
];

/// Capabilities a fragment needs from the outer skeleton, detected by text
/// inspection before imports are stripped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectedNeeds {
    /// References a key-value-store client or table
    pub store: bool,
    /// Constructs timestamps
    pub datetime: bool,
    /// Reads process environment variables
    pub env: bool,
    /// Writes to the store or references the exact-decimal type
    pub decimal: bool,
}

/// Scan a fragment for capability markers.
pub fn detect_needs(code: &str) -> DetectedNeeds {
    let lower = code.to_lowercase();
    DetectedNeeds {
        store: code.contains("boto3") || lower.contains("dynamodb"),
        datetime: code.contains("datetime"),
        env: code.contains("os.environ") || code.contains("os.getenv"),
        decimal: code.contains("Decimal")
            || lower.contains("dynamodb")
            || code.contains("put_item"),
    }
}

struct DecimalRule {
    pattern: Regex,
    replacement: String,
}

/// Compiled rewriting rules, built once and reused across syntheses.
pub struct RewriteRules {
    import_single: Regex,
    import_from: Regex,
    decimal: Vec<DecimalRule>,
}

impl RewriteRules {
    pub fn new() -> Self {
        // The regex engine has no backreferences, so the quote-consistent
        // field patterns are enumerated per quote-character pair.
        let mut decimal = Vec::with_capacity(NUMERIC_FIELDS.len() * 4);
        for field in NUMERIC_FIELDS {
            for key_quote in ['\'', '"'] {
                for param_quote in ['\'', '"'] {
                    let pattern = format!(
                        r"{kq}{field}{kq}\s*:\s*parameters\.get\({pq}{field}{pq}(,\s*[^)]+)?\)",
                        kq = key_quote,
                        pq = param_quote,
                        field = field,
                    );
                    let replacement = format!(
                        "{kq}{field}{kq}: Decimal(str(parameters.get({pq}{field}{pq}${{1}})))",
                        kq = key_quote,
                        pq = param_quote,
                        field = field,
                    );
                    decimal.push(DecimalRule {
                        pattern: Regex::new(&pattern).expect("static decimal pattern"),
                        replacement,
                    });
                }
            }
        }
        Self {
            import_single: Regex::new(r"(?m)^\s*import\s+[\w\.]+\s*$")
                .expect("static import pattern"),
            import_from: Regex::new(r"(?m)^\s*from\s+[\w\.]+\s+import\s+.+$")
                .expect("static from-import pattern"),
            decimal,
        }
    }

    /// Remove every import statement (single- and multi-name forms) so the
    /// fragment cannot shadow names provided by the skeleton, then collapse
    /// the whitespace-only lines that removal leaves behind.
    pub fn strip_imports(&self, code: &str) -> String {
        let stripped = self.import_single.replace_all(code, "");
        let stripped = self.import_from.replace_all(&stripped, "");
        let cleaned: Vec<&str> = stripped
            .split('\n')
            .filter(|line| !line.trim().is_empty() || line.is_empty())
            .collect();
        cleaned.join("\n").trim_start_matches('\n').to_string()
    }

    /// Wrap direct `parameters` lookups for recognized numeric fields in an
    /// exact-decimal conversion applied to their string form. Only assignments
    /// of the shape `'field': parameters.get('field'[, default])` are touched.
    pub fn wrap_decimal_fields(&self, code: &str) -> String {
        let mut out = code.to_string();
        for rule in &self.decimal {
            out = rule
                .pattern
                .replace_all(&out, rule.replacement.as_str())
                .into_owned();
        }
        out
    }
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Indent every non-blank line by `prefix`.
pub fn indent(code: &str, prefix: &str) -> String {
    code.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
