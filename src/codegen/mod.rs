//! Dynamic tool code synthesis
//!
//! Turns a [`ToolSpec`] handler fragment into a self-contained, executable
//! backend unit: inferred imports, a fixed logging/error-handling skeleton,
//! and the (possibly rewritten) fragment body. The produced unit never lets
//! a fragment exception escape the entry point; every failure becomes a
//! structured 500 result.

pub mod rewrite;

use std::io::Write;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::domain::{FactoryError, FactoryResult, ToolSpec};
use rewrite::{detect_needs, indent, RewriteRules};

/// File name of the single entry point inside the deployment archive
pub const PACKAGE_ENTRY_FILE: &str = "lambda_function.py";
/// Entry point reference passed to the function control plane
pub const PACKAGE_HANDLER: &str = "lambda_function.handler";
/// Language runtime the synthesized code targets
pub const PACKAGE_RUNTIME: &str = "python3.11";

const BASELINE_IMPORTS: [&str; 2] = ["import json", "import logging"];

/// A synthesized, immutable executable unit
#[derive(Debug, Clone)]
pub struct SynthesizedUnit {
    /// Ordered, duplicate-free import statements present in the unit
    pub imports: Vec<String>,
    /// Complete source of the unit
    pub source: String,
}

impl SynthesizedUnit {
    /// Package the unit into a deployable archive holding the single
    /// entry-point file.
    pub fn package(&self) -> FactoryResult<Vec<u8>> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        {
            let mut archive = ZipWriter::new(&mut buffer);
            archive
                .start_file(PACKAGE_ENTRY_FILE, SimpleFileOptions::default())
                .map_err(|e| FactoryError::Packaging(format!("archive error: {}", e)))?;
            archive
                .write_all(self.source.as_bytes())
                .map_err(|e| FactoryError::Packaging(format!("archive write error: {}", e)))?;
            archive
                .finish()
                .map_err(|e| FactoryError::Packaging(format!("archive finish error: {}", e)))?;
        }
        Ok(buffer.into_inner())
    }
}

/// Synthesizer for backend tool code, holding the compiled rewrite rules
pub struct CodeSynthesizer {
    rules: RewriteRules,
}

impl CodeSynthesizer {
    pub fn new() -> Self {
        Self {
            rules: RewriteRules::new(),
        }
    }

    /// Produce a self-contained executable unit from a tool specification.
    ///
    /// A fragment that already defines a complete entry point is trusted
    /// as-is, gaining only the baseline import block when it lacks one.
    /// Anything else is treated as a logic-only body: imports are stripped,
    /// numeric store writes are wrapped in exact-decimal conversions, and the
    /// result is re-indented into the error-handling skeleton.
    pub fn synthesize(&self, spec: &ToolSpec) -> SynthesizedUnit {
        let fragment = spec.handler_code.trim();

        if fragment.contains("def handler") || fragment.contains("def lambda_handler") {
            debug!(tool = %spec.name, "complete handler supplied, using as-is");
            return self.complete_handler_unit(fragment);
        }

        debug!(tool = %spec.name, "wrapping logic-only fragment in handler skeleton");

        let fragment = if fragment.is_empty() {
            "pass  # No implementation provided".to_string()
        } else {
            fragment.to_string()
        };

        // Capability markers must be read before imports are stripped
        let needs = detect_needs(&fragment);

        let mut body = self.rules.strip_imports(&fragment);
        if body.contains("put_item") && needs.decimal {
            body = self.rules.wrap_decimal_fields(&body);
        }

        let mut imports: Vec<String> = BASELINE_IMPORTS.iter().map(|s| s.to_string()).collect();
        if needs.store {
            imports.push("import boto3".to_string());
        }
        if needs.datetime {
            imports.push("from datetime import datetime".to_string());
        }
        if needs.env {
            imports.push("import os".to_string());
        }
        if needs.decimal {
            imports.push("from decimal import Decimal".to_string());
        }

        let source = render_skeleton(&spec.name, &imports, &indent(&body, "        "));
        SynthesizedUnit { imports, source }
    }

    fn complete_handler_unit(&self, fragment: &str) -> SynthesizedUnit {
        if fragment.contains("import json") {
            return SynthesizedUnit {
                imports: Vec::new(),
                source: fragment.to_string(),
            };
        }
        let imports: Vec<String> = BASELINE_IMPORTS.iter().map(|s| s.to_string()).collect();
        let source = format!(
            "{}\n\nlogger = logging.getLogger()\nlogger.setLevel(logging.INFO)\n\n{}",
            imports.join("\n"),
            fragment
        );
        SynthesizedUnit { imports, source }
    }
}

impl Default for CodeSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_skeleton(tool_name: &str, imports: &[String], indented_body: &str) -> String {
    format!(
        r#"{imports}

logger = logging.getLogger()
logger.setLevel(logging.INFO)

def handler(event, context):
    """Handler for the {tool_name} tool"""
    try:
        logger.info(f"Tool {tool_name} invoked with event: {{json.dumps(event)}}")

        # Extract parameters
        parameters = event.get('parameters', event)

        # Execute tool logic
{indented_body}

    except Exception as e:
        logger.error(f"Tool execution failed: {{str(e)}}", exc_info=True)
        return {{
            'statusCode': 500,
            'body': json.dumps({{'error': str(e)}})
        }}
"#,
        imports = imports.join("\n"),
        tool_name = tool_name,
        indented_body = indented_body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(handler_code: &str) -> ToolSpec {
        ToolSpec {
            name: "record_expense".to_string(),
            description: "Record an expense in the store".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"amount": {"type": "number"}}
            }),
            handler_code: handler_code.to_string(),
        }
    }

    #[test]
    fn test_baseline_imports_always_present() {
        let unit = CodeSynthesizer::new().synthesize(&spec("return {'ok': True}"));
        assert!(unit.imports.contains(&"import json".to_string()));
        assert!(unit.imports.contains(&"import logging".to_string()));
        assert!(unit.source.contains("import json"));
        assert!(unit.source.contains("import logging"));
    }

    #[test]
    fn test_no_duplicate_imports() {
        let unit = CodeSynthesizer::new().synthesize(&spec(
            "import boto3\nimport boto3\ntable = dynamodb.Table('t')\nreturn {}",
        ));
        let boto_count = unit
            .source
            .lines()
            .filter(|l| l.trim() == "import boto3")
            .count();
        assert_eq!(boto_count, 1);
        let mut sorted = unit.imports.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), unit.imports.len());
    }

    #[test]
    fn test_decimal_wrap_in_put_item() {
        let unit = CodeSynthesizer::new().synthesize(&spec(
            "table.put_item(Item={'user_id': parameters.get('user_id'), 'amount': parameters.get('amount')})\nreturn {'success': True}",
        ));
        assert!(unit
            .source
            .contains("'amount': Decimal(str(parameters.get('amount')))"));
        assert!(!unit.source.contains("'amount': parameters.get('amount')"));
        // Non-numeric fields pass through untouched
        assert!(unit.source.contains("'user_id': parameters.get('user_id')"));
        assert!(unit.imports.contains(&"from decimal import Decimal".to_string()));
    }

    #[test]
    fn test_conditional_imports() {
        let unit = CodeSynthesizer::new().synthesize(&spec(
            "now = datetime.now()\nregion = os.environ.get('AWS_REGION')\nreturn {'at': str(now)}",
        ));
        assert!(unit.imports.contains(&"from datetime import datetime".to_string()));
        assert!(unit.imports.contains(&"import os".to_string()));
        assert!(!unit.imports.contains(&"import boto3".to_string()));
    }

    #[test]
    fn test_fragment_imports_stripped() {
        let unit = CodeSynthesizer::new().synthesize(&spec(
            "import boto3\nfrom datetime import datetime\nreturn {'ok': True}",
        ));
        // Imports live only in the header block, never inside the handler body
        let body_start = unit.source.find("def handler").unwrap();
        assert!(!unit.source[body_start..].contains("import"));
    }

    #[test]
    fn test_complete_handler_used_verbatim() {
        let handler = "import json\n\ndef handler(event, context):\n    return {'ok': True}";
        let unit = CodeSynthesizer::new().synthesize(&spec(handler));
        assert_eq!(unit.source, handler);
        assert!(unit.imports.is_empty());
    }

    #[test]
    fn test_complete_handler_gains_baseline_imports() {
        let handler = "def handler(event, context):\n    return {'ok': True}";
        let unit = CodeSynthesizer::new().synthesize(&spec(handler));
        assert!(unit.source.starts_with("import json\nimport logging"));
        assert!(unit.source.contains(handler));
    }

    #[test]
    fn test_empty_fragment_gets_placeholder() {
        let unit = CodeSynthesizer::new().synthesize(&spec("   "));
        assert!(unit.source.contains("pass  # No implementation provided"));
    }

    #[test]
    fn test_error_skeleton_present() {
        let unit = CodeSynthesizer::new().synthesize(&spec("return {'ok': True}"));
        assert!(unit.source.contains("except Exception as e:"));
        assert!(unit.source.contains("'statusCode': 500"));
        assert!(unit.source.contains("parameters = event.get('parameters', event)"));
    }

    #[test]
    fn test_body_indented_into_try_block() {
        let unit = CodeSynthesizer::new().synthesize(&spec("result = 1\nreturn {'result': result}"));
        assert!(unit.source.contains("        result = 1"));
        assert!(unit.source.contains("        return {'result': result}"));
    }

    #[test]
    fn test_package_is_nonempty_zip() {
        let unit = CodeSynthesizer::new().synthesize(&spec("return {'ok': True}"));
        let bytes = unit.package().unwrap();
        // Zip local file header magic
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }
}
