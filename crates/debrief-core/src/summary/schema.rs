//! JSON Schema validation for structured summaries.
//!
//! The schema lives at `schema/summary.schema.json` and is embedded at
//! compile time. Coercion always produces a valid record, so a failure here
//! points at a bug in coercion rather than bad model output.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded summary schema (loaded at compile time).
const SUMMARY_SCHEMA_JSON: &str = include_str!("../../../../schema/summary.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(SUMMARY_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate a summary JSON value against the schema.
///
/// Returns every violation as `"<message> at <path>"`.
pub fn validate_summary_schema(summary_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(summary_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check validity without collecting messages.
pub fn is_valid_summary(summary_json: &serde_json::Value) -> bool {
    get_validator()
        .map(|v| v.is_valid(summary_json))
        .unwrap_or(false)
}
