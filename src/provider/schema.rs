// Provider schema description and configuration validation

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::fields::ProviderFields;
use super::validation::ValidationOutcome;

/// Attribute-level validation hook: `(value, attribute name)`
pub type ValidateFn = fn(Option<&str>, &str) -> ValidationOutcome;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
}

/// A single configuration attribute
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub optional: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
    /// Environment variables consulted in order when the attribute is unset
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env_defaults: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<&'static str>,
    #[serde(skip)]
    pub validate: Option<ValidateFn>,
}

impl Attribute {
    pub fn optional_string() -> Self {
        Self {
            value_type: ValueType::String,
            optional: true,
            sensitive: false,
            description: "",
            env_defaults: Vec::new(),
            conflicts_with: Vec::new(),
            validate: None,
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn with_env_defaults(mut self, vars: &[&'static str]) -> Self {
        self.env_defaults = vars.to_vec();
        self
    }

    pub fn conflicts_with(mut self, attributes: &[&'static str]) -> Self {
        self.conflicts_with = attributes.to_vec();
        self
    }

    pub fn with_validate(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }
}

/// Set of attributes describing a provider, resource or data source block
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Validate a provider configuration block.
    ///
    /// Conflicts are checked against explicitly configured values only;
    /// attribute validators also see values filled in from the environment.
    pub fn validate_config<F>(&self, config: &Value, lookup: F) -> Vec<Diagnostic>
    where
        F: Fn(&str) -> Option<String>,
    {
        let empty = serde_json::Map::new();
        let object = match config {
            Value::Null => &empty,
            Value::Object(object) => object,
            _ => {
                return vec![Diagnostic::error(
                    None,
                    "Provider configuration must be an object",
                )]
            }
        };

        let mut diagnostics = Vec::new();

        for (key, value) in object {
            let Some(attribute) = self.attribute(key) else {
                diagnostics.push(Diagnostic::error(
                    Some(key.as_str()),
                    format!("Unsupported argument {:?}", key),
                ));
                continue;
            };

            let type_ok = match attribute.value_type {
                ValueType::String => matches!(value, Value::Null | Value::String(_)),
            };
            if !type_ok {
                diagnostics.push(Diagnostic::error(
                    Some(key.as_str()),
                    format!(
                        "Inappropriate value for attribute {:?}: {} required",
                        key,
                        attribute.value_type.name()
                    ),
                ));
            }
        }

        for (name, attribute) in &self.attributes {
            if configured_string(config, name).is_none() {
                continue;
            }
            for other in &attribute.conflicts_with {
                if configured_string(config, other).is_some() {
                    diagnostics.push(Diagnostic::error(
                        Some(name.as_str()),
                        format!("{:?}: conflicts with {}", name, other),
                    ));
                }
            }
        }

        let fields = ProviderFields::resolve(self, config, lookup);
        for (name, attribute) in &self.attributes {
            let Some(validate) = attribute.validate else {
                continue;
            };
            let outcome = validate(fields.get_ok(name), name);
            for warning in outcome.warnings {
                diagnostics.push(Diagnostic::warning(Some(name.as_str()), warning));
            }
            for error in outcome.errors {
                diagnostics.push(Diagnostic::error(Some(name.as_str()), error));
            }
        }

        diagnostics
    }
}

impl ValueType {
    fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
        }
    }
}

/// Full schema exposed to the host: provider block plus resource and data source tables
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

/// Non-empty string configured for `key`, ignoring environment defaults
pub fn configured_string<'a>(config: &'a Value, key: &str) -> Option<&'a str> {
    config
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Validation finding reported back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(attribute: Option<&str>, summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            attribute: attribute.map(str::to_string),
        }
    }

    pub fn warning(attribute: Option<&str>, summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            attribute: attribute.map(str::to_string),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attribute {
            Some(ref attribute) => write!(f, "{}: {}", attribute, self.summary),
            None => f.write_str(&self.summary),
        }
    }
}
