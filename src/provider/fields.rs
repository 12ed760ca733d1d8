// Provider field values after applying environment defaults

use serde_json::Value;
use std::collections::BTreeMap;

use super::schema::{configured_string, Schema};
use crate::config::env_with_fallbacks_from;

/// String values of the provider block, config first, environment second
#[derive(Clone, Default, PartialEq)]
pub struct ProviderFields {
    values: BTreeMap<String, String>,
}

impl ProviderFields {
    /// Resolve every schema attribute: a non-empty configured value wins,
    /// otherwise the first non-empty environment fallback.
    pub fn resolve<F>(schema: &Schema, config: &Value, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = BTreeMap::new();

        for (name, attribute) in &schema.attributes {
            let value = configured_string(config, name)
                .map(str::to_string)
                .or_else(|| env_with_fallbacks_from(&attribute.env_defaults, &lookup));

            if let Some(value) = value {
                values.insert(name.clone(), value);
            }
        }

        Self { values }
    }

    /// Value for `key` if it is set and non-empty
    pub fn get_ok(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.values.insert(key.into(), value);
        }
    }
}

// Values may be secrets: only names are printed
impl std::fmt::Debug for ProviderFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
