use crate::model::Model;
use serde_json::Value;
use std::collections::HashMap;

/// Result of validating a submitted record against a model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Model {
    /// Validate a record of element id to submitted value.
    ///
    /// The record must hold exactly as many entries as the model has
    /// element ids. Each key must name an element whose type has a
    /// registered validator, and that validator must accept the value.
    pub fn validate(&self, record: &HashMap<String, String>) -> bool {
        self.validation_report(record).is_ok()
    }

    /// Like [`Model::validate`] for loosely typed values, e.g. a decoded
    /// JSON object. Values are stringified before validation.
    pub fn validate_map_interface(&self, record: &serde_json::Map<String, Value>) -> bool {
        self.validation_report_map_interface(record).is_ok()
    }

    /// Every reason the record fails to validate. A record with the wrong
    /// number of entries reports only that.
    pub fn validation_report(&self, record: &HashMap<String, String>) -> ValidationResult {
        let mut keys: Vec<&String> = record.keys().collect();
        keys.sort();
        self.check_record(keys.into_iter().map(|k| (k.as_str(), record[k].clone())))
    }

    pub fn validation_report_map_interface(
        &self,
        record: &serde_json::Map<String, Value>,
    ) -> ValidationResult {
        self.check_record(record.iter().map(|(k, v)| (k.as_str(), stringify(v))))
    }

    fn check_record<'a>(
        &self,
        entries: impl ExactSizeIterator<Item = (&'a str, String)>,
    ) -> ValidationResult {
        let mut result = ValidationResult::default();

        let expected = self.get_element_ids().len();
        if entries.len() != expected {
            log::debug!(
                "{}: expected {expected} values, found {}",
                self.id,
                entries.len()
            );
            result.errors.push(format!(
                "Expected {expected} values for model '{}', found {}",
                self.id,
                entries.len()
            ));
            return result;
        }

        for (key, value) in entries {
            let Some(elem) = self.get_element_by_id(key) else {
                log::debug!("{}: no element for {key:?}", self.id);
                result.errors.push(format!("Unknown element '{key}'"));
                continue;
            };
            let Some(validator) = self.types().validator(&elem.element_type) else {
                log::debug!(
                    "{}: no validator for {key:?} of type {:?}",
                    self.id,
                    elem.element_type
                );
                result.errors.push(format!(
                    "No validator for type '{}' of element '{key}'",
                    elem.element_type
                ));
                continue;
            };
            if !validator(elem, &value) {
                result.errors.push(format!(
                    "Invalid value {value:?} for element '{key}' of type '{}'",
                    elem.element_type
                ));
            }
        }

        result
    }
}

/// Textual form of a loosely typed value. Strings are taken as is,
/// numbers in decimal, booleans as `true`/`false`; anything else is
/// rendered as JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // f64 Display is positional, serde_json's would switch to exponents
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
