use crate::error::{ModelError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Generates a fresh [`Element`] pre-configured for one registered type.
pub type GenElementFn = fn() -> Element;

/// Validates a submitted form value (as a string) against an [`Element`].
pub type ValidateFn = fn(&Element, &str) -> bool;

/// A single field of a model, expressed in the GitHub issue-template
/// input element shape.
///
/// The same descriptor drives an HTML input (`type` is the input type),
/// a SQL column (the column type is inferred from `type`) and form value
/// validation (the validator is looked up by `type` in the model's
/// registry).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default)]
    pub element_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Rendering hints, e.g. `name`, `required`, `placeholder`. Range
    /// bounds (`min`, `max`) are read from here too.
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_attributes"
    )]
    pub attributes: BTreeMap<String, String>,

    /// Regular expression a text-like value must match when non-empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pattern: String,

    /// Value/label pairs for selection elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<BTreeMap<String, String>>,

    /// Marks the element identifying the record.
    #[serde(rename = "is_primary_id", default, skip_serializing_if = "is_false")]
    pub is_object_id: bool,

    /// Advisory auto-population strategy, e.g. `uuid` or `current_timestamp`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub generator: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,

    #[serde(skip)]
    pub(crate) changed: bool,
}

impl Element {
    /// Create a basic `text` element. The `name` attribute is set to the id
    /// and the label to the capitalized id.
    pub fn new(id: &str) -> Result<Self> {
        if !is_valid_varname(id) {
            return Err(ModelError::InvalidId(id.to_string()));
        }
        let mut attributes = BTreeMap::new();
        attributes.insert("name".to_string(), id.to_string());
        Ok(Element {
            element_type: "text".to_string(),
            id: id.to_string(),
            attributes,
            label: capitalize(id),
            changed: true,
            ..Default::default()
        })
    }

    /// Shorthand used by the type generators.
    pub(crate) fn of_type(element_type: &str) -> Self {
        Element {
            element_type: element_type.to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub(crate) fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = pattern.to_string();
        self
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn set_changed(&mut self, state: bool) {
        self.changed = state;
    }

    pub fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.to_string(), value.to_string());
        self.changed = true;
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        let removed = self.attributes.remove(key);
        if removed.is_some() {
            self.changed = true;
        }
        removed
    }

    pub fn set_pattern(&mut self, pattern: &str) {
        self.pattern = pattern.to_string();
        self.changed = true;
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
        self.changed = true;
    }

    pub fn set_type(&mut self, element_type: &str) {
        self.element_type = element_type.to_string();
        self.changed = true;
    }

    pub fn set_generator(&mut self, generator: &str) {
        self.generator = generator.to_string();
        self.changed = true;
    }

    pub fn set_object_id(&mut self, state: bool) {
        self.is_object_id = state;
        self.changed = true;
    }

    /// Report every structural problem with the element into `diagnostics`.
    /// Returns false if any was found.
    pub fn check(&self, diagnostics: &mut Vec<String>) -> bool {
        let mut ok = true;
        if self.id.is_empty() {
            diagnostics.push("element missing id".to_string());
            ok = false;
        }
        if self.element_type.is_empty() {
            diagnostics.push(format!("element, {:?}, missing type", self.id));
            ok = false;
        }
        ok
    }
}

/// The naming rule for model and element ids:
/// `^([a-zA-Z]|[a-zA-Z][0-9a-zA-Z_]+)$`.
pub fn is_valid_varname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Attribute values are strings, but schema documents often carry bare
/// scalars (`required: true`, `max: 100`). Those are kept as their text.
#[derive(Deserialize)]
#[serde(untagged)]
enum AttributeValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl AttributeValue {
    fn into_text(self) -> String {
        match self {
            AttributeValue::Text(s) => s,
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::Int(i) => i.to_string(),
            AttributeValue::Float(f) => f.to_string(),
        }
    }
}

pub(crate) fn deserialize_attributes<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<AttributeValue>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.map(AttributeValue::into_text).unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_varnames() {
        for name in ["a", "Z", "id", "family_name", "x1", "camelCase_2"] {
            assert!(is_valid_varname(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_varnames() {
        for name in ["", "1abc", "_id", "family-name", "with space", "émile", "a.b"] {
            assert!(!is_valid_varname(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_new_element_defaults() {
        let elem = Element::new("family_name").unwrap();
        assert_eq!(elem.element_type, "text");
        assert_eq!(elem.label, "Family_name");
        assert_eq!(elem.attributes["name"], "family_name");
        assert!(!elem.is_object_id);
        assert!(elem.has_changed());
    }

    #[test]
    fn test_new_element_rejects_bad_id() {
        let err = Element::new("9lives").unwrap_err();
        assert!(matches!(err, ModelError::InvalidId(id) if id == "9lives"));
    }

    #[test]
    fn test_check_reports_every_problem() {
        let elem = Element::default();
        let mut diagnostics = Vec::new();
        assert!(!elem.check(&mut diagnostics));
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].contains("missing id"));
        assert!(diagnostics[1].contains("missing type"));
    }

    #[test]
    fn test_mutators_set_dirty_flag() {
        let mut elem = Element::of_type("text");
        assert!(!elem.has_changed());
        elem.set_pattern("[a-z]+");
        assert!(elem.has_changed());

        elem.set_changed(false);
        elem.set_object_id(true);
        assert!(elem.has_changed());
        assert!(elem.is_object_id);

        elem.set_changed(false);
        elem.set_label("Name");
        assert!(elem.has_changed());

        elem.set_changed(false);
        elem.set_attribute("required", "true");
        assert!(elem.has_changed());
    }

    #[test]
    fn test_deserialize_scalar_attributes() {
        let elem: Element = serde_yaml::from_str(
            "type: range\nid: score\nattributes:\n  required: true\n  min: 0\n  max: 2.5\n  name: score\n",
        )
        .unwrap();
        assert_eq!(elem.attributes["required"], "true");
        assert_eq!(elem.attributes["min"], "0");
        assert_eq!(elem.attributes["max"], "2.5");
        assert_eq!(elem.attributes["name"], "score");
        assert!(!elem.has_changed());
    }

    #[test]
    fn test_serialize_skips_internal_and_empty_fields() {
        let mut elem = Element::new("pid").unwrap();
        elem.set_object_id(true);
        let yaml = serde_yaml::to_string(&elem).unwrap();
        assert!(yaml.contains("is_primary_id: true"));
        assert!(!yaml.contains("changed"));
        assert!(!yaml.contains("pattern"));
        assert!(!yaml.contains("options"));
    }
}
