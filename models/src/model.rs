use crate::element::{deserialize_attributes, is_valid_varname, Element, GenElementFn, ValidateFn};
use crate::error::{ModelError, Result};
use crate::registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

/// Renders a model into `out`, e.g. as an HTML form or a SQL schema.
pub type RenderFn = fn(&mut dyn Write, &Model) -> Result<()>;

/// A record type: an ordered list of [`Element`]s plus the metadata used
/// when rendering it.
///
/// The type registry, renderers and dirty flag are runtime state and are
/// never part of the serialized document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Form level hints, e.g. `method` and `action`.
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_attributes"
    )]
    pub attributes: BTreeMap<String, String>,

    #[serde(default)]
    pub elements: Vec<Element>,

    #[serde(skip)]
    changed: bool,

    #[serde(skip)]
    types: TypeRegistry,

    #[serde(skip)]
    renderers: Renderers,
}

#[derive(Clone, Default)]
struct Renderers(BTreeMap<String, RenderFn>);

impl fmt::Debug for Renderers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl Model {
    /// Create a model seeded with a required `id` text element that
    /// identifies the record.
    pub fn new(model_id: &str) -> Result<Self> {
        if !is_valid_varname(model_id) {
            return Err(ModelError::InvalidId(model_id.to_string()));
        }
        let mut model = Model {
            id: model_id.to_string(),
            description: format!("... description of {model_id:?} goes here ..."),
            ..Default::default()
        };
        let identifier = Element {
            element_type: "text".to_string(),
            id: "id".to_string(),
            is_object_id: true,
            ..Default::default()
        }
        .with_attribute("required", "true");
        model.insert_element(0, identifier)?;
        Ok(model)
    }

    // ── Dirty tracking ───────────────────────────────────────────────

    /// True if the model or any of its elements has been modified.
    pub fn has_changes(&self) -> bool {
        self.changed || self.elements.iter().any(Element::has_changed)
    }

    /// Set the model's own change flag. Element flags are left alone.
    pub fn set_changed(&mut self, state: bool) {
        self.changed = state;
    }

    /// Clear the change flags of the model and all of its elements,
    /// typically right after the model has been saved.
    pub fn clear_changes(&mut self) {
        self.changed = false;
        for elem in &mut self.elements {
            elem.set_changed(false);
        }
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
        self.changed = true;
    }

    pub fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.to_string(), value.to_string());
        self.changed = true;
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Check that the model has elements, exactly one object identifier
    /// and that each element is valid. Every problem found is pushed to
    /// `diagnostics` before returning.
    pub fn check(&self, diagnostics: &mut Vec<String>) -> bool {
        if self.elements.is_empty() {
            diagnostics.push(format!("missing elements for model {:?}", self.id));
            return false;
        }
        let mut ok = true;
        let mut has_model_id = false;
        for (i, elem) in self.elements.iter().enumerate() {
            if !elem.check(diagnostics) {
                diagnostics.push(format!("error for {}.{}", self.id, elem.id));
                ok = false;
            }
            if elem.is_object_id {
                if has_model_id {
                    diagnostics.push(format!(
                        "duplicate model identifier element ({i}) {}.{}",
                        self.id, elem.id
                    ));
                    ok = false;
                }
                has_model_id = true;
            }
        }
        if !has_model_id {
            diagnostics.push(format!(
                "missing required object identifier for model {}",
                self.id
            ));
            ok = false;
        }
        ok
    }

    /// Like [`Model::check`] but returns the diagnostics as an error.
    pub fn ensure_valid(&self) -> Result<()> {
        let mut diagnostics = Vec::new();
        if self.check(&mut diagnostics) {
            Ok(())
        } else {
            Err(ModelError::InvalidModel {
                id: self.id.clone(),
                diagnostics,
            })
        }
    }

    /// Insert `element` at `pos`, clamped to the end of the element list.
    pub fn insert_element(&mut self, pos: usize, element: Element) -> Result<()> {
        if !is_valid_varname(&element.id) {
            return Err(ModelError::InvalidId(element.id));
        }
        if self.has_element(&element.id) {
            return Err(ModelError::DuplicateElement(element.id));
        }
        let pos = pos.min(self.elements.len());
        self.elements.insert(pos, element);
        self.changed = true;
        Ok(())
    }

    /// Replace the element with `element_id` in place.
    pub fn update_element(&mut self, element_id: &str, element: Element) -> Result<()> {
        let pos = self
            .position_of(element_id)
            .ok_or_else(|| ModelError::ElementNotFound(element_id.to_string()))?;
        if element.id != element_id {
            if !is_valid_varname(&element.id) {
                return Err(ModelError::InvalidId(element.id));
            }
            if self.has_element(&element.id) {
                return Err(ModelError::DuplicateElement(element.id));
            }
        }
        self.elements[pos] = element;
        self.changed = true;
        Ok(())
    }

    pub fn remove_element(&mut self, element_id: &str) -> Result<()> {
        let pos = self
            .position_of(element_id)
            .ok_or_else(|| ModelError::ElementNotFound(element_id.to_string()))?;
        self.elements.remove(pos);
        self.changed = true;
        Ok(())
    }

    fn position_of(&self, element_id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == element_id)
    }

    pub fn has_element(&self, element_id: &str) -> bool {
        self.position_of(element_id).is_some()
    }

    /// Case-insensitive check for an element of the given type.
    pub fn has_element_type(&self, element_type: &str) -> bool {
        self.elements
            .iter()
            .any(|e| e.element_type.eq_ignore_ascii_case(element_type))
    }

    pub fn get_element_by_id(&self, element_id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == element_id)
    }

    /// Mutable access to an element. Changes made through the element's
    /// setters are picked up by [`Model::has_changes`].
    pub fn get_element_mut(&mut self, element_id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == element_id)
    }

    /// Element ids in model order; elements without an id are skipped.
    pub fn get_element_ids(&self) -> Vec<String> {
        self.elements
            .iter()
            .filter(|e| !e.id.is_empty())
            .map(|e| e.id.clone())
            .collect()
    }

    /// Sorted model attribute names.
    pub fn get_attribute_ids(&self) -> Vec<String> {
        self.attributes
            .keys()
            .filter(|k| !k.is_empty())
            .cloned()
            .collect()
    }

    pub fn get_model_identifier(&self) -> Option<&Element> {
        self.elements.iter().find(|e| e.is_object_id)
    }

    /// Id of the object identifier element, or an empty string.
    pub fn get_primary_id(&self) -> String {
        self.get_model_identifier()
            .map(|e| e.id.clone())
            .unwrap_or_default()
    }

    /// Element id to generator name, for elements with a generator.
    pub fn get_generated_types(&self) -> BTreeMap<String, String> {
        self.elements
            .iter()
            .filter(|e| !e.generator.is_empty())
            .map(|e| (e.id.clone(), e.generator.clone()))
            .collect()
    }

    // ── Types ────────────────────────────────────────────────────────

    /// Attach a generator and validator for `type_name`, replacing any
    /// previous definition.
    pub fn define(&mut self, type_name: &str, generator: GenElementFn, validator: ValidateFn) {
        self.types.define(type_name, generator, validator);
    }

    pub fn is_supported_element_type(&self, type_name: &str) -> bool {
        self.types.is_supported(type_name)
    }

    /// A fresh element configured for `type_name`, if the type is defined.
    pub fn gen_element_type(&self, type_name: &str) -> Option<Element> {
        self.types.generate(type_name)
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn register(&mut self, name: &str, render: RenderFn) {
        self.renderers.0.insert(name.to_string(), render);
    }

    pub fn renderer_names(&self) -> Vec<String> {
        self.renderers.0.keys().cloned().collect()
    }

    /// Render the model with the renderer registered as `name`.
    pub fn render(&self, out: &mut dyn Write, name: &str) -> Result<()> {
        match self.renderers.0.get(name) {
            Some(render) => render(out, self),
            None => Err(ModelError::UnknownRenderer(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_model_str;

    fn text_element(id: &str) -> Element {
        Element::new(id).unwrap()
    }

    #[test]
    fn test_new_model_passes_check() {
        let model = Model::new("foo").unwrap();
        let mut diagnostics = Vec::new();
        assert!(model.check(&mut diagnostics), "{diagnostics:?}");
        assert!(diagnostics.is_empty());
        assert_eq!(model.get_element_ids(), vec!["id"]);
        assert_eq!(model.get_primary_id(), "id");
        assert_eq!(model.get_element_by_id("id").unwrap().attributes["required"], "true");
        assert!(model.description.contains("\"foo\""));
    }

    #[test]
    fn test_new_model_rejects_bad_id() {
        assert!(matches!(Model::new("2fast"), Err(ModelError::InvalidId(_))));
        assert!(matches!(Model::new(""), Err(ModelError::InvalidId(_))));
    }

    #[test]
    fn test_change_tracking() {
        let mut model = Model::new("test_model").unwrap();
        assert!(model.has_changes());

        model.set_changed(false);
        assert!(!model.has_changes());

        model.get_element_mut("id").unwrap().set_label("Identifier");
        assert!(model.has_changes());

        model.set_changed(false);
        assert!(model.has_changes(), "element flag still set");

        model.clear_changes();
        assert!(!model.has_changes());

        model.set_attribute("method", "POST");
        assert!(model.has_changes());
    }

    #[test]
    fn test_insert_then_get() {
        let mut model = Model::new("people").unwrap();
        let elem = text_element("name");
        model.insert_element(1, elem.clone()).unwrap();
        assert_eq!(model.get_element_by_id("name"), Some(&elem));
        assert_eq!(model.get_element_ids(), vec!["id", "name"]);
    }

    #[test]
    fn test_insert_positions_are_clamped() {
        let mut model = Model::new("people").unwrap();
        model.insert_element(99, text_element("last")).unwrap();
        model.insert_element(0, text_element("first")).unwrap();
        model.insert_element(2, text_element("middle")).unwrap();
        assert_eq!(model.get_element_ids(), vec!["first", "id", "middle", "last"]);
    }

    #[test]
    fn test_insert_duplicate_leaves_list_unchanged() {
        let mut model = Model::new("people").unwrap();
        model.insert_element(1, text_element("name")).unwrap();
        let before = model.elements.clone();

        let mut dup = text_element("name");
        dup.set_type("email");
        let err = model.insert_element(0, dup).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateElement(id) if id == "name"));
        assert_eq!(model.elements, before);
    }

    #[test]
    fn test_insert_rejects_invalid_id() {
        let mut model = Model::new("people").unwrap();
        let elem = Element {
            id: "family-name".to_string(),
            element_type: "text".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            model.insert_element(0, elem),
            Err(ModelError::InvalidId(_))
        ));
        assert_eq!(model.elements.len(), 1);
    }

    #[test]
    fn test_update_in_place() {
        let mut model = Model::new("people").unwrap();
        model.insert_element(1, text_element("name")).unwrap();
        model.insert_element(2, text_element("email")).unwrap();

        let mut replacement = text_element("name");
        replacement.set_type("textarea");
        model.update_element("name", replacement).unwrap();
        assert_eq!(model.get_element_ids(), vec!["id", "name", "email"]);
        assert_eq!(model.elements[1].element_type, "textarea");
    }

    #[test]
    fn test_update_missing_or_colliding() {
        let mut model = Model::new("people").unwrap();
        model.insert_element(1, text_element("name")).unwrap();
        assert!(matches!(
            model.update_element("nope", text_element("nope")),
            Err(ModelError::ElementNotFound(id)) if id == "nope"
        ));
        assert!(matches!(
            model.update_element("name", text_element("id")),
            Err(ModelError::DuplicateElement(_))
        ));
    }

    #[test]
    fn test_remove_element() {
        let mut model = Model::new("people").unwrap();
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            model.insert_element(i + 1, text_element(id)).unwrap();
        }
        model.remove_element("b").unwrap();
        assert!(!model.has_element("b"));
        assert_eq!(model.get_element_ids(), vec!["id", "a", "c"]);
        assert!(matches!(
            model.remove_element("b"),
            Err(ModelError::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_check_requires_single_object_id() {
        let mut model = Model::new("people").unwrap();
        model.insert_element(1, text_element("name")).unwrap();
        assert!(model.check(&mut Vec::new()));

        model.get_element_mut("name").unwrap().set_object_id(true);
        let mut diagnostics = Vec::new();
        assert!(!model.check(&mut diagnostics));
        assert!(diagnostics.iter().any(|d| d.contains("duplicate model identifier")));

        model.get_element_mut("name").unwrap().set_object_id(false);
        model.get_element_mut("id").unwrap().set_object_id(false);
        let mut diagnostics = Vec::new();
        assert!(!model.check(&mut diagnostics));
        assert!(diagnostics.iter().any(|d| d.contains("missing required object identifier")));
    }

    #[test]
    fn test_check_is_exhaustive() {
        let model = parse_model_str(
            "id: broken\nelements:\n  - id: a\n  - type: text\n",
        )
        .unwrap();
        let mut diagnostics = Vec::new();
        assert!(!model.check(&mut diagnostics));
        assert!(diagnostics.iter().any(|d| d.contains("\"a\", missing type")));
        assert!(diagnostics.iter().any(|d| d.contains("missing id")));
        assert!(diagnostics.iter().any(|d| d.contains("missing required object identifier")));
        assert!(matches!(
            model.ensure_valid(),
            Err(ModelError::InvalidModel { .. })
        ));
    }

    #[test]
    fn test_check_empty_model() {
        let model = Model {
            id: "empty".to_string(),
            ..Default::default()
        };
        let mut diagnostics = Vec::new();
        assert!(!model.check(&mut diagnostics));
        assert_eq!(diagnostics.len(), 1);
        // idempotent
        assert!(!model.check(&mut Vec::new()));
    }

    #[test]
    fn test_queries() {
        let mut model = Model::new("people").unwrap();
        let mut updated = text_element("updated");
        updated.set_type("datetime-local");
        updated.set_generator("current_timestamp");
        model.insert_element(1, updated).unwrap();

        assert!(model.has_element_type("DATETIME-LOCAL"));
        assert!(!model.has_element_type("submit"));
        assert_eq!(model.get_model_identifier().unwrap().id, "id");

        let generated = model.get_generated_types();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated["updated"], "current_timestamp");
    }

    #[test]
    fn test_attribute_ids_sorted() {
        let mut model = Model::new("guestbook").unwrap();
        model.set_attribute("method", "POST");
        model.set_attribute("action", "./");
        assert_eq!(model.get_attribute_ids(), vec!["action", "method"]);
    }

    #[test]
    fn test_registry_is_per_model() {
        fn gen_slug() -> Element {
            Element::of_type("slug")
        }
        fn any(_: &Element, _: &str) -> bool {
            true
        }
        let mut a = Model::new("a").unwrap();
        let b = Model::new("b").unwrap();
        a.define("slug", gen_slug, any);
        assert!(a.is_supported_element_type("slug"));
        assert!(!b.is_supported_element_type("slug"));
        assert_eq!(a.gen_element_type("slug").unwrap().element_type, "slug");
        assert!(b.gen_element_type("slug").is_none());
    }

    #[test]
    fn test_render_registry() {
        fn ids(out: &mut dyn Write, model: &Model) -> Result<()> {
            writeln!(out, "{}", model.get_element_ids().join(","))?;
            Ok(())
        }
        let mut model = Model::new("people").unwrap();
        model.register("ids", ids);
        assert_eq!(model.renderer_names(), vec!["ids"]);

        let mut out = Vec::<u8>::new();
        model.render(&mut out, "ids").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id\n");

        let err = model.render(&mut Vec::<u8>::new(), "pdf").unwrap_err();
        assert_eq!(err.to_string(), "pdf is not a registered rendering function");
    }
}
