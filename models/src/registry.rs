use crate::element::{Element, GenElementFn, ValidateFn};
use std::collections::HashMap;
use std::fmt;

/// Maps a type name to its element generator and its form value validator.
///
/// Every [`crate::Model`] owns one, so two models may recognize different
/// type vocabularies. It starts out empty; see [`crate::types::set_default_types`].
#[derive(Clone, Default)]
pub struct TypeRegistry {
    generators: HashMap<String, GenElementFn>,
    validators: HashMap<String, ValidateFn>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the generator and validator for `type_name`.
    pub fn define(&mut self, type_name: &str, generator: GenElementFn, validator: ValidateFn) {
        self.generators.insert(type_name.to_string(), generator);
        self.validators.insert(type_name.to_string(), validator);
    }

    pub fn is_supported(&self, type_name: &str) -> bool {
        self.generators.contains_key(type_name)
    }

    pub fn generate(&self, type_name: &str) -> Option<Element> {
        self.generators.get(type_name).map(|generate| generate())
    }

    pub fn validator(&self, type_name: &str) -> Option<ValidateFn> {
        self.validators.get(type_name).copied()
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.generators.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}
