pub mod element;
pub mod error;
pub mod model;
pub mod registry;
pub mod schema;
pub mod types;
pub mod validation;

pub use element::{is_valid_varname, Element, GenElementFn, ValidateFn};
pub use error::{ModelError, Result};
pub use model::{Model, RenderFn};
pub use registry::TypeRegistry;
pub use schema::{model_to_yaml, parse_model, parse_model_json, parse_model_str, write_model};
pub use types::{set_default_types, set_inert_types};
pub use validation::ValidationResult;
