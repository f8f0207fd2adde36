//! Renderers that project a [`models::Model`] into other languages.
//!
//! Each renderer is a plain [`models::RenderFn`]. [`register_renderers`]
//! attaches all of them to a model so they can be invoked by name through
//! [`models::Model::render`].

mod html;
mod python;
mod sqlite;
pub mod type_utils;
mod typescript;

pub use html::{element_to_html, model_to_html};
pub use python::model_to_python;
pub use sqlite::model_to_sqlite;
pub use typescript::model_to_typescript;

use models::{Model, ModelError, Result};

/// Renderer names registered by [`register_renderers`].
pub const RENDERER_NAMES: [&str; 5] = ["html", "python", "sqlite", "sqlite3", "typescript"];

/// Register the HTML, SQLite, TypeScript and Python renderers on `model`.
/// `sqlite3` is an alias for `sqlite`.
pub fn register_renderers(model: &mut Model) {
    model.register("html", model_to_html);
    model.register("sqlite", model_to_sqlite);
    model.register("sqlite3", model_to_sqlite);
    model.register("typescript", model_to_typescript);
    model.register("python", model_to_python);
}

/// Render `model` with the renderer registered as `name` and return the
/// output as a string.
pub fn render_to_string(model: &Model, name: &str) -> Result<String> {
    let mut out = Vec::<u8>::new();
    model.render(&mut out, name)?;
    String::from_utf8(out).map_err(|e| ModelError::Schema(format!("{name} output: {e}")))
}
