use crate::type_utils::{sqlite_column_type, sqlite_generator_clause};
use models::{is_valid_varname, Element, Model, ModelError, Result};
use std::io::Write;

/// Render the SQLite table definition for `model`. Model and element ids
/// become table and column names, so each must be a valid variable name.
pub fn model_to_sqlite(out: &mut dyn Write, model: &Model) -> Result<()> {
    if !is_valid_varname(&model.id) {
        return Err(ModelError::InvalidId(model.id.clone()));
    }
    if let Some(elem) = model.elements.iter().find(|e| !is_valid_varname(&e.id)) {
        return Err(ModelError::InvalidId(elem.id.clone()));
    }

    if !model.description.is_empty() {
        for line in model.description.lines() {
            writeln!(out, "-- {line}")?;
        }
    }
    writeln!(out, "create table if not exists {} (", model.id)?;
    let columns: Vec<String> = model.elements.iter().map(column_definition).collect();
    if !columns.is_empty() {
        writeln!(out, "{}", columns.join(",\n"))?;
    }
    writeln!(out, ");")?;
    Ok(())
}

fn column_definition(elem: &Element) -> String {
    let mut column = format!("  {} {}", elem.id, sqlite_column_type(elem));
    if elem.generator == "autoincrement" {
        // SQLite only allows autoincrement on an integer primary key
        if elem.is_object_id {
            return format!("  {} integer primary key autoincrement", elem.id);
        }
        log::warn!(
            "ignoring autoincrement on {:?}, it is not the object identifier",
            elem.id
        );
    } else if let Some(clause) = sqlite_generator_clause(&elem.generator) {
        column.push(' ');
        column.push_str(clause);
    }
    if elem.is_object_id {
        column.push_str(" primary key");
    }
    column
}
