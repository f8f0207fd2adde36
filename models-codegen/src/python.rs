use crate::type_utils::{class_name, python_field};
use models::{Model, Result};
use std::io::Write;

/// Render `model` as a Python class with type hints and an `__init__`
/// that assigns each element's default.
pub fn model_to_python(out: &mut dyn Write, model: &Model) -> Result<()> {
    writeln!(out, "#\n# Model: {}\n#", model.id)?;
    for line in model.description.lines() {
        writeln!(out, "# {line}")?;
    }
    writeln!(out, "#\n")?;

    let needs_any = model
        .elements
        .iter()
        .any(|elem| python_field(elem).0 == "Any");
    if needs_any {
        writeln!(out, "from typing import Any\n")?;
    }

    let class = class_name(&model.id);
    writeln!(out, "# {class} model's definition")?;
    writeln!(out, "class {class}:")?;
    if model.elements.is_empty() {
        writeln!(out, "    pass")?;
        return Ok(());
    }
    for elem in &model.elements {
        writeln!(out, "    {}: {}", elem.id, python_field(elem).0)?;
    }
    writeln!(out, "\n    def __init__(self):")?;
    for elem in &model.elements {
        writeln!(out, "        self.{} = {}", elem.id, python_field(elem).1)?;
    }
    Ok(())
}
