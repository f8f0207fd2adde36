use crate::type_utils::{class_name, typescript_default, typescript_type};
use models::{Model, Result};
use std::io::Write;

/// Render `model` as a TypeScript interface plus a class implementing it.
pub fn model_to_typescript(out: &mut dyn Write, model: &Model) -> Result<()> {
    writeln!(out, "/*\nModel: {}\n\n{}\n*/\n", model.id, model.description)?;

    let class = class_name(&model.id);
    let interface = format!("{class}Interface");

    writeln!(out, "// {interface} describes a {class} record")?;
    writeln!(out, "export interface {interface} {{")?;
    for elem in &model.elements {
        writeln!(out, "\t{}: {};", elem.id, typescript_type(elem))?;
    }
    writeln!(out, "}}\n")?;

    writeln!(out, "// {class}'s class definition")?;
    writeln!(out, "export class {class} implements {interface} {{")?;
    for elem in &model.elements {
        let ts_type = typescript_type(elem);
        writeln!(
            out,
            "\t{}: {} = {};",
            elem.id,
            ts_type,
            typescript_default(ts_type)
        )?;
    }
    writeln!(out, "}}")?;
    Ok(())
}
