use models::{Element, Model, Result};
use std::collections::BTreeMap;
use std::io::Write;

/// Render `model` as an HTML input form. The form carries no values;
/// populating it is left to the page.
pub fn model_to_html(out: &mut dyn Write, model: &Model) -> Result<()> {
    if model.id.is_empty() {
        writeln!(out, "<!-- {} -->", escape_comment(&model.description))?;
        write!(out, "<form")?;
    } else {
        writeln!(
            out,
            "<!-- {}: {} -->",
            model.id,
            escape_comment(&model.description)
        )?;
        write!(out, "<form id=\"{}\"", escape(&model.id))?;
    }
    write_attributes(out, &model.attributes)?;
    writeln!(out, ">")?;

    let css_base = model.id.to_lowercase().replace(' ', "_");
    for elem in &model.elements {
        element_to_html(out, &css_base, elem)?;
    }
    if !model.has_element_type("submit") {
        let css = format!("{css_base}-submit");
        writeln!(
            out,
            "  <div class=\"{css}\"><input class=\"{css}\" type=\"submit\" value=\"submit\"> \
             <input class=\"{css}\" type=\"reset\" value=\"cancel\"></div>"
        )?;
    }
    writeln!(out, "</form>")?;
    Ok(())
}

/// Render one element as a `div` holding its label and input.
pub fn element_to_html(out: &mut dyn Write, css_base: &str, elem: &Element) -> Result<()> {
    let css = escape(&format!("{css_base}-{}", elem.id.to_lowercase()));
    let kind = elem.element_type.to_lowercase();
    write!(out, "  <div class=\"{css}\">")?;

    let labelled = !elem.label.is_empty() && kind != "button";
    if labelled {
        write!(
            out,
            "<label class=\"{css}\" for=\"{}\">{}</label> ",
            escape(&elem.id),
            escape(&elem.label)
        )?;
    }
    match kind.as_str() {
        "textarea" => write!(out, "<textarea class=\"{css}\"")?,
        "button" => write!(out, "<button class=\"{css}\"")?,
        _ => write!(
            out,
            "<input class=\"{css}\" type=\"{}\"",
            escape(&elem.element_type)
        )?,
    }
    if !elem.id.is_empty() {
        write!(out, " id=\"{}\"", escape(&elem.id))?;
        if labelled && !elem.attributes.contains_key("name") {
            write!(out, " name=\"{}\"", escape(&elem.id))?;
        }
    }
    if !elem.pattern.is_empty() && !elem.attributes.contains_key("pattern") {
        write!(out, " pattern=\"{}\"", escape(&elem.pattern))?;
    }
    write_attributes(out, &elem.attributes)?;

    match kind.as_str() {
        "textarea" => write!(out, "></textarea>")?,
        "button" => write!(out, ">{}</button>", escape(&elem.label))?,
        _ => write!(out, ">")?,
    }
    writeln!(out, "</div>")?;
    Ok(())
}

/// `checked` and `required` are boolean attributes: present unless set
/// to "false".
fn write_attributes(out: &mut dyn Write, attributes: &BTreeMap<String, String>) -> Result<()> {
    for (key, value) in attributes {
        match key.as_str() {
            "checked" | "required" => {
                if !value.eq_ignore_ascii_case("false") {
                    write!(out, " {key}")?;
                }
            }
            _ => write!(out, " {key}=\"{}\"", escape(value))?,
        }
    }
    Ok(())
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// "--" may not appear inside a comment
fn escape_comment(s: &str) -> String {
    s.replace("--", "- -")
}
