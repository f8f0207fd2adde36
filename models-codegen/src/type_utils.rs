use heck::ToUpperCamelCase;
use models::Element;

/// Class name for a model id.
/// e.g. "people_model" -> "PeopleModel", "guestbook" -> "Guestbook"
pub fn class_name(model_id: &str) -> String {
    model_id.to_upper_camel_case()
}

/// Map an element type to a SQLite column type.
pub fn sqlite_column_type(elem: &Element) -> &'static str {
    match elem.element_type.to_ascii_lowercase().as_str() {
        "int" | "integer" => "int",
        "float" | "real" => "real",
        "numeric" | "number" => "num",
        "checkbox" => "boolean",
        _ => "text",
    }
}

/// Column constraint implied by an element's generator, if any.
pub fn sqlite_generator_clause(generator: &str) -> Option<&'static str> {
    match generator {
        "date" | "created_date" | "current_date" => Some("default current_date not null"),
        "timestamp" | "created_timestamp" | "current_timestamp" => {
            Some("default current_timestamp not null")
        }
        _ => None,
    }
}

/// Map an element type to a TypeScript type. Unknown types are strings.
pub fn typescript_type(elem: &Element) -> &'static str {
    match elem.element_type.as_str() {
        "number" => "number",
        "range" => "number[]",
        "checkbox" => "boolean",
        _ => "string",
    }
}

/// Initializer for a TypeScript class property of the given type.
pub fn typescript_default(ts_type: &str) -> &'static str {
    match ts_type {
        "number" => "0.0",
        "boolean" => "false",
        "number[]" => "[]",
        _ => "\"\"",
    }
}

/// Python type hint and initial value for an element. Types outside the
/// default vocabulary start out as `None`.
pub fn python_field(elem: &Element) -> (&'static str, &'static str) {
    match elem.element_type.as_str() {
        "number" => ("int | float", "0"),
        "range" => ("list", "[]"),
        "checkbox" => ("bool", "False"),
        "date" | "datetime-local" | "month" | "color" | "email" | "text" | "tel" | "time"
        | "url" | "password" | "radio" | "textarea" | "orcid" | "isni" | "uuid" | "ror" => {
            ("str", "\"\"")
        }
        _ => ("Any", "None"),
    }
}
