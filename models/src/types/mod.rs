//! Element generators and form value validators for the supported types.
//!
//! Each type is a pair of plain functions: `generate_*` builds an element
//! pre-configured for the type and `validate_*` checks a submitted value
//! (always a string) against an element. [`set_default_types`] registers
//! the default vocabulary on a model.

mod datetime;
mod identifier;
mod input;

pub use datetime::{
    generate_date, generate_datetime_local, generate_month, generate_time, generate_week,
    validate_date, validate_datetime_local, validate_month, validate_time, validate_week,
};
pub use identifier::{
    generate_isni, generate_orcid, generate_ror, generate_uuid, validate_isni, validate_orcid,
    validate_ror, validate_uuid, ISNI_PATTERN, ORCID_PATTERN, ROR_PATTERN,
};
pub use input::{
    generate_button, generate_checkbox, generate_color, generate_email, generate_image,
    generate_number, generate_password, generate_radio, generate_range, generate_reset,
    generate_search, generate_submit, generate_tel, generate_text, generate_textarea,
    generate_url, validate_button, validate_checkbox, validate_color, validate_email,
    validate_image, validate_number, validate_password, validate_radio, validate_range,
    validate_reset, validate_search, validate_submit, validate_tel, validate_text,
    validate_textarea, validate_url,
};

use crate::element::Element;
use crate::model::Model;
use std::fmt::Display;

/// Types registered by [`set_default_types`].
pub const DEFAULT_TYPES: [&str; 19] = [
    "date",
    "datetime-local",
    "month",
    "color",
    "email",
    "text",
    "number",
    "range",
    "tel",
    "time",
    "url",
    "checkbox",
    "password",
    "radio",
    "textarea",
    "orcid",
    "isni",
    "uuid",
    "ror",
];

/// Input kinds that carry no value worth persisting. They are left out of
/// the default vocabulary; see [`set_inert_types`].
pub const INERT_TYPES: [&str; 6] = ["button", "reset", "submit", "search", "image", "week"];

/// Register the default type vocabulary on `model`.
pub fn set_default_types(model: &mut Model) {
    model.define("date", generate_date, validate_date);
    model.define("datetime-local", generate_datetime_local, validate_datetime_local);
    model.define("month", generate_month, validate_month);
    model.define("color", generate_color, validate_color);
    model.define("email", generate_email, validate_email);
    model.define("text", generate_text, validate_text);
    model.define("number", generate_number, validate_number);
    model.define("range", generate_range, validate_range);
    model.define("tel", generate_tel, validate_tel);
    model.define("time", generate_time, validate_time);
    model.define("url", generate_url, validate_url);
    model.define("checkbox", generate_checkbox, validate_checkbox);
    model.define("password", generate_password, validate_password);
    model.define("radio", generate_radio, validate_radio);
    model.define("textarea", generate_textarea, validate_textarea);
    model.define("orcid", generate_orcid, validate_orcid);
    model.define("isni", generate_isni, validate_isni);
    model.define("uuid", generate_uuid, validate_uuid);
    model.define("ror", generate_ror, validate_ror);
}

/// Register button, reset, submit, search, image and week.
pub fn set_inert_types(model: &mut Model) {
    model.define("button", generate_button, validate_button);
    model.define("reset", generate_reset, validate_reset);
    model.define("submit", generate_submit, validate_submit);
    model.define("search", generate_search, validate_search);
    model.define("image", generate_image, validate_image);
    model.define("week", generate_week, validate_week);
}

/// Log why a value was turned down and reject it.
fn rejected(elem: &Element, value: &str, reason: impl Display) -> bool {
    log::debug!(
        "failed to validate elem.id {:?}, elem.type {:?}, value {:?}: {reason}",
        elem.id,
        elem.element_type,
        value
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_types_registered() {
        let mut model = Model::new("things").unwrap();
        assert!(model.types().is_empty());
        set_default_types(&mut model);

        for type_name in DEFAULT_TYPES {
            assert!(model.is_supported_element_type(type_name), "{type_name}");
        }
        for type_name in INERT_TYPES {
            assert!(!model.is_supported_element_type(type_name), "{type_name}");
        }
        assert_eq!(model.types().type_names().len(), DEFAULT_TYPES.len());
    }

    #[test]
    fn test_inert_types_are_opt_in() {
        let mut model = Model::new("things").unwrap();
        set_default_types(&mut model);
        set_inert_types(&mut model);
        for type_name in INERT_TYPES {
            assert!(model.is_supported_element_type(type_name), "{type_name}");
        }
    }

    #[test]
    fn test_generated_elements_carry_their_type() {
        let mut model = Model::new("things").unwrap();
        set_default_types(&mut model);
        for type_name in DEFAULT_TYPES {
            let elem = model.gen_element_type(type_name).unwrap();
            assert_eq!(elem.element_type, type_name);
            assert!(elem.id.is_empty());
        }
        assert!(model.gen_element_type("hologram").is_none());
    }

    #[test]
    fn test_generated_range_bounds() {
        let elem = generate_range();
        assert_eq!(elem.attributes["min"], "0");
        assert_eq!(elem.attributes["max"], "100");
        assert!(validate_range(&elem, "100"));
    }
}
