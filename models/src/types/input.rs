use super::rejected;
use crate::element::Element;
use email_address::EmailAddress;
use phonenumber::country;
use regex::Regex;
use url::Url;

/// Parse a value the way a JSON decoder reads a number.
fn parse_json_number(value: &str) -> Option<f64> {
    serde_json::from_str::<f64>(value).ok()
}

// ── Text ─────────────────────────────────────────────────────────────

pub fn generate_text() -> Element {
    Element::of_type("text")
}

/// Without a pattern any text is accepted. Otherwise the value must match
/// the element's pattern.
pub fn validate_text(elem: &Element, value: &str) -> bool {
    if elem.pattern.is_empty() {
        return true;
    }
    let re = match Regex::new(&elem.pattern) {
        Ok(re) => re,
        Err(e) => {
            log::warn!("element {:?} has an unusable pattern: {e}", elem.id);
            return false;
        }
    };
    if re.is_match(value) {
        true
    } else {
        rejected(elem, value, format!("does not match pattern {:?}", elem.pattern))
    }
}

pub fn generate_textarea() -> Element {
    Element::of_type("textarea")
}

pub fn validate_textarea(elem: &Element, value: &str) -> bool {
    validate_text(elem, value)
}

pub fn generate_search() -> Element {
    Element::of_type("search")
}

pub fn validate_search(elem: &Element, value: &str) -> bool {
    validate_text(elem, value)
}

pub fn generate_password() -> Element {
    Element::of_type("password")
}

/// A password is a single line of text.
pub fn validate_password(elem: &Element, value: &str) -> bool {
    if value.contains(['\r', '\n']) {
        return rejected(elem, value, "line break in password");
    }
    validate_text(elem, value)
}

// ── Numbers ──────────────────────────────────────────────────────────

pub fn generate_number() -> Element {
    Element::of_type("number").with_attribute("value", "0")
}

pub fn validate_number(elem: &Element, value: &str) -> bool {
    match parse_json_number(value) {
        Some(_) => true,
        None => rejected(elem, value, "not a number"),
    }
}

pub fn generate_range() -> Element {
    Element::of_type("range")
        .with_attribute("value", "0")
        .with_attribute("min", "0")
        .with_attribute("max", "100")
        .with_attribute("step", "1")
}

/// The element must define numeric `min` and `max` attributes; the value
/// must lie between them, inclusive. `step` is not checked.
pub fn validate_range(elem: &Element, value: &str) -> bool {
    let bound = |name: &str| elem.attributes.get(name).and_then(|v| parse_json_number(v));
    let (Some(min), Some(max)) = (bound("min"), bound("max")) else {
        return rejected(elem, value, "range needs numeric min and max attributes");
    };
    match parse_json_number(value) {
        Some(n) if n >= min && n <= max => true,
        Some(_) => rejected(elem, value, format!("outside {min}..={max}")),
        None => rejected(elem, value, "not a number"),
    }
}

pub fn generate_color() -> Element {
    Element::of_type("color")
        .with_attribute("value", "000000")
        .with_attribute(
            "placeholder",
            "enter a color in hexadecimal format, e.g. green is 00FF00",
        )
}

/// A color is an unsigned hexadecimal integer.
pub fn validate_color(elem: &Element, value: &str) -> bool {
    if value.is_empty() || value.starts_with('+') {
        return rejected(elem, value, "not a hexadecimal number");
    }
    match u64::from_str_radix(value, 16) {
        Ok(_) => true,
        Err(e) => rejected(elem, value, e),
    }
}

// ── Contact ──────────────────────────────────────────────────────────

pub fn generate_email() -> Element {
    Element::of_type("email").with_attribute("placeholder", "E.g. jane.doe@example.org")
}

fn is_atext(c: char) -> bool {
    c.is_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c)
}

/// A display name is a phrase: atoms and quoted strings separated by
/// whitespace. Dots are allowed in atoms.
fn is_display_name(name: &str) -> bool {
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => {}
            '"' => loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => {
                        if chars.next().is_none() {
                            return false;
                        }
                    }
                    Some('\r' | '\n') | None => return false,
                    Some(_) => {}
                }
            },
            c if is_atext(c) || c == '.' => {}
            _ => return false,
        }
    }
    true
}

/// Accepts a single mailbox, either a bare address or
/// `Display Name <address>`.
pub fn validate_email(elem: &Element, value: &str) -> bool {
    let trimmed = value.trim();
    let address = match (trimmed.find('<'), trimmed.strip_suffix('>')) {
        (Some(open), Some(inner)) => {
            if !is_display_name(&trimmed[..open]) {
                return rejected(elem, value, "malformed display name");
            }
            &inner[open + 1..]
        }
        _ => trimmed,
    };
    if EmailAddress::is_valid(address) {
        true
    } else {
        rejected(elem, value, "not an email address")
    }
}

pub fn generate_tel() -> Element {
    Element::of_type("tel")
        .with_attribute("placeholder", "e.g. phone like 123-456-7890")
        .with_attribute("pattern", "[0-9]{3}-[0-9]{3}-[0-9]{4}")
}

/// Phone numbers are parsed for the US region.
pub fn validate_tel(elem: &Element, value: &str) -> bool {
    if value.trim().is_empty() {
        return rejected(elem, value, "empty phone number");
    }
    match phonenumber::parse(Some(country::Id::US), value) {
        Ok(_) => true,
        Err(e) => rejected(elem, value, e),
    }
}

pub fn generate_url() -> Element {
    Element::of_type("url")
        .with_attribute("placeholder", "https://example.edu")
        .with_attribute("pattern", "https://.*")
}

// Relative references are resolved against this before parsing.
const URL_BASE: &str = "http://localhost/";

/// Syntactic check only; nothing is fetched. Absolute URLs and relative
/// references such as `/about` or `example.edu` are both accepted.
pub fn validate_url(elem: &Element, value: &str) -> bool {
    if value.is_empty() {
        return rejected(elem, value, "empty URL");
    }
    let parsed = match Url::parse(value) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(URL_BASE).and_then(|base| base.join(value))
        }
        other => other,
    };
    match parsed {
        Ok(_) => true,
        Err(e) => rejected(elem, value, e),
    }
}

// ── Choices ──────────────────────────────────────────────────────────

pub fn generate_checkbox() -> Element {
    Element::of_type("checkbox")
}

/// A checkbox submits its value only when checked.
pub fn validate_checkbox(elem: &Element, value: &str) -> bool {
    if value.trim().is_empty() {
        return rejected(elem, value, "no value submitted");
    }
    true
}

pub fn generate_radio() -> Element {
    Element::of_type("radio")
}

pub fn validate_radio(elem: &Element, value: &str) -> bool {
    if value.trim().is_empty() {
        return rejected(elem, value, "no value submitted");
    }
    true
}

// ── Inert ────────────────────────────────────────────────────────────

pub fn generate_button() -> Element {
    Element::of_type("button")
}

pub fn validate_button(_elem: &Element, _value: &str) -> bool {
    true
}

pub fn generate_reset() -> Element {
    Element::of_type("reset").with_attribute("value", "reset")
}

pub fn validate_reset(_elem: &Element, _value: &str) -> bool {
    true
}

pub fn generate_submit() -> Element {
    Element::of_type("submit").with_attribute("value", "submit")
}

pub fn validate_submit(_elem: &Element, _value: &str) -> bool {
    true
}

pub fn generate_image() -> Element {
    Element::of_type("image")
}

/// An image input never carries a value.
pub fn validate_image(elem: &Element, value: &str) -> bool {
    if value.is_empty() {
        true
    } else {
        rejected(elem, value, "image inputs have no value")
    }
}
