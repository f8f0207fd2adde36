use super::rejected;
use crate::element::Element;
use regex::Regex;
use std::sync::LazyLock;

/// HTML pattern for an ISNI, written with spaces or dashes.
pub const ISNI_PATTERN: &str =
    "[0-9]{4} [0-9]{4} [0-9]{4} [0-9]{3}[0-9X]|[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X]";
pub const ORCID_PATTERN: &str = "[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9A-Z]";
pub const ROR_PATTERN: &str = "^0[a-hj-km-np-tv-z|0-9]{6}[0-9]{2}$";

static ROR_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(ROR_PATTERN));

const ROR_PREFIX: &str = "https://ror.org/";
const ORCID_PREFIX: &str = "https://orcid.org/";

// The smallest and largest ORCID values, leading 15 digits only.
const ORCID_MIN: u64 = 15_000_000;
const ORCID_MAX: u64 = 35_000_000;

/// Check an ISO 7064 MOD 11-2 identifier. Dashes and spaces are ignored.
/// Returns the 16 normalized characters on success.
fn check_mod11_2(value: &str) -> Result<String, String> {
    let normalized: String = value
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if normalized.chars().count() != 16 {
        return Err(format!("expected 16 digits, found {}", normalized.len()));
    }
    let mut total: u32 = 0;
    for c in normalized.chars().take(15) {
        let digit = c.to_digit(10).ok_or_else(|| format!("{c:?} is not a digit"))?;
        total = (total + digit) * 2;
    }
    let expected = (12 - total % 11) % 11;
    // 10 is written as X, which never equals a decimal digit
    match normalized.chars().last().and_then(|c| c.to_digit(10)) {
        Some(found) if found == expected => Ok(normalized),
        _ => Err("check digit mismatch".to_string()),
    }
}

pub fn generate_isni() -> Element {
    Element::of_type("isni").with_pattern(ISNI_PATTERN)
}

/// An empty value is accepted. Anything else must carry a valid check digit.
pub fn validate_isni(elem: &Element, value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    match check_mod11_2(value) {
        Ok(_) => true,
        Err(e) => rejected(elem, value, e),
    }
}

pub fn generate_orcid() -> Element {
    Element::of_type("orcid").with_pattern(ORCID_PATTERN)
}

/// An empty value is accepted. Otherwise an ORCID, with or without the
/// `https://orcid.org/` prefix, must pass the ISNI checksum and fall in
/// the block reserved for ORCID.
pub fn validate_orcid(elem: &Element, value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    let bare = value.strip_prefix(ORCID_PREFIX).unwrap_or(value);
    let normalized = match check_mod11_2(bare) {
        Ok(normalized) => normalized,
        Err(e) => return rejected(elem, value, e),
    };
    match normalized[..15].parse::<u64>() {
        Ok(n) if (ORCID_MIN..=ORCID_MAX).contains(&n) => true,
        Ok(_) => rejected(elem, value, "outside the ORCID block"),
        Err(e) => rejected(elem, value, e),
    }
}

pub fn generate_ror() -> Element {
    Element::of_type("ror").with_pattern(ROR_PATTERN)
}

/// An empty value is accepted. A ROR may be given bare or as a
/// `https://ror.org/` URL.
pub fn validate_ror(elem: &Element, value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    let bare = value.strip_prefix(ROR_PREFIX).unwrap_or(value);
    match &*ROR_RE {
        Ok(re) if re.is_match(bare) => true,
        Ok(_) => rejected(elem, value, "not a ROR"),
        Err(e) => rejected(elem, value, e),
    }
}

pub fn generate_uuid() -> Element {
    Element::of_type("uuid")
}

/// An empty value is accepted. Any RFC 4122 textual form is accepted.
pub fn validate_uuid(elem: &Element, value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    match uuid::Uuid::parse_str(value) {
        Ok(_) => true,
        Err(e) => rejected(elem, value, e),
    }
}
