use super::rejected;
use crate::element::Element;
use chrono::{DateTime, NaiveDate, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

// Layouts for `has_layout`: `9` stands for one ASCII digit.
const DATE_LAYOUT: &str = "9999-99-99";
const MONTH_LAYOUT: &str = "9999-99";
const TIME_LAYOUT: &str = "99:99:99";
const TIMESTAMP_LAYOUT: &str = "9999-99-99T99:99:99";

/// True when `value` is as long as `layout`, holds a digit wherever the
/// layout has `9` and the same byte everywhere else. chrono tolerates
/// padding and signs that the fixed layouts do not.
fn has_layout(value: &[u8], layout: &str) -> bool {
    value.len() == layout.len()
        && value.iter().zip(layout.bytes()).all(|(&v, l)| match l {
            b'9' => v.is_ascii_digit(),
            _ => v == l,
        })
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    if !has_layout(value.as_bytes(), DATE_LAYOUT) {
        return Err("expected YYYY-MM-DD".to_string());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| e.to_string())
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    if !has_layout(value.as_bytes(), TIME_LAYOUT) {
        return Err("expected HH:MM:SS".to_string());
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|e| e.to_string())
}

pub fn generate_date() -> Element {
    Element::of_type("date").with_attribute("placeholder", "enter a date")
}

/// A date must be `YYYY-MM-DD`.
pub fn validate_date(elem: &Element, value: &str) -> bool {
    match parse_date(value) {
        Ok(_) => true,
        Err(e) => rejected(elem, value, e),
    }
}

pub fn generate_datetime_local() -> Element {
    Element::of_type("datetime-local").with_attribute("placeholder", "enter a local timestamp")
}

/// Accepts an empty value, a full RFC 3339 timestamp (when the value is
/// long enough to carry a zone) or a local `YYYY-MM-DD[T ]HH:MM:SS`.
pub fn validate_datetime_local(elem: &Element, value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    if value.len() >= 20 {
        let stamp = value.as_bytes().get(..TIMESTAMP_LAYOUT.len()).unwrap_or_default();
        if !has_layout(stamp, TIMESTAMP_LAYOUT) || value.ends_with('z') {
            return rejected(elem, value, "expected YYYY-MM-DDTHH:MM:SS with a zone");
        }
        return match DateTime::parse_from_rfc3339(value) {
            Ok(_) => true,
            Err(e) => rejected(elem, value, e),
        };
    }
    let Some(date) = value.get(..10) else {
        return rejected(elem, value, "too short for a date");
    };
    if let Err(e) = parse_date(date) {
        return rejected(elem, value, e);
    }
    if value.len() <= 10 {
        return rejected(elem, value, "missing time");
    }
    if !matches!(value.as_bytes()[10], b'T' | b' ') {
        return rejected(elem, value, "missing T or space between date and time");
    }
    match value.get(11..).map(parse_time) {
        Some(Ok(_)) => true,
        Some(Err(e)) => rejected(elem, value, e),
        None => rejected(elem, value, "malformed time"),
    }
}

pub fn generate_month() -> Element {
    Element::of_type("month")
        .with_attribute("placeholder", "Enter year dash month, example 2006-01")
}

/// A month must be `YYYY-MM`.
pub fn validate_month(elem: &Element, value: &str) -> bool {
    if !has_layout(value.as_bytes(), MONTH_LAYOUT) {
        return rejected(elem, value, "expected YYYY-MM");
    }
    match parse_date(&format!("{value}-01")) {
        Ok(_) => true,
        Err(e) => rejected(elem, value, e),
    }
}

pub fn generate_time() -> Element {
    Element::of_type("time")
        .with_attribute("placeholder", "E.g. 13:44:00 would be 1:44pm")
        .with_attribute("pattern", "[0-2][0-9]:[0-5][0-9]:[0-5][0-9]")
}

/// A time must be `HH:MM:SS`.
pub fn validate_time(elem: &Element, value: &str) -> bool {
    match parse_time(value) {
        Ok(_) => true,
        Err(e) => rejected(elem, value, e),
    }
}

pub fn generate_week() -> Element {
    Element::of_type("week")
        .with_attribute("placeholder", "Input as WW-YYYY where WW is week number, e.g. 51-2024")
        .with_attribute("pattern", "[0-5][0-9]-[0-9]{4}")
}

/// A week is `WW-YYYY`. Week numbers run 1 through 53 regardless of year.
pub fn validate_week(elem: &Element, value: &str) -> bool {
    if value.find('-') != Some(2) {
        return rejected(elem, value, "expected WW-YYYY");
    }
    let week = match value[..2].parse::<i32>() {
        Ok(week) => week,
        Err(e) => return rejected(elem, value, e),
    };
    if let Err(e) = value[3..].parse::<i64>() {
        return rejected(elem, value, e);
    }
    if (1..=53).contains(&week) {
        true
    } else {
        rejected(elem, value, "week number out of range")
    }
}
