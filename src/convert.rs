//! Literal converters.
//!
//! Each converter takes the raw text of a token and returns a typed value or
//! a [`ConversionError`]. Nothing here knows about query documents.

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid integer '{0}'")]
    Integer(String),

    #[error("invalid float '{0}'")]
    Float(String),

    #[error("invalid object id '{0}'")]
    ObjectId(String),

    #[error("invalid duration '{0}'")]
    Duration(String),

    #[error("cannot parse '{text}' as a date with layout '{layout}'")]
    Date { text: String, layout: String },

    #[error("timestamp out of range")]
    OutOfRange,
}

pub fn to_integer(raw: &str) -> Result<i64, ConversionError> {
    raw.parse::<i64>()
        .map_err(|_| ConversionError::Integer(raw.to_string()))
}

/// Finite floats only; `1e999` is an error rather than infinity.
pub fn to_float(raw: &str) -> Result<f64, ConversionError> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ConversionError::Float(raw.to_string()))
}

/// Exactly 24 hexadecimal characters.
pub fn to_object_id(raw: &str) -> Result<ObjectId, ConversionError> {
    if raw.len() != 24 || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConversionError::ObjectId(raw.to_string()));
    }
    ObjectId::parse_str(raw).map_err(|_| ConversionError::ObjectId(raw.to_string()))
}

/// Resolve `\"`, `\\`, `\n`, `\t` and `\r`. Other escapes are kept as written.
pub fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

const NANOS_PER_UNIT: &[(&str, i128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

/// Parse a signed duration such as `-24h`, `1h30m` or `1.5s`.
///
/// Units: `ns`, `us` (`µs`), `ms`, `s`, `m`, `h`. A bare `0` is accepted.
pub fn parse_duration(text: &str) -> Result<TimeDelta, ConversionError> {
    let invalid = || ConversionError::Duration(text.to_string());

    let (negative, mut rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: i128 = 0;
    while !rest.is_empty() {
        let whole_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let whole = &rest[..whole_len];
        rest = &rest[whole_len..];

        let mut fraction = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let fraction_len = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            fraction = &after_dot[..fraction_len];
            rest = &after_dot[fraction_len..];
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(invalid)?;

        let whole: i128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        total = whole
            .checked_mul(scale)
            .and_then(|n| total.checked_add(n))
            .ok_or_else(invalid)?;

        // Digits past nanosecond precision cannot change the result.
        let fraction = &fraction[..fraction.len().min(18)];
        if !fraction.is_empty() {
            let digits: i128 = fraction.parse().map_err(|_| invalid())?;
            let divisor = 10_i128.pow(fraction.len() as u32);
            total = total
                .checked_add(digits * scale / divisor)
                .ok_or_else(invalid)?;
        }
    }

    if negative {
        total = -total;
    }
    let nanos = i64::try_from(total).map_err(|_| invalid())?;
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Parse a timestamp.
///
/// Without a layout the text must be RFC 3339. A layout containing `%` is a
/// chrono `strftime` format; any other layout is written with the reference
/// date `Mon Jan 2 15:04:05 MST 2006` and translated first. Text without an
/// offset is taken as UTC, text without a time as midnight UTC.
pub fn parse_date(text: &str, layout: Option<&str>) -> Result<DateTime<Utc>, ConversionError> {
    let Some(layout) = layout else {
        return DateTime::parse_from_rfc3339(text)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|_| ConversionError::Date {
                text: text.to_string(),
                layout: "RFC 3339".to_string(),
            });
    };

    let format = if layout.contains('%') {
        layout.to_string()
    } else {
        reference_layout_to_strftime(layout)
    };

    if let Ok(ts) = DateTime::parse_from_str(text, &format) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(text, &format) {
        return Ok(ts.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, &format) {
        return Ok(day.and_time(NaiveTime::MIN).and_utc());
    }

    Err(ConversionError::Date {
        text: text.to_string(),
        layout: layout.to_string(),
    })
}

/// Longest elements first so that `2006` wins over `2`.
const REFERENCE_ELEMENTS: &[(&str, &str)] = &[
    (".000000000", "%.9f"),
    (".000000", "%.6f"),
    ("January", "%B"),
    ("Monday", "%A"),
    ("Z07:00", "%:z"),
    ("-07:00", "%:z"),
    ("Z0700", "%z"),
    ("-0700", "%z"),
    (".000", "%.3f"),
    ("2006", "%Y"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("01", "%m"),
    ("02", "%d"),
    ("_2", "%e"),
    ("15", "%H"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("1", "%m"),
    ("2", "%d"),
    ("3", "%I"),
    ("4", "%M"),
    ("5", "%S"),
];

pub fn reference_layout_to_strftime(layout: &str) -> String {
    let mut format = String::with_capacity(layout.len() * 2);
    let mut rest = layout;

    'outer: while !rest.is_empty() {
        for (element, directive) in REFERENCE_ELEMENTS {
            if let Some(after) = rest.strip_prefix(element) {
                format.push_str(directive);
                rest = after;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            if ch == '%' {
                format.push_str("%%");
            } else {
                format.push(ch);
            }
        }
        rest = chars.as_str();
    }
    format
}

/// `now` shifted by a duration such as `-24h`.
pub fn relative_date(now: DateTime<Utc>, duration: &str) -> Result<DateTime<Utc>, ConversionError> {
    let delta = parse_duration(duration)?;
    now.checked_add_signed(delta)
        .ok_or(ConversionError::OutOfRange)
}
