//! Filename decoding for the `[date-][order.]name.ext[.render...]` convention.
//!
//! A content file name carries up to three pieces of information besides its
//! name, and they are peeled off in a fixed order:
//!
//! 1. **Render extensions**: trailing extensions recognized as rendering
//!    stages are stripped one at a time (`about.html.md` → `about.html`,
//!    extensions `["md"]`). Stripping stops at the first unknown extension.
//! 2. **Date prefix**: `YYYY-M-D`, optionally followed by a time
//!    `[Tt@]H.M[.S]`, then a `-` or whitespace separator
//!    (`2023-5-14-my-post` → `my-post`, dated 2023-05-14 00:00:00).
//! 3. **Order prefix**: digits followed by `.` or `-`
//!    (`03.intro` → `intro`, order 3).
//!
//! ```text
//! 2023-05-14T09.30-hello-world.html.md
//! └────┬─────────┘ └────┬────┘ └┬─┘ └┬┘
//!    date            name      ext  render extension
//! ```
//!
//! A date prefix is always removed from the name, but when the front matter
//! already supplied an explicit date the filename date is ignored.

use crate::config::LoadOptions;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?<year>\d{4})-(?<month>\d{1,2})-(?<day>\d{1,2})(?:[Tt@](?<hour>\d{1,2})\.(?<minute>\d{1,2})(?:\.(?<second>\d{1,2}))?)?[-\s]\s*",
    )
    .unwrap()
});

static ORDER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?<order>\d+)[.\-]\s*").unwrap());

#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("malformed {field} digits in file name: {digits:?}")]
    MalformedNumber { field: &'static str, digits: String },
    #[error("date prefix is not a valid calendar date: {text:?}")]
    InvalidDate { text: String },
}

/// Extensions recognized as rendering stages (`md`, `liquid`, ...).
///
/// Comparison is ASCII case-insensitive; tokens are stored without the
/// leading dot, lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnownExtensions(Vec<String>);

impl KnownExtensions {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.0.iter().any(|known| known.eq_ignore_ascii_case(extension))
    }
}

/// Result of decoding a bare file name.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedName {
    /// What is left after stripping render extensions, date and order.
    pub name: String,
    /// Explicit date if one was supplied, otherwise the filename date.
    pub date: Option<NaiveDateTime>,
    /// Order prefix, 0 when absent.
    pub order: i32,
    /// Stripped render extensions in strip order (outermost first).
    pub extensions: Vec<String>,
}

/// Time-of-day part of a date prefix, as raw digit groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePrefix<'a> {
    pub hour: &'a str,
    pub minute: &'a str,
    pub second: Option<&'a str>,
}

/// A matched `YYYY-M-D[Th.m[.s]]` prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatePrefix<'a> {
    pub year: &'a str,
    pub month: &'a str,
    pub day: &'a str,
    pub time: Option<TimePrefix<'a>>,
    /// Byte length of the whole prefix, separator included.
    pub len: usize,
}

impl DatePrefix<'_> {
    /// Convert the digit groups into a timestamp. Missing time parts are 0.
    pub fn to_datetime(&self) -> Result<NaiveDateTime, DecodeError> {
        let year = parse_digits::<i32>("year", self.year)?;
        let month = parse_digits::<u32>("month", self.month)?;
        let day = parse_digits::<u32>("day", self.day)?;
        let (hour, minute, second) = match self.time {
            Some(t) => (
                parse_digits::<u32>("hour", t.hour)?,
                parse_digits::<u32>("minute", t.minute)?,
                t.second
                    .map(|s| parse_digits::<u32>("second", s))
                    .transpose()?
                    .unwrap_or(0),
            ),
            None => (0, 0, 0),
        };

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .ok_or_else(|| DecodeError::InvalidDate {
                text: format!("{year}-{month}-{day} {hour}:{minute}:{second}"),
            })
    }
}

/// A matched `N.` / `N-` prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderPrefix<'a> {
    pub digits: &'a str,
    pub len: usize,
}

impl OrderPrefix<'_> {
    pub fn value(&self) -> Result<i32, DecodeError> {
        parse_digits("order", self.digits)
    }
}

/// `\d` is Unicode-aware, so a matched group can still fail to parse
/// (e.g. Arabic-Indic digits) or overflow.
fn parse_digits<T: std::str::FromStr>(field: &'static str, digits: &str) -> Result<T, DecodeError> {
    digits.parse().map_err(|_| DecodeError::MalformedNumber {
        field,
        digits: digits.to_string(),
    })
}

pub fn match_date_prefix(name: &str) -> Option<DatePrefix<'_>> {
    let caps = DATE_PREFIX.captures(name)?;
    let time = match (caps.name("hour"), caps.name("minute")) {
        (Some(hour), Some(minute)) => Some(TimePrefix {
            hour: hour.as_str(),
            minute: minute.as_str(),
            second: caps.name("second").map(|m| m.as_str()),
        }),
        _ => None,
    };
    Some(DatePrefix {
        year: caps.name("year")?.as_str(),
        month: caps.name("month")?.as_str(),
        day: caps.name("day")?.as_str(),
        time,
        len: caps.get(0)?.end(),
    })
}

pub fn match_order_prefix(name: &str) -> Option<OrderPrefix<'_>> {
    let caps = ORDER_PREFIX.captures(name)?;
    Some(OrderPrefix {
        digits: caps.name("order")?.as_str(),
        len: caps.get(0)?.end(),
    })
}

/// Extension of a bare file name, without the dot (`"a.b.md"` → `"md"`).
pub fn file_extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

/// File name without its last extension (`"about.html"` → `"about"`).
pub fn file_stem(name: &str) -> &str {
    name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
}

/// Strip trailing render extensions, returning the remaining name and the
/// stripped tokens (lowercased, outermost first).
pub fn strip_render_extensions<'a>(
    file_name: &'a str,
    known: &KnownExtensions,
) -> (&'a str, Vec<String>) {
    let mut name = file_name;
    let mut extensions = Vec::new();
    while let Some((stem, ext)) = name.rsplit_once('.') {
        if !known.contains(ext) {
            break;
        }
        extensions.push(ext.to_ascii_lowercase());
        name = stem;
    }
    (name, extensions)
}

/// Decode a bare file name (no directory).
///
/// `explicit_date` is the date supplied by the front matter; when present it
/// wins over the filename date, but the date prefix is still removed.
pub fn decode_file_name(
    file_name: &str,
    known: &KnownExtensions,
    options: LoadOptions,
    explicit_date: Option<NaiveDateTime>,
) -> Result<DecodedName, DecodeError> {
    let (mut name, extensions) = strip_render_extensions(file_name, known);
    let mut date = explicit_date;
    let mut order = 0;

    if options.date_from_file_name
        && let Some(prefix) = match_date_prefix(name)
    {
        if date.is_none() {
            date = Some(prefix.to_datetime()?);
        }
        name = &name[prefix.len..];
    }

    if options.order_from_file_name
        && let Some(prefix) = match_order_prefix(name)
    {
        order = prefix.value()?;
        name = &name[prefix.len..];
    }

    Ok(DecodedName {
        name: name.to_string(),
        date,
        order,
        extensions,
    })
}
