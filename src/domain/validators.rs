// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ready-made validators for common setting formats.
//!
//! Each function is a plain predicate over the raw leaf string, suitable for
//! [`ValidationMap::insert`](crate::domain::ValidationMap::insert). None of them
//! panic. They check format only; nothing is resolved or contacted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([a-z0-9]+(-[a-z0-9]+)*\.)+[a-z]{2,63}$").expect("hostname pattern is valid")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@",
        r"[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    ))
    .expect("email pattern is valid")
});

const SPECIAL_SCHEMES: &[&str] = &["http", "https", "ftp", "ws", "wss", "file"];

/// Accepts every value; use it to require that a key is present.
pub fn exists(_value: &str) -> bool {
    true
}

/// `true` or `false`, case-insensitive.
pub fn is_valid_boolean(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

/// A 32-bit signed integer.
pub fn is_valid_integer(value: &str) -> bool {
    value.trim().parse::<i32>().is_ok()
}

/// An absolute URL. Hierarchical schemes such as `http` must be followed by `//`.
pub fn is_valid_url(value: &str) -> bool {
    let value = value.trim();
    let Ok(url) = url::Url::parse(value) else {
        return false;
    };
    if SPECIAL_SCHEMES.contains(&url.scheme()) {
        let authority = format!("{}://", url.scheme());
        return value.to_ascii_lowercase().starts_with(&authority);
    }
    true
}

/// A dotted DNS name such as `www.example.com`; labels are at most 63 characters.
pub fn is_valid_hostname(value: &str) -> bool {
    let value = value.trim();
    HOSTNAME.is_match(value) && value.split('.').all(|label| label.len() <= 63)
}

/// A dotted-quad IPv4 address.
pub fn is_valid_ip_address(value: &str) -> bool {
    value.trim().parse::<Ipv4Addr>().is_ok()
}

/// Either [`is_valid_hostname`] or [`is_valid_ip_address`].
pub fn is_valid_hostname_or_ip(value: &str) -> bool {
    is_valid_hostname(value) || is_valid_ip_address(value)
}

/// A single `local@domain` address.
pub fn is_valid_email_address(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// A `delimiter`-separated list of addresses; empty entries make the list invalid.
pub fn are_all_valid_email_addresses(value: &str, delimiter: char) -> bool {
    value.split(delimiter).all(is_valid_email_address)
}

/// An absolute file-system path.
pub fn is_well_formed_path(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && Path::new(value).is_absolute()
}

/// A `[d.]hh:mm[:ss[.fffffff]]` time interval with hours below 24 and minutes and
/// seconds below 60.
pub fn is_valid_time_interval(value: &str) -> bool {
    parse_time_interval(value).is_some()
}

pub(crate) fn parse_time_interval(value: &str) -> Option<Duration> {
    let parts: Vec<&str> = value.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let (days, hours) = match parts[0].split_once('.') {
        Some((days, hours)) => (digits(days)?, digits(hours)?),
        None => (0, digits(parts[0])?),
    };
    let minutes = digits(parts[1])?;
    let (seconds, nanos) = match parts.get(2) {
        None => (0, 0),
        Some(part) => match part.split_once('.') {
            Some((seconds, fraction)) => (digits(seconds)?, fraction_nanos(fraction)?),
            None => (digits(part)?, 0),
        },
    };

    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return None;
    }
    let total = days
        .checked_mul(86_400)?
        .checked_add(hours * 3_600 + minutes * 60 + seconds)?;
    Some(Duration::new(total, nanos))
}

fn digits(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn fraction_nanos(fraction: &str) -> Option<u32> {
    if fraction.len() > 7 {
        return None;
    }
    digits(fraction)?;
    format!("{fraction:0<9}").parse().ok()
}
