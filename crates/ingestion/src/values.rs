//! Cell parsers for the formats brokerage exports actually contain.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];
const DATE_TIME_FORMATS: [&str; 5] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parses a number written either Brazilian style (`1.234,56`, `R$ -40,00`)
/// or plain (`1234.56`). Blank cells yield `None`.
///
/// A lone comma is the decimal mark. Dots alone are thousands groups when they
/// split the digits into groups of three (`1.000`, `12.345.678`), and a decimal
/// point otherwise (`70.5`). When both separators appear, the last one is the
/// decimal mark and the other must group thousands; anything else is rejected.
pub fn parse_decimal(cell: &str) -> Option<Decimal> {
    let cleaned: String = cell
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let (sign, magnitude) = match cleaned.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", cleaned.as_str()),
    };
    let normalized = normalize_separators(magnitude)?;
    Decimal::from_str(&format!("{sign}{normalized}")).ok()
}

fn normalize_separators(number: &str) -> Option<String> {
    let commas = number.matches(',').count();
    let dots = number.matches('.').count();

    match (commas, dots) {
        (0, 0) => Some(number.to_string()),
        (0, 1) if !is_grouped(number, '.') => Some(number.to_string()),
        (0, _) => ungroup(number, '.'),
        (1, 0) => Some(number.replace(',', ".")),
        (_, 0) => ungroup(number, ','),
        _ => {
            let comma = number.rfind(',')?;
            let dot = number.rfind('.')?;
            let (mark, group, marks) = if comma > dot {
                (comma, '.', commas)
            } else {
                (dot, ',', dots)
            };
            if marks != 1 {
                return None;
            }
            let (integer, fraction) = number.split_at(mark);
            Some(format!("{}.{}", ungroup(integer, group)?, &fraction[1..]))
        }
    }
}

fn ungroup(number: &str, separator: char) -> Option<String> {
    is_grouped(number, separator).then(|| number.replace(separator, ""))
}

/// `1.234.567`: a leading group of one to three digits, then groups of exactly three.
fn is_grouped(number: &str, separator: char) -> bool {
    let all_digits = |group: &str| group.chars().all(|c| c.is_ascii_digit());
    let mut groups = number.split(separator);
    let leading = groups.next().unwrap_or("");
    let mut rest = groups.peekable();

    rest.peek().is_some()
        && (1..=3).contains(&leading.len())
        && !leading.starts_with('0')
        && all_digits(leading)
        && rest.all(|group| group.len() == 3 && all_digits(group))
}

/// Parses the open-date cell as a calendar day.
///
/// The export's timestamps carry no offset and are taken as wall-clock dates
/// on the exchange calendar: any time-of-day is dropped without timezone
/// conversion, so the same file buckets identically on every host.
pub fn parse_calendar_date(cell: &str) -> Option<NaiveDate> {
    let value = cell.trim();
    if value.is_empty() {
        return None;
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|timestamp| timestamp.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        })
}
