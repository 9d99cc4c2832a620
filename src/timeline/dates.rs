// src/timeline/dates.rs

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

// DD/MM/YYYY[ HH:MM[:SS]] -- tentado primeiro, os dados de origem são brasileiros.
static BR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})(?:[ T](\d{1,2}):(\d{2})(?::(\d{2})(?:\.\d+)?)?)?$")
        .expect("regex BR válida")
});

// YYYY-MM-DD[ HH:MM[:SS]] (ISO / SQL Server)
static ISO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T](\d{1,2}):(\d{2})(?::(\d{2})(?:\.\d+)?)?)?$")
        .expect("regex ISO válida")
});

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const FALLBACK_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y"];

/// Converte qualquer valor de data vindo do backend em um instante local.
///
/// Strings passam por `parse_date_str`; números são tratados como epoch em
/// milissegundos. Qualquer outra coisa vira `None`.
pub fn parse_date_any(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let ms = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(ms).map(|utc| utc.with_timezone(&Local).naive_local())
        }
        _ => None,
    }
}

/// Ordem: brasileiro, ISO, e por último formatos genéricos (RFC 3339,
/// RFC 2822, `YYYY/MM/DD`, `MM/DD/YYYY`). Hora ausente vira 00:00:00.
pub fn parse_date_str(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(caps) = BR_RE.captures(input) {
        if let Some(dt) = from_captures(&caps, 3, 2, 1) {
            return Some(dt);
        }
    }

    if let Some(caps) = ISO_RE.captures(input) {
        if let Some(dt) = from_captures(&caps, 1, 2, 3) {
            return Some(dt);
        }
    }

    parse_fallback(input)
}

fn from_captures(caps: &Captures, year: usize, month: usize, day: usize) -> Option<NaiveDateTime> {
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let date = NaiveDate::from_ymd_opt(num(year)? as i32, num(month)?, num(day)?)?;
    date.and_hms_opt(num(4).unwrap_or(0), num(5).unwrap_or(0), num(6).unwrap_or(0))
}

fn parse_fallback(input: &str) -> Option<NaiveDateTime> {
    // Com fuso explícito: converte para a hora local.
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
