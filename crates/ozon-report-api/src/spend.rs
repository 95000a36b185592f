//! Normalization of Performance API statistics into spend per day.
//!
//! The statistics endpoints answer either with a `;`-separated CSV report
//! (the usual case) or with JSON rows. Both shapes reduce to [`AdSpendByDay`].

use chrono::NaiveDate;
use csv::StringRecord;
use ozon_report_common::{AdSpendByDay, Result};
use serde_json::Value;
use tracing::debug;

/// Date column names, in order of preference.
const DATE_COLUMNS: [&str; 3] = ["Дата", "date", "day"];

/// Spend column names, in order of preference.
const SPEND_COLUMNS: [&str; 3] = ["Расход, ₽", "spend", "cost"];

/// Spend keys of a JSON statistics row, in order of preference.
const SPEND_KEYS: [&str; 3] = ["spend", "money", "cost"];

/// Parses a report date in `YYYY-MM-DD` or `DD.MM.YYYY` form.
pub fn parse_report_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d.%m.%Y"))
        .ok()
}

/// Parses a localized amount such as `"1 990,79"`; unparsable input is 0.
pub fn parse_amount(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.trim().parse().unwrap_or(0.0)
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == *name)
    })
}

/// Parses the CSV statistics report.
///
/// Rows with an empty or unparsable date are skipped, spend that does not
/// parse counts as 0 and rows for the same day are summed.
pub fn parse_spend_csv(text: &str) -> Result<AdSpendByDay> {
    let text = text.trim_start_matches('\u{feff}').trim();
    let mut spend = AdSpendByDay::new();
    if text.is_empty() {
        return Ok(spend);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let (Some(date_idx), Some(spend_idx)) = (
        find_column(&headers, &DATE_COLUMNS),
        find_column(&headers, &SPEND_COLUMNS),
    ) else {
        debug!("CSV statistics without date/spend columns: {:?}", headers);
        return Ok(spend);
    };

    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping CSV line {}: {}", idx + 2, e);
                continue;
            }
        };

        let Some(date) = record.get(date_idx).and_then(parse_report_date) else {
            continue;
        };
        let amount = record.get(spend_idx).map_or(0.0, parse_amount);
        spend.add(date, amount);
    }

    Ok(spend)
}

#[allow(clippy::float_cmp)]
fn json_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if !s.trim().is_empty() => parse_amount(s),
        _ => return None,
    };
    (amount != 0.0).then_some(amount)
}

fn json_rows(value: &Value) -> &[Value] {
    value
        .get("result")
        .and_then(Value::as_array)
        .or_else(|| value.get("rows").and_then(Value::as_array))
        .or_else(|| {
            value
                .get("result")
                .and_then(|r| r.get("rows"))
                .and_then(Value::as_array)
        })
        .map_or(&[], Vec::as_slice)
}

/// Parses JSON statistics rows from `result`, `rows` or `result.rows`.
pub fn parse_spend_json(value: &Value) -> AdSpendByDay {
    let mut spend = AdSpendByDay::new();

    for row in json_rows(value) {
        let Some(date) = ["date", "day"]
            .iter()
            .find_map(|key| row.get(*key).and_then(Value::as_str))
            .and_then(parse_report_date)
        else {
            continue;
        };
        let amount = SPEND_KEYS
            .iter()
            .find_map(|key| row.get(*key).and_then(json_amount))
            .unwrap_or(0.0);
        spend.add(date, amount);
    }

    spend
}
