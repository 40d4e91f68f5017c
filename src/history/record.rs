use anyhow::{bail, Context, Result};

use crate::scoring::{Period, Prediction, SHARED_FEATURES};

/// Log columns before the optional tier column.
pub const HEADER: [&str; 10] = [
    "Period",
    "GF/GP",
    "GA/GP",
    "PP%",
    "PK%",
    "Shots/GP",
    "SA/GP",
    "GF_rate",
    "GA_rate",
    "Вероятность (%)",
];

pub const TIER_HEADER: &str = "Оценка";

/// Number of stat columns in a row (six shared features plus two rates).
pub const STAT_COLUMNS: usize = 8;

/// One row of the prediction log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub period: Period,
    /// Stat values in column order; `None` renders as an empty field.
    pub stats: [Option<f64>; STAT_COLUMNS],
    /// Probability in percent, rounded to two decimals.
    pub probability: f64,
    pub tier: Option<String>,
}

impl LogRecord {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let period = prediction.period;
        let mut stats = [None; STAT_COLUMNS];
        for (slot, key) in stats.iter_mut().zip(column_keys(period)) {
            *slot = prediction.stats.get(key);
        }

        Self {
            period,
            stats,
            probability: round2(prediction.probability),
            tier: Some(prediction.tier.summary()),
        }
    }

    /// Render as a CSV line without the trailing newline.
    pub fn to_row(&self, tier_column: bool) -> String {
        let mut fields = Vec::with_capacity(HEADER.len() + 1);
        fields.push(self.period.to_string());
        fields.extend(self.stats.iter().map(|v| v.map(format_number).unwrap_or_default()));
        fields.push(format_number(self.probability));
        if tier_column {
            fields.push(self.tier.clone().unwrap_or_default());
        }
        join_fields(&fields)
    }

    /// Parse a data row written by [`LogRecord::to_row`], with or without the tier column.
    pub fn parse_row(line: &str) -> Result<Self> {
        let fields = split_fields(line.trim_end_matches(['\r', '\n']))?;
        if fields.len() != HEADER.len() && fields.len() != HEADER.len() + 1 {
            bail!(
                "Expected {} or {} columns, found {}",
                HEADER.len(),
                HEADER.len() + 1,
                fields.len()
            );
        }

        let period: Period = fields[0]
            .parse()
            .with_context(|| format!("Invalid period column: {:?}", fields[0]))?;

        let mut stats = [None; STAT_COLUMNS];
        for (i, slot) in stats.iter_mut().enumerate() {
            let raw = fields[i + 1].trim();
            if !raw.is_empty() {
                let value = raw
                    .parse::<f64>()
                    .with_context(|| format!("Invalid {} column: {:?}", HEADER[i + 1], raw))?;
                *slot = Some(value);
            }
        }

        let raw_probability = fields[STAT_COLUMNS + 1].trim();
        let probability = raw_probability
            .parse::<f64>()
            .with_context(|| format!("Invalid probability column: {:?}", raw_probability))?;

        Ok(Self {
            period,
            stats,
            probability,
            tier: fields.get(HEADER.len()).cloned(),
        })
    }

    /// Value of a stat column by feature key for this record's period.
    pub fn stat(&self, key: &str) -> Option<f64> {
        column_keys(self.period)
            .position(|k| k == key)
            .and_then(|i| self.stats[i])
    }
}

/// Header line without the trailing newline.
pub fn header_row(tier_column: bool) -> String {
    let mut fields: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
    if tier_column {
        fields.push(TIER_HEADER.to_string());
    }
    join_fields(&fields)
}

/// Feature keys backing the stat columns for `period`.
fn column_keys(period: Period) -> impl Iterator<Item = &'static str> {
    SHARED_FEATURES
        .into_iter()
        .chain([period.gf_rate_key(), period.ga_rate_key()])
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a float the way the log has always shown it: integral values keep
/// one decimal place (`22.0`), everything else uses the shortest exact form.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn join_fields(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn split_fields(line: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            (c, _) => current.push(c),
        }
    }

    if in_quotes {
        bail!("Unterminated quoted field in row: {}", line);
    }
    fields.push(current);
    Ok(fields)
}
