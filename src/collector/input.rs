use crate::scoring::{Period, StatsInput};

use super::InputError;

/// Parse a period entry such as `"2"` or `" 3 "`.
pub fn parse_period(text: &str) -> Result<Period, InputError> {
    Ok(text.parse::<Period>()?)
}

/// Parse a stat value. Only finite numbers are accepted.
pub fn parse_value(feature: &str, text: &str) -> Result<f64, InputError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::InvalidNumber {
            feature: feature.to_string(),
            input: trimmed.to_string(),
        }),
    }
}

/// Build stats from `KEY=VALUE` pairs given all at once.
///
/// Keys are taken verbatim; later pairs overwrite earlier ones.
pub fn stats_from_pairs<I, S>(pairs: I) -> Result<StatsInput, InputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stats = StatsInput::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((key, value)) = pair.split_once('=') else {
            return Err(InputError::MalformedPair(pair.to_string()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(InputError::MalformedPair(pair.to_string()));
        }
        stats.insert(key, parse_value(key, value)?);
    }
    Ok(stats)
}
