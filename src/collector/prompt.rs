use std::io::{BufRead, Write};

use crate::scoring::{Period, Prediction, StatsInput};

use super::dialog::{Dialog, Outcome};
use super::input::{parse_period, parse_value};
use super::InputError;

pub const INVALID_PERIOD_MESSAGE: &str = "Period must be 1, 2 or 3.";
pub const INVALID_NUMBER_MESSAGE: &str = "Please enter a number.";

/// Print `message` and read one line. `None` on end of input.
pub fn prompt<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
) -> Result<Option<String>, InputError> {
    write!(writer, "{} ", message)?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Strict one-shot collection: period, then every feature in table order.
///
/// The first bad entry aborts with an error; nothing is re-prompted.
pub fn read_batch<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<(Period, StatsInput), InputError> {
    let start = Dialog::start();
    let line = prompt(reader, writer, &start.prompt())?
        .ok_or_else(|| InputError::UnexpectedEof("period".to_string()))?;
    let period = parse_period(&line)?;

    let mut stats = StatsInput::new();
    for key in period.weights().keys() {
        let line = prompt(reader, writer, &format!("Enter a value for {}:", key))?
            .ok_or_else(|| InputError::UnexpectedEof(key.to_string()))?;
        stats.insert(key, parse_value(key, &line)?);
    }

    tracing::debug!(period = period.number(), "batch input collected");
    Ok((period, stats))
}

/// Re-prompting collection driven by [`Dialog`].
///
/// Bad entries are reported and asked again. End of input abandons the
/// dialog and returns `None`; the partial stats are dropped.
pub fn collect_interactive<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<Option<Prediction>, InputError> {
    let mut dialog = Dialog::start();

    loop {
        let Some(line) = prompt(reader, writer, &dialog.prompt())? else {
            tracing::debug!("interactive input abandoned");
            return Ok(None);
        };

        let transition = dialog.advance(&line);
        match transition.outcome {
            Outcome::Complete(prediction) => return Ok(Some(prediction)),
            Outcome::InvalidPeriod => writeln!(writer, "{}", INVALID_PERIOD_MESSAGE)?,
            Outcome::InvalidNumber(_) => writeln!(writer, "{}", INVALID_NUMBER_MESSAGE)?,
            Outcome::AskFeature(_) => {}
        }

        match transition.next {
            Some(next) => dialog = next,
            None => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const FIRST_PERIOD_INPUT: &str = "1\n3.5\n2.1\n22\n80\n31\n28\n0.6\n0.4\n";

    #[test]
    fn test_read_batch() {
        let mut reader = Cursor::new(FIRST_PERIOD_INPUT);
        let mut out = Vec::new();
        let (period, stats) = read_batch(&mut reader, &mut out).unwrap();

        assert_eq!(period, Period::First);
        assert_eq!(stats.len(), 8);
        assert_eq!(stats.get("PK%"), Some(80.0));
        assert_eq!(stats.get("GA_rate_P1"), Some(0.4));

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("Enter the period number (1 / 2 / 3): "));
        assert!(shown.contains("Enter a value for GF_rate_P1: "));
    }

    #[test]
    fn test_read_batch_invalid_period_is_fatal() {
        let mut reader = Cursor::new("4\n1\n");
        let err = read_batch(&mut reader, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, InputError::InvalidPeriod(_)));
    }

    #[test]
    fn test_read_batch_invalid_number_is_fatal() {
        let mut reader = Cursor::new("2\n3.5\nabc\n");
        let err = read_batch(&mut reader, &mut Vec::new()).unwrap_err();
        match err {
            InputError::InvalidNumber { feature, input } => {
                assert_eq!(feature, "GA/GP");
                assert_eq!(input, "abc");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_read_batch_truncated_input() {
        let mut reader = Cursor::new("3\n1\n");
        let err = read_batch(&mut reader, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, InputError::UnexpectedEof(ref key) if key == "GA/GP"));

        let err = read_batch(&mut Cursor::new(""), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, InputError::UnexpectedEof(ref key) if key == "period"));
    }

    #[test]
    fn test_collect_interactive_reprompts() {
        let input = "9\n1\nx\n3.5\n2.1\n22\n80\n31\n28\n0.6\n0.4\n";
        let mut out = Vec::new();
        let prediction = collect_interactive(&mut Cursor::new(input), &mut out)
            .unwrap()
            .unwrap();

        let (period, stats) = read_batch(&mut Cursor::new(FIRST_PERIOD_INPUT), &mut Vec::new()).unwrap();
        assert_eq!(prediction, Prediction::new(period, stats));

        let shown = String::from_utf8(out).unwrap();
        assert_eq!(shown.matches(INVALID_PERIOD_MESSAGE).count(), 1);
        assert_eq!(shown.matches(INVALID_NUMBER_MESSAGE).count(), 1);
        assert_eq!(shown.matches("Enter a value for GF/GP:").count(), 2);
    }

    #[test]
    fn test_collect_interactive_abandoned() {
        let result = collect_interactive(&mut Cursor::new("2\n1.0\n"), &mut Vec::new()).unwrap();
        assert!(result.is_none());
    }
}
