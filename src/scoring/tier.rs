use serde::Serialize;
use std::fmt;

/// Probability at or above which a period counts as high pressure.
pub const HIGH_THRESHOLD: f64 = 70.0;
/// Probability at or above which a period counts as medium pressure.
pub const MEDIUM_THRESHOLD: f64 = 50.0;

/// Qualitative bucket for a goal probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::High => "HIGH",
            Tier::Medium => "MEDIUM",
            Tier::Low => "LOW",
        }
    }

    /// Betting hint shown next to the label.
    pub fn advice(self) -> &'static str {
        match self {
            Tier::High => "consider Over 0.5 / team Individual Total Over",
            Tier::Medium => "possible goal in next 5 minutes",
            Tier::Low => "no clear pressure",
        }
    }

    /// Text written to the tier column of the prediction log.
    pub fn summary(self) -> String {
        format!("{} - {}", self.label(), self.advice())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a probability (percent) to a tier. Lower bounds are inclusive.
///
/// Accepts any f64; NaN compares false against both thresholds and lands in `Low`.
pub fn interpret(probability: f64) -> Tier {
    if probability >= HIGH_THRESHOLD {
        Tier::High
    } else if probability >= MEDIUM_THRESHOLD {
        Tier::Medium
    } else {
        Tier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(interpret(70.0), Tier::High);
        assert_eq!(interpret(69.999), Tier::Medium);
        assert_eq!(interpret(50.0), Tier::Medium);
        assert_eq!(interpret(49.999), Tier::Low);
    }

    #[test]
    fn test_out_of_range_values() {
        assert_eq!(interpret(150.0), Tier::High);
        assert_eq!(interpret(-20.0), Tier::Low);
        assert_eq!(interpret(f64::INFINITY), Tier::High);
        assert_eq!(interpret(f64::NEG_INFINITY), Tier::Low);
        assert_eq!(interpret(f64::NAN), Tier::Low);
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(Tier::Medium.summary(), "MEDIUM - possible goal in next 5 minutes");
        assert_eq!(Tier::Low.to_string(), "LOW");
    }

    #[test]
    fn test_tier_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Tier::High).unwrap(), "\"HIGH\"");
    }
}
