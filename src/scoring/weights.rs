use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ScoreError;

/// Feature names shared by every period table, in prompt order.
pub const SHARED_FEATURES: [&str; 6] = ["GF/GP", "GA/GP", "PP%", "PK%", "Shots/GP", "SA/GP"];

/// Game period. Selects the weight table and the period-specific rate keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Period {
    First,
    Second,
    Third,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::First, Period::Second, Period::Third];

    pub fn number(self) -> u8 {
        match self {
            Period::First => 1,
            Period::Second => 2,
            Period::Third => 3,
        }
    }

    pub fn from_number(n: i64) -> Result<Self, ScoreError> {
        match n {
            1 => Ok(Period::First),
            2 => Ok(Period::Second),
            3 => Ok(Period::Third),
            other => Err(ScoreError::InvalidPeriod(other.to_string())),
        }
    }

    /// Key of the goals-for rate feature, e.g. `GF_rate_P2`.
    pub fn gf_rate_key(self) -> &'static str {
        match self {
            Period::First => "GF_rate_P1",
            Period::Second => "GF_rate_P2",
            Period::Third => "GF_rate_P3",
        }
    }

    /// Key of the goals-against rate feature, e.g. `GA_rate_P2`.
    pub fn ga_rate_key(self) -> &'static str {
        match self {
            Period::First => "GA_rate_P1",
            Period::Second => "GA_rate_P2",
            Period::Third => "GA_rate_P3",
        }
    }

    pub fn weights(self) -> &'static WeightTable {
        match self {
            Period::First => &FIRST_PERIOD,
            Period::Second => &SECOND_PERIOD,
            Period::Third => &THIRD_PERIOD,
        }
    }
}

impl From<Period> for u8 {
    fn from(period: Period) -> u8 {
        period.number()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for Period {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let n: i64 = s
            .parse()
            .map_err(|_| ScoreError::InvalidPeriod(s.to_string()))?;
        Period::from_number(n)
    }
}

/// Linear weights for one period, in prompt order.
///
/// Tables are compiled in and never change at runtime.
#[derive(Debug)]
pub struct WeightTable {
    period: Period,
    weights: [(&'static str, f64); 8],
}

impl WeightTable {
    pub fn period(&self) -> Period {
        self.period
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.weights.iter().copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.weights.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Key at prompt position `index`, if any.
    pub fn key_at(&self, index: usize) -> Option<&'static str> {
        self.weights.get(index).map(|(key, _)| *key)
    }

    pub fn weight(&self, key: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, w)| *w)
    }
}

static FIRST_PERIOD: WeightTable = WeightTable {
    period: Period::First,
    weights: [
        ("GF/GP", 0.53),
        ("GA/GP", -0.58),
        ("PP%", -0.28),
        ("PK%", -0.37),
        ("Shots/GP", 0.09),
        ("SA/GP", -0.52),
        ("GF_rate_P1", 1.10),
        ("GA_rate_P1", -1.30),
    ],
};

static SECOND_PERIOD: WeightTable = WeightTable {
    period: Period::Second,
    weights: [
        ("GF/GP", 0.38),
        ("GA/GP", -0.16),
        ("PP%", 0.71),
        ("PK%", -0.03),
        ("Shots/GP", -0.08),
        ("SA/GP", -0.10),
        ("GF_rate_P2", 1.13),
        ("GA_rate_P2", -1.58),
    ],
};

static THIRD_PERIOD: WeightTable = WeightTable {
    period: Period::Third,
    weights: [
        ("GF/GP", 0.32),
        ("GA/GP", -0.61),
        ("PP%", -0.25),
        ("PK%", 0.41),
        ("Shots/GP", 0.22),
        ("SA/GP", -0.61),
        ("GF_rate_P3", 1.09),
        ("GA_rate_P3", -1.21),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        assert_eq!("1".parse::<Period>().unwrap(), Period::First);
        assert_eq!(" 2 ".parse::<Period>().unwrap(), Period::Second);
        assert_eq!("+3".parse::<Period>().unwrap(), Period::Third);
    }

    #[test]
    fn test_parse_period_rejects_out_of_range() {
        for input in ["0", "4", "-1", "2.0", "two", ""] {
            let err = input.parse::<Period>().unwrap_err();
            assert!(matches!(err, ScoreError::InvalidPeriod(_)), "input {:?}", input);
        }
    }

    #[test]
    fn test_from_number() {
        assert_eq!(Period::from_number(3).unwrap(), Period::Third);
        assert!(Period::from_number(7).is_err());
    }

    #[test]
    fn test_tables_share_shape() {
        for period in Period::ALL {
            let table = period.weights();
            assert_eq!(table.period(), period);
            assert_eq!(table.len(), 8);

            let keys: Vec<_> = table.keys().collect();
            assert_eq!(&keys[..6], &SHARED_FEATURES[..]);
            assert_eq!(keys[6], period.gf_rate_key());
            assert_eq!(keys[7], period.ga_rate_key());
        }
    }

    #[test]
    fn test_rate_keys_follow_period_number() {
        for period in Period::ALL {
            assert_eq!(period.gf_rate_key(), format!("GF_rate_P{}", period.number()));
            assert_eq!(period.ga_rate_key(), format!("GA_rate_P{}", period.number()));
        }
    }

    #[test]
    fn test_weight_lookup() {
        let table = Period::Second.weights();
        assert_eq!(table.weight("PP%"), Some(0.71));
        assert_eq!(table.weight("GA_rate_P2"), Some(-1.58));
        assert_eq!(table.weight("GA_rate_P1"), None);
        assert_eq!(table.key_at(0), Some("GF/GP"));
        assert_eq!(table.key_at(8), None);
    }

    #[test]
    fn test_period_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Period::Third).unwrap(), "3");
    }
}
