use serde::Serialize;
use std::collections::BTreeMap;

use super::tier::{interpret, Tier};
use super::weights::Period;
use super::ScoreError;

/// Feature values supplied for one prediction, keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatsInput(BTreeMap<String, f64>);

impl StatsInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for StatsInput {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One feature's share of the linear predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureContribution {
    pub key: &'static str,
    pub weight: f64,
    /// `None` when the feature was not supplied and counted as zero.
    pub value: Option<f64>,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub period: Period,
    pub z: f64,
    pub features: Vec<FeatureContribution>,
}

/// Finished prediction: inputs snapshot plus derived probability and tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub period: Period,
    pub stats: StatsInput,
    pub probability: f64,
    pub tier: Tier,
}

impl Prediction {
    pub fn new(period: Period, stats: StatsInput) -> Self {
        let probability = score(period, &stats);
        Self {
            period,
            stats,
            probability,
            tier: interpret(probability),
        }
    }
}

pub fn logistic(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Per-feature terms of the weighted sum, in table order.
///
/// Features missing from `stats` count as 0.0. Keys in `stats` that the
/// period's table does not list are ignored.
pub fn explain(period: Period, stats: &StatsInput) -> ScoreBreakdown {
    let mut z = 0.0;
    let mut features = Vec::with_capacity(period.weights().len());

    for (key, weight) in period.weights().iter() {
        let value = stats.get(key);
        let contribution = weight * value.unwrap_or(0.0);
        z += contribution;
        features.push(FeatureContribution {
            key,
            weight,
            value,
            contribution,
        });
    }

    ScoreBreakdown {
        period,
        z,
        features,
    }
}

/// Probability (percent) of a goal in the next five minutes.
///
/// Missing features silently count as zero, which pushes the result toward
/// the sign of the missing weight. Callers that need complete input must
/// collect every key of `period.weights()` first.
pub fn score(period: Period, stats: &StatsInput) -> f64 {
    let breakdown = explain(period, stats);
    let probability = logistic(breakdown.z) * 100.0;
    tracing::debug!(
        period = period.number(),
        z = breakdown.z,
        probability,
        supplied = stats.len(),
        "scored period"
    );
    probability
}

/// Table keys for `period` that `stats` does not supply.
pub fn missing_features(period: Period, stats: &StatsInput) -> Vec<&'static str> {
    period
        .weights()
        .keys()
        .filter(|key| stats.get(key).is_none())
        .collect()
}

/// Same as [`score`] for an unchecked period number.
pub fn score_period(period: i64, stats: &StatsInput) -> Result<f64, ScoreError> {
    Ok(score(Period::from_number(period)?, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_first_period() -> StatsInput {
        [
            ("GF/GP", 3.5),
            ("GA/GP", 2.1),
            ("PP%", 22.0),
            ("PK%", 80.0),
            ("Shots/GP", 31.0),
            ("SA/GP", 28.0),
            ("GF_rate_P1", 0.6),
            ("GA_rate_P1", 0.4),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_empty_stats_is_fifty_percent() {
        for period in Period::ALL {
            assert_eq!(score(period, &StatsInput::new()), 50.0);
        }
    }

    #[test]
    fn test_first_period_scenario() {
        let stats = sample_first_period();
        let z = 0.53 * 3.5 - 0.58 * 2.1 - 0.28 * 22.0 - 0.37 * 80.0 + 0.09 * 31.0
            - 0.52 * 28.0
            + 1.10 * 0.6
            - 1.30 * 0.4;
        let expected = logistic(z) * 100.0;

        let probability = score(Period::First, &stats);
        assert!((probability - expected).abs() <= expected * 1e-9);
        assert!(probability > 0.0 && probability < 1e-15, "got {}", probability);
        assert_eq!(interpret(probability), Tier::Low);
    }

    #[test]
    fn test_score_is_deterministic() {
        let stats = sample_first_period();
        assert_eq!(score(Period::First, &stats), score(Period::First, &stats));
    }

    #[test]
    fn test_monotonic_in_each_feature() {
        for period in Period::ALL {
            for (key, weight) in period.weights().iter() {
                let low: StatsInput = [(key, 1.0)].into_iter().collect();
                let high: StatsInput = [(key, 2.0)].into_iter().collect();
                let (p_low, p_high) = (score(period, &low), score(period, &high));
                if weight > 0.0 {
                    assert!(p_high > p_low, "{} in period {}", key, period);
                } else {
                    assert!(p_high < p_low, "{} in period {}", key, period);
                }
            }
        }
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let base = sample_first_period();
        let mut noisy = base.clone();
        noisy.insert("GF_rate_P2", 100.0);
        noisy.insert("Faceoff%", 55.0);
        assert_eq!(score(Period::First, &base), score(Period::First, &noisy));
    }

    #[test]
    fn test_missing_feature_counts_as_zero() {
        let mut stats = StatsInput::new();
        stats.insert("GF_rate_P2", 1.0);
        let breakdown = explain(Period::Second, &stats);

        assert_eq!(breakdown.features.len(), 8);
        assert_eq!(breakdown.z, 1.13);
        let missing = &breakdown.features[0];
        assert_eq!(missing.key, "GF/GP");
        assert_eq!(missing.value, None);
        assert_eq!(missing.contribution, 0.0);
    }

    #[test]
    fn test_missing_features() {
        let stats: StatsInput = [("GF/GP", 1.0), ("GF_rate_P1", 1.0)].into_iter().collect();
        assert_eq!(
            missing_features(Period::Third, &stats),
            vec!["GA/GP", "PP%", "PK%", "Shots/GP", "SA/GP", "GF_rate_P3", "GA_rate_P3"]
        );
        assert!(missing_features(Period::First, &sample_first_period()).is_empty());
    }

    #[test]
    fn test_score_period_rejects_invalid_period() {
        let err = score_period(4, &StatsInput::new()).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidPeriod(ref p) if p == "4"));
        assert_eq!(score_period(2, &StatsInput::new()).unwrap(), 50.0);
    }

    #[test]
    fn test_probability_stays_in_open_interval() {
        let stats: StatsInput = [("GF_rate_P3", 5.0)].into_iter().collect();
        let p = score(Period::Third, &stats);
        assert!(p > 0.0 && p < 100.0);
    }

    #[test]
    fn test_prediction_new() {
        let stats: StatsInput = [("PP%", 2.0)].into_iter().collect();
        let prediction = Prediction::new(Period::Second, stats.clone());
        assert_eq!(prediction.period, Period::Second);
        assert_eq!(prediction.stats, stats);
        assert_eq!(prediction.probability, score(Period::Second, &stats));
        assert_eq!(prediction.tier, Tier::High);
    }
}
