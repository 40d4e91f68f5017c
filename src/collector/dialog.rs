use crate::scoring::{Period, Prediction, StatsInput};

use super::input::{parse_period, parse_value};

/// Multi-turn collection of a period and its stats.
///
/// Each state carries everything collected so far; [`Dialog::advance`]
/// consumes the state and returns the next one, so nothing is kept in a
/// side store between turns.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    AwaitingPeriod,
    AwaitingFeature {
        period: Period,
        index: usize,
        stats: StatsInput,
    },
}

/// What happened on one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Input accepted; ask for this feature next.
    AskFeature(&'static str),
    /// Period entry rejected; state unchanged.
    InvalidPeriod,
    /// Value for this feature rejected; state unchanged.
    InvalidNumber(&'static str),
    /// Last feature accepted.
    Complete(Prediction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// `None` once the dialog is complete.
    pub next: Option<Dialog>,
    pub outcome: Outcome,
}

impl Default for Dialog {
    fn default() -> Self {
        Self::start()
    }
}

impl Dialog {
    pub fn start() -> Self {
        Dialog::AwaitingPeriod
    }

    /// Feature the dialog is waiting for, if past the period step.
    pub fn current_feature(&self) -> Option<&'static str> {
        match self {
            Dialog::AwaitingPeriod => None,
            Dialog::AwaitingFeature { period, index, .. } => period.weights().key_at(*index),
        }
    }

    pub fn prompt(&self) -> String {
        match self.current_feature() {
            None => "Enter the period number (1 / 2 / 3):".to_string(),
            Some(key) => format!("Enter a value for {}:", key),
        }
    }

    pub fn advance(self, input: &str) -> Transition {
        match self {
            Dialog::AwaitingPeriod => match parse_period(input) {
                Ok(period) => {
                    let first = period.weights().key_at(0);
                    let next = Dialog::AwaitingFeature {
                        period,
                        index: 0,
                        stats: StatsInput::new(),
                    };
                    match first {
                        Some(key) => Transition {
                            next: Some(next),
                            outcome: Outcome::AskFeature(key),
                        },
                        None => Transition {
                            next: None,
                            outcome: Outcome::Complete(Prediction::new(period, StatsInput::new())),
                        },
                    }
                }
                Err(_) => Transition {
                    next: Some(Dialog::AwaitingPeriod),
                    outcome: Outcome::InvalidPeriod,
                },
            },
            Dialog::AwaitingFeature {
                period,
                index,
                mut stats,
            } => {
                let table = period.weights();
                let Some(key) = table.key_at(index) else {
                    return Transition {
                        next: None,
                        outcome: Outcome::Complete(Prediction::new(period, stats)),
                    };
                };

                let value = match parse_value(key, input) {
                    Ok(value) => value,
                    Err(_) => {
                        return Transition {
                            next: Some(Dialog::AwaitingFeature {
                                period,
                                index,
                                stats,
                            }),
                            outcome: Outcome::InvalidNumber(key),
                        }
                    }
                };

                stats.insert(key, value);
                let index = index + 1;
                match table.key_at(index) {
                    Some(next_key) => Transition {
                        next: Some(Dialog::AwaitingFeature {
                            period,
                            index,
                            stats,
                        }),
                        outcome: Outcome::AskFeature(next_key),
                    },
                    None => Transition {
                        next: None,
                        outcome: Outcome::Complete(Prediction::new(period, stats)),
                    },
                }
            }
        }
    }
}
