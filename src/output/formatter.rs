use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::scoring::{Prediction, ScoreBreakdown, Tier};

pub const NO_HISTORY_MESSAGE: &str = "No predictions saved yet.";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Config override wins; otherwise color only on a terminal.
pub fn resolve_colors(configured: Option<bool>) -> bool {
    configured.unwrap_or_else(should_use_colors)
}

/// Probability with two decimals and a percent sign, e.g. "63.41%".
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability)
}

fn format_tier(tier: Tier, use_colors: bool) -> String {
    let summary = tier.summary();
    if !use_colors {
        return summary;
    }
    match tier {
        Tier::High => summary.red().bold().to_string(),
        Tier::Medium => summary.yellow().to_string(),
        Tier::Low => summary.blue().to_string(),
    }
}

/// Multi-line result block shown after a prediction.
pub fn format_prediction(prediction: &Prediction, use_colors: bool) -> String {
    let probability = format_probability(prediction.probability);
    let probability = if use_colors {
        probability.bold().to_string()
    } else {
        probability
    };

    format!(
        "Period: {}\nGoal probability in the next 5 minutes: {}\n{}",
        prediction.period,
        probability,
        format_tier(prediction.tier, use_colors)
    )
}

/// Per-feature terms of the weighted sum (for verbose mode)
pub fn format_breakdown(breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    let width = breakdown
        .features
        .iter()
        .map(|f| f.key.len())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = breakdown
        .features
        .iter()
        .map(|f| {
            let value = match f.value {
                Some(v) => format!("{}", v),
                None if use_colors => "missing, counted as 0".dimmed().to_string(),
                None => "missing, counted as 0".to_string(),
            };
            format!(
                "  {:<width$}  {:>+6.2} x {}  = {:+.4}",
                f.key,
                f.weight,
                value,
                f.contribution,
                width = width
            )
        })
        .collect();
    lines.push(format!("  z = {:.4}", breakdown.z));
    lines.join("\n")
}

/// Log tail for `last`. `None` means the log does not exist yet.
pub fn format_history(lines: Option<&[String]>) -> String {
    match lines {
        Some(lines) if !lines.is_empty() => format!("Recent predictions:\n{}", lines.join("\n")),
        _ => NO_HISTORY_MESSAGE.to_string(),
    }
}

/// Prediction as pretty JSON for scripting.
pub fn format_json(prediction: &Prediction) -> Result<String> {
    serde_json::to_string_pretty(prediction).context("Failed to serialize prediction")
}
