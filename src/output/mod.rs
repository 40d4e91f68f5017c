pub mod formatter;

pub use formatter::{
    format_breakdown, format_history, format_json, format_prediction, format_probability,
    resolve_colors, should_use_colors, NO_HISTORY_MESSAGE,
};
