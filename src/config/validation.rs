use super::schema::Config;

/// Upper bound for `history`; the whole log is read to take its tail.
pub const MAX_HISTORY: usize = 1000;

/// Check a loaded config, collecting every problem instead of stopping at the first.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.history == 0 {
        errors.push("history: must be at least 1".to_string());
    } else if config.history > MAX_HISTORY {
        errors.push(format!(
            "history: must be at most {} (got {})",
            MAX_HISTORY, config.history
        ));
    }

    let path = &config.log.path;
    if path.as_os_str().is_empty() {
        errors.push("log.path: must not be empty".to_string());
    } else if path.is_dir() {
        errors.push(format!("log.path: {} is a directory", path.display()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
