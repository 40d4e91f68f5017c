use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use super::schema::{Config, LogConfig};
use super::validation::MAX_HISTORY;
use super::get_config_path;
use crate::collector::prompt::prompt;

/// Prompt and return the trimmed answer; end of input counts as an empty answer.
fn ask<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, message: &str) -> Result<String> {
    Ok(prompt(reader, writer, message)?.unwrap_or_default())
}

/// Prompt with a default value. Returns default if input is empty.
fn ask_with_default<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    default: &str,
) -> Result<String> {
    let input = ask(reader, writer, &format!("{} [{}]:", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Yes/no question. Empty input takes the default.
fn ask_yes_no<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    default_yes: bool,
) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = ask(reader, writer, &format!("{} [{}]:", message, hint))?.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Serialize a config to YAML.
pub fn render_config(config: &Config) -> Result<String> {
    serde_saphyr::to_string(config).map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
}

/// Write a config file atomically, creating parent directories.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let yaml = render_config(config)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Run the interactive init wizard on stdin/stdout.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let default_path = match default_path {
        Some(path) => path,
        None => get_config_path()?,
    };

    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let mut writer = std::io::stdout();

    if let Some(path) = run_init_wizard_with(&mut reader, &mut writer, default_path)? {
        writeln!(writer)?;
        writeln!(writer, "Config written to {}", path.display())?;
        writeln!(writer, "Run `nhl-live-predictor` to make a prediction.")?;
    }
    Ok(())
}

/// Wizard body. Returns the path written, or `None` if the user declined to overwrite.
pub fn run_init_wizard_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    default_path: PathBuf,
) -> Result<Option<PathBuf>> {
    let defaults = Config::default();

    writeln!(writer)?;
    writeln!(writer, "NHL Live Predictor Configuration")?;
    writeln!(writer, "================================")?;
    writeln!(writer)?;

    writeln!(writer, "Every prediction is appended to a CSV log.")?;
    let log_path = ask_with_default(
        reader,
        writer,
        "Log file",
        &defaults.log.path.display().to_string(),
    )?;

    let tier_column = ask_yes_no(reader, writer, "Include the tier text column?", true)?;

    let history = loop {
        let input = ask_with_default(
            reader,
            writer,
            "Lines shown by `last`",
            &defaults.history.to_string(),
        )?;
        match input.parse::<usize>() {
            Ok(v) if (1..=MAX_HISTORY).contains(&v) => break v,
            _ => writeln!(writer, "  Invalid: must be between 1 and {}. Try again.", MAX_HISTORY)?,
        }
    };

    let path_str = ask_with_default(
        reader,
        writer,
        "Where should the config be saved?",
        &default_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = ask_yes_no(
            reader,
            writer,
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            writeln!(writer, "Aborted.")?;
            return Ok(None);
        }
    }

    let config = Config {
        log: LogConfig {
            path: PathBuf::from(log_path),
            tier_column,
        },
        history,
        colors: None,
    };
    save_config(&config_path, &config)?;

    Ok(Some(config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::env;
    use std::fs;
    use std::io::Cursor;

    fn temp_path(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!(
            "nhl_live_predictor_init_{}_{}.yaml",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        let config = Config {
            log: LogConfig {
                path: PathBuf::from("period_log.csv"),
                tier_column: false,
            },
            history: 12,
            colors: Some(false),
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(Some(path.clone())).unwrap(), config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_wizard_accepts_defaults() {
        let path = temp_path("defaults");
        let mut out = Vec::new();
        let written = run_init_wizard_with(&mut Cursor::new("\n\n\n\n"), &mut out, path.clone())
            .unwrap()
            .unwrap();

        assert_eq!(written, path);
        assert_eq!(load_config(Some(path.clone())).unwrap(), Config::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_wizard_custom_answers_and_retry() {
        let path = temp_path("custom");
        let input = format!("games.csv\nn\n0\n7\n{}\n", path.display());
        let mut out = Vec::new();
        run_init_wizard_with(&mut Cursor::new(input), &mut out, PathBuf::from("unused.yaml"))
            .unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.log.path, PathBuf::from("games.csv"));
        assert!(!config.log.tier_column);
        assert_eq!(config.history, 7);
        assert!(String::from_utf8(out).unwrap().contains("Invalid: must be between 1"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_wizard_declines_overwrite() {
        let path = temp_path("existing");
        fs::write(&path, "history: 2\n").unwrap();

        let result = run_init_wizard_with(&mut Cursor::new("\n\n\n\nn\n"), &mut Vec::new(), path.clone())
            .unwrap();
        assert!(result.is_none());
        assert_eq!(load_config(Some(path.clone())).unwrap().history, 2);

        let _ = fs::remove_file(&path);
    }
}
