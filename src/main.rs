use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use nhl_live_predictor::chat::{run_chat, Session};
use nhl_live_predictor::collector::{
    collect_interactive, read_batch, stats_from_pairs, InputError,
};
use nhl_live_predictor::config::{self, Config};
use nhl_live_predictor::history::ResultLog;
use nhl_live_predictor::output;
use nhl_live_predictor::scoring::{self, Period, Prediction, StatsInput};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_LOG: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read the period and each stat from stdin, then print and log the prediction (default)
    Predict {
        /// Re-prompt on bad entries instead of failing
        #[arg(short, long)]
        interactive: bool,

        /// Print the prediction as JSON (prompts go to stderr)
        #[arg(long)]
        json: bool,
    },
    /// Score stats given on the command line
    Score {
        /// Period number (1, 2 or 3)
        #[arg(short, long)]
        period: i64,

        /// Stat value, repeatable. Unlisted stats count as 0.
        #[arg(short, long = "stat", value_name = "KEY=VALUE")]
        stats: Vec<String>,

        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,
    },
    /// Conversational mode with start / predict / last / cancel commands
    Chat,
    /// Show the latest lines of the prediction log
    Last {
        /// Number of lines (defaults to `history` from the config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "nhl-live-predictor")]
#[command(about = "Chance of a goal in the next 5 minutes of an NHL period", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/nhl-live-predictor/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Prediction log file (overrides log.path from the config)
    #[arg(long, global = true, env = "NHL_PREDICTOR_LOG")]
    log_file: Option<PathBuf>,

    /// Leave the tier text column out of new log rows
    #[arg(long, global = true)]
    no_tier_column: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,nhl_live_predictor=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Predict {
        interactive: false,
        json: false,
    });
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = config::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let mut config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Some(path) = cli.log_file {
        config.log.path = path;
    }
    if cli.no_tier_column {
        config.log.tier_column = false;
    }

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    tracing::debug!(
        log = %config.log.path.display(),
        tier_column = config.log.tier_column,
        history = config.history,
        "effective config"
    );

    let log = ResultLog::from_config(&config.log);
    let use_colors = output::resolve_colors(config.colors);

    let code = match command {
        Commands::Predict { interactive, json } => {
            run_predict(&log, interactive, json, cli.verbose, use_colors)
        }
        Commands::Score {
            period,
            stats,
            json,
        } => run_score(&log, period, &stats, json, cli.verbose, use_colors),
        Commands::Chat => run_chat_mode(&config, log),
        Commands::Last { count } => run_last(&log, count.unwrap_or(config.history)),
        Commands::Init => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

fn input_exit_code(err: &InputError) -> i32 {
    match err {
        InputError::Io(_) => EXIT_FAILURE,
        _ => EXIT_INPUT,
    }
}

fn run_predict(
    log: &ResultLog,
    interactive: bool,
    json: bool,
    verbose: bool,
    use_colors: bool,
) -> i32 {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    // Keep stdout clean for JSON output.
    let mut prompts: Box<dyn Write> = if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };

    if interactive {
        return match collect_interactive(&mut reader, &mut prompts) {
            Ok(Some(prediction)) => {
                let Prediction { period, stats, .. } = prediction;
                report(log, period, stats, json, verbose, use_colors)
            }
            Ok(None) => {
                eprintln!();
                eprintln!("Prediction abandoned, nothing saved.");
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                input_exit_code(&e)
            }
        };
    }

    let (period, stats) = match read_batch(&mut reader, &mut prompts) {
        Ok(collected) => collected,
        Err(e) => {
            eprintln!();
            eprintln!("Input error: {}", e);
            return input_exit_code(&e);
        }
    };

    report(log, period, stats, json, verbose, use_colors)
}

fn run_score(
    log: &ResultLog,
    period: i64,
    pairs: &[String],
    json: bool,
    verbose: bool,
    use_colors: bool,
) -> i32 {
    let period = match Period::from_number(period) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Input error: {}", e);
            return EXIT_INPUT;
        }
    };

    let stats = match stats_from_pairs(pairs) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {}", e);
            return input_exit_code(&e);
        }
    };

    let missing = scoring::missing_features(period, &stats);
    if !missing.is_empty() {
        tracing::warn!(
            period = period.number(),
            missing = ?missing,
            "missing stats counted as 0"
        );
    }
    let unknown: Vec<&str> = stats
        .iter()
        .map(|(key, _)| key)
        .filter(|key| period.weights().weight(key).is_none())
        .collect();
    if !unknown.is_empty() {
        tracing::warn!(period = period.number(), unknown = ?unknown, "ignoring unknown stats");
    }

    report(log, period, stats, json, verbose, use_colors)
}

/// Print the prediction, then append it to the log. A log failure is
/// reported after the result has been shown.
fn report(
    log: &ResultLog,
    period: Period,
    stats: StatsInput,
    json: bool,
    verbose: bool,
    use_colors: bool,
) -> i32 {
    let breakdown = verbose.then(|| scoring::explain(period, &stats));
    let prediction = Prediction::new(period, stats);

    if json {
        match output::format_json(&prediction) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("{:#}", e);
                return EXIT_FAILURE;
            }
        }
    } else {
        println!();
        println!("{}", output::format_prediction(&prediction, use_colors));
        if let Some(breakdown) = breakdown {
            println!();
            println!("{}", output::format_breakdown(&breakdown, use_colors));
        }
    }

    match log.append(&prediction) {
        Ok(_) => {
            if json {
                eprintln!("Saved to {}", log.path().display());
            } else {
                println!();
                println!("Saved to {}", log.path().display());
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            tracing::warn!(error = %e, "prediction not saved");
            eprintln!("Warning: could not save the prediction: {:#}", e);
            EXIT_LOG
        }
    }
}

fn run_chat_mode(config: &Config, log: ResultLog) -> i32 {
    let mut session = Session::new(log, config.history);
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();

    match run_chat(&mut reader, &mut writer, &mut session) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Chat error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

fn run_last(log: &ResultLog, count: usize) -> i32 {
    match log.last(count) {
        Ok(lines) => {
            println!("{}", output::format_history(lines.as_deref()));
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to read prediction log: {:#}", e);
            EXIT_LOG
        }
    }
}
