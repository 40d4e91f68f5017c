use crate::collector::prompt::{INVALID_NUMBER_MESSAGE, INVALID_PERIOD_MESSAGE};
use crate::collector::{Dialog, Outcome};
use crate::history::ResultLog;
use crate::output::{format_history, format_prediction};
use crate::scoring::Prediction;

pub const GREETING: &str = "Hi! I am the NHL Live Predictor.\n\
I estimate the chance of a goal in the next 5 minutes from the current period stats.\n\
\n\
/predict - enter the stats for a prediction\n\
/last - show the latest saved predictions\n\
/cancel - drop a prediction in progress";

pub const UNKNOWN_MESSAGE: &str = "Unknown command. Send /predict to start or /start for help.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Predict,
    Last,
    Cancel,
}

impl Command {
    /// Recognize `start`, `/start` or `/start@botname` (any case).
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let word = word.strip_prefix('/').unwrap_or(word);
        let word = word.split('@').next().unwrap_or(word);
        match word.to_ascii_lowercase().as_str() {
            "start" | "help" => Some(Command::Start),
            "predict" => Some(Command::Predict),
            "last" => Some(Command::Last),
            "cancel" => Some(Command::Cancel),
            _ => None,
        }
    }
}

/// One conversation. Commands take priority over dialog input.
#[derive(Debug)]
pub struct Session {
    dialog: Option<Dialog>,
    log: ResultLog,
    history: usize,
}

impl Session {
    pub fn new(log: ResultLog, history: usize) -> Self {
        Self {
            dialog: None,
            log,
            history,
        }
    }

    pub fn is_collecting(&self) -> bool {
        self.dialog.is_some()
    }

    /// Handle one incoming message and return the replies to send, in order.
    pub fn handle(&mut self, text: &str) -> Vec<String> {
        if let Some(command) = Command::parse(text) {
            return self.run_command(command);
        }

        let Some(dialog) = self.dialog.take() else {
            return vec![UNKNOWN_MESSAGE.to_string()];
        };

        let transition = dialog.advance(text);
        self.dialog = transition.next;

        match transition.outcome {
            Outcome::AskFeature(key) => vec![format!("Enter a value for {}:", key)],
            Outcome::InvalidPeriod => vec![INVALID_PERIOD_MESSAGE.to_string()],
            Outcome::InvalidNumber(_) => vec![INVALID_NUMBER_MESSAGE.to_string()],
            Outcome::Complete(prediction) => self.finish(&prediction),
        }
    }

    fn run_command(&mut self, command: Command) -> Vec<String> {
        match command {
            Command::Start => vec![GREETING.to_string()],
            Command::Predict => {
                let dialog = Dialog::start();
                let reply = dialog.prompt();
                self.dialog = Some(dialog);
                vec![reply]
            }
            Command::Last => match self.log.last(self.history) {
                Ok(lines) => vec![format_history(lines.as_deref())],
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read prediction log");
                    vec![format!("Could not read the prediction log: {:#}", e)]
                }
            },
            Command::Cancel => {
                if self.dialog.take().is_some() {
                    vec!["Prediction cancelled.".to_string()]
                } else {
                    vec!["Nothing to cancel.".to_string()]
                }
            }
        }
    }

    /// Show the result first, then try to log it.
    fn finish(&self, prediction: &Prediction) -> Vec<String> {
        let mut reply = format!("Result:\n{}", format_prediction(prediction, false));
        match self.log.append(prediction) {
            Ok(_) => reply.push_str(&format!("\n\nSaved to {}", self.log.path().display())),
            Err(e) => {
                tracing::warn!(error = %e, "prediction not saved");
                reply.push_str(&format!("\n\nWarning: could not save the prediction: {:#}", e));
            }
        }
        vec![reply]
    }
}
