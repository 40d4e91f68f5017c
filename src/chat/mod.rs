pub mod session;

pub use session::{Command, Session, GREETING, UNKNOWN_MESSAGE};

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Drive a session line by line until end of input.
///
/// A dialog still in progress at end of input is dropped without logging.
pub fn run_chat<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, session: &mut Session) -> Result<()> {
    writeln!(writer, "Send /start for help.")?;

    let mut line = String::new();
    loop {
        write!(writer, "> ")?;
        writer.flush()?;

        line.clear();
        if reader.read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        for reply in session.handle(text) {
            writeln!(writer, "{}", reply)?;
        }
    }

    if session.is_collecting() {
        tracing::debug!("chat input ended during a dialog");
    }
    writeln!(writer)?;
    Ok(())
}
