//! Interactive confirmation capability.
//!
//! The run executor asks before clearing an existing output directory.
//! The [`Confirm`] trait keeps that prompt injectable: production reads
//! from the terminal, tests replay a scripted sequence.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Yes/no confirmation capability.
pub trait Confirm {
    /// Ask the user `question`, returning `true` on acceptance.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Terminal-backed confirmation reading a reply line from stdin.
///
/// The first character of the reply decides: `y`/`Y` accepts, anything
/// else (including an empty reply) declines.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{question} [y/n] ").context("write prompt")?;
        stdout.flush().context("flush prompt")?;

        let mut reply = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut reply)
            .context("read prompt reply")?;
        Ok(matches!(reply.trim_start().chars().next(), Some('y' | 'Y')))
    }
}
