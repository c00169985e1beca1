//! Interactive editing of a scenario, one command per line.
//!
//! Each command produces a fresh [`ScenarioInputs`] snapshot; results are
//! recomputed from the current snapshot whenever the screen is redrawn.

use super::{calc, ui};
use crate::core::scenario::parse_amount;
use crate::core::{CurrencyRateProvider, Field, RateQuote, ScenarioInputs};
use anyhow::{Result, anyhow};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Set(Field, f64),
    Refresh,
    Show,
    Undo,
    Reset,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        if let Some((field, value)) = line.split_once('=') {
            return Ok(Command::Set(field.parse()?, parse_amount(value)));
        }

        let mut parts = line.split_whitespace();
        let keyword = parts.next().unwrap_or_default().to_lowercase();
        match keyword.as_str() {
            "set" => {
                let field = parts
                    .next()
                    .ok_or_else(|| anyhow!("Usage: set <field> <value>"))?;
                let value = parts.collect::<Vec<_>>().join(" ");
                Ok(Command::Set(field.parse()?, parse_amount(&value)))
            }
            "refresh" | "rates" => Ok(Command::Refresh),
            "" | "show" => Ok(Command::Show),
            "undo" => Ok(Command::Undo),
            "reset" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(anyhow!("Unknown command: {}", line)),
        }
    }
}

/// The current snapshot plus the snapshots it replaced.
#[derive(Debug, Clone)]
pub struct Session {
    initial: ScenarioInputs,
    current: ScenarioInputs,
    history: Vec<ScenarioInputs>,
    quote: Option<RateQuote>,
}

impl Session {
    pub fn new(initial: ScenarioInputs) -> Self {
        Session {
            initial,
            current: initial,
            history: Vec::new(),
            quote: None,
        }
    }

    pub fn current(&self) -> &ScenarioInputs {
        &self.current
    }

    pub fn quote(&self) -> Option<&RateQuote> {
        self.quote.as_ref()
    }

    /// Makes `next` the current snapshot, remembering the previous one.
    pub fn replace(&mut self, next: ScenarioInputs) {
        self.history.push(self.current);
        self.current = next;
    }

    pub fn set(&mut self, field: Field, value: f64) {
        let next = self.current.with(field, value);
        self.replace(next);
    }

    pub fn apply_quote(&mut self, next: ScenarioInputs, quote: RateQuote) {
        self.replace(next);
        self.quote = Some(quote);
    }

    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        let initial = self.initial;
        self.replace(initial);
    }
}

pub fn help_text() -> String {
    let mut output = String::from(
        "Commands:\n  <field>=<value>      set an input\n  set <field> <value>  set an input\n  refresh              fetch current EUR/TRY and SEK/TRY rates\n  show                 redraw the results\n  undo                 restore the previous inputs\n  reset                restore the starting inputs\n  quit                 leave\n\nFields:\n",
    );
    for field in Field::ALL {
        output.push_str(&format!(
            "  {:<8} {:<28} {}\n",
            field.alias(),
            field.name(),
            field.label()
        ));
    }
    output
}

/// Reads commands from `reader` until EOF or `quit`, writing every screen to `out`.
pub async fn run<R, W>(
    reader: R,
    out: &mut W,
    initial: ScenarioInputs,
    provider: &(dyn CurrencyRateProvider + Send + Sync),
) -> Result<Session>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = Session::new(initial);
    writeln!(out, "{}", calc::render_report(session.current(), None))?;
    writeln!(out, "Type 'help' for commands.")?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                continue;
            }
        };
        debug!(?command, "Session command");

        match command {
            Command::Set(field, value) => session.set(field, value),
            Command::Refresh => {
                let current = *session.current();
                match calc::refresh_with_spinner(provider, &current).await {
                    Ok((next, quote)) => session.apply_quote(next, quote),
                    Err(e) => {
                        warn!(error = ?e, "Rate refresh failed, keeping previous rates");
                        writeln!(
                            out,
                            "{}",
                            ui::style_text(
                                "Could not fetch exchange rates, keeping the current ones",
                                ui::StyleType::Error
                            )
                        )?;
                        continue;
                    }
                }
            }
            Command::Show => {}
            Command::Undo => {
                if !session.undo() {
                    writeln!(out, "Nothing to undo")?;
                    continue;
                }
            }
            Command::Reset => session.reset(),
            Command::Help => {
                writeln!(out, "{}", help_text())?;
                continue;
            }
            Command::Quit => break,
        }

        writeln!(out, "{}", ui::separator())?;
        writeln!(
            out,
            "{}",
            calc::render_report(session.current(), session.quote())
        )?;
    }

    Ok(session)
}
