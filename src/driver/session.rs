use anyhow::Result;
use log::{debug, info, warn};

use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use std::str::FromStr;
use std::time::Instant;

use super::command::{parse_number, Command, HELP};
use crate::blockchain::Chain;

/// Interactive session driving a chain from line-oriented input
pub struct Session<R, W> {
    chain: Chain,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(chain: Chain, input: R, output: W) -> Self {
        Session {
            chain,
            input,
            output,
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn into_parts(self) -> (Chain, W) {
        (self.chain, self.output)
    }

    /// Runs the command loop until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        info!("Session started with {} block(s)", self.chain.size());

        loop {
            writeln!(self.output, "{}", self.chain.render())?;

            let line = match self.prompt("Command? ")? {
                Some(line) => line,
                None => break,
            };

            if line.trim().is_empty() {
                continue;
            }

            let flow = match line.parse::<Command>() {
                Ok(command) => self.execute(command)?,
                Err(err) => {
                    debug!("Rejected input {:?}: {}", line.trim(), err);
                    writeln!(self.output, "{}", err)?;
                    ControlFlow::Continue(())
                }
            };

            if flow.is_break() {
                break;
            }
        }

        self.output.flush()?;
        info!("Session ended with {} block(s)", self.chain.size());
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<ControlFlow<()>> {
        match command {
            Command::Mine => {
                let Some(amount) = self.prompt_number::<i32>("Amount transferred? ")? else {
                    return Ok(ControlFlow::Break(()));
                };

                let started = Instant::now();
                let block = self.chain.mine_next(amount);
                info!(
                    "Mined block {} in {:?} ({} attempts)",
                    block.index(),
                    started.elapsed(),
                    block.attempts()
                );

                writeln!(self.output, "amount = {}, nonce = {}", block.amount(), block.nonce())?;
            }
            Command::Append => {
                let Some(amount) = self.prompt_number::<i32>("Amount transferred? ")? else {
                    return Ok(ControlFlow::Break(()));
                };
                let Some(nonce) = self.prompt_number::<u64>("Nonce? ")? else {
                    return Ok(ControlFlow::Break(()));
                };

                let block = self.chain.candidate(amount, nonce);
                let index = block.index();
                match self.chain.append(block) {
                    Ok(()) => info!("Appended block {}", index),
                    Err(err) => {
                        warn!("Rejected block {}: {}", index, err);
                        writeln!(self.output, "{}", err)?;
                    }
                }
            }
            Command::Remove => {
                if !self.chain.remove_last() {
                    writeln!(self.output, "Cannot remove the genesis block")?;
                }
            }
            Command::Check => {
                if self.chain.validate() {
                    writeln!(self.output, "Chain is valid!")?;
                } else {
                    writeln!(self.output, "Chain is invalid!")?;
                }
            }
            Command::Report => {
                writeln!(self.output, "{}", self.chain.balances())?;
            }
            Command::Export => {
                writeln!(self.output, "{}", self.chain.to_json()?)?;
            }
            Command::Help => {
                writeln!(self.output, "{}", HELP)?;
            }
            Command::Quit => return Ok(ControlFlow::Break(())),
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Prints `text` and reads one line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line))
    }

    /// Re-prompts until the user enters a number; `None` at end of input
    fn prompt_number<T: FromStr>(&mut self, text: &str) -> Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(text)? else {
                return Ok(None);
            };

            match parse_number(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => {
                    debug!("Rejected number {:?}", line.trim());
                    writeln!(self.output, "{}", err)?;
                }
            }
        }
    }
}
