//! Session: runs a stream of setting lines and messages through a machine.
//!
//! Input is line oriented. A line starting with `*` reconfigures the
//! machine; every other line is a message converted with the current
//! configuration and emitted as one output line. Rotor offsets carry over
//! from one message line to the next until the next setting line.

use tracing::{debug, info};

use crate::config::{MachineConfig, Setting};
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;

/// A machine plus the bookkeeping needed to process a message stream.
#[derive(Debug, Clone)]
pub struct Session {
    machine: Machine,
    configured: bool,
    messages: usize,
}

impl Session {
    /// Wraps a machine that has not been given a setting yet.
    pub fn new(machine: Machine) -> Self {
        Session {
            machine,
            configured: false,
            messages: 0,
        }
    }

    /// Parses a configuration file and builds the session's machine.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if the configuration is
    /// invalid.
    pub fn from_config(text: &str) -> Result<Self> {
        let config = MachineConfig::parse(text)?;
        Ok(Self::new(config.build()?))
    }

    /// Returns the machine.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Returns the number of message lines converted so far.
    pub fn messages(&self) -> usize {
        self.messages
    }

    /// Processes one input line.
    ///
    /// # Returns
    /// `None` for a setting line and for blank lines before the first
    /// setting line; otherwise the converted message.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Format`] for a message before any setting
    /// line, and propagates setting and conversion errors.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        if Setting::is_setting_line(line) {
            let setting = Setting::parse(line, self.machine.num_rotors())?;
            setting.apply(&mut self.machine)?;
            self.configured = true;
            info!(
                rotors = ?setting.rotors,
                positions = %setting.positions,
                plugboard = %setting.plugboard,
                "machine reconfigured"
            );
            return Ok(None);
        }

        if !self.configured {
            if line.trim().is_empty() {
                return Ok(None);
            }
            return Err(EnigmaError::format("message before setting line"));
        }

        let out = self.machine.convert(line)?;
        self.messages += 1;
        debug!(message = self.messages, len = out.len(), "message converted");
        Ok(Some(out))
    }

    /// Processes every line of `input` and collects the output lines.
    ///
    /// # Errors
    /// Stops at the first failing line and returns its error.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::Session;
    ///
    /// let config = "ABCD 2 1  R R (AB) (CD)  M MA (ABCD)";
    /// let mut session = Session::from_config(config).unwrap();
    /// let out = session.process("* R M A\nABBA\n").unwrap();
    /// assert_eq!(out.len(), 1);
    /// ```
    pub fn process(&mut self, input: &str) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for line in input.lines() {
            if let Some(converted) = self.process_line(line)? {
                out.push(converted);
            }
        }
        Ok(out)
    }
}
