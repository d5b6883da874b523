//! Parsers for machine configuration files and setting lines.
//!
//! A configuration file describes the hardware:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I     MQ   (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! Beta  N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B     R    (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
//! ```
//!
//! The first token is the alphabet, followed by the slot and pawl counts.
//! Each rotor record is a name, a type tag (`M<notches>`, `N` or `R`) and
//! its cycles, which may run over several lines. A setting line selects
//! rotors for one or more messages:
//!
//! ```text
//! * B Beta I II III AAAA (CK) (MX) (LV)
//! ```

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Marker that opens a setting line.
pub const SETTING_MARKER: char = '*';

/// Type tag of a rotor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorTag {
    /// `M<notches>`: the notch symbols, possibly none.
    Moving(String),
    /// `N`
    Fixed,
    /// `R`
    Reflector,
}

impl RotorTag {
    fn parse(rotor: &str, tag: &str) -> Result<Self> {
        let mut chars = tag.chars();
        match (chars.next(), chars.as_str()) {
            (Some('M'), notches) => Ok(RotorTag::Moving(notches.to_string())),
            (Some('N'), "") => Ok(RotorTag::Fixed),
            (Some('R'), "") => Ok(RotorTag::Reflector),
            _ => Err(EnigmaError::config(format!(
                "rotor {} has invalid type tag \"{}\"",
                rotor, tag
            ))),
        }
    }
}

/// One rotor record of a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorSpec {
    pub name: String,
    pub tag: RotorTag,
    pub cycles: String,
}

impl RotorSpec {
    /// Builds the rotor this record describes.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] for malformed cycles or
    /// notches outside `alphabet`.
    pub fn build(&self, alphabet: &Alphabet) -> Result<Rotor> {
        let perm = Permutation::new(&self.cycles, alphabet)?;
        Ok(match &self.tag {
            RotorTag::Moving(notches) => Rotor::moving(self.name.clone(), perm, notches)?,
            RotorTag::Fixed => Rotor::fixed(self.name.clone(), perm),
            RotorTag::Reflector => Rotor::reflector(self.name.clone(), perm),
        })
    }
}

/// A parsed configuration file.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub alphabet: Alphabet,
    pub num_rotors: usize,
    pub num_pawls: usize,
    pub rotors: Vec<RotorSpec>,
}

impl MachineConfig {
    /// Parses the text of a configuration file.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if the file is truncated,
    /// a count is not a number, or a rotor record lacks a type tag or has
    /// an invalid one. Cycle and count validation happen in
    /// [`build`](Self::build).
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace().peekable();

        let alphabet = tokens
            .next()
            .ok_or_else(|| EnigmaError::config("configuration is empty"))
            .and_then(Alphabet::new)?;
        let num_rotors = parse_count(tokens.next(), "rotor count")?;
        let num_pawls = parse_count(tokens.next(), "pawl count")?;

        let mut rotors = Vec::new();
        while let Some(name) = tokens.next() {
            if name.starts_with('(') {
                return Err(EnigmaError::config(format!(
                    "cycles \"{}\" do not belong to any rotor",
                    name
                )));
            }
            let tag = match tokens.next() {
                Some(tag) if !tag.starts_with('(') => RotorTag::parse(name, tag)?,
                _ => {
                    return Err(EnigmaError::config(format!(
                        "rotor {} has no type tag",
                        name
                    )))
                }
            };
            let mut cycles = Vec::new();
            while let Some(cycle) = tokens.next_if(|t| t.starts_with('(')) {
                cycles.push(cycle);
            }
            rotors.push(RotorSpec {
                name: name.to_string(),
                tag,
                cycles: cycles.join(" "),
            });
        }

        debug!(
            alphabet = %alphabet,
            num_rotors,
            num_pawls,
            rotors = rotors.len(),
            "configuration parsed"
        );
        Ok(MachineConfig {
            alphabet,
            num_rotors,
            num_pawls,
            rotors,
        })
    }

    /// Builds a machine holding every rotor of the configuration.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] for any rotor that does not
    /// build, duplicate rotor names, or bad slot and pawl counts.
    pub fn build(&self) -> Result<Machine> {
        let rotors = self
            .rotors
            .iter()
            .map(|spec| spec.build(&self.alphabet))
            .collect::<Result<Vec<Rotor>>>()?;
        Machine::new(self.alphabet.clone(), self.num_rotors, self.num_pawls, rotors)
    }
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize> {
    let token = token
        .ok_or_else(|| EnigmaError::config(format!("configuration truncated before {}", what)))?;
    token
        .parse()
        .map_err(|_| EnigmaError::config(format!("{} \"{}\" is not a number", what, token)))
}

/// A parsed setting line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    /// Rotor names by slot; the first is the reflector.
    pub rotors: Vec<String>,
    /// Initial symbols for slots `1..`.
    pub positions: String,
    /// Plugboard cycles; empty for no plugs.
    pub plugboard: String,
}

impl Setting {
    /// Returns true if `line` is a setting line.
    pub fn is_setting_line(line: &str) -> bool {
        line.trim_start().starts_with(SETTING_MARKER)
    }

    /// Parses a setting line for a machine with `num_rotors` slots.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Format`] if the marker is missing, or there
    /// are too few rotor names or no position string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::config::Setting;
    ///
    /// let s = Setting::parse("* B Beta III IV I AXLE (HQ) (EX)", 5).unwrap();
    /// assert_eq!(s.rotors, ["B", "Beta", "III", "IV", "I"]);
    /// assert_eq!(s.positions, "AXLE");
    /// assert_eq!(s.plugboard, "(HQ) (EX)");
    /// ```
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let body = line
            .trim_start()
            .strip_prefix(SETTING_MARKER)
            .ok_or_else(|| EnigmaError::format(format!("\"{}\" is not a setting line", line)))?;
        let mut tokens = body.split_whitespace();

        let rotors: Vec<String> = tokens.by_ref().take(num_rotors).map(String::from).collect();
        if rotors.len() != num_rotors {
            return Err(EnigmaError::format(format!(
                "setting names {} rotors, machine has {} slots",
                rotors.len(),
                num_rotors
            )));
        }
        let positions = tokens
            .next()
            .ok_or_else(|| EnigmaError::format("setting has no rotor positions"))?
            .to_string();
        let plugboard = tokens.collect::<Vec<_>>().join(" ");

        Ok(Setting {
            rotors,
            positions,
            plugboard,
        })
    }

    /// Inserts the rotors, sets their positions and wires the plugboard.
    ///
    /// The plugboard and positions are checked before any rotor is
    /// inserted, so a rejected setting leaves the machine unchanged.
    ///
    /// # Errors
    /// Propagates the errors of [`Machine::insert_rotors`],
    /// [`Machine::set_rotors`] and the plugboard's [`Permutation::new`].
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        let plugboard = Permutation::new(&self.plugboard, machine.alphabet())?;
        machine.resolve_setting(&self.positions)?;
        machine.insert_rotors(self.rotors.as_slice())?;
        machine.set_rotors(&self.positions)?;
        machine.set_plugboard(plugboard)
    }
}
