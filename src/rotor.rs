//! Rotor: a permutation that can be turned.
//!
//! All rotors share a name, a base permutation (the wiring at offset 0)
//! and a current offset. What they can do differs by kind:
//!
//! | kind        | rotates | reflects | notches |
//! |-------------|---------|----------|---------|
//! | `Reflector` | no      | yes      | none    |
//! | `Fixed`     | no      | no       | none    |
//! | `Moving`    | yes     | no       | 0 or more |
//!
//! Every kind accepts [`Rotor::set`] (ring alignment); only a moving
//! rotor changes offset through [`Rotor::advance`].

use std::collections::BTreeSet;
use std::fmt;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// Handle to a rotor in a machine's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub usize);

/// Per-kind payload of a [`Rotor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Non-rotating rotor that turns the signal back through the stack.
    Reflector,
    /// Non-rotating rotor, e.g. the thin Beta/Gamma wheels.
    Fixed,
    /// Rotating rotor; `notches` are the offsets at which it lets the
    /// rotor on its left advance.
    Moving { notches: BTreeSet<usize> },
}

/// A named rotor with its base wiring and current offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    offset: usize,
    kind: RotorKind,
}

impl Rotor {
    /// Creates a moving rotor whose notches are the symbols of `notches`.
    ///
    /// # Parameters
    /// - `name`: Catalogue name of the rotor.
    /// - `permutation`: Wiring at offset 0.
    /// - `notches`: Notch symbols; may be empty.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if a notch symbol is not in
    /// the permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::{Alphabet, Permutation, Rotor};
    ///
    /// let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)",
    ///     &Alphabet::upper()).unwrap();
    /// let mut rotor = Rotor::moving("I", perm, "Q").unwrap();
    /// rotor.set_symbol('Q').unwrap();
    /// assert!(rotor.at_notch());
    /// rotor.advance();
    /// assert!(!rotor.at_notch());
    /// ```
    pub fn moving(name: impl Into<String>, permutation: Permutation, notches: &str) -> Result<Self> {
        let name = name.into();
        let alphabet = permutation.alphabet();
        let notches = notches
            .chars()
            .map(|c| {
                alphabet.to_index(c).map_err(|_| {
                    EnigmaError::config(format!(
                        "notch '{}' of rotor {} is not in the alphabet",
                        c, name
                    ))
                })
            })
            .collect::<Result<BTreeSet<usize>>>()?;
        Ok(Self::build(name, permutation, RotorKind::Moving { notches }))
    }

    /// Creates a rotor that never advances.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::build(name.into(), permutation, RotorKind::Fixed)
    }

    /// Creates a reflector.
    ///
    /// The wiring is not checked here; a machine rejects a reflector that
    /// is not a derangement when it is placed in slot 0.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::build(name.into(), permutation, RotorKind::Reflector)
    }

    fn build(name: String, permutation: Permutation, kind: RotorKind) -> Self {
        Rotor {
            name,
            permutation,
            offset: 0,
            kind,
        }
    }

    /// Returns the catalogue name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rotor kind.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the alphabet of the wiring.
    pub fn alphabet(&self) -> &Alphabet {
        self.permutation.alphabet()
    }

    /// Returns the wiring at offset 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet size.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// True iff the rotor has a ratchet and can advance.
    pub fn rotates(&self) -> bool {
        match self.kind {
            RotorKind::Moving { .. } => true,
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// True iff the rotor is a reflector.
    pub fn reflecting(&self) -> bool {
        match self.kind {
            RotorKind::Reflector => true,
            RotorKind::Fixed | RotorKind::Moving { .. } => false,
        }
    }

    /// Returns the current offset in `[0, size)`.
    pub fn setting(&self) -> usize {
        self.offset
    }

    /// Sets the offset to `posn` modulo the alphabet size.
    pub fn set(&mut self, posn: usize) {
        self.offset = posn % self.size();
    }

    /// Sets the offset to the index of `symbol`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Lookup`] if `symbol` is not in the alphabet.
    pub fn set_symbol(&mut self, symbol: char) -> Result<()> {
        let posn = self.alphabet().to_index(symbol)?;
        self.set(posn);
        Ok(())
    }

    /// Maps `index` right-to-left through the wiring at the current offset.
    pub fn convert_forward(&self, index: usize) -> usize {
        self.permutation.permute_at(self.offset, index)
    }

    /// Maps `index` left-to-right, the inverse of
    /// [`convert_forward`](Self::convert_forward).
    pub fn convert_backward(&self, index: usize) -> usize {
        self.permutation.invert_at(self.offset, index)
    }

    /// True iff the rotor sits on one of its notches.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.offset),
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Advances a moving rotor one position; no-op for other kinds.
    pub fn advance(&mut self) {
        match self.kind {
            RotorKind::Moving { .. } => self.offset = (self.offset + 1) % self.size(),
            RotorKind::Reflector | RotorKind::Fixed => {}
        }
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotor {}", self.name)
    }
}
