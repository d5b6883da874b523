//! Alphabet: bijection between symbols and dense indices.
//!
//! Every permutation, rotor and machine works on indices `0..size`. The
//! alphabet is the only place where symbols and indices are translated.

use std::collections::HashMap;
use std::fmt;

use crate::error::{EnigmaError, Result};

/// Symbols of the default alphabet.
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An ordered set of distinct symbols.
///
/// The K-th symbol has index K. Two alphabets are equal when they hold
/// the same symbols in the same order.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Creates an alphabet from the characters of `chars`, in order.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if `chars` is empty, repeats a
    /// symbol, or contains whitespace or a cycle delimiter.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::Alphabet;
    ///
    /// let vowels = Alphabet::new("AEIOU").unwrap();
    /// assert_eq!(vowels.size(), 5);
    /// assert!(Alphabet::new("ABCA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self> {
        let mut symbols = Vec::with_capacity(chars.len());
        let mut index = HashMap::with_capacity(chars.len());
        for c in chars.chars() {
            if c.is_whitespace() || c == '(' || c == ')' || c == '*' {
                return Err(EnigmaError::config(format!(
                    "'{}' cannot be an alphabet symbol",
                    c
                )));
            }
            if index.insert(c, symbols.len()).is_some() {
                return Err(EnigmaError::config(format!(
                    "symbol '{}' appears twice in alphabet",
                    c
                )));
            }
            symbols.push(c);
        }
        if symbols.is_empty() {
            return Err(EnigmaError::config("alphabet is empty"));
        }
        Ok(Alphabet { symbols, index })
    }

    /// The upper-case alphabet `A..=Z`.
    pub fn upper() -> Self {
        let symbols: Vec<char> = UPPER.chars().collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, index }
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if `symbol` belongs to this alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    /// Returns the symbol at `index`, or `None` if `index >= size()`.
    pub fn to_symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Returns the index of `symbol`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Lookup`] if `symbol` is not in the alphabet.
    pub fn to_index(&self, symbol: char) -> Result<usize> {
        self.index
            .get(&symbol)
            .copied()
            .ok_or(EnigmaError::Lookup(symbol))
    }

    /// Iterates over the symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    /// Symbol lookup for indices the crate has already wrapped into range.
    pub(crate) fn symbol_at(&self, index: usize) -> char {
        self.symbols[index]
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::upper()
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}

impl Eq for Alphabet {}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &c in &self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
