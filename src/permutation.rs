//! Permutation: a total bijection over an alphabet's index space.
//!
//! Permutations are written in cycle notation, e.g. `"(AELT) (BKNW) (S)"`.
//! Each cycle maps every symbol to the next one and the last back to the
//! first. Symbols that appear in no cycle are fixed points.
//!
//! The forward and inverse tables are built once and never change. A
//! rotor turned by `k` positions does not get a new permutation: its
//! effective mapping is the base one conjugated by a cyclic shift,
//!
//! ```text
//! permute_at(k, i) = wrap(permute(wrap(i + k)) - k)
//! ```
//!
//! evaluated in O(1) per call by [`Permutation::permute_at`] and
//! [`Permutation::invert_at`].

use std::fmt;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// Returns `p` reduced into `[0, n)`, including for negative `p`.
///
/// # Panics
/// Panics if `n == 0`.
///
/// # Examples
///
/// ```
/// use rotorcrypt::permutation::wrap;
///
/// assert_eq!(wrap(27, 26), 1);
/// assert_eq!(wrap(-1, 26), 25);
/// assert_eq!(wrap(-52, 26), 0);
/// ```
pub fn wrap(p: i64, n: usize) -> usize {
    let n = n as i64;
    (((p % n) + n) % n) as usize
}

/// A permutation of the indices of an [`Alphabet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Alphabet,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parses `cycles` in cycle notation over `alphabet`.
    ///
    /// Whitespace between and inside cycles is ignored. The empty string
    /// is the identity.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if a cycle names a symbol
    /// outside `alphabet`, a symbol appears more than once, a cycle is
    /// empty, delimiters are unbalanced or nested, or text appears outside
    /// of any cycle.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::{Alphabet, Permutation};
    ///
    /// let p = Permutation::new("(BACD)", &Alphabet::upper()).unwrap();
    /// assert_eq!(p.permute_symbol('A').unwrap(), 'C');
    /// assert_eq!(p.invert_symbol('B').unwrap(), 'D');
    /// assert_eq!(p.permute_symbol('Z').unwrap(), 'Z');
    /// ```
    pub fn new(cycles: &str, alphabet: &Alphabet) -> Result<Self> {
        let n = alphabet.size();
        let mut forward: Vec<usize> = (0..n).collect();
        let mut seen = vec![false; n];

        for cycle in parse_cycles(cycles)? {
            let mut members = Vec::with_capacity(cycle.len());
            for c in cycle {
                let i = alphabet.to_index(c).map_err(|_| {
                    EnigmaError::config(format!("cycle symbol '{}' is not in the alphabet", c))
                })?;
                if seen[i] {
                    return Err(EnigmaError::config(format!(
                        "symbol '{}' appears in more than one cycle position",
                        c
                    )));
                }
                seen[i] = true;
                members.push(i);
            }
            for (k, &from) in members.iter().enumerate() {
                forward[from] = members[(k + 1) % members.len()];
            }
        }

        Ok(Self::from_forward(alphabet.clone(), forward))
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: &Alphabet) -> Self {
        Self::from_forward(alphabet.clone(), (0..alphabet.size()).collect())
    }

    fn from_forward(alphabet: Alphabet, forward: Vec<usize>) -> Self {
        let mut inverse = vec![0; forward.len()];
        for (i, &f) in forward.iter().enumerate() {
            inverse[f] = i;
        }
        Permutation {
            alphabet,
            forward,
            inverse,
        }
    }

    /// Returns the size of the permuted alphabet.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Returns the alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Applies the permutation to `index` taken modulo `size()`.
    pub fn permute(&self, index: usize) -> usize {
        self.forward[index % self.size()]
    }

    /// Applies the inverse permutation to `index` taken modulo `size()`.
    pub fn invert(&self, index: usize) -> usize {
        self.inverse[index % self.size()]
    }

    /// The base permutation conjugated by a cyclic shift of `offset`.
    ///
    /// This is the mapping seen through a rotor turned `offset` positions.
    pub fn permute_at(&self, offset: usize, index: usize) -> usize {
        let n = self.size();
        let k = offset % n;
        (self.forward[(index % n + k) % n] + n - k) % n
    }

    /// Inverse of [`permute_at`](Self::permute_at) for the same `offset`.
    pub fn invert_at(&self, offset: usize, index: usize) -> usize {
        let n = self.size();
        let k = offset % n;
        (self.inverse[(index % n + k) % n] + n - k) % n
    }

    /// Applies the permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Lookup`] if `symbol` is not in the alphabet.
    pub fn permute_symbol(&self, symbol: char) -> Result<char> {
        let i = self.alphabet.to_index(symbol)?;
        Ok(self.alphabet.symbol_at(self.permute(i)))
    }

    /// Applies the inverse permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Lookup`] if `symbol` is not in the alphabet.
    pub fn invert_symbol(&self, symbol: char) -> Result<char> {
        let i = self.alphabet.to_index(symbol)?;
        Ok(self.alphabet.symbol_at(self.invert(i)))
    }

    /// Returns true iff no index maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &f)| i != f)
    }
}

/// Renders the non-trivial cycles, each starting at its lowest index.
impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut visited = vec![false; self.size()];
        let mut first = true;
        for start in 0..self.size() {
            if visited[start] || self.forward[start] == start {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "(")?;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                write!(f, "{}", self.alphabet.symbol_at(i))?;
                i = self.forward[i];
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Splits cycle notation into the symbol lists of its cycles.
fn parse_cycles(text: &str) -> Result<Vec<Vec<char>>> {
    let mut cycles = Vec::new();
    let mut current: Option<Vec<char>> = None;

    for c in text.chars() {
        match (c, current.as_mut()) {
            ('(', None) => current = Some(Vec::new()),
            ('(', Some(_)) => {
                return Err(EnigmaError::config(format!(
                    "nested '(' in cycles \"{}\"",
                    text
                )))
            }
            (')', None) => {
                return Err(EnigmaError::config(format!(
                    "unbalanced ')' in cycles \"{}\"",
                    text
                )))
            }
            (')', Some(cycle)) => {
                if cycle.is_empty() {
                    return Err(EnigmaError::config(format!(
                        "empty cycle in \"{}\"",
                        text
                    )));
                }
                cycles.push(std::mem::take(cycle));
                current = None;
            }
            (c, _) if c.is_whitespace() => {}
            (c, Some(cycle)) => cycle.push(c),
            (c, None) => {
                return Err(EnigmaError::config(format!(
                    "'{}' outside of any cycle in \"{}\"",
                    c, text
                )))
            }
        }
    }

    if current.is_some() {
        return Err(EnigmaError::config(format!(
            "unterminated cycle in \"{}\"",
            text
        )));
    }
    Ok(cycles)
}
