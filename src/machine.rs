//! Machine: rotor slots, pawl stepping and the reflected signal path.
//!
//! A machine owns an inventory of rotors and references the ones in use
//! by [`RotorId`], so a rotor can be taken out and put back in another
//! slot by the next setting without being rebuilt.
//!
//! ```text
//!            slot 0       1        2      ...     n-1
//! key  ──> plugboard ─> R[n-1] ─> ... ─> R[1] ─> R[0] (reflector)
//! lamp <── plugboard <─ R[n-1] <─ ... <─ R[1] <──┘
//! ```
//!
//! Before every symbol the machine ticks: which rotors advance is decided
//! from the notch positions of all rotors *before* the tick, and only then
//! are the advances applied.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorId};
use crate::utils::text;

/// A rotor cipher machine.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Alphabet,
    num_rotors: usize,
    num_pawls: usize,
    inventory: Vec<Rotor>,
    by_name: HashMap<String, RotorId>,
    slots: Vec<RotorId>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `num_pawls` pawls
    /// whose available rotors are `all_rotors`.
    ///
    /// No rotors are inserted and the plugboard is the identity.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if `num_rotors < 2`,
    /// `num_pawls >= num_rotors`, two rotors share a name, or a rotor is
    /// wired over a different alphabet.
    pub fn new(
        alphabet: Alphabet,
        num_rotors: usize,
        num_pawls: usize,
        all_rotors: Vec<Rotor>,
    ) -> Result<Self> {
        if num_rotors < 2 {
            return Err(EnigmaError::config(format!(
                "a machine needs at least 2 rotor slots, got {}",
                num_rotors
            )));
        }
        if num_pawls >= num_rotors {
            return Err(EnigmaError::config(format!(
                "{} pawls do not fit {} rotor slots",
                num_pawls, num_rotors
            )));
        }

        let mut by_name = HashMap::with_capacity(all_rotors.len());
        for (i, rotor) in all_rotors.iter().enumerate() {
            if rotor.alphabet() != &alphabet {
                return Err(EnigmaError::config(format!(
                    "rotor {} uses a different alphabet",
                    rotor.name()
                )));
            }
            if by_name.insert(rotor.name().to_string(), RotorId(i)).is_some() {
                return Err(EnigmaError::config(format!(
                    "rotor {} is defined twice",
                    rotor.name()
                )));
            }
        }

        debug!(
            num_rotors,
            num_pawls,
            available = all_rotors.len(),
            alphabet_size = alphabet.size(),
            "machine assembled"
        );

        let plugboard = Permutation::identity(&alphabet);
        Ok(Machine {
            alphabet,
            num_rotors,
            num_pawls,
            inventory: all_rotors,
            by_name,
            slots: Vec::new(),
            plugboard,
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns the machine alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the current plugboard.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Returns the rotor in `slot`, or `None` if the slot is out of range
    /// or no rotors have been inserted.
    pub fn slot(&self, slot: usize) -> Option<&Rotor> {
        self.slots.get(slot).map(|&id| &self.inventory[id.0])
    }

    /// Looks up an available rotor by name.
    pub fn rotor(&self, name: &str) -> Option<&Rotor> {
        self.by_name.get(name).map(|&id| &self.inventory[id.0])
    }

    /// Places the rotors named `names` in slots `0..num_rotors`, in order.
    /// `names[0]` is the reflector.
    ///
    /// Every inserted rotor is reset to offset 0. On error the previous
    /// slot assignment is left untouched.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if the count differs from
    /// [`num_rotors`](Self::num_rotors), a name is unknown or repeated,
    /// slot 0 is not a reflector or its wiring has a fixed point, another
    /// slot holds a reflector, or a non-rotating rotor sits to the right
    /// of a rotating one.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::config(format!(
                "expected {} rotors, got {}",
                self.num_rotors,
                names.len()
            )));
        }

        let mut slots = Vec::with_capacity(self.num_rotors);
        let mut used = HashSet::with_capacity(self.num_rotors);
        for name in names {
            let name = name.as_ref();
            let id = *self
                .by_name
                .get(name)
                .ok_or_else(|| EnigmaError::config(format!("unknown rotor {}", name)))?;
            if !used.insert(id) {
                return Err(EnigmaError::config(format!("rotor {} used twice", name)));
            }
            slots.push(id);
        }

        self.check_slots(&slots)?;

        for &id in &slots {
            self.inventory[id.0].set(0);
        }
        let listed: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
        debug!(rotors = ?listed, "rotors inserted");
        self.slots = slots;
        Ok(())
    }

    /// Validates reflector placement and the rotating-suffix rule.
    fn check_slots(&self, slots: &[RotorId]) -> Result<()> {
        let reflector = &self.inventory[slots[0].0];
        if !reflector.reflecting() {
            return Err(EnigmaError::config(format!(
                "rotor {} in slot 0 is not a reflector",
                reflector.name()
            )));
        }
        if !reflector.permutation().derangement() {
            return Err(EnigmaError::config(format!(
                "reflector {} has a fixed point",
                reflector.name()
            )));
        }

        let mut seen_rotating = false;
        for &id in &slots[1..] {
            let rotor = &self.inventory[id.0];
            if rotor.reflecting() {
                return Err(EnigmaError::config(format!(
                    "reflector {} is only allowed in slot 0",
                    rotor.name()
                )));
            }
            if rotor.rotates() {
                seen_rotating = true;
            } else if seen_rotating {
                return Err(EnigmaError::config(format!(
                    "non-rotating rotor {} placed right of a rotating rotor",
                    rotor.name()
                )));
            }
        }
        Ok(())
    }

    /// Sets the offsets of slots `1..num_rotors` from `setting`, whose
    /// first symbol is for slot 1.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Format`] if `setting` does not have exactly
    /// `num_rotors - 1` symbols or contains a symbol outside the alphabet,
    /// and [`EnigmaError::Configuration`] if no rotors are inserted.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        self.require_rotors()?;
        let offsets = self.resolve_setting(setting)?;
        for (&id, offset) in self.slots[1..].iter().zip(offsets) {
            self.inventory[id.0].set(offset);
        }
        debug!(setting, "rotors set");
        Ok(())
    }

    /// Resolves a setting string to offsets for slots `1..num_rotors`
    /// without touching any rotor.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Format`] on a length mismatch or a symbol
    /// outside the alphabet.
    pub(crate) fn resolve_setting(&self, setting: &str) -> Result<Vec<usize>> {
        let symbols: Vec<char> = setting.chars().collect();
        if symbols.len() != self.num_rotors - 1 {
            return Err(EnigmaError::format(format!(
                "setting \"{}\" must have {} symbols",
                setting,
                self.num_rotors - 1
            )));
        }
        symbols
            .iter()
            .map(|&c| {
                self.alphabet.to_index(c).map_err(|_| {
                    EnigmaError::format(format!(
                        "setting symbol '{}' is not in the alphabet",
                        c
                    ))
                })
            })
            .collect()
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if `plugboard` is over a
    /// different alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if plugboard.alphabet() != &self.alphabet {
            return Err(EnigmaError::config(
                "plugboard alphabet differs from machine alphabet",
            ));
        }
        self.plugboard = plugboard;
        Ok(())
    }

    /// Returns the current offsets of slots `1..num_rotors` as symbols.
    pub fn settings(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .map(|&id| self.alphabet.symbol_at(self.inventory[id.0].setting()))
            .collect()
    }

    fn require_rotors(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(EnigmaError::config("no rotors inserted"));
        }
        Ok(())
    }

    /// Decides which slots advance this tick from pre-tick notch states.
    ///
    /// Pawls sit on the rightmost `num_pawls` slots (never slot 0). The
    /// rightmost slot always advances. Any other pawled slot advances when
    /// its right neighbour is at a notch, or when it is itself at a notch
    /// and the pawl of its left neighbour engages it (double step).
    fn step_plan(&self) -> Vec<bool> {
        let n = self.slots.len();
        let first = (n - self.num_pawls).max(1);
        let at_notch: Vec<bool> = self
            .slots
            .iter()
            .map(|&id| self.inventory[id.0].at_notch())
            .collect();

        let mut plan = vec![false; n];
        for i in first..n {
            plan[i] = i == n - 1 || at_notch[i + 1] || (at_notch[i] && i > first);
        }
        plan
    }

    /// Advances every rotor the step plan selects.
    fn tick(&mut self) {
        let plan = self.step_plan();
        for (slot, &step) in plan.iter().enumerate() {
            if step {
                let id = self.slots[slot];
                self.inventory[id.0].advance();
            }
        }
        trace!(stepped = ?plan, settings = %self.settings(), "tick");
    }

    /// Advances the machine, then converts alphabet index `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Configuration`] if no rotors are inserted.
    pub fn convert_index(&mut self, index: usize) -> Result<usize> {
        self.require_rotors()?;
        Ok(self.convert_ready(index))
    }

    fn convert_ready(&mut self, index: usize) -> usize {
        self.tick();

        let mut idx = self.plugboard.permute(index);
        for &id in self.slots[1..].iter().rev() {
            idx = self.inventory[id.0].convert_forward(idx);
        }
        idx = self.inventory[self.slots[0].0].convert_forward(idx);
        for &id in &self.slots[1..] {
            idx = self.inventory[id.0].convert_backward(idx);
        }
        self.plugboard.invert(idx)
    }

    /// Advances the machine, then converts one symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Encoding`] if `symbol` is not in the
    /// alphabet and [`EnigmaError::Configuration`] if no rotors are
    /// inserted.
    pub fn convert_symbol(&mut self, symbol: char) -> Result<char> {
        let index = self
            .alphabet
            .to_index(symbol)
            .map_err(|_| EnigmaError::Encoding(symbol))?;
        let out = self.convert_index(index)?;
        Ok(self.alphabet.symbol_at(out))
    }

    /// Converts every non-whitespace symbol of `msg` and returns the
    /// result in groups of five.
    ///
    /// The whole message is checked before any rotor moves, so a rejected
    /// message leaves the machine as it was. Rotor offsets otherwise carry
    /// over to the next call.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Encoding`] for the first symbol outside the
    /// alphabet and [`EnigmaError::Configuration`] if no rotors are
    /// inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::{Alphabet, Machine, Permutation, Rotor};
    ///
    /// let a = Alphabet::new("ABCD").unwrap();
    /// let rotors = vec![
    ///     Rotor::reflector("R", Permutation::new("(AB) (CD)", &a).unwrap()),
    ///     Rotor::moving("M", Permutation::new("(ABC)", &a).unwrap(), "").unwrap(),
    /// ];
    /// let mut encoder = Machine::new(a.clone(), 2, 1, rotors.clone()).unwrap();
    /// let mut decoder = Machine::new(a, 2, 1, rotors).unwrap();
    /// for m in [&mut encoder, &mut decoder] {
    ///     m.insert_rotors(&["R", "M"]).unwrap();
    ///     m.set_rotors("A").unwrap();
    /// }
    /// let secret = encoder.convert("ABCDDCBA").unwrap();
    /// assert_eq!(decoder.convert(&secret).unwrap(), "ABCDD CBA");
    /// ```
    pub fn convert(&mut self, msg: &str) -> Result<String> {
        self.require_rotors()?;
        let indices = text::significant_chars(msg)
            .map(|c| self.alphabet.to_index(c).map_err(|_| EnigmaError::Encoding(c)))
            .collect::<Result<Vec<usize>>>()?;

        let symbols: Vec<char> = indices
            .into_iter()
            .map(|i| {
                let out = self.convert_ready(i);
                self.alphabet.symbol_at(out)
            })
            .collect();
        Ok(text::group(&symbols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFLECTOR_B: &str =
        "(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)";
    const BETA: &str = "(ALBEVFCYODJWUGNMQTZSKPR) (HIX)";
    const ROTOR_I: &str = "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)";
    const ROTOR_II: &str = "(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)";
    const ROTOR_III: &str = "(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)";

    fn perm(cycles: &str) -> Permutation {
        Permutation::new(cycles, &Alphabet::upper()).unwrap()
    }

    fn rotors() -> Vec<Rotor> {
        vec![
            Rotor::reflector("B", perm(REFLECTOR_B)),
            Rotor::fixed("Beta", perm(BETA)),
            Rotor::moving("I", perm(ROTOR_I), "Q").unwrap(),
            Rotor::moving("II", perm(ROTOR_II), "E").unwrap(),
            Rotor::moving("III", perm(ROTOR_III), "V").unwrap(),
            Rotor::reflector("Bad", perm("(AB)")),
        ]
    }

    fn machine() -> Machine {
        Machine::new(Alphabet::upper(), 5, 3, rotors()).unwrap()
    }

    fn standard() -> Machine {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AAAA").unwrap();
        m
    }

    #[test]
    fn test_new_rejects_bad_shapes() {
        assert!(Machine::new(Alphabet::upper(), 1, 0, rotors()).is_err());
        assert!(Machine::new(Alphabet::upper(), 5, 5, rotors()).is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_catalogue_names() {
        let mut all = rotors();
        all.push(Rotor::fixed("Beta", perm(BETA)));
        assert!(matches!(
            Machine::new(Alphabet::upper(), 5, 3, all),
            Err(EnigmaError::Configuration(_))
        ));
    }

    #[test]
    fn test_new_rejects_foreign_alphabet() {
        let vowels = Alphabet::new("AEIOU").unwrap();
        let mut all = rotors();
        all.push(Rotor::fixed("V", Permutation::new("(AE)", &vowels).unwrap()));
        assert!(Machine::new(Alphabet::upper(), 5, 3, all).is_err());
    }

    #[test]
    fn test_insert_wrong_count() {
        let mut m = machine();
        assert!(m.insert_rotors(&["B", "Beta", "I", "II"]).is_err());
    }

    #[test]
    fn test_insert_unknown_name() {
        let mut m = machine();
        assert!(m.insert_rotors(&["B", "Beta", "I", "II", "IX"]).is_err());
    }

    #[test]
    fn test_insert_slot_zero_must_reflect() {
        let mut m = machine();
        assert!(matches!(
            m.insert_rotors(&["Beta", "B", "I", "II", "III"]),
            Err(EnigmaError::Configuration(_))
        ));
    }

    #[test]
    fn test_insert_reflector_outside_slot_zero() {
        let mut m = machine();
        assert!(matches!(
            m.insert_rotors(&["B", "Bad", "I", "II", "III"]),
            Err(EnigmaError::Configuration(_))
        ));
        assert!(m.slot(0).is_none());
    }

    #[test]
    fn test_insert_reflector_with_fixed_point() {
        let mut m = machine();
        assert!(m.insert_rotors(&["Bad", "Beta", "I", "II", "III"]).is_err());
    }

    #[test]
    fn test_insert_duplicate_name() {
        let mut m = machine();
        assert!(m.insert_rotors(&["B", "Beta", "I", "I", "III"]).is_err());
    }

    #[test]
    fn test_insert_fixed_right_of_moving() {
        let mut m = machine();
        assert!(m.insert_rotors(&["B", "I", "Beta", "II", "III"]).is_err());
    }

    #[test]
    fn test_failed_insert_keeps_previous_slots() {
        let mut m = standard();
        assert!(m.insert_rotors(&["B", "I", "Beta", "II", "III"]).is_err());
        assert_eq!(m.slot(2).unwrap().name(), "I");
    }

    #[test]
    fn test_insert_resets_offsets() {
        let mut m = standard();
        m.set_rotors("BCDE").unwrap();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        assert_eq!(m.settings(), "AAAA");
    }

    #[test]
    fn test_set_rotors_format_errors() {
        let mut m = standard();
        assert!(matches!(m.set_rotors("AAA"), Err(EnigmaError::Format(_))));
        assert!(matches!(m.set_rotors("AAAAA"), Err(EnigmaError::Format(_))));
        assert!(matches!(m.set_rotors("AA1A"), Err(EnigmaError::Format(_))));
        assert_eq!(m.settings(), "AAAA");
    }

    #[test]
    fn test_set_rotors_before_insert() {
        let mut m = machine();
        assert!(matches!(
            m.set_rotors("AAAA"),
            Err(EnigmaError::Configuration(_))
        ));
    }

    #[test]
    fn test_plugboard_alphabet_mismatch() {
        let mut m = standard();
        let other = Alphabet::new("ABC").unwrap();
        assert!(m
            .set_plugboard(Permutation::new("(AB)", &other).unwrap())
            .is_err());
    }

    #[test]
    fn test_rightmost_rotor_steps_each_symbol() {
        let mut m = standard();
        for expected in ["AAAB", "AAAC", "AAAD"] {
            m.convert_index(2).unwrap();
            assert_eq!(m.settings(), expected);
        }
    }

    #[test]
    fn test_notch_carries_to_left_neighbour() {
        let mut m = standard();
        m.set_rotors("AAAV").unwrap();
        m.convert_index(0).unwrap();
        assert_eq!(m.settings(), "AABW");
    }

    #[test]
    fn test_double_step() {
        let mut m = standard();
        m.set_rotors("AADU").unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            m.convert_index(0).unwrap();
            seen.push(m.settings());
        }
        assert_eq!(seen, ["AADV", "AAEW", "ABFX", "ABFY"]);
    }

    #[test]
    fn test_leftmost_pawled_rotor_ignores_own_notch() {
        let mut m = standard();
        m.set_rotors("AQAA").unwrap();
        m.convert_index(0).unwrap();
        assert_eq!(m.settings(), "AQAB");
    }

    #[test]
    fn test_all_notches_aligned() {
        let mut m = standard();
        m.set_rotors("CQEV").unwrap();
        m.convert_index(0).unwrap();
        assert_eq!(m.settings(), "CRFW");
    }

    #[test]
    fn test_fixed_rotor_under_pawl_does_not_move() {
        let mut m = Machine::new(Alphabet::upper(), 5, 4, rotors()).unwrap();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("CQAA").unwrap();
        m.convert_index(0).unwrap();
        assert_eq!(m.settings(), "CRAB");
    }

    #[test]
    fn test_zero_pawls_nothing_moves() {
        let mut m = Machine::new(Alphabet::upper(), 5, 0, rotors()).unwrap();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.convert("HELLO").unwrap();
        assert_eq!(m.settings(), "AAAA");
    }

    #[test]
    fn test_hello_world() {
        let mut m = standard();
        assert_eq!(m.convert("HELLO WORLD").unwrap(), "ILBDA AMTAZ");
    }

    #[test]
    fn test_convert_symbol_matches_message() {
        let mut a = standard();
        let mut b = standard();
        let one: String = "HELLO".chars().map(|c| a.convert_symbol(c).unwrap()).collect();
        assert_eq!(one, b.convert("HELLO").unwrap());
    }

    #[test]
    fn test_encoding_error_leaves_state() {
        let mut m = standard();
        assert_eq!(m.convert("HELLO world"), Err(EnigmaError::Encoding('w')));
        assert_eq!(m.settings(), "AAAA");
        assert_eq!(m.convert_symbol('3'), Err(EnigmaError::Encoding('3')));
    }

    #[test]
    fn test_state_carries_across_messages() {
        let mut m = standard();
        m.convert("HELLO").unwrap();
        assert_eq!(m.convert("WORLD").unwrap(), "AMTAZ");
    }

    #[test]
    fn test_convert_before_insert() {
        let mut m = machine();
        assert!(matches!(
            m.convert("A"),
            Err(EnigmaError::Configuration(_))
        ));
    }

    #[test]
    fn test_convert_never_maps_symbol_to_itself() {
        let mut m = standard();
        let plain = "A".repeat(200);
        let cipher = m.convert(&plain).unwrap();
        assert!(!cipher.contains('A'));
    }
}
