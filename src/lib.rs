//! Rotor cipher machine simulator.
//!
//! rotorcrypt models an electromechanical rotor machine of the Enigma
//! family: a plugboard, a stack of rotors driven by pawls, and a reflector
//! that sends the signal back through the stack. Every key press first
//! steps the rotors, then routes the symbol through the machine.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbols <-> dense indices)
//!     ↓
//! Permutation  (cycle notation, forward/inverse tables, shifted views)
//!     ↓
//! Rotor        (Reflector | Fixed | Moving{notches}, current offset)
//!     ↓ N slots + plugboard
//! Machine      (pawl stepping with double step, reflected signal path)
//!     ↓
//! Session      (setting lines and messages from a configuration file)
//! ```
//!
//! # Examples
//!
//! Build the four-rotor naval machine and encrypt a message:
//!
//! ```
//! use rotorcrypt::{Alphabet, Machine, Permutation, Rotor};
//!
//! let a = Alphabet::upper();
//! let p = |cycles: &str| Permutation::new(cycles, &a).unwrap();
//! let rotors = vec![
//!     Rotor::reflector("B", p("(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)")),
//!     Rotor::fixed("Beta", p("(ALBEVFCYODJWUGNMQTZSKPR) (HIX)")),
//!     Rotor::moving("I", p("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)"), "Q").unwrap(),
//!     Rotor::moving("II", p("(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)"), "E").unwrap(),
//!     Rotor::moving("III", p("(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)"), "V").unwrap(),
//! ];
//!
//! let mut machine = Machine::new(a.clone(), 5, 3, rotors).unwrap();
//! machine.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
//! machine.set_rotors("AAAA").unwrap();
//! assert_eq!(machine.convert("HELLO WORLD").unwrap(), "ILBDA AMTAZ");
//! ```
//!
//! Drive a machine from configuration text:
//!
//! ```
//! use rotorcrypt::Session;
//!
//! let mut session = Session::from_config("AEIOUY 3 1
//!     First  R (AI) (EO) (UY)
//!     Second N (AIU) (EO)
//!     Third  M (AO) (EY)").unwrap();
//! let out = session.process("* First Second Third AA\nAAAA").unwrap();
//! assert_eq!(out, ["UEEU"]);
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod session;
pub mod utils;

pub use alphabet::Alphabet;
pub use error::{EnigmaError, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorId, RotorKind};
pub use session::Session;
