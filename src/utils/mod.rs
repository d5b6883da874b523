//! Text helpers shared by the machine and the session driver.

pub mod text;
