//! Services shared by the HTTP API and the command line.

pub mod cards;
pub mod font;
