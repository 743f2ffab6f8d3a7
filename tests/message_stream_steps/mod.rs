//! Step definitions for message stream BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
