//! Step definitions for resume trigger BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
