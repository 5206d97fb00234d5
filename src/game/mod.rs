//! Implementation of the Havannah board, its geometry and winning conditions.

pub mod core;
pub mod position;
pub mod rules;
