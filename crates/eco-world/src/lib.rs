//! Ecosystem simulation engine.
//!
//! This crate implements the bounded 2D field where plants and organisms
//! live, reproduce, mutate and die, and the tick protocol that advances it.

pub mod entity;
pub mod field;
pub mod pathfinding;
pub mod ecosystem;
pub mod state;

pub use entity::{Action, Body, Entity, Organism, Plant, StepContext};
pub use field::Field;
pub use pathfinding::{Heuristic, Path};
pub use ecosystem::{Ecosystem, TickReport};
pub use state::{CellState, Census, FieldState};
