//! Heritable traits for organisms.
//!
//! A genetic code is a fixed schema of named numeric traits, each with a
//! declared valid range. Codes are immutable once built; offspring receive a
//! new code derived from the parent's through bounded random mutation.

pub mod traits;
pub mod code;
pub mod mutation;

pub use traits::Trait;
pub use code::GeneticCode;
pub use eco_core::MutationConfig;
