//! The trait schema shared by every genetic code.

use eco_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named heritable trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    /// Probability of attempting a move each tick
    MovementBias,
    /// Probability of reproducing once eligible
    Fertility,
    /// Energy spent per tick
    Metabolism,
}

impl Trait {
    pub const COUNT: usize = 3;

    pub fn all() -> [Trait; Trait::COUNT] {
        [Trait::MovementBias, Trait::Fertility, Trait::Metabolism]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Trait::MovementBias => "movement_bias",
            Trait::Fertility => "fertility",
            Trait::Metabolism => "metabolism",
        }
    }

    /// Inclusive (min, max) bounds a value of this trait must respect
    pub fn range(&self) -> (f32, f32) {
        match self {
            Trait::MovementBias => (0.0, 1.0),
            Trait::Fertility => (0.0, 1.0),
            Trait::Metabolism => (0.1, 10.0),
        }
    }

    pub fn default_value(&self) -> f32 {
        match self {
            Trait::MovementBias => 0.5,
            Trait::Fertility => 0.3,
            Trait::Metabolism => 1.0,
        }
    }

    pub fn span(&self) -> f32 {
        let (min, max) = self.range();
        max - min
    }

    pub fn contains(&self, value: f32) -> bool {
        let (min, max) = self.range();
        value.is_finite() && value >= min && value <= max
    }

    pub fn clamp(&self, value: f32) -> f32 {
        let (min, max) = self.range();
        value.clamp(min, max)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Trait::MovementBias => 0,
            Trait::Fertility => 1,
            Trait::Metabolism => 2,
        }
    }
}

impl FromStr for Trait {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Trait::all()
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::UnknownTrait(name.to_string()))
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for t in Trait::all() {
            assert_eq!(t.name().parse::<Trait>().unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "photosynthesis".parse::<Trait>().unwrap_err();
        assert_eq!(err, Error::UnknownTrait("photosynthesis".to_string()));
    }

    #[test]
    fn test_defaults_within_range() {
        for t in Trait::all() {
            assert!(t.contains(t.default_value()), "{} default out of range", t);
        }
    }

    #[test]
    fn test_indices_are_dense() {
        let mut seen = [false; Trait::COUNT];
        for t in Trait::all() {
            seen[t.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_contains_rejects_nan() {
        assert!(!Trait::Fertility.contains(f32::NAN));
        assert!(!Trait::Metabolism.contains(0.0));
        assert_eq!(Trait::Metabolism.clamp(0.0), 0.1);
    }
}
