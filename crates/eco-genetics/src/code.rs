//! Immutable genetic codes.

use crate::traits::Trait;
use eco_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A full set of trait values. There are no setters: a code never changes
/// after construction, offspring get a fresh code from `derive_from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f32>", into = "BTreeMap<String, f32>")]
pub struct GeneticCode {
    values: [f32; Trait::COUNT],
}

impl GeneticCode {
    /// Build a code from (trait name, value) pairs.
    ///
    /// Every trait in the schema must be given exactly once, within its range.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f32)>,
        S: AsRef<str>,
    {
        let mut values: [Option<f32>; Trait::COUNT] = [None; Trait::COUNT];

        for (name, value) in pairs {
            let t: Trait = name.as_ref().parse()?;
            if values[t.index()].is_some() {
                return Err(Error::InvalidConfiguration(format!(
                    "trait {} given more than once",
                    t
                )));
            }
            if !t.contains(value) {
                let (min, max) = t.range();
                return Err(Error::InvalidConfiguration(format!(
                    "trait {} = {} is outside [{}, {}]",
                    t, value, min, max
                )));
            }
            values[t.index()] = Some(value);
        }

        let mut resolved = [0.0; Trait::COUNT];
        for t in Trait::all() {
            resolved[t.index()] = values[t.index()].ok_or_else(|| {
                Error::InvalidConfiguration(format!("missing trait {}", t))
            })?;
        }

        Ok(Self { values: resolved })
    }

    /// Value of a trait looked up by name
    pub fn get(&self, name: &str) -> Result<f32> {
        let t: Trait = name.parse()?;
        Ok(self.value(t))
    }

    pub fn value(&self, t: Trait) -> f32 {
        self.values[t.index()]
    }

    pub fn movement_bias(&self) -> f32 {
        self.value(Trait::MovementBias)
    }

    pub fn fertility(&self) -> f32 {
        self.value(Trait::Fertility)
    }

    pub fn metabolism(&self) -> f32 {
        self.value(Trait::Metabolism)
    }

    /// Iterator over all (trait, value) pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (Trait, f32)> + '_ {
        Trait::all().into_iter().map(move |t| (t, self.value(t)))
    }

    /// Build directly from schema-ordered values, clamping each into range
    pub(crate) fn from_clamped(values: [f32; Trait::COUNT]) -> Self {
        let mut clamped = values;
        for t in Trait::all() {
            clamped[t.index()] = t.clamp(values[t.index()]);
        }
        Self { values: clamped }
    }
}

impl Default for GeneticCode {
    fn default() -> Self {
        let mut values = [0.0; Trait::COUNT];
        for t in Trait::all() {
            values[t.index()] = t.default_value();
        }
        Self { values }
    }
}

impl TryFrom<BTreeMap<String, f32>> for GeneticCode {
    type Error = Error;

    fn try_from(map: BTreeMap<String, f32>) -> Result<Self> {
        Self::from_pairs(map)
    }
}

impl From<GeneticCode> for BTreeMap<String, f32> {
    fn from(code: GeneticCode) -> Self {
        code.iter()
            .map(|(t, value)| (t.name().to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(bias: f32, fertility: f32, metabolism: f32) -> Vec<(&'static str, f32)> {
        vec![
            ("movement_bias", bias),
            ("fertility", fertility),
            ("metabolism", metabolism),
        ]
    }

    #[test]
    fn test_from_pairs() {
        let code = GeneticCode::from_pairs(pairs(0.2, 0.4, 2.0)).unwrap();
        assert_eq!(code.movement_bias(), 0.2);
        assert_eq!(code.fertility(), 0.4);
        assert_eq!(code.metabolism(), 2.0);
    }

    #[test]
    fn test_get_by_name() {
        let code = GeneticCode::default();
        assert_eq!(code.get("fertility").unwrap(), Trait::Fertility.default_value());
        assert_eq!(
            code.get("wingspan"),
            Err(Error::UnknownTrait("wingspan".to_string()))
        );
    }

    #[test]
    fn test_unknown_trait_rejected() {
        let mut input = pairs(0.2, 0.4, 2.0);
        input.push(("photosynthesis", 0.5));
        assert_eq!(
            GeneticCode::from_pairs(input),
            Err(Error::UnknownTrait("photosynthesis".to_string()))
        );
    }

    #[test]
    fn test_missing_trait_rejected() {
        let input = vec![("movement_bias", 0.2), ("fertility", 0.4)];
        assert!(matches!(
            GeneticCode::from_pairs(input),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_duplicate_trait_rejected() {
        let mut input = pairs(0.2, 0.4, 2.0);
        input.push(("fertility", 0.1));
        assert!(GeneticCode::from_pairs(input).is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(GeneticCode::from_pairs(pairs(1.5, 0.4, 2.0)).is_err());
        assert!(GeneticCode::from_pairs(pairs(0.5, 0.4, 0.0)).is_err());
        assert!(GeneticCode::from_pairs(pairs(f32::NAN, 0.4, 2.0)).is_err());
    }

    #[test]
    fn test_from_clamped() {
        let code = GeneticCode::from_clamped([-1.0, 2.0, 50.0]);
        assert_eq!(code.movement_bias(), 0.0);
        assert_eq!(code.fertility(), 1.0);
        assert_eq!(code.metabolism(), 10.0);
    }

    #[test]
    fn test_serializes_as_map() {
        let code = GeneticCode::from_pairs(pairs(0.25, 0.5, 1.0)).unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(
            json,
            r#"{"fertility":0.5,"metabolism":1.0,"movement_bias":0.25}"#
        );

        let back: GeneticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }

    #[test]
    fn test_deserialize_rejects_unknown() {
        let json = r#"{"fertility":0.5,"metabolism":1.0,"movement_bias":0.25,"gills":1.0}"#;
        assert!(serde_json::from_str::<GeneticCode>(json).is_err());
    }
}
