//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Initial population of a freshly built field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Obstacle density (0.0 to 1.0)
    pub obstacle_density: f32,
    /// Plant density (0.0 to 1.0)
    pub plant_density: f32,
    /// Organism density (0.0 to 1.0)
    pub organism_density: f32,
    /// Grow every obstacle seed into a block covering its Moore neighbourhood
    pub obstacle_clustering: bool,
}

impl LayoutConfig {
    /// A layout that leaves every cell void
    pub fn empty() -> Self {
        Self {
            obstacle_density: 0.0,
            plant_density: 0.0,
            organism_density: 0.0,
            obstacle_clustering: false,
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("obstacle_density", self.obstacle_density),
            ("plant_density", self.plant_density),
            ("organism_density", self.organism_density),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        let total = self.obstacle_density + self.plant_density + self.organism_density;
        if total > 1.0 {
            return Err(Error::InvalidConfiguration(format!(
                "layout densities sum to {}, which exceeds 1",
                total
            )));
        }

        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            obstacle_density: 0.05,
            plant_density: 0.15,
            organism_density: 0.05,
            obstacle_clustering: false,
        }
    }
}

/// Organism life-cycle parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganismConfig {
    /// Starting energy for founder organisms
    pub initial_energy: f32,
    /// Minimum age before an organism may reproduce
    pub maturity_age: u64,
    /// Age at which an organism dies
    pub max_age: u64,
    /// Minimum energy required to reproduce
    pub reproduce_energy: f32,
    /// Trait values carried by founder organisms, keyed by trait name
    pub founder_traits: BTreeMap<String, f32>,
}

impl OrganismConfig {
    fn validate(&self) -> Result<()> {
        if !(self.initial_energy > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "initial_energy must be positive, got {}",
                self.initial_energy
            )));
        }
        if self.max_age == 0 {
            return Err(Error::InvalidConfiguration(
                "max_age must be positive".to_string(),
            ));
        }
        if !(self.reproduce_energy >= 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "reproduce_energy must be non-negative, got {}",
                self.reproduce_energy
            )));
        }
        Ok(())
    }
}

impl Default for OrganismConfig {
    fn default() -> Self {
        let founder_traits = [
            ("movement_bias".to_string(), 0.5),
            ("fertility".to_string(), 0.3),
            ("metabolism".to_string(), 1.0),
        ]
        .into_iter()
        .collect();

        Self {
            initial_energy: 40.0,
            maturity_age: 5,
            max_age: 60,
            reproduce_energy: 20.0,
            founder_traits,
        }
    }
}

/// Plant growth parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Ticks a plant must live before it first spreads
    pub maturity_threshold: u64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            maturity_threshold: 8,
        }
    }
}

/// Mutation applied when an organism passes its genetic code on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Probability that any single trait is perturbed (0.0 to 1.0)
    pub mutation_rate: f32,
    /// Largest perturbation, as a fraction of the trait's valid range (0.0 to 1.0)
    pub max_delta: f32,
}

impl MutationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::InvalidConfiguration(format!(
                "mutation_rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.max_delta) {
            return Err(Error::InvalidConfiguration(format!(
                "max_delta must be within [0, 1], got {}",
                self.max_delta
            )));
        }
        Ok(())
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.5,
            max_delta: 0.1,
        }
    }
}

/// Ecosystem configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemConfig {
    /// Number of rows in the field
    pub height: usize,
    /// Number of columns in the field
    pub width: usize,
    /// Ticks processed per unit passed to `simulate`
    pub speed: u32,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Initial population
    pub layout: LayoutConfig,
    pub organism: OrganismConfig,
    pub plant: PlantConfig,
    pub mutation: MutationConfig,
    /// Ticks between population metric events (0 disables them)
    pub metrics_interval: u64,
}

impl EcosystemConfig {
    /// Config for a `height` x `width` field with no initial population
    pub fn empty(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            layout: LayoutConfig::empty(),
            ..Default::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on values that would make the simulation meaningless
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.height, self.width)?;
        if self.speed == 0 {
            return Err(Error::InvalidConfiguration(
                "speed must be positive".to_string(),
            ));
        }
        self.layout.validate()?;
        self.organism.validate()?;
        self.mutation.validate()?;
        Ok(())
    }
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            height: 10,
            width: 12,
            speed: 1,
            seed: 0,
            layout: LayoutConfig::default(),
            organism: OrganismConfig::default(),
            plant: PlantConfig::default(),
            mutation: MutationConfig::default(),
            metrics_interval: 100,
        }
    }
}

/// Both dimensions of a field must be positive
pub fn validate_dimensions(height: usize, width: usize) -> Result<()> {
    if height == 0 || width == 0 {
        return Err(Error::InvalidConfiguration(format!(
            "field dimensions must be positive, got {}x{}",
            height, width
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = EcosystemConfig::default();
        assert_eq!(config.height, 10);
        assert_eq!(config.width, 12);
        assert_eq!(config.speed, 1);
        assert!(config.validate().is_ok());

        assert_eq!(config.organism.founder_traits.len(), 3);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = EcosystemConfig::empty(0, 5);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        let config = EcosystemConfig::empty(5, 0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_speed_rejected() {
        let config = EcosystemConfig {
            speed: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_overfull_layout_rejected() {
        let config = EcosystemConfig {
            layout: LayoutConfig {
                obstacle_density: 0.5,
                plant_density: 0.4,
                organism_density: 0.2,
                ..LayoutConfig::empty()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mutation_bounds() {
        let mutation = MutationConfig {
            mutation_rate: 1.5,
            max_delta: 0.1,
        };
        assert!(mutation.validate().is_err());

        let mutation = MutationConfig {
            mutation_rate: 1.0,
            max_delta: -0.1,
        };
        assert!(mutation.validate().is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = EcosystemConfig::from_json(r#"{"height": 3, "width": 4, "seed": 7}"#).unwrap();
        assert_eq!(config.height, 3);
        assert_eq!(config.width, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.speed, 1);
        assert_eq!(config.plant.maturity_threshold, 8);
        assert!(!config.layout.obstacle_clustering);
    }

    #[test]
    fn test_from_json_validates() {
        let result = EcosystemConfig::from_json(r#"{"height": 0, "width": 4}"#);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));

        let result = EcosystemConfig::from_json("{ not json");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = EcosystemConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EcosystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.seed, deserialized.seed);
        assert_eq!(
            config.organism.founder_traits,
            deserialized.organism.founder_traits
        );
    }
}
