//! Read-only views of the field for renderers and reporting.

use crate::field::Field;
use eco_core::{Coordinate, EntityKind};
use eco_genetics::Trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What a renderer needs to know about one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellState {
    pub coordinate: Coordinate,
    pub kind: EntityKind,
    pub is_alive: bool,
}

/// Owned copy of the grid at one tick. Mutating it has no effect on the
/// ecosystem it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    pub tick: u64,
    pub height: usize,
    pub width: usize,
    cells: Vec<CellState>,
}

impl FieldState {
    pub fn capture(field: &Field, tick: u64) -> Self {
        let cells = field
            .iter()
            .map(|(coordinate, entity)| CellState {
                coordinate,
                kind: entity.kind(),
                is_alive: entity.is_alive(),
            })
            .collect();

        Self {
            tick,
            height: field.height(),
            width: field.width(),
            cells,
        }
    }

    pub fn get(&self, coord: Coordinate) -> Option<&CellState> {
        if !coord.in_bounds(self.height, self.width) {
            return None;
        }
        self.cells
            .get(coord.row as usize * self.width + coord.col as usize)
    }

    pub fn kind_at(&self, coord: Coordinate) -> Option<EntityKind> {
        self.get(coord).map(|cell| cell.kind)
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> + '_ {
        self.cells.chunks(self.width)
    }
}

impl fmt::Display for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|cell| cell.kind.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Population summary of a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    pub tick: u64,
    pub voids: usize,
    pub obstacles: usize,
    pub plants: usize,
    pub organisms: usize,
    pub mean_energy: f32,
    pub mean_age: f32,
    /// Mean value of each trait across living organisms
    pub mean_traits: BTreeMap<String, f32>,
}

impl Census {
    pub fn take(field: &Field, tick: u64) -> Self {
        let mut census = Census {
            tick,
            ..Default::default()
        };
        let mut trait_sums = [0.0f32; Trait::COUNT];

        for (_, entity) in field.iter() {
            match entity.kind() {
                EntityKind::Void => census.voids += 1,
                EntityKind::Obstacle => census.obstacles += 1,
                EntityKind::Plant => census.plants += 1,
                EntityKind::Organism => census.organisms += 1,
            }

            if let Some(organism) = entity.as_organism() {
                census.mean_energy += organism.energy;
                census.mean_age += organism.age as f32;
                for (sum, (_, value)) in trait_sums.iter_mut().zip(organism.genes.iter()) {
                    *sum += value;
                }
            }
        }

        if census.organisms > 0 {
            let n = census.organisms as f32;
            census.mean_energy /= n;
            census.mean_age /= n;
            census.mean_traits = Trait::all()
                .into_iter()
                .zip(trait_sums)
                .map(|(t, sum)| (t.name().to_string(), sum / n))
                .collect();
        }

        census
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Void => self.voids,
            EntityKind::Obstacle => self.obstacles,
            EntityKind::Plant => self.plants,
            EntityKind::Organism => self.organisms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use eco_genetics::GeneticCode;

    fn sample_field() -> Field {
        let mut field = Field::new(2, 3).unwrap();
        field.set(Coordinate::new(0, 0), Entity::obstacle()).unwrap();
        field.set(Coordinate::new(0, 2), Entity::plant()).unwrap();
        field
            .set(
                Coordinate::new(1, 1),
                Entity::organism(GeneticCode::default(), 8.0),
            )
            .unwrap();
        field
            .set(
                Coordinate::new(1, 2),
                Entity::organism(GeneticCode::default(), 4.0),
            )
            .unwrap();
        field
    }

    #[test]
    fn test_capture() {
        let state = FieldState::capture(&sample_field(), 3);
        assert_eq!(state.tick, 3);
        assert_eq!(state.cells().len(), 6);
        assert_eq!(state.kind_at(Coordinate::new(0, 0)), Some(EntityKind::Obstacle));
        assert_eq!(state.kind_at(Coordinate::new(1, 0)), Some(EntityKind::Void));
        assert_eq!(state.kind_at(Coordinate::new(2, 0)), None);

        let organism = state.get(Coordinate::new(1, 1)).unwrap();
        assert!(organism.is_alive);
        assert!(!state.get(Coordinate::new(0, 0)).unwrap().is_alive);
    }

    #[test]
    fn test_render() {
        let state = FieldState::capture(&sample_field(), 0);
        assert_eq!(state.to_string(), "#.*\n.oo\n");
    }

    #[test]
    fn test_census_counts() {
        let census = Census::take(&sample_field(), 0);
        assert_eq!(census.voids, 2);
        assert_eq!(census.obstacles, 1);
        assert_eq!(census.plants, 1);
        assert_eq!(census.organisms, 2);
        assert_eq!(census.count(EntityKind::Organism), 2);
        assert_eq!(census.mean_energy, 6.0);
        assert_eq!(
            census.mean_traits.get("fertility").copied(),
            Some(GeneticCode::default().fertility())
        );
    }

    #[test]
    fn test_census_of_empty_field() {
        let census = Census::take(&Field::new(3, 3).unwrap(), 0);
        assert_eq!(census.voids, 9);
        assert!(census.mean_traits.is_empty());
        assert_eq!(census.mean_energy, 0.0);
    }
}
