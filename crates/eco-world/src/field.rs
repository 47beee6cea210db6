//! 2D bounded grid of entity slots.

use crate::entity::Entity;
use eco_core::{validate_dimensions, Coordinate, EcosystemConfig, EntityKind, Error, Result};
use eco_genetics::GeneticCode;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Rectangular arena of cells. Every cell holds exactly one entity (void
/// when unoccupied) and that entity's position always matches its cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    height: usize,
    width: usize,
    cells: Vec<Entity>,
}

impl Field {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        validate_dimensions(height, width)?;
        let mut field = Self {
            height,
            width,
            cells: Vec::with_capacity(height * width),
        };
        field.reset();
        Ok(field)
    }

    /// Create a randomly populated field from configuration.
    ///
    /// Each cell rolls once against the cumulative layout densities in the
    /// order obstacle, plant, organism; founders carry `founder` genes.
    /// With `obstacle_clustering` every obstacle seed then also claims its
    /// in-bounds Moore neighbourhood, displacing whatever rolled there.
    pub fn from_config(
        config: &EcosystemConfig,
        founder: &GeneticCode,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        let mut field = Self::new(config.height, config.width)?;
        let layout = &config.layout;

        for index in 0..field.cells.len() {
            let coord = field.index_to_coord(index);
            let roll = rng.gen::<f32>();

            let entity = if roll < layout.obstacle_density {
                Entity::obstacle()
            } else if roll < layout.obstacle_density + layout.plant_density {
                Entity::plant()
            } else if roll
                < layout.obstacle_density + layout.plant_density + layout.organism_density
            {
                Entity::organism(founder.clone(), config.organism.initial_energy)
            } else {
                continue;
            };
            field.set(coord, entity)?;
        }

        if layout.obstacle_clustering {
            let seeds: Vec<Coordinate> = field
                .iter()
                .filter(|(_, entity)| entity.kind() == EntityKind::Obstacle)
                .map(|(coord, _)| coord)
                .collect();

            for seed in &seeds {
                let block: Vec<Coordinate> = field
                    .neighbors(*seed, 1)?
                    .into_iter()
                    .map(|(coord, _)| coord)
                    .collect();
                for coord in block {
                    field.set(coord, Entity::obstacle())?;
                }
            }
            debug!(seeds = seeds.len(), "Clustered obstacle layout");
        }

        Ok(field)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.in_bounds(self.height, self.width)
    }

    /// Entity at `coord`
    pub fn get(&self, coord: Coordinate) -> Result<&Entity> {
        let index = self.coord_to_index(coord)?;
        Ok(&self.cells[index])
    }

    pub(crate) fn get_mut(&mut self, coord: Coordinate) -> Result<&mut Entity> {
        let index = self.coord_to_index(coord)?;
        Ok(&mut self.cells[index])
    }

    /// Place `entity` at `coord`, overwriting the previous occupant
    pub fn set(&mut self, coord: Coordinate, mut entity: Entity) -> Result<()> {
        let index = self.coord_to_index(coord)?;
        entity.set_position(coord);
        self.cells[index] = entity;
        Ok(())
    }

    /// Remove the entity at `coord`, leaving void behind
    pub fn take(&mut self, coord: Coordinate) -> Result<Entity> {
        let index = self.coord_to_index(coord)?;
        let mut void = Entity::void();
        void.set_position(coord);
        Ok(std::mem::replace(&mut self.cells[index], void))
    }

    /// In-bounds cells within Chebyshev `radius` of `coord`, excluding
    /// `coord` itself, in row-major order. No wraparound at the edges.
    pub fn neighbors(
        &self,
        coord: Coordinate,
        radius: u32,
    ) -> Result<Vec<(Coordinate, &Entity)>> {
        self.coord_to_index(coord)?;

        // Clip the square to the grid before scanning it
        let radius = i64::from(radius);
        let row_min = (i64::from(coord.row) - radius).max(0) as i32;
        let row_max = (i64::from(coord.row) + radius).min(self.height as i64 - 1) as i32;
        let col_min = (i64::from(coord.col) - radius).max(0) as i32;
        let col_max = (i64::from(coord.col) + radius).min(self.width as i64 - 1) as i32;

        let mut neighbors = Vec::new();
        for row in row_min..=row_max {
            for col in col_min..=col_max {
                let neighbor = Coordinate::new(row, col);
                if neighbor == coord {
                    continue;
                }
                let index = row as usize * self.width + col as usize;
                neighbors.push((neighbor, &self.cells[index]));
            }
        }

        Ok(neighbors)
    }

    /// All occupying entities in row-major order
    pub fn entities(&self) -> Vec<(Coordinate, &Entity)> {
        self.iter()
            .filter(|(_, entity)| entity.is_occupying())
            .collect()
    }

    /// Iterator over every cell in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &Entity)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, entity)| (self.index_to_coord(i), entity))
    }

    /// Fill every cell with fresh void
    pub fn reset(&mut self) {
        let width = self.width;
        let size = self.height * width;
        self.cells.clear();
        self.cells.extend((0..size).map(|i| {
            let mut void = Entity::void();
            void.set_position(Coordinate::new((i / width) as i32, (i % width) as i32));
            void
        }));
    }

    fn coord_to_index(&self, coord: Coordinate) -> Result<usize> {
        if !self.contains(coord) {
            return Err(Error::OutOfBounds {
                row: coord.row,
                col: coord.col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(coord.row as usize * self.width + coord.col as usize)
    }

    fn index_to_coord(&self, index: usize) -> Coordinate {
        Coordinate::new((index / self.width) as i32, (index % self.width) as i32)
    }
}
