//! Entities that occupy field cells and the actions they propose.

use eco_core::{Coordinate, EcosystemConfig, EntityKind};
use eco_genetics::GeneticCode;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Outcome an entity proposes for the current tick
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Stay,
    MoveTo(Coordinate),
    Reproduce {
        target: Coordinate,
        /// Code for an organism child; plants spread without one
        genes: Option<GeneticCode>,
    },
    Die,
}

impl Action {
    /// Cell this action claims, if any
    pub fn target(&self) -> Option<Coordinate> {
        match self {
            Action::MoveTo(target) | Action::Reproduce { target, .. } => Some(*target),
            Action::Stay | Action::Die => None,
        }
    }
}

/// Read-only inputs to `Entity::step`.
///
/// The neighbourhood comes from the tick snapshot, never the live field.
pub struct StepContext<'a> {
    pub neighborhood: &'a [(Coordinate, EntityKind)],
    pub config: &'a EcosystemConfig,
    pub rng: &'a mut ChaCha8Rng,
}

impl StepContext<'_> {
    fn free_cells(&self) -> Vec<Coordinate> {
        self.neighborhood
            .iter()
            .filter(|(_, kind)| *kind == EntityKind::Void)
            .map(|(coord, _)| *coord)
            .collect()
    }

    fn pick(&mut self, cells: &[Coordinate]) -> Option<Coordinate> {
        if cells.is_empty() {
            None
        } else {
            Some(cells[self.rng.gen_range(0..cells.len())])
        }
    }
}

/// Mobile entity carrying a genetic code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub genes: GeneticCode,
    pub energy: f32,
    pub age: u64,
}

impl Organism {
    pub fn new(genes: GeneticCode, energy: f32) -> Self {
        Self {
            genes,
            energy,
            age: 0,
        }
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Action {
        let config = ctx.config;
        let rules = &config.organism;
        if self.energy <= 0.0 || self.age >= rules.max_age {
            return Action::Die;
        }

        let free = ctx.free_cells();
        if free.is_empty() {
            return Action::Stay;
        }

        if self.age >= rules.maturity_age && self.energy >= rules.reproduce_energy {
            if ctx.rng.gen::<f32>() < self.genes.fertility() {
                if let Some(target) = ctx.pick(&free) {
                    let genes = GeneticCode::derive_from(&self.genes, &config.mutation, ctx.rng);
                    return Action::Reproduce {
                        target,
                        genes: Some(genes),
                    };
                }
            }
        }

        if ctx.rng.gen::<f32>() < self.genes.movement_bias() {
            if let Some(target) = ctx.pick(&free) {
                return Action::MoveTo(target);
            }
        }

        Action::Stay
    }

    fn advance(&mut self) {
        self.age += 1;
        self.energy -= self.genes.metabolism();
    }

    /// Split energy with a newborn carrying `genes`
    fn bud(&mut self, genes: GeneticCode) -> Organism {
        let share = self.energy / 2.0;
        self.energy -= share;
        Organism::new(genes, share)
    }
}

/// Stationary entity that spreads into free neighbouring cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub maturity: u64,
}

impl Plant {
    fn step(&self, ctx: &mut StepContext<'_>) -> Action {
        if self.maturity < ctx.config.plant.maturity_threshold || ctx.neighborhood.is_empty() {
            return Action::Stay;
        }

        let index = ctx.rng.gen_range(0..ctx.neighborhood.len());
        let (target, kind) = ctx.neighborhood[index];
        if kind == EntityKind::Void {
            Action::Reproduce {
                target,
                genes: None,
            }
        } else {
            Action::Stay
        }
    }
}

/// Kind-specific payload of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Void,
    Obstacle,
    Plant(Plant),
    Organism(Organism),
}

/// Anything that fills a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    position: Coordinate,
    alive: bool,
    body: Body,
}

impl Entity {
    pub fn new(body: Body) -> Self {
        let alive = matches!(body, Body::Plant(_) | Body::Organism(_));
        Self {
            position: Coordinate::new(0, 0),
            alive,
            body,
        }
    }

    pub fn void() -> Self {
        Self::new(Body::Void)
    }

    pub fn obstacle() -> Self {
        Self::new(Body::Obstacle)
    }

    pub fn plant() -> Self {
        Self::new(Body::Plant(Plant::default()))
    }

    pub fn organism(genes: GeneticCode, energy: f32) -> Self {
        Self::new(Body::Organism(Organism::new(genes, energy)))
    }

    pub fn kind(&self) -> EntityKind {
        match self.body {
            Body::Void => EntityKind::Void,
            Body::Obstacle => EntityKind::Obstacle,
            Body::Plant(_) => EntityKind::Plant,
            Body::Organism(_) => EntityKind::Organism,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether this entity blocks its cell from being claimed
    pub fn is_occupying(&self) -> bool {
        match self.body {
            Body::Void => false,
            Body::Obstacle => true,
            Body::Plant(_) | Body::Organism(_) => self.alive,
        }
    }

    pub fn as_organism(&self) -> Option<&Organism> {
        match &self.body {
            Body::Organism(organism) => Some(organism),
            _ => None,
        }
    }

    pub fn as_plant(&self) -> Option<&Plant> {
        match &self.body {
            Body::Plant(plant) => Some(plant),
            _ => None,
        }
    }

    pub fn genes(&self) -> Option<&GeneticCode> {
        self.as_organism().map(|o| &o.genes)
    }

    /// Propose this tick's action. Pure with respect to the field: all
    /// state changes happen when the ecosystem commits the action.
    pub fn step(&self, ctx: &mut StepContext<'_>) -> Action {
        if !self.alive {
            return Action::Stay;
        }
        match &self.body {
            Body::Void | Body::Obstacle => Action::Stay,
            Body::Plant(plant) => plant.step(ctx),
            Body::Organism(organism) => organism.step(ctx),
        }
    }

    /// Age one tick: organisms grow older and pay metabolism, plants mature
    pub(crate) fn advance(&mut self) {
        match &mut self.body {
            Body::Organism(organism) => organism.advance(),
            Body::Plant(plant) => plant.maturity += 1,
            Body::Void | Body::Obstacle => {}
        }
    }

    /// Produce a child of the same kind. Organism children take `genes`
    /// (or a copy of the parent's when none is given) and half the parent's
    /// energy. Inert entities have no offspring.
    pub(crate) fn spawn_offspring(&mut self, genes: Option<GeneticCode>) -> Option<Entity> {
        match &mut self.body {
            Body::Organism(organism) => {
                let genes = genes.unwrap_or_else(|| organism.genes.clone());
                Some(Entity::new(Body::Organism(organism.bud(genes))))
            }
            Body::Plant(_) => Some(Entity::plant()),
            Body::Void | Body::Obstacle => None,
        }
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::void()
    }
}
