//! Tick orchestration for a whole ecosystem.
//!
//! Every tick runs four phases:
//!
//! 1. **Snapshot** – clone the field so all decisions read the same state.
//! 2. **Decide** – ask each occupying entity, in row-major order, for an
//!    [`Action`] against the snapshot neighbourhood.
//! 3. **Resolve** – walk the proposals in the same order; the first to claim
//!    a cell wins it and later claims on that cell become `Stay`. Deaths
//!    never conflict.
//! 4. **Commit** – apply the resolved actions to the live field.
//!
//! Decide only reads the snapshot, so it could run in parallel as long as
//! proposals are collected back into row-major order. Randomness is drawn
//! from the single seeded generator owned by the ecosystem, in that same
//! order, which keeps runs reproducible.

use crate::entity::{Action, Entity, StepContext};
use crate::field::Field;
use crate::state::{Census, FieldState};
use eco_core::{Coordinate, EcosystemConfig, EntityKind, Error, Result};
use eco_genetics::GeneticCode;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, event, info, instrument, trace, warn, Level};

/// Summary of what happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub moves: usize,
    pub births: usize,
    pub deaths: usize,
    /// Proposals downgraded to `Stay` because their target was taken
    pub conflicts: usize,
}

pub struct Ecosystem {
    field: Field,
    config: EcosystemConfig,
    founder: GeneticCode,
    rng: ChaCha8Rng,
    tick: u64,
    total_births: u64,
    total_deaths: u64,
}

impl Ecosystem {
    /// Build an ecosystem, populating the field from the layout densities
    pub fn new(config: EcosystemConfig) -> Result<Self> {
        config.validate()?;
        let founder = GeneticCode::from_pairs(
            config
                .organism
                .founder_traits
                .iter()
                .map(|(name, value)| (name.as_str(), *value)),
        )?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let field = Field::from_config(&config, &founder, &mut rng)?;

        info!(
            height = config.height,
            width = config.width,
            speed = config.speed,
            seed = config.seed,
            "Ecosystem created"
        );

        Ok(Self {
            field,
            config,
            founder,
            rng,
            tick: 0,
            total_births: 0,
            total_deaths: 0,
        })
    }

    /// Place an entity directly, e.g. to build an initial layout by hand
    pub fn place(&mut self, coord: Coordinate, entity: Entity) -> Result<()> {
        self.field.set(coord, entity)
    }

    /// Place a founder organism carrying the configured founder traits
    pub fn place_founder(&mut self, coord: Coordinate) -> Result<()> {
        let organism = Entity::organism(self.founder.clone(), self.config.organism.initial_energy);
        self.field.set(coord, organism)
    }

    /// Clear the field back to all void
    pub fn reset(&mut self) {
        self.field.reset();
    }

    /// Advance `steps` units of `speed` ticks each
    #[instrument(skip(self), fields(speed = self.config.speed, start_tick = self.tick))]
    pub fn simulate(&mut self, steps: u64) -> Result<()> {
        let ticks = steps.checked_mul(u64::from(self.config.speed)).ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "{} steps at speed {} overflows the tick counter",
                steps, self.config.speed
            ))
        })?;
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    /// Run one full snapshot/decide/resolve/commit cycle
    pub fn tick(&mut self) -> Result<TickReport> {
        let snapshot = self.field.clone();
        let proposals = self.decide(&snapshot)?;
        let (resolved, conflicts) = resolve(&snapshot, proposals);

        let mut report = self.commit(resolved)?;
        report.conflicts = conflicts;

        self.tick += 1;
        report.tick = self.tick;
        self.total_births += report.births as u64;
        self.total_deaths += report.deaths as u64;

        debug!(
            tick = report.tick,
            moves = report.moves,
            births = report.births,
            deaths = report.deaths,
            conflicts = report.conflicts,
            "Tick complete"
        );

        let interval = self.config.metrics_interval;
        if interval > 0 && self.tick % interval == 0 {
            self.emit_population_metrics();
        }

        Ok(report)
    }

    fn decide(&mut self, snapshot: &Field) -> Result<Vec<(Coordinate, Action)>> {
        let mut proposals = Vec::new();

        for (coord, entity) in snapshot.entities() {
            if !entity.kind().is_active() {
                continue;
            }

            let neighborhood: Vec<(Coordinate, EntityKind)> = snapshot
                .neighbors(coord, 1)?
                .into_iter()
                .map(|(c, e)| (c, e.kind()))
                .collect();

            let mut ctx = StepContext {
                neighborhood: &neighborhood,
                config: &self.config,
                rng: &mut self.rng,
            };
            let action = entity.step(&mut ctx);
            proposals.push((coord, action));
        }

        Ok(proposals)
    }

    fn commit(&mut self, resolved: Vec<(Coordinate, Action)>) -> Result<TickReport> {
        let mut report = TickReport::default();

        for (source, action) in resolved {
            match action {
                Action::Stay => self.field.get_mut(source)?.advance(),
                Action::MoveTo(target) => {
                    let mut entity = self.field.take(source)?;
                    entity.advance();
                    self.field.set(target, entity)?;
                    report.moves += 1;
                }
                Action::Reproduce { target, genes } => {
                    let parent = self.field.get_mut(source)?;
                    parent.advance();
                    match parent.spawn_offspring(genes) {
                        Some(child) => {
                            trace!(
                                event = "birth",
                                tick = self.tick,
                                kind = %child.kind(),
                                parent_row = source.row,
                                parent_col = source.col,
                                row = target.row,
                                col = target.col,
                                "Entity reproduced"
                            );
                            self.field.set(target, child)?;
                            report.births += 1;
                        }
                        None => warn!(
                            kind = %parent.kind(),
                            row = source.row,
                            col = source.col,
                            "Entity without offspring proposed reproduction"
                        ),
                    }
                }
                Action::Die => {
                    let mut entity = self.field.take(source)?;
                    entity.kill();
                    trace!(
                        event = "death",
                        tick = self.tick,
                        kind = %entity.kind(),
                        row = source.row,
                        col = source.col,
                        age = entity.as_organism().map(|o| o.age),
                        "Entity died"
                    );
                    report.deaths += 1;
                }
            }
        }

        Ok(report)
    }

    fn emit_population_metrics(&self) {
        let census = self.census();

        info!(
            event = "population_metrics",
            tick = self.tick,
            plants = census.plants,
            organisms = census.organisms,
            obstacles = census.obstacles,
            avg_energy = census.mean_energy,
            avg_age = census.mean_age,
            total_births = self.total_births,
            total_deaths = self.total_deaths,
            "Population metrics snapshot"
        );

        event!(
            Level::INFO,
            gauge_name = "population_organisms",
            gauge_value = census.organisms,
            tick = self.tick,
            "Organism population gauge"
        );
    }

    /// Read-only copy of the grid; does not advance time
    pub fn get_state(&self) -> FieldState {
        FieldState::capture(&self.field, self.tick)
    }

    pub fn census(&self) -> Census {
        Census::take(&self.field, self.tick)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn config(&self) -> &EcosystemConfig {
        &self.config
    }

    pub fn founder_genes(&self) -> &GeneticCode {
        &self.founder
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn speed(&self) -> u32 {
        self.config.speed
    }

    pub fn total_births(&self) -> u64 {
        self.total_births
    }

    pub fn total_deaths(&self) -> u64 {
        self.total_deaths
    }
}

/// First claim on a cell wins. Claims on cells that were not void in the
/// snapshot are dropped as well, so commit never overwrites an occupant.
fn resolve(
    snapshot: &Field,
    proposals: Vec<(Coordinate, Action)>,
) -> (Vec<(Coordinate, Action)>, usize) {
    let mut claimed = HashSet::new();
    let mut conflicts = 0;

    let resolved = proposals
        .into_iter()
        .map(|(source, action)| {
            let Some(target) = action.target() else {
                return (source, action);
            };

            let free = snapshot
                .get(target)
                .map(|entity| entity.kind() == EntityKind::Void)
                .unwrap_or(false);

            if free && claimed.insert(target) {
                (source, action)
            } else {
                conflicts += 1;
                trace!(
                    row = source.row,
                    col = source.col,
                    target_row = target.row,
                    target_col = target.col,
                    "Claim lost, staying put"
                );
                (source, Action::Stay)
            }
        })
        .collect();

    (resolved, conflicts)
}
