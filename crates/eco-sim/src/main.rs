//! Headless harness: build an ecosystem, run it, print the result.
//!
//! `ECO_CONFIG` names a JSON configuration file (defaults are used when
//! unset) and `ECO_STEPS` the number of `simulate` units to run.

mod telemetry;

use anyhow::Result;
use eco_core::{Coordinate, EcosystemConfig};
use eco_world::{Ecosystem, Field, Heuristic};
use tracing::info;

const DEFAULT_STEPS: u64 = 50;

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = load_config()?;
    let steps = match std::env::var("ECO_STEPS") {
        Ok(value) => value.parse()?,
        Err(_) => DEFAULT_STEPS,
    };

    let mut ecosystem = Ecosystem::new(config)?;
    println!("{}", ecosystem.get_state());

    ecosystem.simulate(steps)?;

    let census = ecosystem.census();
    info!(
        ticks = ecosystem.tick_count(),
        plants = census.plants,
        organisms = census.organisms,
        births = ecosystem.total_births(),
        deaths = ecosystem.total_deaths(),
        "Run finished"
    );

    println!("{}", ecosystem.get_state());
    println!("{}", summarize(&census));
    println!("{}", describe_route(ecosystem.field())?);

    Ok(())
}

fn load_config() -> Result<EcosystemConfig> {
    match std::env::var("ECO_CONFIG") {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            let json = std::fs::read_to_string(&path)?;
            Ok(EcosystemConfig::from_json(&json)?)
        }
        Err(_) => Ok(EcosystemConfig::default()),
    }
}

/// Route between the free cells nearest two opposite corners
fn describe_route(field: &Field) -> Result<String> {
    let corner = Coordinate::new(field.height() as i32 - 1, field.width() as i32 - 1);
    let from = field.find_free_near(Coordinate::new(0, 0))?;
    let to = field.find_free_near(corner)?;

    let (Some(from), Some(to)) = (from, to) else {
        return Ok("route: field is full".to_string());
    };
    Ok(match field.find_path(from, to, Heuristic::Diagonal)? {
        Some(path) => format!("route {} -> {}: {} moves", from, to, path.len()),
        None => format!("route {} -> {}: unreachable", from, to),
    })
}

fn summarize(census: &eco_world::Census) -> String {
    let traits: Vec<String> = census
        .mean_traits
        .iter()
        .map(|(name, value)| format!("{}={:.3}", name, value))
        .collect();

    format!(
        "tick {}: {} plants, {} organisms, {} obstacles, mean energy {:.1} [{}]",
        census.tick,
        census.plants,
        census.organisms,
        census.obstacles,
        census.mean_energy,
        traits.join(", ")
    )
}
