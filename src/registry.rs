//! Ordered list of the available animations.
//!
//! The first entry is the default. Ids are stable: the page shell stores them
//! as UI state and passes them back when switching.

use serde::Serialize;

use crate::compute::{
    CellularAutomaton, FieldSimulation, FlockSimulation, SimRng, Simulation,
};
use crate::schema::BackdropConfig;

/// Builds a simulation for a surface of the given size.
pub type InitFn = fn(f32, f32, &BackdropConfig, SimRng) -> Box<dyn Simulation>;

/// One selectable animation.
pub struct RegistryEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    constructor: InitFn,
}

impl RegistryEntry {
    /// Construct the simulation with dimensions baked in.
    pub fn init(
        &self,
        width: f32,
        height: f32,
        config: &BackdropConfig,
        rng: SimRng,
    ) -> Box<dyn Simulation> {
        (self.constructor)(width, height, config, rng)
    }

    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id,
            name: self.display_name,
        }
    }
}

/// Serializable view of an entry for UI listings.
#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub id: &'static str,
    pub name: &'static str,
}

fn init_field(w: f32, h: f32, config: &BackdropConfig, rng: SimRng) -> Box<dyn Simulation> {
    Box::new(FieldSimulation::new(w, h, &config.field, rng))
}

fn init_flock(w: f32, h: f32, config: &BackdropConfig, rng: SimRng) -> Box<dyn Simulation> {
    Box::new(FlockSimulation::new(w, h, &config.flock, rng))
}

fn init_automaton(w: f32, h: f32, config: &BackdropConfig, rng: SimRng) -> Box<dyn Simulation> {
    Box::new(CellularAutomaton::new(w, h, &config.automaton, rng))
}

static REGISTRY: [RegistryEntry; 3] = [
    RegistryEntry {
        id: "magneticFields",
        display_name: "Magnetic",
        constructor: init_field,
    },
    RegistryEntry {
        id: "flockingBoids",
        display_name: "Flocking",
        constructor: init_flock,
    },
    RegistryEntry {
        id: "conwaysGameOfLife",
        display_name: "Life",
        constructor: init_automaton,
    },
];

/// All entries in display order.
pub fn entries() -> &'static [RegistryEntry] {
    &REGISTRY
}

pub fn default_entry() -> &'static RegistryEntry {
    &REGISTRY[0]
}

/// Entry with the given id, if registered.
pub fn find(id: &str) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|entry| entry.id == id)
}

/// Entry with the given id, falling back to the default.
pub fn lookup(id: &str) -> &'static RegistryEntry {
    find(id).unwrap_or_else(|| {
        log::warn!(
            "unknown animation {id:?}, falling back to {:?}",
            default_entry().id
        );
        default_entry()
    })
}

pub fn summaries() -> Vec<EntrySummary> {
    REGISTRY.iter().map(RegistryEntry::summary).collect()
}
