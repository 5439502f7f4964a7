//! Configuration types for the backdrop animations.
//!
//! Every default below is the constant the page ships with; the structs exist
//! so the headless runner can experiment with overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level backdrop configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Cellular automaton parameters.
    pub automaton: AutomatonConfig,
    /// Flocking parameters.
    pub flock: FlockConfig,
    /// Particle field parameters.
    pub field: FieldConfig,
    /// Fixed RNG seed. `None` seeds every simulation from entropy.
    pub rng_seed: Option<u64>,
}

/// Game of Life with colour lineage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonConfig {
    /// Cell edge length in pixels.
    pub cell_size: u32,
    /// Drawn frames per generation.
    pub frame_delay: u32,
    /// Probability that a cell starts alive.
    pub seed_density: f32,
    /// Corner radius of a drawn cell.
    pub corner_radius: f32,
    /// Minimum user-origin neighbours for a newborn to inherit the lineage.
    pub lineage_threshold: usize,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            cell_size: 8,
            frame_delay: 5,
            seed_density: 0.2,
            corner_radius: 2.0,
            lineage_threshold: 3,
        }
    }
}

/// Boids steering parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    /// Boids created at init.
    pub count: usize,
    /// Boids appended per click.
    pub spawn_per_click: usize,
    /// Radius of the disc new boids are scattered in around a click.
    pub spawn_jitter: f32,
    /// Population cap. Oldest boids are evicted beyond it.
    pub max_population: usize,
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    /// Distance from an edge where avoidance kicks in.
    pub edge_margin: f32,
    /// Avoidance force at full penetration of the margin.
    pub edge_force: f32,
    /// Distance from a side edge where the horizontal bias applies.
    pub bias_margin: f32,
    pub bias_force: f32,
    /// Distance from the right edge treated as stuck.
    pub stuck_margin: f32,
    pub stuck_force: f32,
    /// Distance from the right edge where rightward motion is forcibly reversed.
    pub escape_margin: f32,
    pub escape_boost: f32,
    /// Velocity retained on a wall bounce.
    pub restitution: f32,
    /// Peak-to-peak random jitter per axis per step.
    pub turbulence: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            count: 50,
            spawn_per_click: 2,
            spawn_jitter: 20.0,
            max_population: 600,
            max_speed: 1.2,
            max_force: 0.05,
            separation_radius: 40.0,
            alignment_radius: 50.0,
            cohesion_radius: 60.0,
            separation_weight: 0.5,
            alignment_weight: 0.1,
            cohesion_weight: 0.05,
            edge_margin: 100.0,
            edge_force: 0.3,
            bias_margin: 200.0,
            bias_force: 0.2,
            stuck_margin: 50.0,
            stuck_force: 0.3,
            escape_margin: 30.0,
            escape_boost: 1.2,
            restitution: 0.8,
            turbulence: 0.02,
        }
    }
}

/// Attractor field parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub attractor_count: usize,
    /// Particles appended per click.
    pub spawn_per_click: usize,
    /// Peak-to-peak scatter around a click, per axis.
    pub spawn_jitter: f32,
    /// Population cap. Oldest particles are evicted beyond it.
    pub max_population: usize,
    /// Past positions kept per particle.
    pub trail_capacity: usize,
    /// Velocity multiplier applied every step.
    pub damping: f32,
    /// Peak-to-peak random jitter per axis per step.
    pub turbulence: f32,
    /// Peak-to-peak signed attractor strength.
    pub strength_span: f32,
    pub min_radius: f32,
    pub radius_span: f32,
    /// Peak-to-peak attractor drift velocity.
    pub attractor_speed: f32,
    /// Peak-to-peak initial particle velocity.
    pub initial_speed: f32,
    /// Peak-to-peak velocity of click-spawned particles.
    pub spawn_speed: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 120,
            attractor_count: 12,
            spawn_per_click: 5,
            spawn_jitter: 20.0,
            max_population: 1500,
            trail_capacity: 25,
            damping: 0.95,
            turbulence: 0.1,
            strength_span: 0.05,
            min_radius: 80.0,
            radius_span: 150.0,
            attractor_speed: 0.5,
            initial_speed: 1.5,
            spawn_speed: 2.0,
        }
    }
}

impl BackdropConfig {
    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.automaton;
        if a.cell_size == 0 {
            return Err(ConfigError::InvalidCellSize);
        }
        if a.frame_delay == 0 {
            return Err(ConfigError::InvalidFrameDelay);
        }
        if !(0.0..=1.0).contains(&a.seed_density) {
            return Err(ConfigError::InvalidDensity(a.seed_density));
        }

        let f = &self.flock;
        if f.max_speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(f.max_speed));
        }
        if f.max_population < f.count {
            return Err(ConfigError::PopulationCap {
                what: "flock",
                cap: f.max_population,
                initial: f.count,
            });
        }

        let p = &self.field;
        if p.trail_capacity == 0 {
            return Err(ConfigError::InvalidTrailCapacity);
        }
        if !(0.0..=1.0).contains(&p.damping) {
            return Err(ConfigError::InvalidDamping(p.damping));
        }
        if p.max_population < p.particle_count {
            return Err(ConfigError::PopulationCap {
                what: "field",
                cap: p.max_population,
                initial: p.particle_count,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Cell size must be non-zero")]
    InvalidCellSize,
    #[error("Frame delay must be non-zero")]
    InvalidFrameDelay,
    #[error("Seed density {0} outside [0, 1]")]
    InvalidDensity(f32),
    #[error("Maximum speed must be positive, got {0}")]
    InvalidSpeed(f32),
    #[error("Trail capacity must be non-zero")]
    InvalidTrailCapacity,
    #[error("Damping {0} outside [0, 1]")]
    InvalidDamping(f32),
    #[error("{what} population cap {cap} is below the initial count {initial}")]
    PopulationCap {
        what: &'static str,
        cap: usize,
        initial: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(BackdropConfig::default().validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let json = serde_json::to_string(&BackdropConfig::default()).unwrap();
        let parsed = BackdropConfig::from_json(&json).unwrap();
        assert_eq!(parsed.flock.count, 50);
        assert_eq!(parsed.field.trail_capacity, 25);
        assert_eq!(parsed.automaton.cell_size, 8);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = BackdropConfig::from_json(r#"{ "flock": { "count": 10 } }"#).unwrap();
        assert_eq!(config.flock.count, 10);
        assert_eq!(config.flock.max_speed, 1.2);
        assert_eq!(config.field.particle_count, 120);
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_rejects_zero_frame_delay() {
        let err = BackdropConfig::from_json(r#"{ "automaton": { "frame_delay": 0 } }"#);
        assert!(matches!(err, Err(ConfigError::InvalidFrameDelay)));
    }

    #[test]
    fn test_rejects_cap_below_initial() {
        let mut config = BackdropConfig::default();
        config.field.max_population = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PopulationCap { what: "field", .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backdrop.json");
        std::fs::write(&path, r#"{ "rng_seed": 42, "field": { "damping": 0.9 } }"#).unwrap();

        let config = BackdropConfig::load(&path).unwrap();
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.field.damping, 0.9);

        let missing = BackdropConfig::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            BackdropConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
