//! Boids flocking with edge handling tuned to keep the flock on screen.

use std::f32::consts::TAU;

use glam::Vec2;

use super::{SimRng, Simulation};
use crate::render::Surface;
use crate::schema::{FlockConfig, Hsla};

/// One flock member.
#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Hue in degrees.
    pub hue: f32,
    pub size: f32,
    pub max_speed: f32,
    pub max_force: f32,
}

impl Boid {
    /// Random boid at `position` with a slight rightward drift.
    fn spawn(position: Vec2, config: &FlockConfig, rng: &mut SimRng) -> Self {
        Self {
            position,
            velocity: Vec2::new(rng.centered(0.6) + 0.2, rng.centered(0.4)),
            hue: rng.uniform(200.0, 40.0),
            size: rng.uniform(2.0, 2.0),
            max_speed: config.max_speed,
            max_force: config.max_force,
        }
    }
}

/// Steering-behaviour flock.
pub struct FlockSimulation {
    width: f32,
    height: f32,
    config: FlockConfig,
    boids: Vec<Boid>,
    rng: SimRng,
}

impl FlockSimulation {
    pub fn new(width: f32, height: f32, config: &FlockConfig, mut rng: SimRng) -> Self {
        let boids = (0..config.count)
            .map(|_| {
                let position = Vec2::new(rng.unit() * width, rng.unit() * height);
                Boid::spawn(position, config, &mut rng)
            })
            .collect();

        Self {
            width,
            height,
            config: config.clone(),
            boids,
            rng,
        }
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    /// Append a boid, evicting the oldest past the population cap.
    pub fn add_boid(&mut self, boid: Boid) {
        self.boids.push(boid);
        let excess = self.boids.len().saturating_sub(self.config.max_population);
        if excess > 0 {
            self.boids.drain(..excess);
            log::debug!("flock at cap {}, evicted {excess}", self.config.max_population);
        }
    }
}

/// Cap the speed of `velocity` at `max`, keeping its direction.
#[inline]
pub fn limit_speed(velocity: Vec2, max: f32) -> Vec2 {
    velocity.clamp_length_max(max)
}

/// Clamp a position into the surface, reflecting and damping the velocity
/// component perpendicular to any edge crossed.
pub fn bounce(
    mut position: Vec2,
    mut velocity: Vec2,
    width: f32,
    height: f32,
    restitution: f32,
) -> (Vec2, Vec2) {
    if position.x < 0.0 {
        position.x = 0.0;
        velocity.x = velocity.x.abs() * restitution;
    }
    if position.x > width {
        position.x = width;
        velocity.x = -velocity.x.abs() * restitution;
    }
    if position.y < 0.0 {
        position.y = 0.0;
        velocity.y = velocity.y.abs() * restitution;
    }
    if position.y > height {
        position.y = height;
        velocity.y = -velocity.y.abs() * restitution;
    }
    (position, velocity)
}

/// Linear push away from an edge within `margin`, on one axis.
#[inline]
fn edge_push(coord: f32, extent: f32, margin: f32, force: f32) -> f32 {
    if coord < margin {
        force * (margin - coord) / margin
    } else if coord > extent - margin {
        -force * (coord - (extent - margin)) / margin
    } else {
        0.0
    }
}

/// Total steering for boid `i` given the rest of the flock.
fn steering(
    boids: &[Boid],
    i: usize,
    config: &FlockConfig,
    width: f32,
    height: f32,
    jitter: Vec2,
) -> Vec2 {
    let boid = &boids[i];
    let (mut separation, mut alignment, mut cohesion) = (Vec2::ZERO, Vec2::ZERO, Vec2::ZERO);
    let (mut n_sep, mut n_ali, mut n_coh) = (0u32, 0u32, 0u32);

    for (j, other) in boids.iter().enumerate() {
        if j == i {
            continue;
        }
        let offset = boid.position - other.position;
        let distance = offset.length();
        if distance <= 0.0 {
            continue;
        }
        if distance < config.separation_radius {
            separation += offset / distance;
            n_sep += 1;
        }
        if distance < config.alignment_radius {
            alignment += other.velocity;
            n_ali += 1;
        }
        if distance < config.cohesion_radius {
            cohesion += other.position;
            n_coh += 1;
        }
    }

    let mut force = jitter;
    if n_sep > 0 {
        force += separation / n_sep as f32 * config.separation_weight;
    }
    if n_ali > 0 {
        force += alignment / n_ali as f32 * config.alignment_weight;
    }
    if n_coh > 0 {
        force += (cohesion / n_coh as f32 - boid.position) * config.cohesion_weight;
    }

    force.x += edge_push(boid.position.x, width, config.edge_margin, config.edge_force);
    force.y += edge_push(boid.position.y, height, config.edge_margin, config.edge_force);

    // Nudge off the side edges unless already heading away.
    let (x, vx) = (boid.position.x, boid.velocity.x);
    if x < config.bias_margin && vx < 0.5 {
        force.x += config.bias_force;
    } else if x > width - config.bias_margin && vx > -0.5 {
        force.x -= config.bias_force;
    } else if x > width - config.stuck_margin {
        force.x -= config.stuck_force;
    }

    force
}

impl Simulation for FlockSimulation {
    fn advance(&mut self) {
        let (w, h) = (self.width, self.height);
        let turbulence = self.config.turbulence;

        // In place: later boids see earlier boids' updated state.
        for i in 0..self.boids.len() {
            let jitter = Vec2::new(
                self.rng.centered(turbulence),
                self.rng.centered(turbulence),
            );
            let force = steering(&self.boids, i, &self.config, w, h, jitter);

            let boid = &mut self.boids[i];
            let velocity = limit_speed(boid.velocity + force, boid.max_speed);
            let (position, mut velocity) =
                bounce(boid.position + velocity, velocity, w, h, self.config.restitution);

            if position.x > w - self.config.escape_margin && velocity.x > 0.0 {
                velocity.x = -velocity.x.abs() * self.config.escape_boost;
                velocity = limit_speed(velocity, boid.max_speed);
            }

            boid.position = position;
            boid.velocity = velocity;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for boid in &self.boids {
            let s = boid.size;
            surface.save();
            surface.translate(boid.position.x, boid.position.y);
            surface.rotate(boid.velocity.y.atan2(boid.velocity.x));

            surface.set_fill(Hsla::opaque(boid.hue, 70.0, 60.0));
            surface.fill_ellipse(0.0, 0.0, s * 1.5, s * 0.8);

            surface.set_fill(Hsla::opaque(boid.hue, 70.0, 50.0));
            surface.fill_ellipse(-s * 0.5, -s * 0.3, s * 0.8, s * 0.3);
            surface.fill_ellipse(-s * 0.5, s * 0.3, s * 0.8, s * 0.3);

            surface.restore();
        }
    }

    fn interact(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let click = Vec2::new(x, y);
        for _ in 0..self.config.spawn_per_click {
            let angle = self.rng.uniform(0.0, TAU);
            let radius = self.rng.unit() * self.config.spawn_jitter;
            let boid = Boid::spawn(
                click + Vec2::from_angle(angle) * radius,
                &self.config,
                &mut self.rng,
            );
            self.add_boid(boid);
        }
    }

    fn population(&self) -> usize {
        self.boids.len()
    }
}
