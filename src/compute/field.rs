//! Particles drifting through a field of moving attractors and repellers.

use std::collections::VecDeque;

use glam::Vec2;

use super::{SimRng, Simulation};
use crate::render::Surface;
use crate::schema::{FieldConfig, Hsla};

/// Fixed-capacity history of past positions, oldest first.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a position, evicting the oldest once full.
    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

#[derive(Debug, Clone)]
pub struct FieldParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub trail: Trail,
    pub hue: f32,
    pub size: f32,
}

impl FieldParticle {
    fn spawn(position: Vec2, speed: f32, trail_capacity: usize, rng: &mut SimRng) -> Self {
        Self {
            position,
            velocity: Vec2::new(rng.centered(speed), rng.centered(speed)),
            trail: Trail::new(trail_capacity),
            hue: rng.uniform(180.0, 60.0),
            size: rng.uniform(1.0, 3.0),
        }
    }
}

/// Moving point source. Positive strength attracts, negative repels.
#[derive(Debug, Clone)]
pub struct Attractor {
    pub position: Vec2,
    pub velocity: Vec2,
    pub strength: f32,
    /// Influence radius in pixels.
    pub radius: f32,
}

/// Wrap a position to the opposite edge once it leaves the surface.
#[inline]
pub fn wrap_position(mut position: Vec2, width: f32, height: f32) -> Vec2 {
    if position.x < 0.0 {
        position.x = width;
    } else if position.x > width {
        position.x = 0.0;
    }
    if position.y < 0.0 {
        position.y = height;
    } else if position.y > height {
        position.y = 0.0;
    }
    position
}

pub struct FieldSimulation {
    width: f32,
    height: f32,
    config: FieldConfig,
    particles: Vec<FieldParticle>,
    attractors: Vec<Attractor>,
    rng: SimRng,
}

impl FieldSimulation {
    pub fn new(width: f32, height: f32, config: &FieldConfig, mut rng: SimRng) -> Self {
        let particles = (0..config.particle_count)
            .map(|_| {
                let position = Vec2::new(rng.unit() * width, rng.unit() * height);
                FieldParticle::spawn(
                    position,
                    config.initial_speed,
                    config.trail_capacity,
                    &mut rng,
                )
            })
            .collect();

        let attractors = (0..config.attractor_count)
            .map(|_| Attractor {
                position: Vec2::new(rng.unit() * width, rng.unit() * height),
                strength: rng.centered(config.strength_span),
                radius: rng.uniform(config.min_radius, config.radius_span),
                velocity: Vec2::new(
                    rng.centered(config.attractor_speed),
                    rng.centered(config.attractor_speed),
                ),
            })
            .collect();

        Self {
            width,
            height,
            config: config.clone(),
            particles,
            attractors,
            rng,
        }
    }

    pub fn particles(&self) -> &[FieldParticle] {
        &self.particles
    }

    pub fn attractors(&self) -> &[Attractor] {
        &self.attractors
    }

    /// Append a particle, evicting the oldest past the population cap.
    pub fn add_particle(&mut self, particle: FieldParticle) {
        self.particles.push(particle);
        let excess = self
            .particles
            .len()
            .saturating_sub(self.config.max_population);
        if excess > 0 {
            self.particles.drain(..excess);
            log::debug!(
                "field at cap {}, evicted {excess}",
                self.config.max_population
            );
        }
    }

    fn move_attractors(&mut self) {
        let bounds = Vec2::new(self.width, self.height);
        for attractor in &mut self.attractors {
            attractor.position += attractor.velocity;
            if attractor.position.x < 0.0 || attractor.position.x > bounds.x {
                attractor.velocity.x = -attractor.velocity.x;
            }
            if attractor.position.y < 0.0 || attractor.position.y > bounds.y {
                attractor.velocity.y = -attractor.velocity.y;
            }
            attractor.position = attractor.position.clamp(Vec2::ZERO, bounds);
        }
    }
}

impl Simulation for FieldSimulation {
    fn advance(&mut self) {
        self.move_attractors();

        let (w, h) = (self.width, self.height);
        let (turbulence, damping) = (self.config.turbulence, self.config.damping);

        for particle in &mut self.particles {
            particle.trail.push(particle.position);

            for attractor in &self.attractors {
                let delta = attractor.position - particle.position;
                let distance = delta.length();
                if distance < attractor.radius {
                    particle.velocity += delta * (attractor.strength / (distance + 1.0));
                }
            }

            particle.velocity += Vec2::new(
                self.rng.centered(turbulence),
                self.rng.centered(turbulence),
            );
            particle.velocity *= damping;
            particle.position = wrap_position(particle.position + particle.velocity, w, h);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for particle in &self.particles {
            surface.set_fill(Hsla::opaque(particle.hue, 80.0, 70.0));

            let n = particle.trail.len() as f32;
            for (i, point) in particle.trail.iter().enumerate() {
                surface.set_alpha(i as f32 / n * 0.4);
                surface.fill_circle(point.x, point.y, particle.size * 0.5);
            }

            surface.set_alpha(0.9);
            surface.fill_circle(particle.position.x, particle.position.y, particle.size);
        }
        surface.set_alpha(1.0);
    }

    fn interact(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let jitter = self.config.spawn_jitter;
        for _ in 0..self.config.spawn_per_click {
            let position = Vec2::new(
                x + self.rng.centered(jitter),
                y + self.rng.centered(jitter),
            );
            let particle = FieldParticle::spawn(
                position,
                self.config.spawn_speed,
                self.config.trail_capacity,
                &mut self.rng,
            );
            self.add_particle(particle);
        }
    }

    fn population(&self) -> usize {
        self.particles.len()
    }
}
