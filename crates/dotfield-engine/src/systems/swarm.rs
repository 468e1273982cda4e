//! Free-floating particle field: gentle cursor attraction, speed clamp,
//! toroidal wraparound. Particle count only changes on (re)initialization.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::Bounds;
use crate::renderer::{DrawList, Rgba};
use super::connections::Positioned;
use super::rng::Rng;

/// Tuning for a particle field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwarmConfig {
    /// Number of particles scattered on initialization.
    pub particle_count: usize,
    /// Initial velocity components are drawn from [-initial_speed, initial_speed).
    pub initial_speed: f32,
    /// Radius range [min, max). `min` must be positive.
    pub size_range: (f32, f32),
    /// Opacity range [min, max) within [0, 1].
    pub opacity_range: (f32, f32),
    /// Cursor pulls particles closer than this.
    pub attraction_radius: f32,
    /// Velocity added per update along the unit vector to the cursor.
    pub attraction_strength: f32,
    /// Velocity magnitude cap.
    pub max_speed: f32,
    /// Advance state on every N-th logical frame only (drawing is unaffected).
    pub update_every: u32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            initial_speed: 0.25,
            size_range: (0.5, 3.0),
            opacity_range: (0.1, 0.6),
            attraction_radius: 200.0,
            attraction_strength: 0.05,
            max_speed: 1.2,
            update_every: 1,
        }
    }
}

impl SwarmConfig {
    /// Sparser, slower preset used behind the timeline.
    pub fn timeline() -> Self {
        Self {
            particle_count: 45,
            initial_speed: 0.15,
            size_range: (0.5, 2.5),
            opacity_range: (0.1, 0.4),
            attraction_radius: 100.0,
            attraction_strength: 0.015,
            max_speed: 0.4,
            update_every: 3,
        }
    }
}

/// A single drifting particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub opacity: f32,
}

impl Particle {
    /// Scatter a particle uniformly inside `bounds`.
    pub fn random(bounds: Bounds, config: &SwarmConfig, rng: &mut Rng) -> Self {
        let (size_min, size_max) = config.size_range;
        let (opacity_min, opacity_max) = config.opacity_range;
        Particle {
            position: Vec2::new(rng.range(0.0, bounds.width), rng.range(0.0, bounds.height)),
            velocity: Vec2::new(
                rng.symmetric(config.initial_speed),
                rng.symmetric(config.initial_speed),
            ),
            size: rng.range(size_min, size_max).max(f32::EPSILON),
            opacity: rng.range(opacity_min, opacity_max).clamp(0.0, 1.0),
        }
    }

    /// One integration step: attract, clamp, move, wrap.
    pub fn step(&mut self, cursor: Option<Vec2>, bounds: Bounds, config: &SwarmConfig) {
        if let Some(cursor) = cursor {
            let offset = cursor - self.position;
            let distance = offset.length();
            // A particle sitting exactly on the cursor has no direction to move in.
            if distance > f32::EPSILON && distance < config.attraction_radius {
                self.velocity += offset / distance * config.attraction_strength;
            }
        }

        self.velocity = self.velocity.clamp_length_max(config.max_speed.max(0.0));
        self.position += self.velocity;
        self.position.x = wrap(self.position.x, bounds.width);
        self.position.y = wrap(self.position.y, bounds.height);
    }
}

impl Positioned for Particle {
    fn position(&self) -> Vec2 {
        self.position
    }
}

/// Toroidal edge rule: leaving one side re-enters at the opposite side.
#[inline]
pub fn wrap(value: f32, extent: f32) -> f32 {
    if value < 0.0 {
        extent
    } else if value > extent {
        0.0
    } else {
        value
    }
}

/// Owns the particles of one canvas.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    config: SwarmConfig,
}

impl ParticleField {
    pub fn new(config: SwarmConfig) -> Self {
        Self {
            particles: Vec::with_capacity(config.particle_count),
            config,
        }
    }

    /// Discard all particles and scatter `count` fresh ones inside `bounds`.
    /// An empty extent leaves the field empty.
    pub fn initialize(&mut self, count: usize, bounds: Bounds, rng: &mut Rng) {
        self.particles.clear();
        if bounds.is_empty() {
            log::debug!("particle field: empty bounds, nothing to scatter");
            return;
        }
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::random(bounds, &self.config, rng));
        }
    }

    /// Advance the simulation for logical frame `frame`, wrapping at `bounds`.
    /// Returns false when the throttle skipped this frame.
    pub fn tick(&mut self, cursor: Option<Vec2>, bounds: Bounds, frame: u64) -> bool {
        let every = self.config.update_every.max(1) as u64;
        if frame % every != 0 {
            return false;
        }
        let config = self.config;
        for p in &mut self.particles {
            p.step(cursor, bounds, &config);
        }
        true
    }

    /// Draw every particle as a filled circle in `ink` at its own opacity.
    pub fn draw(&self, draw: &mut DrawList, ink: Rgba) {
        for p in &self.particles {
            draw.circle(p.position, p.size, ink.with_alpha(p.opacity));
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(count: usize, bounds: Bounds) -> ParticleField {
        let mut field = ParticleField::new(SwarmConfig::default());
        field.initialize(count, bounds, &mut Rng::new(42));
        field
    }

    #[test]
    fn initialize_scatters_within_bounds() {
        let f = field(200, Bounds::new(800.0, 600.0));
        assert_eq!(f.len(), 200);
        for p in f.particles() {
            assert!(p.position.x >= 0.0 && p.position.x <= 800.0);
            assert!(p.position.y >= 0.0 && p.position.y <= 600.0);
            assert!(p.velocity.x.abs() <= 0.25 && p.velocity.y.abs() <= 0.25);
        }
    }

    #[test]
    fn tick_preserves_count() {
        for n in [0usize, 1, 17, 100] {
            let bounds = Bounds::new(300.0, 200.0);
            let mut f = field(n, bounds);
            for frame in 0..120 {
                f.tick(Some(Vec2::new(150.0, 100.0)), bounds, frame);
                assert_eq!(f.len(), n, "count changed at frame {}", frame);
            }
        }
    }

    #[test]
    fn opacity_and_size_stay_valid() {
        let bounds = Bounds::new(400.0, 400.0);
        let mut f = field(100, bounds);
        for frame in 0..300 {
            f.tick(Some(Vec2::new(200.0, 200.0)), bounds, frame);
            for p in f.particles() {
                assert!((0.0..=1.0).contains(&p.opacity), "opacity {}", p.opacity);
                assert!(p.size > 0.0, "size {}", p.size);
            }
        }
    }

    #[test]
    fn wraps_past_right_edge_to_zero() {
        let config = SwarmConfig::default();
        let bounds = Bounds::new(100.0, 100.0);
        let mut p = Particle {
            position: Vec2::new(99.9, 50.0),
            velocity: Vec2::new(0.5, 0.0),
            size: 1.0,
            opacity: 0.5,
        };
        p.step(None, bounds, &config);
        assert_eq!(p.position.x, 0.0);
        assert_eq!(p.position.y, 50.0);
    }

    #[test]
    fn wraps_past_left_and_top_edges() {
        assert_eq!(wrap(-0.1, 100.0), 100.0);
        assert_eq!(wrap(100.1, 100.0), 0.0);
        assert_eq!(wrap(42.0, 100.0), 42.0);
    }

    #[test]
    fn attraction_pulls_toward_cursor() {
        let config = SwarmConfig::default();
        let mut p = Particle {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::ZERO,
            size: 1.0,
            opacity: 0.5,
        };
        p.step(Some(Vec2::new(150.0, 100.0)), Bounds::new(500.0, 500.0), &config);
        assert!(p.velocity.x > 0.0);
        assert!((p.velocity.x - config.attraction_strength).abs() < 1e-6);
    }

    #[test]
    fn no_attraction_outside_radius() {
        let config = SwarmConfig::default();
        let mut p = Particle {
            position: Vec2::new(0.0, 0.0),
            velocity: Vec2::ZERO,
            size: 1.0,
            opacity: 0.5,
        };
        p.step(Some(Vec2::new(400.0, 0.0)), Bounds::new(500.0, 500.0), &config);
        assert_eq!(p.velocity, Vec2::ZERO);
    }

    #[test]
    fn cursor_on_particle_does_not_produce_nan() {
        let config = SwarmConfig::default();
        let mut p = Particle {
            position: Vec2::new(10.0, 10.0),
            velocity: Vec2::ZERO,
            size: 1.0,
            opacity: 0.5,
        };
        p.step(Some(Vec2::new(10.0, 10.0)), Bounds::new(100.0, 100.0), &config);
        assert!(p.position.is_finite());
        assert!(p.velocity.is_finite());
    }

    #[test]
    fn speed_is_clamped() {
        let config = SwarmConfig::default();
        let mut p = Particle {
            position: Vec2::new(50.0, 50.0),
            velocity: Vec2::new(10.0, 10.0),
            size: 1.0,
            opacity: 0.5,
        };
        p.step(None, Bounds::new(1000.0, 1000.0), &config);
        assert!(p.velocity.length() <= config.max_speed + 1e-5);
    }

    #[test]
    fn throttled_field_updates_every_third_frame() {
        let bounds = Bounds::new(500.0, 500.0);
        let mut f = ParticleField::new(SwarmConfig::timeline());
        f.initialize(45, bounds, &mut Rng::new(1));
        let before = f.particles().to_vec();
        assert!(!f.tick(None, bounds, 1));
        assert!(!f.tick(None, bounds, 2));
        assert_eq!(f.particles(), &before[..]);
        assert!(f.tick(None, bounds, 3));
        assert_ne!(f.particles(), &before[..]);
    }

    #[test]
    fn empty_bounds_leave_field_empty() {
        let mut f = field(50, Bounds::ZERO);
        assert!(f.is_empty());
        assert!(f.tick(Some(Vec2::ZERO), Bounds::ZERO, 0));
        let mut draw = DrawList::new();
        f.draw(&mut draw, Rgba::WHITE);
        assert!(draw.is_empty());
    }
}
