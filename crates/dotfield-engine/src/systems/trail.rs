//! Cursor sparkle trail.
//!
//! Sparkles spawn near a lagged copy of the cursor at a throttled rate and
//! fade geometrically. Memory stays bounded by pruning faded points; this is a
//! soft cap, not a fixed capacity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::cursor::LaggedCursor;
use crate::core::schedule::Throttle;
use crate::renderer::{DrawList, Rgba};
use super::connections::Positioned;
use super::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrailConfig {
    /// Minimum simulated time between emissions.
    pub interval_ms: f64,
    /// Fraction of the gap to the raw cursor the follower closes per frame.
    pub lag: f32,
    /// Spawn offset drawn from [-jitter, jitter) per axis.
    pub jitter: f32,
    /// `life` multiplier per frame.
    pub decay: f32,
    /// Points at or below this life are removed.
    pub prune_below: f32,
    pub size_range: (f32, f32),
    pub opacity_range: (f32, f32),
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100.0,
            lag: LaggedCursor::DEFAULT_FACTOR,
            jitter: 5.0,
            decay: 0.9,
            prune_below: 0.05,
            size_range: (0.5, 2.0),
            opacity_range: (0.2, 0.7),
        }
    }
}

/// A fading sparkle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub life: f32,
    pub max_life: f32,
}

impl TrailPoint {
    /// Remaining life as a fraction in [0, 1].
    pub fn fade(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn render_opacity(&self) -> f32 {
        self.opacity * self.fade()
    }

    pub fn render_size(&self) -> f32 {
        self.size * self.fade()
    }
}

impl Positioned for TrailPoint {
    fn position(&self) -> Vec2 {
        self.position
    }
}

#[derive(Debug, Clone)]
pub struct TrailEmitter {
    points: Vec<TrailPoint>,
    lagged: LaggedCursor,
    throttle: Throttle,
    config: TrailConfig,
}

impl TrailEmitter {
    pub fn new(config: TrailConfig) -> Self {
        Self {
            points: Vec::with_capacity(16),
            lagged: LaggedCursor::new(config.lag),
            throttle: Throttle::new(config.interval_ms),
            config,
        }
    }

    /// Move the lagged follower one frame toward the raw cursor.
    pub fn follow(&mut self, raw: Option<Vec2>) -> Option<Vec2> {
        self.lagged.follow(raw)
    }

    /// The smoothed cursor the trail is anchored to.
    pub fn lagged(&self) -> Option<Vec2> {
        self.lagged.position()
    }

    /// Spawn one sparkle if the throttle interval has elapsed and a cursor has
    /// been seen. Faded points are pruned before the new one is pushed.
    pub fn maybe_emit(&mut self, now_ms: f64, rng: &mut Rng) -> Option<TrailPoint> {
        if !self.throttle.ready(now_ms) {
            return None;
        }
        let origin = self.lagged.position()?;

        let jitter = Vec2::new(rng.symmetric(self.config.jitter), rng.symmetric(self.config.jitter));
        let (size_min, size_max) = self.config.size_range;
        let (opacity_min, opacity_max) = self.config.opacity_range;
        let point = TrailPoint {
            position: origin + jitter,
            size: rng.range(size_min, size_max),
            opacity: rng.range(opacity_min, opacity_max).clamp(0.0, 1.0),
            life: 1.0,
            max_life: 1.0,
        };

        self.prune();
        self.points.push(point);
        Some(point)
    }

    /// Fade every point by one frame and drop the spent ones.
    pub fn decay(&mut self) {
        let factor = self.config.decay;
        for p in &mut self.points {
            p.life *= factor;
        }
        self.prune();
    }

    /// Follow, emit, decay: one logical frame.
    pub fn tick(&mut self, raw: Option<Vec2>, now_ms: f64, rng: &mut Rng) {
        self.follow(raw);
        self.maybe_emit(now_ms, rng);
        self.decay();
    }

    fn prune(&mut self) {
        let floor = self.config.prune_below;
        self.points.retain(|p| p.life > floor);
    }

    pub fn draw(&self, draw: &mut DrawList, ink: Rgba) {
        for p in &self.points {
            draw.circle(p.position, p.render_size(), ink.with_alpha(p.render_opacity()));
        }
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for TrailEmitter {
    fn default() -> Self {
        Self::new(TrailConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_emission_before_cursor_seen() {
        let mut trail = TrailEmitter::default();
        let mut rng = Rng::new(42);
        trail.follow(None);
        assert!(trail.maybe_emit(0.0, &mut rng).is_none());
    }

    #[test]
    fn emits_near_lagged_cursor() {
        let mut trail = TrailEmitter::default();
        let mut rng = Rng::new(42);
        trail.follow(Some(Vec2::new(100.0, 100.0)));
        let p = trail.maybe_emit(0.0, &mut rng).expect("should emit");
        assert!((p.position.x - 100.0).abs() <= 5.0);
        assert!((p.position.y - 100.0).abs() <= 5.0);
        assert_eq!(p.life, 1.0);
        assert_eq!(trail.points().len(), 1);
    }

    #[test]
    fn emission_is_throttled() {
        let mut trail = TrailEmitter::default();
        let mut rng = Rng::new(42);
        trail.follow(Some(Vec2::ZERO));
        assert!(trail.maybe_emit(0.0, &mut rng).is_some());
        assert!(trail.maybe_emit(50.0, &mut rng).is_none());
        assert!(trail.maybe_emit(100.0, &mut rng).is_none());
        assert!(trail.maybe_emit(101.0, &mut rng).is_some());
    }

    #[test]
    fn life_strictly_decreases_until_pruned() {
        let mut trail = TrailEmitter::default();
        let mut rng = Rng::new(42);
        trail.follow(Some(Vec2::ZERO));
        trail.maybe_emit(0.0, &mut rng);

        let mut last = 1.0;
        let mut frames = 0;
        while let Some(p) = trail.points().first().copied() {
            assert!(p.life < last || frames == 0, "life did not decrease");
            last = p.life;
            trail.decay();
            frames += 1;
            assert!(frames < 100, "point was never pruned");
        }
        // 0.9^28 ≈ 0.052, 0.9^29 ≈ 0.047
        assert_eq!(frames, 29);
    }

    #[test]
    fn pruned_points_never_exceed_floor() {
        let mut trail = TrailEmitter::default();
        let mut rng = Rng::new(9);
        for frame in 0..600 {
            let now = frame as f64 * 1000.0 / 60.0;
            trail.tick(Some(Vec2::new(frame as f32, 0.0)), now, &mut rng);
            for p in trail.points() {
                assert!(p.life > 0.05);
                assert!((0.0..=1.0).contains(&p.render_opacity()));
            }
        }
        // One emission per ~100ms, each living ~29 frames: never more than a handful.
        assert!(trail.points().len() <= 6, "len {}", trail.points().len());
    }

    #[test]
    fn render_fades_with_life() {
        let p = TrailPoint {
            position: Vec2::ZERO,
            size: 2.0,
            opacity: 0.6,
            life: 0.5,
            max_life: 1.0,
        };
        assert!((p.render_opacity() - 0.3).abs() < 1e-6);
        assert!((p.render_size() - 1.0).abs() < 1e-6);
    }
}
