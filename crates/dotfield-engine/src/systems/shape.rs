//! Dot field derived from circle primitives (a logo exported as SVG circles).
//!
//! Circles are projected into the container with a fit-within transform.
//! Dots near the cursor are nudged in or out depending on a fixed per-dot
//! phase; everything else homes back to its resting origin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::Bounds;
use crate::error::EngineError;
use crate::renderer::{random_rainbow, DrawList, Rgba};
use super::connections::{self, Connection, Positioned};
use super::rng::Rng;

/// One `<circle cx cy r>` from the source drawing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CirclePrimitive {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

/// Circles plus the extent of the coordinate system they were drawn in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSource {
    #[serde(alias = "viewbox")]
    pub view_box: Bounds,
    #[serde(default)]
    pub circles: Vec<CirclePrimitive>,
}

impl ShapeSource {
    /// Parse and validate a shape source. A zero-sized extent is rejected.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let source: ShapeSource = serde_json::from_str(json).map_err(EngineError::ShapeSource)?;
        if source.view_box.is_empty() {
            return Err(EngineError::EmptyViewBox {
                width: source.view_box.width,
                height: source.view_box.height,
            });
        }
        Ok(source)
    }
}

/// Uniform scale plus centring offset from source space to container space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f32,
    pub offset: Vec2,
}

impl Projection {
    /// Largest uniform scale that fits `view_box` inside `bounds`, centred on
    /// the slack axis. `None` when either extent is empty.
    pub fn fit_within(view_box: Bounds, bounds: Bounds) -> Option<Self> {
        let source_aspect = view_box.aspect()?;
        let target_aspect = bounds.aspect()?;

        if source_aspect > target_aspect {
            let scale = bounds.width / view_box.width;
            Some(Projection {
                scale,
                offset: Vec2::new(0.0, (bounds.height - view_box.height * scale) * 0.5),
            })
        } else {
            let scale = bounds.height / view_box.height;
            Some(Projection {
                scale,
                offset: Vec2::new((bounds.width - view_box.width * scale) * 0.5, 0.0),
            })
        }
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }
}

/// A projected dot with its resting position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDot {
    pub position: Vec2,
    pub origin: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

impl Positioned for ShapeDot {
    fn position(&self) -> Vec2 {
        self.position
    }
}

pub const MIN_DOT_RADIUS: f32 = 0.5;

/// Project circle primitives into `bounds`. Empty when either extent is empty.
pub fn project(
    circles: &[CirclePrimitive],
    view_box: Bounds,
    bounds: Bounds,
    rng: &mut Rng,
) -> Vec<ShapeDot> {
    let Some(projection) = Projection::fit_within(view_box, bounds) else {
        return Vec::new();
    };
    circles
        .iter()
        .map(|c| {
            let p = projection.apply(Vec2::new(c.cx, c.cy));
            ShapeDot {
                position: p,
                origin: p,
                radius: (c.r * projection.scale).max(MIN_DOT_RADIUS),
                opacity: rng.range(0.2, 0.7),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeConfig {
    pub interaction_radius: f32,
    pub mobile_interaction_radius: f32,
    pub displacement_strength: f32,
    pub opacity_boost: f32,
    pub opacity_cap: f32,
    /// Fraction of the distance to the origin closed per frame.
    pub homing: f32,
    pub resting_opacity: (f32, f32),
    /// Connections are skipped entirely at or above this many dots.
    pub max_linked_dots: usize,
    pub link_distance: f32,
    pub mobile_link_distance: f32,
    pub link_alpha: f32,
    pub cursor_link_distance: f32,
    pub mobile_cursor_link_distance: f32,
    pub cursor_link_alpha: f32,
    pub line_width: f32,
    /// Viewports narrower than this use the mobile distances.
    pub mobile_breakpoint: f32,
    pub rainbow: bool,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            interaction_radius: 150.0,
            mobile_interaction_radius: 100.0,
            displacement_strength: 5.0,
            opacity_boost: 1.2,
            opacity_cap: 0.75,
            homing: 0.1,
            resting_opacity: (0.2, 0.5),
            max_linked_dots: 300,
            link_distance: 40.0,
            mobile_link_distance: 30.0,
            link_alpha: 0.1,
            cursor_link_distance: 100.0,
            mobile_cursor_link_distance: 70.0,
            cursor_link_alpha: 0.15,
            line_width: 0.5,
            mobile_breakpoint: 768.0,
            rainbow: false,
        }
    }
}

impl ShapeConfig {
    pub fn interaction_radius(&self, mobile: bool) -> f32 {
        if mobile { self.mobile_interaction_radius } else { self.interaction_radius }
    }

    pub fn link_distance(&self, mobile: bool) -> f32 {
        if mobile { self.mobile_link_distance } else { self.link_distance }
    }

    pub fn cursor_link_distance(&self, mobile: bool) -> f32 {
        if mobile { self.mobile_cursor_link_distance } else { self.cursor_link_distance }
    }
}

#[derive(Debug, Clone)]
pub struct ShapeField {
    source: Option<ShapeSource>,
    dots: Vec<ShapeDot>,
    bounds: Bounds,
    failed: bool,
    config: ShapeConfig,
}

impl ShapeField {
    pub fn new(config: ShapeConfig) -> Self {
        Self {
            source: None,
            dots: Vec::new(),
            bounds: Bounds::ZERO,
            failed: false,
            config,
        }
    }

    /// Install a parsed source and project it into `bounds`.
    pub fn load(&mut self, source: ShapeSource, bounds: Bounds, rng: &mut Rng) {
        if self.failed {
            log::warn!("shape field: ignoring source after earlier failure");
            return;
        }
        log::debug!("shape field: loaded {} circles", source.circles.len());
        self.source = Some(source);
        self.resize(bounds, rng);
    }

    /// The source could not be fetched or parsed. The field stays empty for good.
    pub fn fail(&mut self, reason: &str) {
        log::warn!("shape field: source failed: {}", reason);
        self.failed = true;
        self.source = None;
        self.dots.clear();
    }

    /// Reproject from the source for a new container size.
    pub fn resize(&mut self, bounds: Bounds, rng: &mut Rng) {
        self.bounds = bounds;
        self.dots = match &self.source {
            Some(source) => project(&source.circles, source.view_box, bounds, rng),
            None => Vec::new(),
        };
    }

    /// One logical frame. `cursor_local` is in container coordinates.
    pub fn tick(&mut self, cursor_local: Option<Vec2>, interaction_radius: f32, rng: &mut Rng) {
        let cursor = cursor_local.filter(|c| self.bounds.contains(*c));
        let config = self.config;

        for dot in &mut self.dots {
            let influence = cursor.and_then(|c| {
                let delta = c - dot.position;
                let distance = delta.length();
                (distance < interaction_radius).then_some((delta, distance))
            });

            match influence {
                Some((delta, distance)) => {
                    let falloff = 1.0 - (distance / interaction_radius).min(1.0);
                    let strength = config.displacement_strength * falloff * dot.radius * 0.5;
                    let phase = (dot.origin.x * 0.05 + dot.origin.y * 0.05).sin() * 0.7;
                    dot.position += delta.normalize_or_zero() * strength * phase;
                    dot.opacity = (dot.opacity * config.opacity_boost).min(config.opacity_cap);
                }
                None => {
                    dot.position += (dot.origin - dot.position) * config.homing;
                    let (lo, hi) = config.resting_opacity;
                    dot.opacity = dot.opacity * 0.95 + rng.range(lo, hi) * 0.05;
                }
            }
        }
    }

    /// Dot-to-dot and dot-to-cursor links for this frame.
    pub fn connections(&self, cursor_local: Option<Vec2>, mobile: bool) -> Vec<Connection> {
        if self.dots.len() >= self.config.max_linked_dots {
            return Vec::new();
        }
        let mut links = connections::pairwise(
            &self.dots,
            self.config.link_distance(mobile),
            self.config.link_alpha,
        );
        if let Some(cursor) = cursor_local.filter(|c| self.bounds.contains(*c)) {
            links.extend(connections::to_cursor(
                &self.dots,
                cursor,
                self.config.cursor_link_distance(mobile),
                self.config.cursor_link_alpha,
            ));
        }
        links
    }

    /// Dots, then connections. In rainbow mode every primitive picks its own
    /// palette colour each frame.
    pub fn draw(
        &self,
        draw: &mut DrawList,
        ink: Rgba,
        cursor_local: Option<Vec2>,
        mobile: bool,
        rng: &mut Rng,
    ) {
        for dot in &self.dots {
            let color = self.color(ink, dot.opacity, rng);
            draw.circle(dot.position, dot.radius, color);
        }
        for link in self.connections(cursor_local, mobile) {
            let color = self.color(ink, link.alpha, rng);
            draw.line(link.from, link.to, self.config.line_width, color);
        }
    }

    fn color(&self, ink: Rgba, alpha: f32, rng: &mut Rng) -> Rgba {
        if self.config.rainbow {
            random_rainbow(rng, alpha)
        } else {
            ink.with_alpha(alpha)
        }
    }

    pub fn set_rainbow(&mut self, rainbow: bool) {
        self.config.rainbow = rainbow;
    }

    pub fn config(&self) -> &ShapeConfig {
        &self.config
    }

    pub fn dots(&self) -> &[ShapeDot] {
        &self.dots
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}

impl Default for ShapeField {
    fn default() -> Self {
        Self::new(ShapeConfig::default())
    }
}
