//! Flow dots streaming along quadratic Bézier curves between consecutive
//! timeline anchors.
//!
//! Anchors are measured by the host in page coordinates and converted to
//! viewport coordinates at placement time. The field walks a small state
//! machine: nothing is drawn until anchors arrive, and a layout invalidation
//! hides the curves until the next measurement.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::Bounds;
use crate::core::space::{page_to_viewport, within_vertical_margin};
use crate::error::EngineError;
use crate::renderer::{DrawList, Rgba};
use super::rng::Rng;

/// Horizontal slot of a timeline card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Left,
    Center,
    Right,
}

impl Placement {
    /// The wave pattern used when the host does not report a slot:
    /// left, center, right, center, repeating.
    pub fn for_index(index: usize) -> Self {
        match index % 4 {
            0 => Placement::Left,
            2 => Placement::Right,
            _ => Placement::Center,
        }
    }
}

/// A measured timeline card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    #[serde(default)]
    pub id: String,
    /// Attach point in page pixels (the card centre).
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default, alias = "positionClass")]
    pub position: Option<Placement>,
    #[serde(default)]
    pub index: usize,
    /// Overrides `y` as the attach height when present.
    #[serde(default)]
    pub image_area_y: Option<f32>,
}

impl Anchor {
    pub fn placement(&self) -> Placement {
        self.position.unwrap_or_else(|| Placement::for_index(self.index))
    }

    /// Attach point in page coordinates.
    pub fn attach_point(&self) -> Vec2 {
        Vec2::new(self.x, self.image_area_y.unwrap_or(self.y))
    }

    /// Parse a JSON array of anchors.
    pub fn list_from_json(json: &str) -> Result<Vec<Anchor>, EngineError> {
        serde_json::from_str(json).map_err(EngineError::Layout)
    }
}

/// Fraction of the horizontal span at which the control point sits.
pub fn control_bias(from: Placement, to: Placement) -> f32 {
    match (from, to) {
        (Placement::Left, Placement::Center) => 0.8,
        (Placement::Center, Placement::Right) => 0.3,
        (Placement::Right, Placement::Center) => 0.3,
        (Placement::Center, Placement::Left) => 0.7,
        _ => 0.5,
    }
}

/// Control point for a curve from `start` to `end`: vertically centred,
/// horizontally biased by the card slots.
pub fn control_point(start: Vec2, end: Vec2, from: Placement, to: Placement) -> Vec2 {
    Vec2::new(
        start.x + (end.x - start.x) * control_bias(from, to),
        (start.y + end.y) * 0.5,
    )
}

/// Point on the quadratic Bézier `p0 → c → p1` at `t`. Exact at both ends.
#[inline]
pub fn quadratic_bezier(p0: Vec2, c: Vec2, p1: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + c * (2.0 * u * t) + p1 * (t * t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub start: Vec2,
    pub control: Vec2,
    pub end: Vec2,
}

impl Curve {
    /// Curve between two anchors in viewport coordinates.
    pub fn between(from: &Anchor, to: &Anchor, scroll_y: f32) -> Self {
        let start = page_to_viewport(from.attach_point(), scroll_y);
        let end = page_to_viewport(to.attach_point(), scroll_y);
        Curve {
            start,
            control: control_point(start, end, from.placement(), to.placement()),
            end,
        }
    }

    pub fn point_at(&self, t: f32) -> Vec2 {
        quadratic_bezier(self.start, self.control, self.end, t)
    }

    /// Both endpoints within `margin` of the viewport vertically.
    pub fn is_visible(&self, viewport: Bounds, margin: f32) -> bool {
        within_vertical_margin(self.start.y, viewport.height, margin)
            && within_vertical_margin(self.end.y, viewport.height, margin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurveConfig {
    /// Each segment gets `dots_base + rand(dots_spread)` flow dots.
    pub dots_base: u32,
    pub dots_spread: u32,
    pub progress_jitter: f32,
    pub speed_range: (f32, f32),
    pub size_range: (f32, f32),
    pub opacity_range: (f32, f32),
    pub interaction_radius: f32,
    pub interaction_strength: f32,
    pub opacity_boost: f32,
    pub opacity_cap: f32,
    /// Segments with an endpoint further than this outside the viewport are skipped.
    pub offscreen_margin: f32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            dots_base: 35,
            dots_spread: 20,
            progress_jitter: 0.15,
            speed_range: (0.0002, 0.0007),
            size_range: (0.3, 1.5),
            opacity_range: (0.1, 0.5),
            interaction_radius: 150.0,
            interaction_strength: 8.0,
            opacity_boost: 1.2,
            opacity_cap: 0.7,
            offscreen_margin: 100.0,
        }
    }
}

/// A dot travelling along segment `segment` (anchor `segment` → `segment + 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowDot {
    pub segment: usize,
    pub progress: f32,
    pub speed: f32,
    pub size: f32,
    pub opacity: f32,
    /// Last placed viewport position; `None` while the segment is off-screen.
    pub placed: Option<Vec2>,
}

impl FlowDot {
    fn random(segment: usize, progress: f32, config: &CurveConfig, rng: &mut Rng) -> Self {
        let mut dot = FlowDot {
            segment,
            progress,
            speed: rng.range(config.speed_range.0, config.speed_range.1),
            size: 0.0,
            opacity: 0.0,
            placed: None,
        };
        dot.restyle(config, rng);
        dot
    }

    fn restyle(&mut self, config: &CurveConfig, rng: &mut Rng) {
        self.size = rng.range(config.size_range.0, config.size_range.1);
        self.opacity = rng.range(config.opacity_range.0, config.opacity_range.1).clamp(0.0, 1.0);
    }

    /// Move along the curve; passing the end restarts at 0 with a new look.
    pub fn advance(&mut self, config: &CurveConfig, rng: &mut Rng) {
        self.progress += self.speed;
        if self.progress > 1.0 {
            self.progress = 0.0;
            self.restyle(config, rng);
        }
    }
}

/// Lateral cursor perturbation for a dot at `point` with curve parameter `t`.
/// Dots near the cursor oscillate between attraction and repulsion.
pub fn cursor_offset(
    point: Vec2,
    cursor: Vec2,
    t: f32,
    size: f32,
    frame: u64,
    config: &CurveConfig,
) -> Option<Vec2> {
    let delta = cursor - point;
    let distance = delta.length();
    if !(distance < config.interaction_radius) {
        return None;
    }
    let falloff = 1.0 - (distance / config.interaction_radius).min(1.0);
    let strength = config.interaction_strength * (size + 0.5);
    let attraction = (t * PI * 4.0 + frame as f32 * 0.02).sin() * 0.7;
    Some(delta.normalize_or_zero() * strength * falloff * attraction)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveState {
    /// No measurement yet.
    Uninitialized,
    /// Anchors known, flow dots not yet distributed.
    AnchorsReady,
    DotsSeeded,
    Animating,
    /// Layout changed; waiting for a fresh measurement.
    AnchorsStale,
}

#[derive(Debug, Clone)]
pub struct CurveField {
    state: CurveState,
    anchors: Vec<Anchor>,
    dots: Vec<FlowDot>,
    seeded_segments: Option<usize>,
    config: CurveConfig,
}

impl CurveField {
    pub fn new(config: CurveConfig) -> Self {
        Self {
            state: CurveState::Uninitialized,
            anchors: Vec::new(),
            dots: Vec::new(),
            seeded_segments: None,
            config,
        }
    }

    pub fn state(&self) -> CurveState {
        self.state
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn dots(&self) -> &[FlowDot] {
        &self.dots
    }

    pub fn segment_count(&self) -> usize {
        self.anchors.len().saturating_sub(1)
    }

    /// Take a fresh set of anchors. Existing flow dots survive when the
    /// segment count is unchanged.
    pub fn layout_measured(&mut self, mut anchors: Vec<Anchor>) {
        anchors.sort_by_key(|a| a.index);
        self.anchors = anchors;
        let segments = self.segment_count();

        if self.seeded_segments == Some(segments) {
            log::debug!("curves: remeasured {} segments, keeping flow dots", segments);
            self.state = CurveState::DotsSeeded;
        } else {
            log::debug!("curves: measured {} segments", segments);
            self.dots.clear();
            self.seeded_segments = None;
            self.state = CurveState::AnchorsReady;
        }
    }

    pub fn layout_invalidated(&mut self) {
        if self.state != CurveState::Uninitialized {
            log::debug!("curves: anchors stale");
            self.state = CurveState::AnchorsStale;
        }
    }

    /// Distribute flow dots along every segment.
    pub fn seed(&mut self, rng: &mut Rng) {
        self.dots.clear();
        let config = self.config;
        for segment in 0..self.segment_count() {
            let count = config.dots_base + rng.next_int(config.dots_spread);
            for j in 0..count {
                let progress = j as f32 / count as f32 + rng.next_f32() * config.progress_jitter;
                self.dots.push(FlowDot::random(segment, progress, &config, rng));
            }
        }
        self.seeded_segments = Some(self.segment_count());
        self.state = CurveState::DotsSeeded;
        log::debug!("curves: seeded {} flow dots", self.dots.len());
    }

    /// Viewport curves per segment; `None` for segments outside the margin.
    pub fn visible_curves(&self, scroll_y: f32, viewport: Bounds) -> Vec<Option<Curve>> {
        self.anchors
            .windows(2)
            .map(|pair| {
                let curve = Curve::between(&pair[0], &pair[1], scroll_y);
                curve
                    .is_visible(viewport, self.config.offscreen_margin)
                    .then_some(curve)
            })
            .collect()
    }

    /// One logical frame: advance every dot, then place the ones on visible
    /// segments and apply the cursor perturbation.
    pub fn update(
        &mut self,
        cursor: Option<Vec2>,
        scroll_y: f32,
        viewport: Bounds,
        frame: u64,
        rng: &mut Rng,
    ) {
        match self.state {
            CurveState::Uninitialized | CurveState::AnchorsStale => return,
            CurveState::AnchorsReady => self.seed(rng),
            CurveState::DotsSeeded | CurveState::Animating => {}
        }

        let config = self.config;
        for dot in &mut self.dots {
            dot.advance(&config, rng);
        }

        let curves = self.visible_curves(scroll_y, viewport);
        for dot in &mut self.dots {
            let Some(curve) = curves.get(dot.segment).copied().flatten() else {
                dot.placed = None;
                continue;
            };
            let t = dot.progress;
            let mut point = curve.point_at(t);
            if let Some(cursor) = cursor {
                if let Some(offset) = cursor_offset(point, cursor, t, dot.size, frame, &config) {
                    point += offset;
                    dot.opacity = (dot.opacity * config.opacity_boost).min(config.opacity_cap);
                }
            }
            dot.placed = Some(point);
        }

        self.state = CurveState::Animating;
    }

    pub fn draw(&self, draw: &mut DrawList, ink: Rgba) {
        if self.state != CurveState::Animating {
            return;
        }
        for dot in &self.dots {
            if let Some(p) = dot.placed {
                draw.circle(p, dot.size, ink.with_alpha(dot.opacity));
            }
        }
    }
}

impl Default for CurveField {
    fn default() -> Self {
        Self::new(CurveConfig::default())
    }
}
