use dotfield_engine::{
    Bounds, CursorReader, Debounce, DrawList, EngineContext, FixedTimestep, InputEvent,
    InputQueue, Rect, RenderContext, Rng, View, ViewConfig,
};
#[cfg(feature = "vectors")]
use dotfield_engine::VectorState;

/// Generic view runner that wires up the engine loop.
///
/// Each exported canvas owns one runner. It has no browser dependencies, so
/// the whole frame pipeline can be driven from native tests.
pub struct ViewRunner<V: View> {
    view: V,
    ctx: EngineContext,
    input: InputQueue,
    draw: DrawList,
    /// Separate generator for render-time randomness (rainbow colours).
    render_rng: Rng,
    timestep: FixedTimestep,
    config: ViewConfig,
    resize: Debounce,
    pending_viewport: Option<Bounds>,
    pending_container: Option<Rect>,
    initialized: bool,
    stopped: bool,
    #[cfg(feature = "vectors")]
    vectors: VectorState,
}

impl<V: View> ViewRunner<V> {
    pub fn new(view: V, cursor: CursorReader, seed: u64) -> Self {
        let config = view.config();
        Self {
            timestep: FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps_per_frame),
            resize: Debounce::new(config.resize_debounce_ms),
            draw: DrawList::with_capacity(config.draw_capacity),
            ctx: EngineContext::new(cursor, seed),
            render_rng: Rng::new(seed.rotate_left(17) ^ 0x9E37_79B9_7F4A_7C15),
            input: InputQueue::new(),
            pending_viewport: None,
            pending_container: None,
            initialized: false,
            stopped: false,
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(),
            config,
            view,
        }
    }

    /// Initialize the view. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.view.config();
        self.view.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Queue a host event; it is applied at the start of the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Late ticks after this are ignored. A pending resize stays armed and
    /// settles once the clock moves again after `resume`.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn resume(&mut self) {
        self.stopped = false;
        self.timestep.reset();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Run one display frame: apply input, settle resizes, step the
    /// simulation, rebuild the draw list. Returns false when nothing ran.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.initialized || self.stopped {
            return false;
        }

        for event in self.input.drain() {
            self.apply(event);
        }

        if self.resize.fire(self.ctx.now_ms()) {
            self.settle_resize();
        }

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.ctx.clock.advance(self.timestep.dt());
            self.view.update(&mut self.ctx);
        }

        self.draw.reset();
        {
            let mut render_ctx = RenderContext {
                engine: &self.ctx,
                draw: &mut self.draw,
                rng: &mut self.render_rng,
            };
            self.view.render(&mut render_ctx);
        }

        #[cfg(feature = "vectors")]
        self.vectors.tessellate(&self.draw, self.ctx.surface());

        true
    }

    fn apply(&mut self, event: InputEvent) {
        let now = self.ctx.now_ms();
        match event {
            InputEvent::Scroll { y } => self.ctx.scroll_y = y,
            InputEvent::Resize { width, height } => {
                let bounds = Bounds::new(width, height);
                if self.ctx.viewport.is_empty() {
                    // First measurement: nothing to debounce against.
                    self.ctx.viewport = bounds;
                    self.view.resize(&mut self.ctx);
                } else if bounds != self.ctx.viewport || self.pending_viewport.is_some() {
                    // Latest size wins, even one equal to the current viewport.
                    self.pending_viewport = Some(bounds);
                    self.resize.trigger(now);
                }
            }
            InputEvent::Container(rect) => {
                let current = self.ctx.container.size();
                if current.is_empty() {
                    self.ctx.container = rect;
                    self.view.resize(&mut self.ctx);
                } else if rect.size() == current && self.pending_container.is_none() {
                    // Moved, not resized: takes effect at once.
                    self.ctx.container = rect;
                } else {
                    self.ctx.container.x = rect.x;
                    self.ctx.container.y = rect.y;
                    self.pending_container = Some(rect);
                    self.resize.trigger(now);
                }
            }
            InputEvent::Theme(theme) => self.ctx.theme = theme,
            InputEvent::LayoutMeasured(anchors) => self.view.layout_measured(&mut self.ctx, anchors),
            InputEvent::LayoutInvalidated => self.view.layout_invalidated(&mut self.ctx),
            InputEvent::ShapeLoaded(source) => self.view.shape_loaded(&mut self.ctx, source),
            InputEvent::ShapeFailed(reason) => self.view.shape_failed(&mut self.ctx, &reason),
            InputEvent::Rainbow(on) => self.view.set_rainbow(on),
        }
    }

    fn settle_resize(&mut self) {
        let before = (self.ctx.viewport, self.ctx.container.size());
        if let Some(viewport) = self.pending_viewport.take() {
            self.ctx.viewport = viewport;
        }
        if let Some(container) = self.pending_container.take() {
            self.ctx.container = container;
        }
        if (self.ctx.viewport, self.ctx.container.size()) == before {
            log::debug!("resize burst ended where it started");
            return;
        }
        log::debug!(
            "resize settled: viewport {:?}, surface {:?}",
            self.ctx.viewport,
            self.ctx.surface()
        );
        self.view.resize(&mut self.ctx);
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw
    }

    /// Size the painter should give its canvas, in CSS pixels.
    pub fn surface(&self) -> Bounds {
        self.ctx.surface()
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    // ---- Vector accessors for GPU hosts ----

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotfield_engine::{
        Anchor, CurveState, CursorStore, DrawCommand, SwarmView, Theme, TimelineView,
    };

    const FRAME: f32 = 1.0 / 60.0;

    fn swarm_runner(store: &CursorStore) -> ViewRunner<SwarmView> {
        let mut runner = ViewRunner::new(SwarmView::new(), store.reader(), 42);
        runner.init();
        runner
    }

    #[test]
    fn tick_before_init_is_a_no_op() {
        let store = CursorStore::new();
        let mut runner = ViewRunner::new(SwarmView::new(), store.reader(), 1);
        assert!(!runner.tick(FRAME));
        assert!(runner.draw_list().is_empty());
    }

    #[test]
    fn first_resize_applies_immediately() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.push_input(InputEvent::Resize { width: 800.0, height: 600.0 });
        assert!(runner.tick(FRAME));
        assert_eq!(runner.context().viewport, Bounds::new(800.0, 600.0));
        assert_eq!(runner.view().field().len(), 100);
        assert_eq!(runner.draw_list().circle_count(), 100);
    }

    #[test]
    fn later_resizes_wait_for_quiet() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.push_input(InputEvent::Resize { width: 800.0, height: 600.0 });
        runner.tick(FRAME);

        // A burst of resizes, one per frame.
        for i in 0..5 {
            runner.push_input(InputEvent::Resize { width: 700.0 - i as f32 * 10.0, height: 500.0 });
            runner.tick(FRAME);
            assert_eq!(runner.context().viewport, Bounds::new(800.0, 600.0));
        }

        // 200ms of quiet is 12 frames; give it a few more.
        for _ in 0..15 {
            runner.tick(FRAME);
        }
        assert_eq!(runner.context().viewport, Bounds::new(660.0, 500.0));
        assert!(runner
            .view()
            .field()
            .particles()
            .iter()
            .all(|p| p.position.x <= 660.0 + 1.3));
    }

    #[test]
    fn resize_back_to_current_size_settles_there() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.push_input(InputEvent::Resize { width: 800.0, height: 600.0 });
        runner.tick(FRAME);

        runner.push_input(InputEvent::Resize { width: 700.0, height: 600.0 });
        runner.tick(FRAME);
        runner.push_input(InputEvent::Resize { width: 800.0, height: 600.0 });
        runner.tick(FRAME);
        for _ in 0..30 {
            runner.tick(FRAME);
        }
        assert_eq!(runner.context().viewport, Bounds::new(800.0, 600.0));
    }

    #[test]
    fn pending_resize_settles_after_resume() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.push_input(InputEvent::Resize { width: 800.0, height: 600.0 });
        runner.tick(FRAME);
        runner.push_input(InputEvent::Resize { width: 700.0, height: 500.0 });
        runner.tick(FRAME);

        runner.stop();
        assert!(!runner.tick(FRAME));
        runner.resume();
        for _ in 0..60 {
            runner.tick(FRAME);
        }
        assert_eq!(runner.context().viewport, Bounds::new(700.0, 500.0));
    }

    #[test]
    fn first_container_applies_immediately() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        let rect = Rect::new(10.0, 20.0, 400.0, 300.0);
        runner.push_input(InputEvent::Container(rect));
        runner.tick(FRAME);
        assert_eq!(runner.context().container, rect);
        assert_eq!(runner.surface(), Bounds::new(400.0, 300.0));
    }

    #[test]
    fn container_move_applies_immediately() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.push_input(InputEvent::Container(Rect::new(10.0, 20.0, 400.0, 300.0)));
        runner.tick(FRAME);

        let moved = Rect::new(50.0, 60.0, 400.0, 300.0);
        runner.push_input(InputEvent::Container(moved));
        runner.tick(FRAME);
        assert_eq!(runner.context().container, moved);
    }

    #[test]
    fn container_size_change_waits_for_quiet() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.push_input(InputEvent::Container(Rect::new(10.0, 20.0, 400.0, 300.0)));
        runner.tick(FRAME);

        runner.push_input(InputEvent::Container(Rect::new(0.0, 5.0, 500.0, 300.0)));
        runner.tick(FRAME);
        let container = runner.context().container;
        assert_eq!((container.x, container.y), (0.0, 5.0), "origin follows at once");
        assert_eq!(container.size(), Bounds::new(400.0, 300.0), "size is debounced");

        for _ in 0..15 {
            runner.tick(FRAME);
        }
        assert_eq!(runner.context().container, Rect::new(0.0, 5.0, 500.0, 300.0));
        assert_eq!(runner.surface(), Bounds::new(500.0, 300.0));
    }

    #[test]
    fn container_resize_and_back_keeps_latest_rect() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.push_input(InputEvent::Container(Rect::new(10.0, 20.0, 400.0, 300.0)));
        runner.tick(FRAME);

        runner.push_input(InputEvent::Container(Rect::new(0.0, 0.0, 500.0, 300.0)));
        runner.tick(FRAME);
        let back = Rect::new(5.0, 5.0, 400.0, 300.0);
        runner.push_input(InputEvent::Container(back));
        runner.tick(FRAME);
        for _ in 0..30 {
            runner.tick(FRAME);
        }
        assert_eq!(runner.context().container, back);
    }

    #[test]
    fn layout_before_first_resize_still_animates() {
        let store = CursorStore::new();
        let mut runner = ViewRunner::new(TimelineView::new(), store.reader(), 9);
        runner.init();
        let anchors = Anchor::list_from_json(
            r#"[{"x": 300, "y": 100, "index": 0}, {"x": 500, "y": 400, "index": 1}]"#,
        )
        .expect("valid anchors");
        runner.push_input(InputEvent::LayoutMeasured(anchors));
        runner.push_input(InputEvent::Resize { width: 1000.0, height: 800.0 });
        for _ in 0..30 {
            runner.tick(FRAME);
        }
        assert_eq!(runner.view().curves().state(), CurveState::Animating);
    }

    #[test]
    fn steps_are_capped_per_frame() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.tick(5.0);
        assert_eq!(runner.context().frame(), 10);
        runner.tick(FRAME * 0.5);
        assert_eq!(runner.context().frame(), 10);
        runner.tick(FRAME * 0.6);
        assert_eq!(runner.context().frame(), 11);
    }

    #[test]
    fn stop_makes_late_ticks_no_ops() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.tick(FRAME);
        let frame = runner.context().frame();
        runner.stop();
        assert!(!runner.tick(FRAME));
        assert_eq!(runner.context().frame(), frame);

        runner.resume();
        assert!(runner.tick(FRAME));
    }

    #[test]
    fn theme_and_scroll_apply_before_render() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.push_input(InputEvent::Theme(Theme::Dark));
        runner.push_input(InputEvent::Scroll { y: 320.0 });
        runner.tick(FRAME);
        assert_eq!(runner.context().scroll_y, 320.0);
        assert_eq!(
            runner.draw_list().commands()[0],
            DrawCommand::Fill { color: Theme::Dark.background() }
        );
    }

    #[test]
    fn layout_events_reach_the_view() {
        let store = CursorStore::new();
        let mut runner = ViewRunner::new(TimelineView::new(), store.reader(), 9);
        runner.init();
        let anchors = Anchor::list_from_json(
            r#"[{"x": 300, "y": 100, "index": 0}, {"x": 500, "y": 400, "index": 1}]"#,
        )
        .expect("valid anchors");
        runner.push_input(InputEvent::Resize { width: 1000.0, height: 800.0 });
        runner.push_input(InputEvent::LayoutMeasured(anchors));
        runner.tick(FRAME);
        assert_eq!(runner.view().curves().state(), CurveState::Animating);

        runner.push_input(InputEvent::LayoutInvalidated);
        runner.tick(FRAME);
        assert_eq!(runner.view().curves().state(), CurveState::AnchorsStale);
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn draw_list_is_tessellated() {
        let store = CursorStore::new();
        let mut runner = swarm_runner(&store);
        runner.push_input(InputEvent::Resize { width: 320.0, height: 240.0 });
        runner.tick(FRAME);
        assert!(runner.vector_vertex_count() > 6);
        assert!(!runner.vector_vertices_ptr().is_null());
    }
}
