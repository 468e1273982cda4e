pub mod frame_loop;
pub mod painter;
pub mod runner;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use dotfield_engine::{Anchor, Bounds, CursorReader, CursorStore, Rect, ShapeSource, Theme, View};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub use dotfield_engine::{ConfiguredView, InputEvent};
pub use frame_loop::FrameLoop;
pub use painter::CanvasPainter;
pub use runner::ViewRunner;

static LOGGING: Once = Once::new();

/// Install the panic hook and console logger. Safe to call repeatedly.
pub fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    });
}

/// The page-wide cursor. Create one, feed it pointer and touch positions in
/// client coordinates, and hand it to every canvas.
#[wasm_bindgen]
pub struct SharedCursor {
    store: CursorStore,
}

#[wasm_bindgen]
impl SharedCursor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SharedCursor {
        init_logging();
        SharedCursor {
            store: CursorStore::new(),
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.store.update_position(x, y);
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        self.store.update_position(x, y);
    }
}

impl SharedCursor {
    pub fn reader(&self) -> CursorReader {
        self.store.reader()
    }
}

impl Default for SharedCursor {
    fn default() -> Self {
        Self::new()
    }
}

struct HostState<V: View> {
    runner: ViewRunner<V>,
    painter: Option<CanvasPainter>,
    dpr: f64,
    last_timestamp: Option<f64>,
}

impl<V: View> HostState<V> {
    fn frame(&mut self, timestamp: f64) {
        let dt = match self.last_timestamp {
            Some(last) => ((timestamp - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp);

        if !self.runner.tick(dt) {
            return;
        }
        let Some(painter) = self.painter.as_mut() else {
            return;
        };
        let surface = self.runner.surface();
        let result = painter
            .resize(surface, self.dpr)
            .and_then(|()| painter.paint(self.runner.draw_list()));
        if let Err(e) = result {
            log::error!("paint failed: {}", e);
        }
    }
}

/// Owns one canvas: its runner, its painter and its frame loop.
///
/// wasm-bindgen cannot export generic structs, so [`export_view!`] wraps a
/// concrete `CanvasHost<V>` per view type.
pub struct CanvasHost<V: View + 'static> {
    state: Rc<RefCell<HostState<V>>>,
    frame_loop: Option<FrameLoop>,
}

impl<V: View + 'static> CanvasHost<V> {
    pub fn new(canvas: HtmlCanvasElement, cursor: &SharedCursor, view: V) -> Self {
        init_logging();
        let painter = match CanvasPainter::new(canvas) {
            Ok(painter) => Some(painter),
            Err(e) => {
                log::error!("{}; canvas will stay blank", e);
                None
            }
        };
        let seed = js_sys::Date::now() as u64;
        let mut runner = ViewRunner::new(view, cursor.reader(), seed);
        runner.init();

        Self {
            state: Rc::new(RefCell::new(HostState {
                runner,
                painter,
                dpr: 1.0,
                last_timestamp: None,
            })),
            frame_loop: None,
        }
    }

    pub fn start(&mut self) {
        if self.frame_loop.is_some() {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            state.runner.resume();
            state.last_timestamp = None;
        }
        let state = Rc::clone(&self.state);
        match FrameLoop::start(move |timestamp| state.borrow_mut().frame(timestamp)) {
            Ok(frame_loop) => self.frame_loop = Some(frame_loop),
            Err(e) => log::error!("{}", e),
        }
    }

    /// Cancel the frame loop. A pending resize settles after `start`.
    pub fn stop(&mut self) {
        self.frame_loop = None;
        self.state.borrow_mut().runner.stop();
    }

    pub fn push(&self, event: InputEvent) {
        self.state.borrow_mut().runner.push_input(event);
    }

    pub fn scroll(&self, y: f32) {
        self.push(InputEvent::Scroll { y });
    }

    pub fn resize(&self, width: f32, height: f32, dpr: f64) {
        self.state.borrow_mut().dpr = dpr;
        self.push(InputEvent::Resize { width, height });
    }

    pub fn set_container(&self, x: f32, y: f32, width: f32, height: f32) {
        self.push(InputEvent::Container(Rect::new(x, y, width, height)));
    }

    pub fn set_dark_mode(&self, dark: bool) {
        self.push(InputEvent::Theme(Theme::from_dark_flag(dark)));
    }

    pub fn set_rainbow(&self, on: bool) {
        self.push(InputEvent::Rainbow(on));
    }

    pub fn layout_measured(&self, json: &str) {
        match Anchor::list_from_json(json) {
            Ok(anchors) => self.push(InputEvent::LayoutMeasured(anchors)),
            Err(e) => log::warn!("{}", e),
        }
    }

    pub fn layout_invalidated(&self) {
        self.push(InputEvent::LayoutInvalidated);
    }

    pub fn shape_loaded(&self, json: &str) {
        match ShapeSource::from_json(json) {
            Ok(source) => self.push(InputEvent::ShapeLoaded(source)),
            Err(e) => {
                log::warn!("{}", e);
                self.push(InputEvent::ShapeFailed(e.to_string()));
            }
        }
    }

    pub fn shape_failed(&self, reason: &str) {
        self.push(InputEvent::ShapeFailed(reason.to_string()));
    }

    pub fn surface(&self) -> Bounds {
        self.state.borrow().runner.surface()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.state.borrow().runner.vector_vertices_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.state.borrow().runner.vector_vertex_count()
    }
}

/// Generate a `#[wasm_bindgen]` canvas class for a view.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use dotfield_engine::SwarmView;
///
/// dotfield_web::export_view!(SwarmCanvas, SwarmView, "swarm");
/// ```
///
/// From JavaScript:
///
/// ```js
/// const cursor = new SharedCursor();
/// const swarm = new SwarmCanvas(canvasEl, cursor, null);
/// swarm.resize(innerWidth, innerHeight, devicePixelRatio);
/// swarm.start();
/// ```
///
/// # Arguments
///
/// - `$handle`: name of the generated JavaScript class
/// - `$view`: a type implementing `dotfield_engine::ConfiguredView`
/// - `$name`: string literal used in log messages
#[macro_export]
macro_rules! export_view {
    ($handle:ident, $view:ty, $name:literal) => {
        #[wasm_bindgen]
        pub struct $handle {
            host: $crate::CanvasHost<$view>,
        }

        #[wasm_bindgen]
        impl $handle {
            /// `config_json` is an optional camelCase view config; missing
            /// fields use their defaults.
            #[wasm_bindgen(constructor)]
            pub fn new(
                canvas: web_sys::HtmlCanvasElement,
                cursor: &$crate::SharedCursor,
                config_json: Option<String>,
            ) -> $handle {
                $crate::init_logging();
                let view = <$view as $crate::ConfiguredView>::from_json(config_json.as_deref());
                log::info!("{}: canvas created", $name);
                $handle {
                    host: $crate::CanvasHost::new(canvas, cursor, view),
                }
            }

            pub fn start(&mut self) {
                self.host.start();
            }

            pub fn stop(&mut self) {
                self.host.stop();
                log::info!("{}: stopped", $name);
            }

            pub fn scroll(&self, y: f32) {
                self.host.scroll(y);
            }

            pub fn resize(&self, width: f32, height: f32, dpr: f64) {
                self.host.resize(width, height, dpr);
            }

            pub fn set_container(&self, x: f32, y: f32, width: f32, height: f32) {
                self.host.set_container(x, y, width, height);
            }

            pub fn set_dark_mode(&self, dark: bool) {
                self.host.set_dark_mode(dark);
            }

            pub fn set_rainbow(&self, on: bool) {
                self.host.set_rainbow(on);
            }

            pub fn layout_measured(&self, json: &str) {
                self.host.layout_measured(json);
            }

            pub fn layout_invalidated(&self) {
                self.host.layout_invalidated();
            }

            pub fn shape_loaded(&self, json: &str) {
                self.host.shape_loaded(json);
            }

            pub fn shape_failed(&self, reason: &str) {
                self.host.shape_failed(reason);
            }
        }
    };

    // Variant with vectors feature
    ($handle:ident, $view:ty, $name:literal, vectors) => {
        $crate::export_view!($handle, $view, $name);

        #[wasm_bindgen]
        impl $handle {
            pub fn vector_vertices_ptr(&self) -> *const f32 {
                self.host.vector_vertices_ptr()
            }

            pub fn vector_vertex_count(&self) -> u32 {
                self.host.vector_vertex_count()
            }
        }
    };
}
