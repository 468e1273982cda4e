//! requestAnimationFrame driver.
//!
//! The loop holds its browser callback for as long as it lives. Dropping it
//! cancels the outstanding frame request and frees the callback, so no
//! callbacks fire after teardown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dotfield_engine::EngineError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

type FrameCallback = Closure<dyn FnMut(f64)>;

pub struct FrameLoop {
    window: web_sys::Window,
    handle: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    /// Start calling `on_frame(timestamp_ms)` once per display refresh.
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, EngineError> {
        let window =
            web_sys::window().ok_or_else(|| EngineError::Surface("no global window".into()))?;

        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        // The closure only holds a weak reference to itself; the loop owns it.
        let handle_cb = Rc::clone(&handle);
        let callback_cb = Rc::downgrade(&callback);
        let window_cb = window.clone();
        let closure = Closure::wrap(Box::new(move |timestamp: f64| {
            handle_cb.set(None);
            on_frame(timestamp);

            let Some(callback) = callback_cb.upgrade() else {
                return;
            };
            let borrow = callback.borrow();
            let Some(cb) = borrow.as_ref() else {
                return;
            };
            match window_cb.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => handle_cb.set(Some(id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
        }) as Box<dyn FnMut(f64)>);

        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|e| EngineError::Surface(format!("requestAnimationFrame: {:?}", e)))?;
        handle.set(Some(id));
        *callback.borrow_mut() = Some(closure);

        log::debug!("frame loop started");
        Ok(Self {
            window,
            handle,
            callback,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.handle.get().is_some()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        self.callback.borrow_mut().take();
        log::debug!("frame loop stopped");
    }
}
