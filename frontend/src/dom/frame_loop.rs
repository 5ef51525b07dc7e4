use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::LogFailure;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A requestAnimationFrame loop that can be stopped and restarted.
///
/// The callback re-requests itself while running. `stop` cancels the
/// pending frame so nothing is drawn while particles are suspended.
#[derive(Clone)]
pub struct FrameLoop {
    window: Window,
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub fn new(window: Window, mut on_frame: impl FnMut() + 'static) -> Self {
        let running = Rc::new(Cell::new(false));
        let pending = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let frame = {
            let window = window.clone();
            let running = running.clone();
            let pending = pending.clone();
            let callback = callback.clone();
            Closure::wrap(Box::new(move || {
                pending.set(None);
                if !running.get() {
                    return;
                }
                on_frame();
                if let Some(next) = callback.borrow().as_ref() {
                    match window.request_animation_frame(next.as_ref().unchecked_ref()) {
                        Ok(handle) => pending.set(Some(handle)),
                        Err(err) => {
                            warn!("animation frame request failed: {:?}", err);
                            running.set(false);
                        }
                    }
                }
            }) as Box<dyn FnMut()>)
        };
        *callback.borrow_mut() = Some(frame);

        Self {
            window,
            running,
            pending,
            callback,
        }
    }

    pub fn start(&self) {
        if self.running.replace(true) {
            return;
        }
        let callback = self.callback.borrow();
        let Some(frame) = callback.as_ref() else {
            self.running.set(false);
            return;
        };
        match self.window.request_animation_frame(frame.as_ref().unchecked_ref()) {
            Ok(handle) => self.pending.set(Some(handle)),
            Err(err) => {
                warn!("animation frame request failed: {:?}", err);
                self.running.set(false);
            }
        }
    }

    pub fn stop(&self) {
        self.running.set(false);
        if let Some(handle) = self.pending.take() {
            self.window.cancel_animation_frame(handle).log_failure("cancel_animation_frame");
        }
    }

    /// Stops the loop and drops the frame closure, breaking its
    /// self-reference. The loop cannot be started again afterwards.
    pub fn dispose(&self) {
        self.stop();
        self.callback.borrow_mut().take();
    }
}
