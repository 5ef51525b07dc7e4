use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

use crate::error::{LogFailure, Result};

struct Binding {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// DOM listeners owned by the page; every one is removed on drop.
#[derive(Default)]
pub struct Listeners {
    bindings: Vec<Binding>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Adds a listener whose event is cast to `E` before `handler` sees it.
    /// Events of another type are ignored.
    pub fn listen<E, F>(&mut self, target: &EventTarget, event: &'static str, handler: F) -> Result<()>
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        self.bind(target, event, handler, None)
    }

    /// Like `listen`, but registered as non-passive so the handler may
    /// call `prevent_default`.
    pub fn listen_active<E, F>(&mut self, target: &EventTarget, event: &'static str, handler: F) -> Result<()>
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        self.bind(target, event, handler, Some(options))
    }

    fn bind<E, F>(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        mut handler: F,
        options: Option<AddEventListenerOptions>,
    ) -> Result<()>
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        let callback = Closure::wrap(Box::new(move |event: Event| {
            if let Ok(event) = event.dyn_into::<E>() {
                handler(event);
            }
        }) as Box<dyn FnMut(Event)>);

        match &options {
            Some(options) => target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                options,
            )?,
            None => target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?,
        }

        self.bindings.push(Binding {
            target: target.clone(),
            event,
            callback,
        });
        Ok(())
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for binding in self.bindings.drain(..) {
            binding
                .target
                .remove_event_listener_with_callback(binding.event, binding.callback.as_ref().unchecked_ref())
                .log_failure("remove_event_listener");
        }
    }
}
