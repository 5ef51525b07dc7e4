use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::js_sys;
use web_sys::{
    Document, Element, EventTarget, KeyboardEvent, MediaQueryListEvent, MouseEvent, TouchEvent, WheelEvent,
    Window,
};

use crate::config::{LandingConfig, CONFIG_ELEMENT_ID};
use crate::dom::canvas::{attach_canvases, resize_canvases, SectionCanvas};
use crate::dom::effects::{self, DomContents};
use crate::dom::frame_loop::FrameLoop;
use crate::dom::listeners::Listeners;
use crate::engine::controller::{progress_percent, PageController, PageEffect};
use crate::engine::motion::MotionEffect;
use crate::engine::particles::ParticleEngine;
use crate::engine::sections::SectionId;
use crate::error::{LandingError, Result};

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type Page = PageController<DomContents>;

/// Everything an event handler or timer needs to drive the page.
#[derive(Clone)]
struct PageHandle {
    window: Window,
    document: Document,
    page: Rc<RefCell<Page>>,
    canvases: Rc<Vec<SectionCanvas>>,
    frames: FrameLoop,
    alive: Rc<Cell<bool>>,
}

impl PageHandle {
    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    /// Runs `action` against the controller, then applies whatever it
    /// produced.
    fn dispatch<R>(&self, action: impl FnOnce(&mut Page, f64) -> R) -> R {
        let now = self.now();
        let result = action(&mut self.page.borrow_mut(), now);
        self.pump();
        result
    }

    fn pump(&self) {
        if !self.alive.get() {
            return;
        }
        let (effects, wakeups) = {
            let mut page = self.page.borrow_mut();
            (page.take_effects(), page.take_wakeups())
        };
        for effect in effects {
            self.apply(effect);
        }
        for delay in wakeups {
            let handle = self.clone();
            Timeout::new(delay.max(0.0).ceil() as u32, move || {
                if handle.alive.get() {
                    handle.dispatch(|page, now| page.run_due(now));
                }
            })
            .forget();
        }
    }

    fn apply(&self, effect: PageEffect) {
        match effect {
            PageEffect::Slide { transition, animate } => {
                effects::apply_slide(&self.window, &self.document, transition, animate)
            }
            PageEffect::ClearSlide { from, to } => effects::clear_slide(&self.document, from, to),
            PageEffect::Entry { step, instant } => effects::apply_entry(&self.document, &step, instant),
            PageEffect::HideLoadingScreen => effects::hide_loading_screen(&self.document),
            PageEffect::Motion(motion) => {
                match motion {
                    MotionEffect::SuspendParticles => self.frames.stop(),
                    MotionEffect::ResumeParticles => self.frames.start(),
                    _ => {}
                }
                effects::apply_motion(&self.document, motion);
            }
        }
    }

    /// Converts viewport coordinates to the canvas space of `section`.
    fn local_point(&self, section: usize, client_x: i32, client_y: i32) -> (f64, f64) {
        let (left, top) = self
            .canvases
            .iter()
            .find(|canvas| canvas.section.index() == section)
            .map(|canvas| canvas.origin())
            .unwrap_or((0.0, 0.0));
        (client_x as f64 - left, client_y as f64 - top)
    }

    fn current_point(&self, client_x: i32, client_y: i32) -> (f64, f64) {
        let current = self.page.borrow().current_section();
        self.local_point(current, client_x, client_y)
    }
}

/// The mounted landing page. Dropping it detaches every listener, stops
/// the frame loop and cancels pending work.
pub struct Runtime {
    handle: PageHandle,
    _listeners: Listeners,
}

impl Runtime {
    pub fn mount() -> Result<Self> {
        let window = web_sys::window().ok_or(LandingError::MissingDom("window"))?;
        let document = window.document().ok_or(LandingError::MissingDom("document"))?;

        let reduced_motion = window
            .match_media(REDUCED_MOTION_QUERY)?
            .map(|query| query.matches())
            .unwrap_or(false);
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;

        let mut engine = ParticleEngine::new(seed);
        let canvases = attach_canvases(&document, &mut engine);
        if let Some(config) = load_config(&document) {
            if let Err(err) = config.apply_to(&mut engine) {
                warn!("ignoring landing config: {}", err);
            }
        }

        let mut page = PageController::new(
            DomContents::new(document.clone()),
            engine,
            reduced_motion,
            seed.rotate_left(17),
        );
        {
            let document = document.clone();
            page.subscribe(Box::new(move |index| {
                effects::show_section(&document, index, progress_percent(index));
            }));
        }

        let page = Rc::new(RefCell::new(page));
        let canvases = Rc::new(canvases);
        let frames = {
            let page = page.clone();
            let canvases = canvases.clone();
            FrameLoop::new(window.clone(), move || {
                page.borrow_mut().frame();
                let page = page.borrow();
                for canvas in canvases.iter() {
                    canvas.render(page.engine());
                }
            })
        };

        let handle = PageHandle {
            window,
            document,
            page,
            canvases,
            frames,
            alive: Rc::new(Cell::new(true)),
        };
        let listeners = bind_listeners(&handle)?;

        handle.frames.start();
        handle.dispatch(|page, now| page.start(now));
        info!(
            "landing page mounted: {} particle canvases, {} listeners, reduced motion {}",
            handle.canvases.len(),
            listeners.len(),
            reduced_motion
        );

        Ok(Self {
            handle,
            _listeners: listeners,
        })
    }

    pub fn go_to(&self, index: usize) {
        self.handle.dispatch(|page, now| page.go_to(index, now));
    }

    pub fn next(&self) {
        self.handle.dispatch(|page, now| page.next(now));
    }

    pub fn prev(&self) {
        self.handle.dispatch(|page, now| page.prev(now));
    }

    pub fn current_section(&self) -> usize {
        self.handle.page.borrow().current_section()
    }

    /// Bursts `count` particles at a viewport point inside the named
    /// section. Unknown names are ignored.
    pub fn add_burst_effect(&self, section_name: &str, client_x: i32, client_y: i32, count: usize) {
        let Ok(section) = section_name.parse::<SectionId>() else {
            debug!("burst for unknown section {}", section_name);
            return;
        };
        let (x, y) = self.handle.local_point(section.index(), client_x, client_y);
        self.handle
            .dispatch(|page, _| page.add_burst_effect(section_name, x, y, count));
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.handle.alive.set(false);
        self.handle.frames.dispose();
        debug!("landing page unmounted");
    }
}

fn load_config(document: &Document) -> Option<LandingConfig> {
    let text = document.get_element_by_id(CONFIG_ELEMENT_ID)?.text_content()?;
    match LandingConfig::parse(&text) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!("ignoring landing config: {}", err);
            None
        }
    }
}

fn is_text_input(target: Option<EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<Element>().ok())
        .map(|el| {
            let tag = el.tag_name();
            tag == "INPUT" || tag == "TEXTAREA" || el.get_attribute("contenteditable").is_some()
        })
        .unwrap_or(false)
}

fn bind_listeners(handle: &PageHandle) -> Result<Listeners> {
    let mut listeners = Listeners::new();
    let window: &EventTarget = handle.window.as_ref();
    let document: &EventTarget = handle.document.as_ref();

    let h = handle.clone();
    listeners.listen_active(window, "wheel", move |ev: WheelEvent| {
        ev.prevent_default();
        h.dispatch(|page, now| page.on_wheel(ev.delta_y(), now));
    })?;

    let h = handle.clone();
    listeners.listen_active(document, "keydown", move |ev: KeyboardEvent| {
        if is_text_input(ev.target()) {
            return;
        }
        if h.dispatch(|page, now| page.on_key(&ev.key(), now)) {
            ev.prevent_default();
        }
    })?;

    let h = handle.clone();
    listeners.listen(document, "touchstart", move |ev: TouchEvent| {
        if let Some(touch) = ev.changed_touches().get(0) {
            h.page
                .borrow_mut()
                .on_touch_start(touch.client_x() as f64, touch.client_y() as f64);
        }
    })?;

    let h = handle.clone();
    listeners.listen(document, "touchend", move |ev: TouchEvent| {
        if let Some(touch) = ev.changed_touches().get(0) {
            let (x, y) = (touch.client_x() as f64, touch.client_y() as f64);
            h.dispatch(|page, now| page.on_touch_end(x, y, now));
        }
    })?;

    let h = handle.clone();
    listeners.listen(document, "mousemove", move |ev: MouseEvent| {
        let (x, y) = h.current_point(ev.client_x(), ev.client_y());
        h.dispatch(|page, now| page.on_pointer_move(x, y, now));
    })?;

    let h = handle.clone();
    listeners.listen(document, "click", move |ev: MouseEvent| {
        let (x, y) = h.current_point(ev.client_x(), ev.client_y());
        h.dispatch(|page, _| page.on_click(x, y));
    })?;

    let h = handle.clone();
    listeners.listen(document, "visibilitychange", move |_: web_sys::Event| {
        let visible = !h.document.hidden();
        h.dispatch(|page, _| page.set_page_visible(visible));
    })?;

    let h = handle.clone();
    listeners.listen(window, "resize", move |_: web_sys::Event| {
        resize_canvases(&h.canvases, h.page.borrow_mut().engine_mut());
    })?;

    let h = handle.clone();
    listeners.listen(window, "blur", move |_: web_sys::Event| {
        h.dispatch(|page, _| page.set_window_focused(false));
    })?;

    let h = handle.clone();
    listeners.listen(window, "focus", move |_: web_sys::Event| {
        h.dispatch(|page, _| page.set_window_focused(true));
    })?;

    if let Some(query) = handle.window.match_media(REDUCED_MOTION_QUERY)? {
        let h = handle.clone();
        listeners.listen(query.as_ref(), "change", move |ev: MediaQueryListEvent| {
            h.dispatch(|page, _| page.set_reduced_motion(ev.matches()));
        })?;
    }

    Ok(listeners)
}
