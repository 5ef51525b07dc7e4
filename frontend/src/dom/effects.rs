use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::engine::entry::{EntryEffect, EntryStep, SectionContents};
use crate::engine::motion::MotionEffect;
use crate::engine::navigation::Transition;
use crate::engine::sections::{SectionId, TOTAL_SECTIONS};
use crate::error::LogFailure;

const ANIMATED_ATTR: &str = "data-animated";

/// Section markup as found in the live document.
pub struct DomContents {
    document: Document,
}

impl DomContents {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

pub fn section_element(document: &Document, index: usize) -> Option<HtmlElement> {
    document
        .query_selector_all(".section")
        .ok()?
        .get(index as u32)?
        .dyn_into::<HtmlElement>()
        .ok()
}

fn nth_in_section(document: &Document, section: SectionId, selector: &str, nth: usize) -> Option<HtmlElement> {
    section_element(document, section.index())?
        .query_selector_all(selector)
        .ok()?
        .get(nth as u32)?
        .dyn_into::<HtmlElement>()
        .ok()
}

impl SectionContents for DomContents {
    fn count(&self, section: SectionId, selector: &str) -> usize {
        section_element(&self.document, section.index())
            .and_then(|el| el.query_selector_all(selector).ok())
            .map(|list| list.length() as usize)
            .unwrap_or(0)
    }

    fn animate_kinds(&self, section: SectionId) -> Vec<String> {
        let Some(list) = section_element(&self.document, section.index())
            .and_then(|el| el.query_selector_all("[data-animate]").ok())
        else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|el| el.get_attribute("data-animate"))
            .collect()
    }
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    el.style().set_property(property, value).log_failure("set_property");
}

fn clear_style(el: &HtmlElement, property: &str) {
    el.style().remove_property(property).log_failure("remove_property");
}

pub fn apply_slide(window: &web_sys::Window, document: &Document, transition: Transition, animate: bool) {
    let (Some(outgoing), Some(incoming)) = (
        section_element(document, transition.from),
        section_element(document, transition.to),
    ) else {
        return;
    };
    outgoing.class_list().remove_1("active").log_failure("remove_1");

    if !animate {
        incoming.class_list().add_1("active").log_failure("add_1");
        return;
    }

    set_style(&incoming, "transform", transition.incoming_from.css());
    set_style(&outgoing, "transform", transition.outgoing_to.css());

    let settle_in = Closure::once_into_js(move || {
        incoming.class_list().add_1("active").log_failure("add_1");
        set_style(&incoming, "transform", "translateY(0) translateX(0)");
    });
    window
        .request_animation_frame(settle_in.unchecked_ref())
        .log_failure("request_animation_frame");
}

pub fn clear_slide(document: &Document, from: usize, to: usize) {
    for index in [from, to] {
        if let Some(section) = section_element(document, index) {
            clear_style(&section, "transform");
        }
    }
}

pub fn apply_entry(document: &Document, step: &EntryStep, instant: bool) {
    let Some(el) = nth_in_section(document, step.section, step.selector, step.nth) else {
        return;
    };
    if instant {
        set_style(&el, "opacity", "1");
        set_style(&el, "transform", "none");
        return;
    }
    match &step.effect {
        EntryEffect::Reveal => {
            set_style(&el, "opacity", "1");
            set_style(&el, "transform", "translateY(0)");
        }
        EntryEffect::AddClass(class) => {
            el.class_list().add_1(class).log_failure("add_1");
            el.set_attribute(ANIMATED_ATTR, "").log_failure("set_attribute");
        }
    }
}

pub fn hide_loading_screen(document: &Document) {
    if let Some(screen) = document.get_element_by_id("loading-screen") {
        screen.class_list().add_1("hidden").log_failure("add_1");
    }
}

fn set_play_state(document: &Document, state: &str) {
    let Ok(list) = document.query_selector_all(&format!("[{}]", ANIMATED_ATTR)) else {
        return;
    };
    for el in (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
    {
        set_style(&el, "animation-play-state", state);
    }
}

/// Applies the CSS side of a motion change. Particle suspension is handled
/// by the caller, which owns the frame loop.
pub fn apply_motion(document: &Document, effect: MotionEffect) {
    let Some(body) = document.body() else {
        return;
    };
    let classes = body.class_list();
    match effect {
        MotionEffect::ReducedMotion(on) => {
            classes.toggle_with_force("reduced-motion", on).log_failure("toggle_with_force");
        }
        MotionEffect::PageHidden(hidden) => {
            classes.toggle_with_force("page-hidden", hidden).log_failure("toggle_with_force");
        }
        MotionEffect::PauseAnimations => {
            classes.add_1("animations-paused").log_failure("add_1");
            set_play_state(document, "paused");
        }
        MotionEffect::ResumeAnimations => {
            classes.remove_1("animations-paused").log_failure("remove_1");
            set_play_state(document, "running");
        }
        MotionEffect::SuspendParticles | MotionEffect::ResumeParticles => {}
    }
}

/// Navbar highlight, progress bar and arrow visibility for `index`.
pub fn show_section(document: &Document, index: usize, progress_percent: f64) {
    if let Ok(links) = document.query_selector_all(".nav-link") {
        for i in 0..links.length() {
            if let Some(link) = links.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                link.class_list().toggle_with_force("active", i as usize == index).log_failure("toggle_with_force");
            }
        }
    }

    if let Some(bar) = document
        .query_selector(".progress-bar")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        set_style(&bar, "width", &format!("{}%", progress_percent));
    }

    let arrow = |id: &str, visible: bool| {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            set_style(&el, "display", if visible { "flex" } else { "none" });
        }
    };
    arrow("nav-back", index > 0);
    arrow("nav-main", index + 1 < TOTAL_SECTIONS);
}
