//! Staged entrance animations run once a section becomes current.
//!
//! Every step is scheduled with its own delay; ordering between the items
//! of one section comes only from those delays increasing with the index.

use crate::engine::sections::SectionId;

pub const DATA_ANIMATE_SELECTOR: &str = "[data-animate]";
const DATA_ANIMATE_STAGGER_MS: f64 = 100.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryEffect {
    /// Inline `opacity: 1; transform: translateY(0)`.
    Reveal,
    AddClass(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntryStep {
    pub section: SectionId,
    /// CSS selector scoped to the section element.
    pub selector: &'static str,
    pub nth: usize,
    pub delay_ms: f64,
    pub effect: EntryEffect,
}

/// Read access to what a section's markup actually contains.
pub trait SectionContents {
    fn count(&self, section: SectionId, selector: &str) -> usize;

    /// Values of `data-animate` on the section's elements, in document order.
    fn animate_kinds(&self, section: SectionId) -> Vec<String>;
}

struct PlanBuilder<'a, C: SectionContents> {
    section: SectionId,
    contents: &'a C,
    steps: Vec<EntryStep>,
}

impl<'a, C: SectionContents> PlanBuilder<'a, C> {
    fn stagger(&mut self, selector: &'static str, start_ms: f64, every_ms: f64, effect: EntryEffect) {
        for nth in 0..self.contents.count(self.section, selector) {
            self.steps.push(EntryStep {
                section: self.section,
                selector,
                nth,
                delay_ms: start_ms + nth as f64 * every_ms,
                effect: effect.clone(),
            });
        }
    }

    fn once(&mut self, selector: &'static str, delay_ms: f64, effect: EntryEffect) {
        if self.contents.count(self.section, selector) > 0 {
            self.steps.push(EntryStep {
                section: self.section,
                selector,
                nth: 0,
                delay_ms,
                effect,
            });
        }
    }
}

fn class(name: &str) -> EntryEffect {
    EntryEffect::AddClass(name.to_string())
}

pub fn entry_plan<C: SectionContents>(section: SectionId, contents: &C) -> Vec<EntryStep> {
    let mut plan = PlanBuilder {
        section,
        contents,
        steps: Vec::new(),
    };

    for (nth, kind) in contents.animate_kinds(section).into_iter().enumerate() {
        plan.steps.push(EntryStep {
            section,
            selector: DATA_ANIMATE_SELECTOR,
            nth,
            delay_ms: nth as f64 * DATA_ANIMATE_STAGGER_MS,
            effect: EntryEffect::AddClass(format!("animate-{}", kind)),
        });
    }

    match section {
        SectionId::Hero => plan.stagger(".title-line", 0.0, 200.0, EntryEffect::Reveal),
        SectionId::Platform => {
            plan.stagger(".feature-item", 0.0, 150.0, class("animate-slide-left"));
            plan.once(".platform-mockup", 300.0, class("animate-slide-right"));
        }
        SectionId::Workspace => plan.stagger(".workspace-card", 0.0, 200.0, class("animate-fade-in")),
        SectionId::Benefits => {
            plan.once(".percentage-display", 0.0, class("animate-zoom-in"));
            plan.stagger(".benefit-item", 0.0, 150.0, class("animate-slide-left"));
        }
        SectionId::Apply => {
            plan.once(".section-title", 0.0, class("animate-fade-in"));
            plan.once(".section-subtitle", 200.0, class("animate-fade-in"));
            plan.once(".apply-cta", 400.0, class("animate-bounce"));
        }
        SectionId::Rules => plan.stagger(".rule-card", 0.0, 100.0, class("animate-flip-x")),
        SectionId::FinalApply => {
            plan.once(".section-title", 0.0, class("animate-fade-in"));
            plan.once(".section-subtitle", 200.0, class("animate-fade-in"));
            plan.once(".final-apply-cta", 400.0, class("animate-bounce"));
        }
    }

    plan.steps
}
