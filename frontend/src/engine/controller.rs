use log::{debug, info};

use crate::engine::entry::{entry_plan, EntryStep, SectionContents};
use crate::engine::input::{InputArbiter, Intent, PointerSparkler, CLICK_BURST_COUNT};
use crate::engine::motion::{MotionEffect, MotionGovernor};
use crate::engine::navigation::{Navigator, Transition, SETTLE_MS};
use crate::engine::particles::ParticleEngine;
use crate::engine::scheduler::Scheduler;
use crate::engine::sections::{SectionId, TOTAL_SECTIONS};

pub const LOADING_SCREEN_MS: f64 = 3000.0;
pub const FIRST_ENTRY_DELAY_MS: f64 = 500.0;

#[derive(Clone, Debug, PartialEq)]
enum Task {
    Settle,
    Entry(EntryStep),
    HideLoadingScreen,
    AnimateCurrent,
}

/// Work for the DOM layer, produced in the order it must be applied.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEffect {
    /// Deactivate `from` and bring in `to`; tween only when `animate` is set.
    Slide { transition: Transition, animate: bool },
    /// Drop the inline transforms left on both sections by a slide.
    ClearSlide { from: usize, to: usize },
    /// Apply an entrance step; `instant` resolves straight to the final state.
    Entry { step: EntryStep, instant: bool },
    HideLoadingScreen,
    Motion(MotionEffect),
}

pub type SectionListener = Box<dyn FnMut(usize)>;

/// Application root: owns every core component and is the only thing the
/// web layer talks to.
pub struct PageController<C: SectionContents> {
    contents: C,
    navigator: Navigator,
    engine: ParticleEngine,
    governor: MotionGovernor,
    arbiter: InputArbiter,
    sparkler: PointerSparkler,
    scheduler: Scheduler<Task>,
    listeners: Vec<SectionListener>,
    effects: Vec<PageEffect>,
}

impl<C: SectionContents> PageController<C> {
    pub fn new(contents: C, engine: ParticleEngine, reduced_motion: bool, seed: u64) -> Self {
        Self {
            contents,
            navigator: Navigator::new(),
            engine,
            governor: MotionGovernor::new(reduced_motion),
            arbiter: InputArbiter::new(),
            sparkler: PointerSparkler::new(seed),
            scheduler: Scheduler::new(),
            listeners: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Kicks off the loading sequence and aligns everything with the
    /// initial motion policy.
    pub fn start(&mut self, now_ms: f64) {
        for effect in self.governor.initial_effects() {
            self.apply_motion(effect);
        }
        let current = self.navigator.current_section();
        if let Some(section) = SectionId::from_index(current) {
            self.engine.enter_section(section, now_ms);
        }
        self.notify(current);
        self.scheduler.schedule(now_ms, LOADING_SCREEN_MS, Task::HideLoadingScreen);
    }

    /// Registers an `on_section_change` listener. Listeners run while the
    /// controller is borrowed and must not call back into it.
    pub fn subscribe(&mut self, listener: SectionListener) {
        self.listeners.push(listener);
    }

    fn notify(&mut self, index: usize) {
        for listener in &mut self.listeners {
            listener(index);
        }
    }

    pub fn engine(&self) -> &ParticleEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ParticleEngine {
        &mut self.engine
    }

    pub fn current_section(&self) -> usize {
        self.navigator.current_section()
    }

    #[cfg(test)]
    pub fn total_sections(&self) -> usize {
        TOTAL_SECTIONS
    }

    #[cfg(test)]
    pub fn is_transitioning(&self) -> bool {
        self.navigator.is_transitioning()
    }

    pub fn go_to(&mut self, index: usize, now_ms: f64) -> bool {
        let transition = self.navigator.go_to(index);
        self.begin(transition, now_ms)
    }

    pub fn next(&mut self, now_ms: f64) -> bool {
        let transition = self.navigator.next();
        self.begin(transition, now_ms)
    }

    pub fn prev(&mut self, now_ms: f64) -> bool {
        let transition = self.navigator.prev();
        self.begin(transition, now_ms)
    }

    fn begin(&mut self, transition: Option<Transition>, now_ms: f64) -> bool {
        let Some(transition) = transition else {
            return false;
        };
        debug!(
            "section {} -> {} ({:?})",
            transition.from, transition.to, transition.direction
        );

        if let Some(section) = SectionId::from_index(transition.to) {
            self.engine.enter_section(section, now_ms);
        }
        self.notify(transition.to);
        self.effects.push(PageEffect::Slide {
            transition,
            animate: !self.governor.reduced_motion(),
        });
        self.scheduler.schedule(now_ms, SETTLE_MS, Task::Settle);
        true
    }

    pub fn handle_intent(&mut self, intent: Intent, now_ms: f64) -> bool {
        match intent {
            Intent::Advance => self.next(now_ms),
            Intent::Retreat => self.prev(now_ms),
            Intent::JumpTo(index) => self.go_to(index, now_ms),
        }
    }

    pub fn on_wheel(&mut self, delta_y: f64, now_ms: f64) -> bool {
        let transitioning = self.navigator.is_transitioning();
        match self.arbiter.on_wheel(delta_y, now_ms, transitioning) {
            Some(intent) => self.handle_intent(intent, now_ms),
            None => false,
        }
    }

    /// Returns whether the key was consumed, so the caller can prevent the
    /// browser's default scrolling.
    pub fn on_key(&mut self, key: &str, now_ms: f64) -> bool {
        match self.arbiter.on_key(key, self.navigator.is_transitioning()) {
            Some(intent) => {
                self.handle_intent(intent, now_ms);
                true
            }
            None => false,
        }
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64) {
        self.arbiter.on_touch_start(x, y);
    }

    pub fn on_touch_end(&mut self, x: f64, y: f64, now_ms: f64) -> bool {
        let transitioning = self.navigator.is_transitioning();
        match self.arbiter.on_touch_end(x, y, transitioning) {
            Some(intent) => self.handle_intent(intent, now_ms),
            None => false,
        }
    }

    /// Pointer coordinates are local to the current section's surface.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, now_ms: f64) {
        if self.governor.reduced_motion() {
            return;
        }
        if let Some(count) = self.sparkler.on_move(now_ms) {
            self.burst_current(x, y, count);
        }
    }

    pub fn on_click(&mut self, x: f64, y: f64) {
        if !self.governor.reduced_motion() {
            self.burst_current(x, y, CLICK_BURST_COUNT);
        }
    }

    fn burst_current(&mut self, x: f64, y: f64, count: usize) {
        if let Some(section) = SectionId::from_index(self.current_section()) {
            self.engine.add_burst(section, x, y, count);
        }
    }

    /// Burst by section name; unknown names, sections without a particle
    /// field and reduced motion make it a no-op.
    pub fn add_burst_effect(&mut self, section_name: &str, x: f64, y: f64, count: usize) {
        if self.governor.reduced_motion() {
            return;
        }
        if let Ok(section) = section_name.parse::<SectionId>() {
            self.engine.add_burst(section, x, y, count);
        }
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        info!("reduced motion: {}", reduced);
        for effect in self.governor.set_reduced_motion(reduced) {
            self.apply_motion(effect);
        }
    }

    pub fn set_page_visible(&mut self, visible: bool) {
        debug!("page visible: {}", visible);
        for effect in self.governor.set_page_visible(visible) {
            self.apply_motion(effect);
        }
    }

    pub fn set_window_focused(&mut self, focused: bool) {
        for effect in self.governor.set_window_focused(focused) {
            self.apply_motion(effect);
        }
    }

    fn apply_motion(&mut self, effect: MotionEffect) {
        match effect {
            MotionEffect::SuspendParticles => self.engine.suspend(),
            MotionEffect::ResumeParticles => self.engine.resume(),
            _ => {}
        }
        self.effects.push(PageEffect::Motion(effect));
    }

    /// Advances particles by one display frame.
    pub fn frame(&mut self) {
        self.engine.tick(1);
    }

    /// Runs every delayed task that has come due.
    pub fn run_due(&mut self, now_ms: f64) {
        for task in self.scheduler.drain_due(now_ms) {
            match task {
                Task::Settle => {
                    if let Some((from, to)) = self.navigator.settle() {
                        self.effects.push(PageEffect::ClearSlide { from, to });
                        self.animate_section(to, now_ms);
                    }
                }
                Task::Entry(step) => {
                    let instant = self.governor.reduced_motion();
                    self.effects.push(PageEffect::Entry { step, instant });
                }
                Task::HideLoadingScreen => {
                    self.effects.push(PageEffect::HideLoadingScreen);
                    self.scheduler.schedule(now_ms, FIRST_ENTRY_DELAY_MS, Task::AnimateCurrent);
                }
                Task::AnimateCurrent => {
                    let current = self.navigator.current_section();
                    self.animate_section(current, now_ms);
                }
            }
        }
        self.scheduler.rearm(now_ms);
    }

    fn animate_section(&mut self, index: usize, now_ms: f64) {
        let Some(section) = SectionId::from_index(index) else {
            return;
        };
        let mut plan = entry_plan(section, &self.contents);
        if self.governor.reduced_motion() {
            plan.sort_by(|a, b| a.delay_ms.total_cmp(&b.delay_ms));
            self.effects
                .extend(plan.into_iter().map(|step| PageEffect::Entry { step, instant: true }));
            return;
        }
        for step in plan {
            let delay = step.delay_ms;
            self.scheduler.schedule(now_ms, delay, Task::Entry(step));
        }
    }

    pub fn take_effects(&mut self) -> Vec<PageEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn take_wakeups(&mut self) -> Vec<f64> {
        self.scheduler.take_wakeups()
    }
}

pub fn progress_percent(index: usize) -> f64 {
    (index + 1) as f64 / TOTAL_SECTIONS as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::entry::EntryEffect;
    use crate::engine::navigation::NavState;

    struct Markup;

    impl SectionContents for Markup {
        fn count(&self, section: SectionId, selector: &str) -> usize {
            match (section, selector) {
                (SectionId::Hero, ".title-line") => 2,
                (SectionId::Benefits, ".benefit-item") => 3,
                (SectionId::Benefits, ".percentage-display") => 1,
                _ => 0,
            }
        }

        fn animate_kinds(&self, _section: SectionId) -> Vec<String> {
            Vec::new()
        }
    }

    fn controller() -> PageController<Markup> {
        let mut engine = ParticleEngine::new(5);
        for section in SectionId::ALL {
            engine.attach_surface(section, 320.0, 640.0);
        }
        PageController::new(Markup, engine, false, 9)
    }

    fn entries(effects: &[PageEffect]) -> Vec<(&'static str, bool)> {
        effects
            .iter()
            .filter_map(|e| match e {
                PageEffect::Entry { step, instant } => Some((step.selector, *instant)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn go_to_settles_after_800ms() {
        let mut page = controller();
        assert!(page.go_to(3, 0.0));
        assert!(page.is_transitioning());
        assert_eq!(page.current_section(), 3);

        page.run_due(799.0);
        assert!(page.is_transitioning());
        page.run_due(800.0);
        assert!(!page.is_transitioning());
        assert_eq!(page.navigator.state(), NavState::Idle { at: 3 });

        let effects = page.take_effects();
        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[0], PageEffect::Slide { animate: true, .. }));
        assert_eq!(effects[1], PageEffect::ClearSlide { from: 0, to: 3 });
    }

    #[test]
    fn input_during_transition_is_dropped_not_queued() {
        let mut page = controller();
        assert!(page.next(0.0));
        assert!(!page.go_to(5, 100.0));
        assert!(!page.on_key("ArrowDown", 200.0));
        page.run_due(800.0);
        assert_eq!(page.current_section(), 1);
        assert!(page.scheduler.is_empty());
    }

    #[test]
    fn two_wheel_events_100ms_apart_move_once() {
        let mut page = controller();
        assert!(page.on_wheel(100.0, 0.0));
        assert!(!page.on_wheel(100.0, 100.0));
        page.run_due(800.0);
        assert_eq!(page.current_section(), 1);
        let slides = page
            .take_effects()
            .iter()
            .filter(|e| matches!(e, PageEffect::Slide { .. }))
            .count();
        assert_eq!(slides, 1);
    }

    #[test]
    fn listeners_hear_the_target_immediately() {
        let mut page = controller();
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = heard.clone();
        page.subscribe(Box::new(move |index| sink.borrow_mut().push(index)));

        page.go_to(2, 0.0);
        assert_eq!(*heard.borrow(), vec![2]);
        page.run_due(800.0);
        page.prev(900.0);
        assert_eq!(*heard.borrow(), vec![2, 1]);
    }

    #[test]
    fn entry_steps_run_on_their_stagger_after_settle() {
        let mut page = controller();
        page.go_to(3, 0.0);
        page.run_due(800.0);
        page.take_effects();

        page.run_due(800.0);
        assert_eq!(
            entries(&page.take_effects()),
            vec![(".percentage-display", false), (".benefit-item", false)]
        );
        page.run_due(950.0);
        assert_eq!(entries(&page.take_effects()), vec![(".benefit-item", false)]);
        page.run_due(1100.0);
        assert_eq!(entries(&page.take_effects()), vec![(".benefit-item", false)]);
    }

    #[test]
    fn reduced_motion_resolves_entries_instantly_and_stops_particles() {
        let mut page = controller();
        page.set_reduced_motion(true);
        assert!(page.engine().is_suspended());

        page.go_to(3, 0.0);
        page.run_due(800.0);
        let effects = page.take_effects();
        assert!(effects.contains(&PageEffect::Motion(MotionEffect::ReducedMotion(true))));
        assert!(matches!(
            effects.iter().find(|e| matches!(e, PageEffect::Slide { .. })),
            Some(PageEffect::Slide { animate: false, .. })
        ));
        let instant = entries(&effects);
        assert_eq!(instant.len(), 4);
        assert!(instant.iter().all(|(_, instant)| *instant));
        assert!(page.scheduler.is_empty());

        let before = page.engine().particles(SectionId::Benefits).to_vec();
        page.frame();
        assert_eq!(page.engine().particles(SectionId::Benefits), &before[..]);

        page.set_reduced_motion(false);
        assert!(!page.engine().is_suspended());
    }

    #[test]
    fn hidden_page_suspends_particles_but_not_navigation() {
        let mut page = controller();
        page.set_page_visible(false);
        assert!(page.engine().is_suspended());
        assert!(page.next(0.0));
        page.run_due(800.0);
        assert_eq!(page.current_section(), 1);
        page.set_page_visible(true);
        assert!(!page.engine().is_suspended());
    }

    #[test]
    fn loading_sequence_animates_first_section() {
        let mut page = controller();
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = heard.clone();
        page.subscribe(Box::new(move |index| sink.borrow_mut().push(index)));
        page.start(0.0);
        assert_eq!(*heard.borrow(), vec![0]);
        assert!(page.take_effects().is_empty());
        page.run_due(3000.0);
        assert_eq!(page.take_effects(), vec![PageEffect::HideLoadingScreen]);
        page.run_due(3500.0);
        assert!(page.take_effects().is_empty());
        page.run_due(3500.0);
        let effects = page.take_effects();
        assert_eq!(entries(&effects), vec![(".title-line", false)]);
        match &effects[0] {
            PageEffect::Entry { step, .. } => assert_eq!(step.effect, EntryEffect::Reveal),
            other => panic!("unexpected effect {:?}", other),
        }
        assert_eq!(page.take_wakeups(), vec![3000.0, 500.0, 0.0, 200.0]);
    }

    #[test]
    fn settle_timer_firing_early_is_rearmed() {
        let mut page = controller();
        page.go_to(1, 0.0);
        assert_eq!(page.take_wakeups(), vec![800.0]);

        page.run_due(799.5);
        assert!(page.is_transitioning());
        assert_eq!(page.take_wakeups(), vec![0.5]);

        page.run_due(800.0);
        assert!(!page.is_transitioning());
        assert!(page.go_to(2, 900.0));
    }

    #[test]
    fn steps_in_flight_turn_instant_when_reduced_motion_starts() {
        let mut page = controller();
        page.go_to(3, 0.0);
        page.run_due(800.0);
        page.run_due(800.0);
        assert_eq!(
            entries(&page.take_effects()),
            vec![(".percentage-display", false), (".benefit-item", false)]
        );

        page.set_reduced_motion(true);
        page.run_due(1100.0);
        assert_eq!(
            entries(&page.take_effects()),
            vec![(".benefit-item", true), (".benefit-item", true)]
        );
    }

    #[test]
    fn bursts_by_name_and_on_click() {
        let mut page = controller();
        page.add_burst_effect("platform", 10.0, 10.0, 8);
        assert_eq!(page.engine().particles(SectionId::Platform).len(), 38);
        page.add_burst_effect("lobby", 10.0, 10.0, 8);

        page.on_click(5.0, 5.0);
        assert_eq!(page.engine().particles(SectionId::Hero).len(), 58);

        page.set_reduced_motion(true);
        page.on_click(5.0, 5.0);
        page.add_burst_effect("hero", 5.0, 5.0, 8);
        assert_eq!(page.engine().particles(SectionId::Hero).len(), 58);
    }

    #[test]
    fn progress_tracks_section() {
        assert!((progress_percent(0) - 100.0 / 7.0).abs() < 1e-9);
        assert_eq!(progress_percent(TOTAL_SECTIONS - 1), 100.0);
        let mut page = controller();
        assert_eq!(page.total_sections(), 7);
        page.go_to(6, 0.0);
        assert_eq!(progress_percent(page.current_section()), 100.0);
    }
}
