/// Side effects the governor asks the page to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionEffect {
    SuspendParticles,
    ResumeParticles,
    PauseAnimations,
    ResumeAnimations,
    ReducedMotion(bool),
    PageHidden(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionPolicy {
    pub reduced_motion: bool,
    pub page_visible: bool,
    pub window_focused: bool,
}

impl Default for MotionPolicy {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            page_visible: true,
            window_focused: true,
        }
    }
}

impl MotionPolicy {
    pub fn particles_enabled(&self) -> bool {
        !self.reduced_motion && self.page_visible
    }

    pub fn animations_running(&self) -> bool {
        !self.reduced_motion && self.page_visible && self.window_focused
    }
}

/// Mirrors the OS reduced-motion preference and page visibility, and turns
/// every change into the effects needed to gate particle and CSS work.
/// It never touches navigation state.
#[derive(Debug, Default)]
pub struct MotionGovernor {
    policy: MotionPolicy,
}

impl MotionGovernor {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            policy: MotionPolicy {
                reduced_motion,
                ..MotionPolicy::default()
            },
        }
    }

    #[cfg(test)]
    pub fn policy(&self) -> MotionPolicy {
        self.policy
    }

    pub fn reduced_motion(&self) -> bool {
        self.policy.reduced_motion
    }

    /// Effects that bring a freshly loaded page in line with the policy.
    pub fn initial_effects(&self) -> Vec<MotionEffect> {
        let mut effects = Vec::new();
        if self.policy.reduced_motion {
            effects.push(MotionEffect::ReducedMotion(true));
        }
        if !self.policy.particles_enabled() {
            effects.push(MotionEffect::SuspendParticles);
        }
        if !self.policy.animations_running() {
            effects.push(MotionEffect::PauseAnimations);
        }
        effects
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) -> Vec<MotionEffect> {
        if self.policy.reduced_motion == reduced {
            return Vec::new();
        }
        self.apply(|policy| policy.reduced_motion = reduced, MotionEffect::ReducedMotion(reduced))
    }

    pub fn set_page_visible(&mut self, visible: bool) -> Vec<MotionEffect> {
        if self.policy.page_visible == visible {
            return Vec::new();
        }
        self.apply(|policy| policy.page_visible = visible, MotionEffect::PageHidden(!visible))
    }

    pub fn set_window_focused(&mut self, focused: bool) -> Vec<MotionEffect> {
        let before = self.policy;
        self.policy.window_focused = focused;
        Self::diff(before, self.policy)
    }

    fn apply(&mut self, change: impl FnOnce(&mut MotionPolicy), flag: MotionEffect) -> Vec<MotionEffect> {
        let before = self.policy;
        change(&mut self.policy);
        let mut effects = vec![flag];
        effects.extend(Self::diff(before, self.policy));
        effects
    }

    fn diff(before: MotionPolicy, after: MotionPolicy) -> Vec<MotionEffect> {
        let mut effects = Vec::new();
        match (before.particles_enabled(), after.particles_enabled()) {
            (true, false) => effects.push(MotionEffect::SuspendParticles),
            (false, true) => effects.push(MotionEffect::ResumeParticles),
            _ => {}
        }
        match (before.animations_running(), after.animations_running()) {
            (true, false) => effects.push(MotionEffect::PauseAnimations),
            (false, true) => effects.push(MotionEffect::ResumeAnimations),
            _ => {}
        }
        effects
    }
}
