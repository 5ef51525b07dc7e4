use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::sections::TOTAL_SECTIONS;

pub const WHEEL_COOLDOWN_MS: f64 = 800.0;
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;
const POINTER_SAMPLE_MS: f64 = 50.0;
const POINTER_SPARKLE_CHANCE: f64 = 0.1;
pub const POINTER_SPARKLE_COUNT: usize = 3;
pub const CLICK_BURST_COUNT: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Advance,
    Retreat,
    JumpTo(usize),
}

/// Turns raw wheel, keyboard and touch input into navigation intents.
#[derive(Debug, Default)]
pub struct InputArbiter {
    last_wheel_ms: Option<f64>,
    touch_start: Option<(f64, f64)>,
}

impl InputArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_wheel(&mut self, delta_y: f64, now_ms: f64, transitioning: bool) -> Option<Intent> {
        if transitioning || delta_y == 0.0 {
            return None;
        }
        if let Some(last) = self.last_wheel_ms {
            if now_ms - last < WHEEL_COOLDOWN_MS {
                return None;
            }
        }
        self.last_wheel_ms = Some(now_ms);
        Some(if delta_y > 0.0 { Intent::Advance } else { Intent::Retreat })
    }

    pub fn on_key(&self, key: &str, transitioning: bool) -> Option<Intent> {
        if transitioning {
            return None;
        }
        match key {
            "ArrowDown" | "PageDown" | " " => Some(Intent::Advance),
            "ArrowUp" | "PageUp" => Some(Intent::Retreat),
            "Home" => Some(Intent::JumpTo(0)),
            "End" => Some(Intent::JumpTo(TOTAL_SECTIONS - 1)),
            _ => None,
        }
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64) {
        self.touch_start = Some((x, y));
    }

    pub fn on_touch_end(&mut self, x: f64, y: f64, transitioning: bool) -> Option<Intent> {
        let (start_x, start_y) = self.touch_start.take()?;
        if transitioning {
            return None;
        }
        let delta_y = start_y - y;
        let delta_x = start_x - x;
        if delta_y.abs() <= delta_x.abs() || delta_y.abs() <= SWIPE_THRESHOLD_PX {
            return None;
        }
        Some(if delta_y > 0.0 { Intent::Advance } else { Intent::Retreat })
    }
}

/// Occasionally sprinkles a few particles where the pointer moves.
#[derive(Debug)]
pub struct PointerSparkler {
    last_sample_ms: Option<f64>,
    rng: SmallRng,
}

impl PointerSparkler {
    pub fn new(seed: u64) -> Self {
        Self {
            last_sample_ms: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Returns the burst size to spawn for this movement, if any.
    pub fn on_move(&mut self, now_ms: f64) -> Option<usize> {
        if let Some(last) = self.last_sample_ms {
            if now_ms - last < POINTER_SAMPLE_MS {
                return None;
            }
        }
        self.last_sample_ms = Some(now_ms);
        self.rng
            .gen_bool(POINTER_SPARKLE_CHANCE)
            .then_some(POINTER_SPARKLE_COUNT)
    }
}
