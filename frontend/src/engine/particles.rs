use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::engine::sections::SectionId;
use crate::engine::shapes::{DrawSurface, ShapeKind};

const BURST_LIFE: u32 = 60;
const BURST_SPEED: ValueRange = ValueRange { min: 2.0, max: 5.0 };
const MAX_ROTATION_SPEED: f64 = 0.1;
const MAX_PULSE_SPEED: f64 = 0.12;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn sample(self, rng: &mut SmallRng) -> f64 {
        between(rng, self.min, self.max)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleFieldConfig {
    pub count: usize,
    pub color: String,
    pub size: ValueRange,
    pub speed: ValueRange,
    pub opacity: ValueRange,
    pub shape: ShapeKind,
}

impl ParticleFieldConfig {
    pub fn default_for(section: SectionId) -> Self {
        let (count, color, size, speed, opacity, shape) = match section {
            SectionId::Hero => (50, "#FFD700", (1.0, 3.0), (0.5, 1.5), (0.3, 0.8), ShapeKind::Star),
            SectionId::Platform => (30, "#DC143C", (2.0, 4.0), (0.3, 1.0), (0.4, 0.7), ShapeKind::Diamond),
            SectionId::Workspace => (40, "#FFD700", (1.0, 2.0), (0.2, 0.8), (0.2, 0.6), ShapeKind::Dot),
            SectionId::Benefits => (35, "#9932CC", (2.0, 5.0), (0.4, 1.2), (0.3, 0.7), ShapeKind::Coin),
            SectionId::Apply => (45, "#DC143C", (1.0, 3.0), (0.5, 1.3), (0.4, 0.8), ShapeKind::Heart),
            SectionId::Rules => (25, "#FFD700", (1.0, 2.0), (0.3, 0.9), (0.3, 0.6), ShapeKind::Square),
            SectionId::FinalApply => (60, "#FFD700", (2.0, 4.0), (0.6, 1.8), (0.5, 0.9), ShapeKind::Star),
        };
        Self {
            count,
            color: color.to_string(),
            size: ValueRange::new(size.0, size.1),
            speed: ValueRange::new(speed.0, speed.1),
            opacity: ValueRange::new(opacity.0, opacity.1),
            shape,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub opacity: f64,
    pub angle: f64,
    pub rotation_speed: f64,
    pub pulse_phase: f64,
    pub pulse_speed: f64,
    /// Remaining frames for burst particles; `None` for ambient ones.
    pub life: Option<u32>,
}

impl Particle {
    /// Opacity after pulsing, kept inside [0.1, 1.0].
    pub fn pulsed_opacity(&self) -> f64 {
        (self.opacity + self.pulse_phase.sin() * 0.2).clamp(0.1, 1.0)
    }

    pub fn pulsed_size(&self) -> f64 {
        (self.size + self.pulse_phase.sin() * 0.5).max(0.1)
    }

    fn step(&mut self, width: f64, height: f64) {
        self.x += self.speed_x;
        self.y += self.speed_y;
        self.angle += self.rotation_speed;
        self.pulse_phase += self.pulse_speed;
        if let Some(life) = self.life.as_mut() {
            *life = life.saturating_sub(1);
        }

        self.x = wrap(self.x, width, self.size);
        self.y = wrap(self.y, height, self.size);
    }

    fn is_expired(&self) -> bool {
        self.life == Some(0)
    }
}

fn wrap(value: f64, extent: f64, margin: f64) -> f64 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

fn between(rng: &mut SmallRng, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bounds {
    width: f64,
    height: f64,
}

#[derive(Debug)]
struct Field {
    config: ParticleFieldConfig,
    particles: Vec<Particle>,
    surface: Option<Bounds>,
}

/// Owns one particle population per section and animates the ones whose
/// section has a drawing surface.
#[derive(Debug)]
pub struct ParticleEngine {
    fields: Vec<Field>,
    rng: SmallRng,
    suspended: bool,
}

impl ParticleEngine {
    pub fn new(seed: u64) -> Self {
        let fields = SectionId::ALL
            .iter()
            .map(|section| Field {
                config: ParticleFieldConfig::default_for(*section),
                particles: Vec::new(),
                surface: None,
            })
            .collect();
        Self {
            fields,
            rng: SmallRng::seed_from_u64(seed),
            suspended: false,
        }
    }

    fn field(&self, section: SectionId) -> &Field {
        &self.fields[section.index()]
    }

    fn field_mut(&mut self, section: SectionId) -> &mut Field {
        &mut self.fields[section.index()]
    }

    /// Gives `section` a drawing surface and populates it from its template.
    pub fn attach_surface(&mut self, section: SectionId, width: f64, height: f64) {
        self.field_mut(section).surface = Some(Bounds { width, height });
        let config = self.field(section).config.clone();
        self.init_field(section, config);
    }

    #[cfg(test)]
    pub fn has_surface(&self, section: SectionId) -> bool {
        self.field(section).surface.is_some()
    }

    #[cfg(test)]
    pub fn config(&self, section: SectionId) -> &ParticleFieldConfig {
        &self.field(section).config
    }

    #[cfg(test)]
    pub fn particles(&self, section: SectionId) -> &[Particle] {
        &self.field(section).particles
    }

    pub fn init_field(&mut self, section: SectionId, config: ParticleFieldConfig) {
        let Self { fields, rng, .. } = self;
        let field = &mut fields[section.index()];
        field.config = config;
        field.particles.clear();

        let Some(bounds) = field.surface else {
            return;
        };
        let config = &field.config;
        field.particles.extend((0..config.count).map(|_| Particle {
            x: rng.gen::<f64>() * bounds.width,
            y: rng.gen::<f64>() * bounds.height,
            size: config.size.sample(rng),
            speed_x: between(rng, -config.speed.max, config.speed.max),
            speed_y: between(rng, -config.speed.max, config.speed.max),
            opacity: config.opacity.sample(rng),
            angle: rng.gen::<f64>() * TAU,
            rotation_speed: between(rng, -0.02, 0.02),
            pulse_phase: rng.gen::<f64>() * TAU,
            pulse_speed: between(rng, 0.01, 0.03),
            life: None,
        }));
    }

    pub fn set_count(&mut self, section: SectionId, count: usize) {
        let mut config = self.field(section).config.clone();
        config.count = count;
        self.init_field(section, config);
    }

    pub fn set_speed_range(&mut self, section: SectionId, speed: ValueRange) {
        let mut config = self.field(section).config.clone();
        config.speed = speed;
        self.init_field(section, config);
    }

    pub fn tick(&mut self, frames: u32) {
        if self.suspended {
            return;
        }
        for field in &mut self.fields {
            let Some(bounds) = field.surface else {
                continue;
            };
            for _ in 0..frames {
                for particle in &mut field.particles {
                    particle.step(bounds.width, bounds.height);
                }
                field.particles.retain(|p| !p.is_expired());
            }
        }
    }

    pub fn render<S: DrawSurface>(&self, section: SectionId, surface: &mut S) {
        if self.suspended {
            return;
        }
        let field = self.field(section);
        let Some(bounds) = field.surface else {
            return;
        };

        surface.clear(bounds.width, bounds.height);
        for particle in &field.particles {
            surface.save();
            surface.set_alpha(particle.pulsed_opacity());
            surface.translate(particle.x, particle.y);
            surface.rotate(particle.angle);
            for command in field.config.shape.commands(particle.pulsed_size(), &field.config.color) {
                surface.draw(&command);
            }
            surface.restore();
        }
    }

    /// Spawns `count` short-lived particles radiating from (x, y).
    pub fn add_burst(&mut self, section: SectionId, x: f64, y: f64, count: usize) {
        let Self { fields, rng, .. } = self;
        let field = &mut fields[section.index()];
        if field.surface.is_none() || count == 0 {
            return;
        }
        let size = field.config.size;
        field.particles.extend((0..count).map(|i| {
            let angle = TAU * i as f64 / count as f64;
            let speed = BURST_SPEED.sample(rng);
            Particle {
                x,
                y,
                size: size.sample(rng),
                speed_x: angle.cos() * speed,
                speed_y: angle.sin() * speed,
                opacity: 1.0,
                angle,
                rotation_speed: between(rng, -0.1, 0.1),
                pulse_phase: 0.0,
                pulse_speed: 0.05,
                life: Some(BURST_LIFE),
            }
        }));
    }

    /// Clamps particles that ended up outside the new bounds onto the edge.
    pub fn resize(&mut self, section: SectionId, width: f64, height: f64) {
        let field = self.field_mut(section);
        if field.surface.is_none() {
            return;
        }
        field.surface = Some(Bounds { width, height });
        for particle in &mut field.particles {
            particle.x = particle.x.min(width);
            particle.y = particle.y.min(height);
        }
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Section-specific flourish applied when `section` becomes current.
    pub fn enter_section(&mut self, section: SectionId, now_ms: f64) {
        let field = self.field_mut(section);
        if field.surface.is_none() {
            return;
        }
        let shape = field.config.shape;
        let max_speed = field.config.speed.max * 2.0;

        match (section, shape) {
            (SectionId::Hero, _) => {
                let t = now_ms * 0.001;
                for particle in &mut field.particles {
                    particle.speed_x = (particle.speed_x + t.sin() * 0.1).clamp(-max_speed, max_speed);
                    particle.speed_y = (particle.speed_y + t.cos() * 0.1).clamp(-max_speed, max_speed);
                }
            }
            (SectionId::Benefits, ShapeKind::Coin) => {
                for particle in &mut field.particles {
                    particle.rotation_speed =
                        (particle.rotation_speed * 1.5).clamp(-MAX_ROTATION_SPEED, MAX_ROTATION_SPEED);
                }
            }
            (SectionId::Apply, ShapeKind::Heart) => {
                for particle in &mut field.particles {
                    particle.pulse_speed = (particle.pulse_speed * 2.0).min(MAX_PULSE_SPEED);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::shapes::DrawCommand;

    #[derive(Default)]
    struct Recorder {
        clears: usize,
        alphas: Vec<f64>,
        translations: Vec<(f64, f64)>,
        commands: usize,
        depth: i32,
    }

    impl DrawSurface for Recorder {
        fn clear(&mut self, _width: f64, _height: f64) {
            self.clears += 1;
        }
        fn save(&mut self) {
            self.depth += 1;
        }
        fn restore(&mut self) {
            self.depth -= 1;
        }
        fn set_alpha(&mut self, alpha: f64) {
            self.alphas.push(alpha);
        }
        fn translate(&mut self, x: f64, y: f64) {
            self.translations.push((x, y));
        }
        fn rotate(&mut self, _angle: f64) {}
        fn draw(&mut self, _command: &DrawCommand<'_>) {
            self.commands += 1;
        }
    }

    fn engine_with_hero() -> ParticleEngine {
        let mut engine = ParticleEngine::new(7);
        engine.attach_surface(SectionId::Hero, 400.0, 300.0);
        engine
    }

    #[test]
    fn attaching_a_surface_populates_from_template() {
        let engine = engine_with_hero();
        let particles = engine.particles(SectionId::Hero);
        assert_eq!(particles.len(), 50);
        for p in particles {
            assert!((0.0..=400.0).contains(&p.x) && (0.0..=300.0).contains(&p.y));
            assert!((1.0..=3.0).contains(&p.size));
            assert!((0.3..=0.8).contains(&p.opacity));
            assert!(p.speed_x.abs() <= 1.5 && p.speed_y.abs() <= 1.5);
            assert!(p.life.is_none());
        }
        assert!(engine.particles(SectionId::Platform).is_empty());
    }

    #[test]
    fn positions_stay_within_wrap_margin() {
        let mut engine = engine_with_hero();
        engine.add_burst(SectionId::Hero, 1.0, 299.0, 12);
        for _ in 0..500 {
            engine.tick(1);
            for p in engine.particles(SectionId::Hero) {
                assert!(p.x >= -p.size && p.x <= 400.0 + p.size, "x out of range: {}", p.x);
                assert!(p.y >= -p.size && p.y <= 300.0 + p.size, "y out of range: {}", p.y);
            }
        }
    }

    #[test]
    fn wrap_moves_to_opposite_edge() {
        assert_eq!(wrap(-3.5, 100.0, 2.0), 102.0);
        assert_eq!(wrap(102.5, 100.0, 2.0), -2.0);
        assert_eq!(wrap(-2.0, 100.0, 2.0), -2.0);
        assert_eq!(wrap(50.0, 100.0, 2.0), 50.0);
    }

    #[test]
    fn burst_adds_exactly_count_and_expires_after_its_life() {
        let mut engine = engine_with_hero();
        engine.add_burst(SectionId::Hero, 200.0, 150.0, 8);
        assert_eq!(engine.particles(SectionId::Hero).len(), 58);

        engine.tick(BURST_LIFE - 1);
        assert_eq!(engine.particles(SectionId::Hero).len(), 58);
        engine.tick(1);
        assert_eq!(engine.particles(SectionId::Hero).len(), 50);
        assert!(engine.particles(SectionId::Hero).iter().all(|p| p.life.is_none()));
    }

    #[test]
    fn burst_radiates_around_full_circle() {
        let mut engine = engine_with_hero();
        engine.add_burst(SectionId::Hero, 10.0, 20.0, 4);
        let burst: Vec<_> = engine.particles(SectionId::Hero)[50..].to_vec();
        for (i, p) in burst.iter().enumerate() {
            let speed = (p.speed_x * p.speed_x + p.speed_y * p.speed_y).sqrt();
            assert!((2.0..=5.0).contains(&speed));
            let expected = TAU * i as f64 / 4.0;
            assert!((p.angle - expected).abs() < 1e-9);
            assert_eq!((p.x, p.y), (10.0, 20.0));
            assert_eq!(p.life, Some(BURST_LIFE));
        }
    }

    #[test]
    fn sections_without_surface_are_skipped() {
        let mut engine = ParticleEngine::new(1);
        engine.add_burst(SectionId::Rules, 1.0, 1.0, 8);
        engine.resize(SectionId::Rules, 10.0, 10.0);
        engine.tick(3);
        engine.enter_section(SectionId::Rules, 0.0);
        let mut recorder = Recorder::default();
        engine.render(SectionId::Rules, &mut recorder);
        assert!(!engine.has_surface(SectionId::Rules));
        assert!(engine.particles(SectionId::Rules).is_empty());
        assert_eq!(recorder.clears, 0);
    }

    #[test]
    fn reconfiguring_resynthesizes_population() {
        let mut engine = engine_with_hero();
        engine.add_burst(SectionId::Hero, 0.0, 0.0, 5);
        engine.set_count(SectionId::Hero, 12);
        assert_eq!(engine.particles(SectionId::Hero).len(), 12);
        assert_eq!(engine.config(SectionId::Hero).count, 12);

        engine.set_speed_range(SectionId::Hero, ValueRange::new(0.0, 0.25));
        assert_eq!(engine.particles(SectionId::Hero).len(), 12);
        assert!(engine
            .particles(SectionId::Hero)
            .iter()
            .all(|p| p.speed_x.abs() <= 0.25 && p.speed_y.abs() <= 0.25));
    }

    #[test]
    fn resize_clamps_only_out_of_bounds_particles() {
        let mut engine = engine_with_hero();
        let before = engine.particles(SectionId::Hero).to_vec();
        engine.resize(SectionId::Hero, 200.0, 100.0);
        for (old, new) in before.iter().zip(engine.particles(SectionId::Hero)) {
            assert_eq!(new.x, old.x.min(200.0));
            assert_eq!(new.y, old.y.min(100.0));
        }
        assert_eq!(engine.particles(SectionId::Hero).len(), 50);
    }

    #[test]
    fn suspended_engine_neither_moves_nor_draws() {
        let mut engine = engine_with_hero();
        let before = engine.particles(SectionId::Hero).to_vec();
        engine.suspend();
        engine.tick(10);
        let mut recorder = Recorder::default();
        engine.render(SectionId::Hero, &mut recorder);
        assert_eq!(engine.particles(SectionId::Hero), &before[..]);
        assert_eq!(recorder.clears, 0);

        engine.resume();
        engine.tick(1);
        assert_ne!(engine.particles(SectionId::Hero), &before[..]);
    }

    #[test]
    fn render_clears_then_draws_each_particle_with_clamped_alpha() {
        let engine = engine_with_hero();
        let mut recorder = Recorder::default();
        engine.render(SectionId::Hero, &mut recorder);
        assert_eq!(recorder.clears, 1);
        assert_eq!(recorder.depth, 0);
        assert_eq!(recorder.alphas.len(), 50);
        assert!(recorder.alphas.iter().all(|a| (0.1..=1.0).contains(a)));
        assert_eq!(recorder.translations[0], {
            let p = &engine.particles(SectionId::Hero)[0];
            (p.x, p.y)
        });
        assert!(recorder.commands >= 50);
    }

    #[test]
    fn pulsed_opacity_is_clamped() {
        let mut p = engine_with_hero().particles(SectionId::Hero)[0].clone();
        p.opacity = 0.95;
        p.pulse_phase = std::f64::consts::FRAC_PI_2;
        assert_eq!(p.pulsed_opacity(), 1.0);
        p.opacity = 0.0;
        p.pulse_phase = -std::f64::consts::FRAC_PI_2;
        assert_eq!(p.pulsed_opacity(), 0.1);
    }

    #[test]
    fn section_effects_are_capped() {
        let mut engine = ParticleEngine::new(3);
        engine.attach_surface(SectionId::Apply, 100.0, 100.0);
        engine.attach_surface(SectionId::Benefits, 100.0, 100.0);
        for _ in 0..20 {
            engine.enter_section(SectionId::Apply, 0.0);
            engine.enter_section(SectionId::Benefits, 0.0);
        }
        assert!(engine.particles(SectionId::Apply).iter().all(|p| p.pulse_speed <= MAX_PULSE_SPEED));
        assert!(engine
            .particles(SectionId::Benefits)
            .iter()
            .all(|p| p.rotation_speed.abs() <= MAX_ROTATION_SPEED));
    }
}
