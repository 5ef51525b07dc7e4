use std::collections::HashMap;

use log::Level;
use serde::Deserialize;

use crate::engine::particles::{ParticleEngine, ParticleFieldConfig, ValueRange};
use crate::engine::sections::SectionId;
use crate::engine::shapes::ShapeKind;
use crate::error::Result;

pub const CONFIG_ELEMENT_ID: &str = "landing-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Optional page-level overrides, embedded as JSON in the document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandingConfig {
    #[serde(default)]
    pub fields: HashMap<String, FieldOverride>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOverride {
    pub count: Option<usize>,
    pub color: Option<String>,
    pub size: Option<ValueRange>,
    pub speed: Option<ValueRange>,
    pub opacity: Option<ValueRange>,
    pub shape: Option<ShapeKind>,
}

impl FieldOverride {
    fn apply(&self, mut config: ParticleFieldConfig) -> ParticleFieldConfig {
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(color) = &self.color {
            config.color = color.clone();
        }
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(opacity) = self.opacity {
            config.opacity = opacity;
        }
        if let Some(shape) = self.shape {
            config.shape = shape;
        }
        config
    }

    fn replaces_template(&self) -> bool {
        self.color.is_some() || self.size.is_some() || self.opacity.is_some() || self.shape.is_some()
    }

    /// Density and speed tweaks go through the engine's reconfiguration
    /// calls; anything else installs a whole new template.
    fn apply_to(&self, section: SectionId, engine: &mut ParticleEngine) {
        if self.replaces_template() {
            engine.init_field(section, self.apply(ParticleFieldConfig::default_for(section)));
            return;
        }
        if let Some(count) = self.count {
            engine.set_count(section, count);
        }
        if let Some(speed) = self.speed {
            engine.set_speed_range(section, speed);
        }
    }
}

impl LandingConfig {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pairs every override with its section, failing on the first name
    /// that is not a section of the page.
    pub fn resolve(&self) -> Result<Vec<(SectionId, &FieldOverride)>> {
        let mut resolved = Vec::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            let section: SectionId = name.parse()?;
            resolved.push((section, field));
        }
        resolved.sort_by_key(|(section, _)| *section);
        Ok(resolved)
    }

    pub fn apply_to(&self, engine: &mut ParticleEngine) -> Result<()> {
        for (section, field) in self.resolve()? {
            field.apply_to(section, engine);
        }
        Ok(())
    }
}
