use std::f64::consts::TAU;

use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement};

use crate::engine::particles::ParticleEngine;
use crate::engine::sections::SectionId;
use crate::engine::shapes::{DrawCommand, DrawSurface};
use crate::error::{LandingError, LogFailure, Result};

const CANVAS_STYLE: &str =
    "position: absolute; top: 0; left: 0; width: 100%; height: 100%; pointer-events: none; z-index: 1;";

/// A 2d canvas context seen through the engine's drawing interface.
pub struct CanvasSurface<'a> {
    context: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(context: &'a CanvasRenderingContext2d) -> Self {
        Self { context }
    }
}

impl DrawSurface for CanvasSurface<'_> {
    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.context.set_global_alpha(alpha);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.context.translate(x, y).log_failure("translate");
    }

    fn rotate(&mut self, angle: f64) {
        self.context.rotate(angle).log_failure("rotate");
    }

    fn draw(&mut self, command: &DrawCommand<'_>) {
        let ctx = self.context;
        match *command {
            DrawCommand::BeginPath => ctx.begin_path(),
            DrawCommand::MoveTo(x, y) => ctx.move_to(x, y),
            DrawCommand::LineTo(x, y) => ctx.line_to(x, y),
            DrawCommand::QuadTo { cx, cy, x, y } => ctx.quadratic_curve_to(cx, cy, x, y),
            DrawCommand::Arc { radius } => {
                ctx.arc(0.0, 0.0, radius, 0.0, TAU).log_failure("arc");
            }
            DrawCommand::ClosePath => ctx.close_path(),
            DrawCommand::Fill(color) => {
                ctx.set_fill_style_str(color);
                ctx.fill();
            }
            DrawCommand::Glow { color, blur } => {
                ctx.set_shadow_color(color);
                ctx.set_shadow_blur(blur);
            }
            DrawCommand::FillRect { half, color } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(-half, -half, half * 2.0, half * 2.0);
            }
            DrawCommand::StrokeRect { half, color, line_width } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(line_width);
                ctx.stroke_rect(-half, -half, half * 2.0, half * 2.0);
            }
        }
    }
}

/// The canvas appended to one section's particle container.
pub struct SectionCanvas {
    pub section: SectionId,
    container: Element,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl SectionCanvas {
    fn create(document: &Document, section: SectionId, container: Element) -> Result<Self> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| LandingError::MissingDom("canvas element"))?;
        canvas.set_attribute("style", CANVAS_STYLE)?;
        container.append_child(&canvas)?;

        let context = canvas
            .get_context("2d")?
            .ok_or(LandingError::MissingDom("2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| LandingError::MissingDom("2d context"))?;

        Ok(Self {
            section,
            container,
            canvas,
            context,
        })
    }

    /// Matches the canvas pixel size to its container and returns it.
    pub fn sync_size(&self) -> (f64, f64) {
        let rect = self.container.get_bounding_client_rect();
        self.canvas.set_width(rect.width().max(0.0) as u32);
        self.canvas.set_height(rect.height().max(0.0) as u32);
        (rect.width(), rect.height())
    }

    /// Top-left corner of the canvas in viewport coordinates.
    pub fn origin(&self) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (rect.left(), rect.top())
    }

    pub fn render(&self, engine: &ParticleEngine) {
        engine.render(self.section, &mut CanvasSurface::new(&self.context));
    }
}

/// Creates a canvas for every section that declares a particle container
/// and attaches it to the engine. Sections without one are skipped.
pub fn attach_canvases(document: &Document, engine: &mut ParticleEngine) -> Vec<SectionCanvas> {
    let mut canvases = Vec::new();
    for section in SectionId::ALL {
        let Some(container) = document.get_element_by_id(&section.particle_container_id()) else {
            continue;
        };
        match SectionCanvas::create(document, section, container) {
            Ok(canvas) => {
                let (width, height) = canvas.sync_size();
                engine.attach_surface(section, width, height);
                canvases.push(canvas);
            }
            Err(err) => warn!("no particle canvas for {}: {}", section, err),
        }
    }
    canvases
}

pub fn resize_canvases(canvases: &[SectionCanvas], engine: &mut ParticleEngine) {
    for canvas in canvases {
        let (width, height) = canvas.sync_size();
        engine.resize(canvas.section, width, height);
    }
}
