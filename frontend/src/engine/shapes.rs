use std::f64::consts::PI;

use serde::Deserialize;

const HIGHLIGHT: &str = "rgba(255, 255, 255, 0.3)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Star,
    Diamond,
    Dot,
    Coin,
    Heart,
    Square,
}

/// One 2d drawing instruction, relative to the particle's own origin.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand<'a> {
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo { cx: f64, cy: f64, x: f64, y: f64 },
    Arc { radius: f64 },
    ClosePath,
    Fill(&'a str),
    Glow { color: &'a str, blur: f64 },
    FillRect { half: f64, color: &'a str },
    StrokeRect { half: f64, color: &'a str, line_width: f64 },
}

/// Anything particles can be painted onto. Implemented for the browser
/// canvas in the web layer and by a recorder in tests.
pub trait DrawSurface {
    fn clear(&mut self, width: f64, height: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn set_alpha(&mut self, alpha: f64);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn draw(&mut self, command: &DrawCommand<'_>);
}

impl ShapeKind {
    pub fn commands(self, size: f64, color: &str) -> Vec<DrawCommand<'_>> {
        match self {
            ShapeKind::Star => star(size, color),
            ShapeKind::Diamond => diamond(size, color),
            ShapeKind::Dot => dot(size, color),
            ShapeKind::Coin => coin(size, color),
            ShapeKind::Heart => heart(size, color),
            ShapeKind::Square => square(size, color),
        }
    }
}

pub fn star(size: f64, color: &str) -> Vec<DrawCommand<'_>> {
    const SPIKES: usize = 5;
    let inner = size * 0.4;

    let mut commands = vec![DrawCommand::BeginPath];
    for i in 0..SPIKES * 2 {
        let radius = if i % 2 == 0 { size } else { inner };
        let angle = i as f64 * PI / SPIKES as f64;
        let (x, y) = (angle.cos() * radius, angle.sin() * radius);
        commands.push(if i == 0 {
            DrawCommand::MoveTo(x, y)
        } else {
            DrawCommand::LineTo(x, y)
        });
    }
    commands.extend([
        DrawCommand::ClosePath,
        DrawCommand::Fill(color),
        DrawCommand::Glow { color, blur: size },
        DrawCommand::Fill(color),
    ]);
    commands
}

fn rhombus(half: f64, color: &str) -> [DrawCommand<'_>; 7] {
    [
        DrawCommand::BeginPath,
        DrawCommand::MoveTo(0.0, -half),
        DrawCommand::LineTo(half, 0.0),
        DrawCommand::LineTo(0.0, half),
        DrawCommand::LineTo(-half, 0.0),
        DrawCommand::ClosePath,
        DrawCommand::Fill(color),
    ]
}

pub fn diamond(size: f64, color: &str) -> Vec<DrawCommand<'_>> {
    let mut commands = rhombus(size, color).to_vec();
    commands.extend(rhombus(size * 0.7, HIGHLIGHT));
    commands
}

pub fn dot(size: f64, color: &str) -> Vec<DrawCommand<'_>> {
    vec![
        DrawCommand::BeginPath,
        DrawCommand::Arc { radius: size },
        DrawCommand::Fill(color),
        DrawCommand::Glow { color, blur: size * 2.0 },
        DrawCommand::Fill(color),
    ]
}

pub fn coin(size: f64, color: &str) -> Vec<DrawCommand<'_>> {
    let mut commands = Vec::with_capacity(9);
    for (radius, fill) in [(size, color), (size * 0.7, HIGHLIGHT), (size * 0.3, color)] {
        commands.extend([
            DrawCommand::BeginPath,
            DrawCommand::Arc { radius },
            DrawCommand::Fill(fill),
        ]);
    }
    commands
}

pub fn heart(size: f64, color: &str) -> Vec<DrawCommand<'_>> {
    let w = size * 2.0;
    let h = size * 2.0;
    vec![
        DrawCommand::BeginPath,
        DrawCommand::MoveTo(0.0, h / 4.0),
        DrawCommand::QuadTo { cx: 0.0, cy: 0.0, x: w / 4.0, y: 0.0 },
        DrawCommand::QuadTo { cx: w / 2.0, cy: 0.0, x: w / 2.0, y: h / 4.0 },
        DrawCommand::QuadTo { cx: w / 2.0, cy: 0.0, x: w * 3.0 / 4.0, y: 0.0 },
        DrawCommand::QuadTo { cx: w, cy: 0.0, x: w, y: h / 4.0 },
        DrawCommand::QuadTo { cx: w, cy: h / 2.0, x: w * 3.0 / 4.0, y: h * 3.0 / 4.0 },
        DrawCommand::LineTo(w / 2.0, h),
        DrawCommand::LineTo(w / 4.0, h * 3.0 / 4.0),
        DrawCommand::QuadTo { cx: 0.0, cy: h / 2.0, x: 0.0, y: h / 4.0 },
        DrawCommand::Fill(color),
    ]
}

pub fn square(size: f64, color: &str) -> Vec<DrawCommand<'_>> {
    vec![
        DrawCommand::BeginPath,
        DrawCommand::FillRect { half: size, color },
        DrawCommand::StrokeRect { half: size, color: HIGHLIGHT, line_width: 0.5 },
    ]
}
