//! Render sink abstraction
//!
//! The simulation never draws pixels. Each entity describes itself to a
//! `RenderSink` once per frame; the drawing backend lives outside the crate.

pub mod shapes;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const DEEP_BLUE: Color = Color::rgb(0, 17, 102);
    pub const CITRINE: Color = Color::rgb(204, 204, 0);
    pub const STONE: Color = Color::rgb(120, 110, 100);
}

/// Colors a circular target can spawn with
pub const TARGET_PALETTE: [Color; 6] = [
    Color::RED,
    Color::BLUE,
    Color::YELLOW,
    Color::GREEN,
    Color::MAGENTA,
    Color::CYAN,
];

/// Drawing target. Alpha is 0-255.
pub trait RenderSink {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: u8);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color, alpha: u8);
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: u8,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Color,
        alpha: u8,
    },
}

/// Sink that records draw calls, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSink for DrawList {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: u8) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color, alpha: u8) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
            alpha,
        });
    }
}

/// Alpha for an entity with the given life counter, scaled by `fade`
#[inline]
pub fn life_alpha(life: i32, fade: f32) -> u8 {
    let alpha = (life.max(0) as f32).min(crate::consts::MAX_ALPHA) * fade.clamp(0.0, 1.0);
    alpha as u8
}
