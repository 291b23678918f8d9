//! Canvas 2D renderer for the browser build

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wasm_bindgen::JsCast;

use super::{Frame, Overlay, Renderer, Sprite, SpriteKind};
use crate::sim::{EnemyVariant, PowerupKind};

const BACKGROUND: &str = "#07030f";
const GRID: &str = "rgba(255, 43, 214, 0.08)";
const GRID_SPACING: f32 = 40.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    size: (u32, u32),
}

impl CanvasRenderer {
    /// None if the canvas has no 2d context
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            size: (canvas.width(), canvas.height()),
        })
    }

    fn css(color: u32) -> String {
        format!("#{:06x}", color & 0x00ff_ffff)
    }

    /// Arena-to-canvas scale and letterbox offset
    fn fit(&self, frame: &Frame) -> (f64, f64, f64) {
        let (w, h) = (self.size.0 as f64, self.size.1 as f64);
        let scale = (w / frame.width.max(1.0) as f64).min(h / frame.height.max(1.0) as f64);
        let ox = (w - frame.width as f64 * scale) * 0.5;
        let oy = (h - frame.height as f64 * scale) * 0.5;
        (scale, ox, oy)
    }

    fn draw_grid(&self, frame: &Frame) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(GRID);
        ctx.set_line_width(1.0);
        // Scrolls slowly downward
        let scroll = (frame.time * 30.0) % GRID_SPACING;
        ctx.begin_path();
        let mut x = 0.0;
        while x <= frame.width {
            ctx.move_to(x as f64, 0.0);
            ctx.line_to(x as f64, frame.height as f64);
            x += GRID_SPACING;
        }
        let mut y = scroll - GRID_SPACING;
        while y <= frame.height {
            ctx.move_to(0.0, y as f64);
            ctx.line_to(frame.width as f64, y as f64);
            y += GRID_SPACING;
        }
        ctx.stroke();
    }

    fn draw_sprite(&self, sprite: &Sprite, glow: bool) {
        let ctx = &self.ctx;
        let color = Self::css(sprite.color);
        let r = sprite.radius as f64;

        ctx.save();
        ctx.set_global_alpha(sprite.alpha.clamp(0.0, 1.0) as f64);
        if glow && sprite.kind != SpriteKind::Particle {
            ctx.set_shadow_color(&color);
            ctx.set_shadow_blur(r.max(4.0));
        }
        ctx.translate(sprite.pos.x as f64, sprite.pos.y as f64).ok();
        ctx.rotate(sprite.rotation as f64).ok();
        ctx.set_fill_style_str(&color);
        ctx.set_stroke_style_str(&color);
        ctx.set_line_width(2.0);

        match sprite.kind {
            SpriteKind::Player => {
                // Arrowhead pointing up
                ctx.begin_path();
                ctx.move_to(0.0, -r);
                ctx.line_to(r * 0.8, r);
                ctx.line_to(0.0, r * 0.5);
                ctx.line_to(-r * 0.8, r);
                ctx.close_path();
                ctx.stroke();
            }
            SpriteKind::Enemy(variant) => {
                let sides = match variant {
                    EnemyVariant::Scout => 3,
                    EnemyVariant::Slinger => 4,
                    EnemyVariant::Brute => 6,
                };
                polygon(ctx, sides, r);
                ctx.stroke();
            }
            SpriteKind::EliteHalo => {
                ctx.begin_path();
                ctx.arc(0.0, 0.0, r, 0.0, TAU).ok();
                ctx.stroke();
            }
            SpriteKind::PlayerLaser | SpriteKind::EnemyLaser => {
                // rotation already aligns +x with travel
                ctx.fill_rect(-r * 3.0, -r * 0.5, r * 6.0, r);
            }
            SpriteKind::Particle => {
                ctx.fill_rect(-r * 0.5, -r * 0.5, r, r);
            }
            SpriteKind::Powerup(kind) => {
                polygon(ctx, 4, r);
                ctx.stroke();
                let glyph = match kind {
                    PowerupKind::Shield => "S",
                    PowerupKind::WeaponBuff => "W",
                };
                ctx.rotate(-sprite.rotation as f64).ok();
                ctx.set_font("bold 12px monospace");
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                ctx.fill_text(glyph, 0.0, 0.0).ok();
            }
        }
        ctx.restore();
    }

    fn draw_overlay(&self, frame: &Frame) {
        let (title, detail) = match frame.overlay {
            Overlay::None => return,
            Overlay::StartMenu => ("NEON RAID".to_string(), "press enter to start".to_string()),
            Overlay::Paused => ("PAUSED".to_string(), "press p to resume".to_string()),
            Overlay::GameOver(summary) => (
                "GAME OVER".to_string(),
                format!("score {}  wave {}  -  enter to retry", summary.score, summary.wave),
            ),
        };
        let ctx = &self.ctx;
        let (cx, cy) = (frame.width as f64 * 0.5, frame.height as f64 * 0.5);
        ctx.set_fill_style_str("rgba(7, 3, 15, 0.6)");
        ctx.fill_rect(0.0, 0.0, frame.width as f64, frame.height as f64);
        ctx.set_text_align("center");
        ctx.set_fill_style_str("#ff2bd6");
        ctx.set_font("bold 48px monospace");
        ctx.fill_text(&title, cx, cy - 20.0).ok();
        ctx.set_fill_style_str("#00f6ff");
        ctx.set_font("16px monospace");
        ctx.fill_text(&detail, cx, cy + 24.0).ok();
    }
}

fn polygon(ctx: &CanvasRenderingContext2d, sides: u32, r: f64) {
    ctx.begin_path();
    for i in 0..sides {
        let a = -std::f64::consts::FRAC_PI_2 + TAU * i as f64 / sides as f64;
        let (x, y) = (a.cos() * r, a.sin() * r);
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.close_path();
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, frame: &Frame) {
        let ctx = &self.ctx;
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, self.size.0 as f64, self.size.1 as f64);

        let (scale, ox, oy) = self.fit(frame);
        ctx.set_transform(scale, 0.0, 0.0, scale, ox, oy).ok();

        self.draw_grid(frame);
        for sprite in &frame.sprites {
            self.draw_sprite(sprite, frame.glow);
        }
        self.draw_overlay(frame);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}
