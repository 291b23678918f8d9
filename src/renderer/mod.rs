//! Rendering seam
//!
//! The simulation never draws. Each frame the host captures a [`Frame`] and
//! hands it to whatever [`Renderer`] the platform provides.

pub mod frame;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use frame::{Frame, Hud, Overlay, Sprite, SpriteKind};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// Draws one captured frame
pub trait Renderer {
    fn draw(&mut self, frame: &Frame);

    /// Backing store changed size (CSS pixels times device pixel ratio)
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Renderer for headless runs; remembers only what it was last shown
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub last_hud: Option<Hud>,
}

impl Renderer for HeadlessRenderer {
    fn draw(&mut self, frame: &Frame) {
        self.frames += 1;
        self.last_hud = Some(frame.hud.clone());
    }
}
