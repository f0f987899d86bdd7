//! Capabilities shared by everything the frame driver uploads and draws.

use std::ops::AddAssign;

use crate::error::RenderError;
use crate::shader::ShaderProgram;

/// Per-draw counters, summed over submeshes and meshes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Draw commands actually issued.
    pub draw_calls: usize,
    /// Indices submitted.
    pub elements: u64,
    /// Submeshes not drawn because of an invalid material binding.
    pub skipped: usize,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.draw_calls += rhs.draw_calls;
        self.elements += rhs.elements;
        self.skipped += rhs.skipped;
    }
}

/// Something that must be uploaded against a program before drawing.
pub trait Loadable {
    fn load(&mut self, program: &ShaderProgram) -> Result<(), RenderError>;

    fn is_loaded(&self) -> bool;
}

/// Something that issues draw calls with a linked program.
pub trait Drawable {
    fn draw(&self, program: &ShaderProgram) -> Result<DrawStats, RenderError>;
}
