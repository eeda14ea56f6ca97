//! Block-rate parameter interpolation.
//!
//! Controls are read once per block. Jumping straight to each new reading
//! makes speed changes step audibly ("zipper noise"); gliding towards it over
//! a few blocks hides the steps without adding per-sample cost.

/// Glides from the previous value to a new target over a fixed number of
/// blocks. Call [`next`](Self::next) once per block with the latest target.
#[derive(Debug, Clone, Copy)]
pub struct BlockInterpolator {
    value: f32,
    blocks: u32,
}

impl BlockInterpolator {
    pub fn new(initial: f32, blocks: u32) -> Self {
        Self {
            value: initial,
            blocks: blocks.max(1),
        }
    }

    /// Move `1/blocks` of the remaining distance towards `target`.
    #[inline]
    pub fn next(&mut self, target: f32) -> f32 {
        self.value += (target - self.value) / self.blocks as f32;
        self.value
    }
}
