pub mod clock;
pub mod config; // Construction-time settings and defaults
pub mod dsp;
pub mod error;
pub mod looper; // Sample store, write heads, playback and crossfades

pub use config::{ClearMode, LooperConfig};
pub use error::{LooperError, Result};
pub use looper::{Looper, LooperInputs};

/// Largest block the looper is tuned for. Longer host blocks are still
/// processed, they just are not what the benches measure.
pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
