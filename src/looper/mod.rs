//! The looper and its parts.
//!
//! Leaf first: the [`store`] holds the audio, [`write_head`]s record into it,
//! [`playback`] reads it back at varispeed using the crossfades in
//! [`transition`], and [`engine`] ties everything together per block.

pub mod buffer;
pub mod engine;
pub mod playback;
pub mod speed;
pub mod store;
pub mod transition;
pub mod write_head;

pub use buffer::LooperBuffer;
pub use engine::{Looper, LooperInputs};
pub use playback::Playback;
pub use speed::{speed_from_knob, Direction};
pub use store::{Frame, SampleStore};
pub use transition::{FadeKind, TriggerStage};
pub use write_head::{HeadState, WriteHead};
