//! Sample store plus the two record heads.

use super::{
    store::{SampleStore, LEFT, RIGHT},
    write_head::WriteHead,
};
use crate::config::{ClearMode, LooperConfig};

pub struct LooperBuffer {
    store: SampleStore,
    heads: [WriteHead; 2],
    clear_mode: ClearMode,
    clearing: bool,
}

impl LooperBuffer {
    pub fn new(store: SampleStore, fade_samples: u32, clear_mode: ClearMode) -> Self {
        Self {
            store,
            heads: [WriteHead::new(fade_samples), WriteHead::new(fade_samples)],
            clear_mode,
            clearing: false,
        }
    }

    pub fn from_config(config: &LooperConfig) -> Self {
        let store =
            SampleStore::with_noise(config.capacity(), config.noise_level, config.noise_seed);
        Self::new(store, config.fade_samples(), config.clear_mode)
    }

    /// Start both heads. Ignored while a clear is running.
    pub fn start(&mut self) {
        if self.clearing {
            return;
        }
        for head in self.heads.iter_mut() {
            head.start();
        }
    }

    pub fn stop(&mut self) {
        for head in self.heads.iter_mut() {
            head.stop();
        }
    }

    pub fn is_recording(&self) -> bool {
        self.heads.iter().any(WriteHead::is_writing)
    }

    #[inline]
    pub fn write(&mut self, position: i64, left: f32, right: f32) {
        let [head_l, head_r] = &mut self.heads;
        head_l.write(&mut self.store, LEFT, position, left);
        head_r.write(&mut self.store, RIGHT, position, right);
    }

    /// Begin zeroing the store. Recording stops at once, without a fade.
    pub fn begin_clear(&mut self) {
        for head in self.heads.iter_mut() {
            head.force_stop();
        }
        self.store.restart_clear();
        self.clearing = true;
    }

    /// Run one block's worth of clearing. Returns true when the clear
    /// finished in this block.
    pub fn clear_step(&mut self) -> bool {
        if !self.clearing {
            return false;
        }

        let done = match self.clear_mode {
            ClearMode::Immediate => {
                self.store.clear();
                true
            }
            ClearMode::Incremental => self.store.clear_step(),
        };
        if done {
            self.clearing = false;
        }
        done
    }

    pub fn is_clearing(&self) -> bool {
        self.clearing
    }

    pub fn clear_mode(&self) -> ClearMode {
        self.clear_mode
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }
}
