//! Audio setup: duplex cpal streams around a looper on the output thread

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::{Consumer, Producer, RingBuffer};

use super::ui::{ControlMessage, LoopStatus, UiApp};

use tapeloop_dsp::{Looper, LooperConfig, LooperInputs, MAX_BLOCK_SIZE};

/// Interleaved stereo samples buffered between the input and output callbacks
const INPUT_RING_SIZE: usize = MAX_BLOCK_SIZE * 8;
const SCOPE_RING_SIZE: usize = 8192;
const CONTROL_RING_SIZE: usize = 64;
const STATUS_RING_SIZE: usize = 16;

/// Application builder
pub struct Tapeloop {
    buffer_seconds: f32,
}

impl Tapeloop {
    pub fn new() -> Self {
        Self {
            buffer_seconds: tapeloop_dsp::config::DEFAULT_BUFFER_SECONDS,
        }
    }

    /// Seconds of audio the looper can hold
    pub fn buffer_seconds(mut self, seconds: f32) -> Self {
        self.buffer_seconds = seconds;
        self
    }

    /// Open the audio devices and run the UI until the user quits
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let output = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let output_config = output
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = output_config.sample_rate().0 as f32;
        let channels = output_config.channels() as usize;

        let config = LooperConfig::new(sample_rate).with_buffer_seconds(self.buffer_seconds);
        let looper = Looper::new(config).wrap_err("failed to create looper")?;
        let capacity = looper.capacity();
        tracing::info!(
            "Output: {} Hz, {} channels, {} frame loop buffer",
            sample_rate,
            channels,
            capacity
        );

        let (input_tx, input_rx) = RingBuffer::<f32>::new(INPUT_RING_SIZE);
        let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);
        let (control_tx, control_rx) = RingBuffer::<ControlMessage>::new(CONTROL_RING_SIZE);
        let (status_tx, status_rx) = RingBuffer::<LoopStatus>::new(STATUS_RING_SIZE);

        // Recording works without an input device, it just records silence
        let input_stream = match host.default_input_device() {
            Some(device) => Some(build_input(&device, sample_rate, input_tx)?),
            None => {
                tracing::warn!("No input device, recording silence");
                None
            }
        };

        let mut engine = AudioEngine {
            looper,
            inputs: LooperInputs::default(),
            input_rx,
            scope_tx,
            control_rx,
            status_tx,
            left_in: vec![0.0; MAX_BLOCK_SIZE],
            right_in: vec![0.0; MAX_BLOCK_SIZE],
            left_out: vec![0.0; MAX_BLOCK_SIZE],
            right_out: vec![0.0; MAX_BLOCK_SIZE],
        };

        let output_stream = output.build_output_stream(
            &output_config.into(),
            move |data: &mut [f32], _| engine.render(data, channels),
            |err| tracing::error!("Output stream error: {}", err),
            None,
        )?;

        if let Some(stream) = &input_stream {
            stream.play()?;
        }
        output_stream.play()?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(control_tx, status_rx, scope_rx, capacity, sample_rate)
            .run(&mut terminal);
        ratatui::restore();

        result
    }
}

impl Default for Tapeloop {
    fn default() -> Self {
        Self::new()
    }
}

fn build_input(
    device: &cpal::Device,
    sample_rate: f32,
    mut input_tx: Producer<f32>,
) -> EyreResult<cpal::Stream> {
    let default = device
        .default_input_config()
        .wrap_err("failed to fetch default input config")?;
    let channels = default.channels() as usize;
    let config = cpal::StreamConfig {
        channels: default.channels(),
        sample_rate: cpal::SampleRate(sample_rate as u32),
        buffer_size: cpal::BufferSize::Default,
    };

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _| {
            for frame in data.chunks(channels.max(1)) {
                let left = frame.first().copied().unwrap_or(0.0);
                let right = frame.get(1).copied().unwrap_or(left);
                // Dropped when the output side falls behind
                if input_tx.slots() >= 2 {
                    let _ = input_tx.push(left);
                    let _ = input_tx.push(right);
                }
            }
        },
        |err| tracing::error!("Input stream error: {}", err),
        None,
    )?;
    Ok(stream)
}

/// State owned by the output callback
struct AudioEngine {
    looper: Looper,
    inputs: LooperInputs,
    input_rx: Consumer<f32>,
    scope_tx: Producer<f32>,
    control_rx: Consumer<ControlMessage>,
    status_tx: Producer<LoopStatus>,
    left_in: Vec<f32>,
    right_in: Vec<f32>,
    left_out: Vec<f32>,
    right_out: Vec<f32>,
}

impl AudioEngine {
    fn render(&mut self, data: &mut [f32], channels: usize) {
        let mut pulse = Pulse::default();
        while let Ok(message) = self.control_rx.pop() {
            match message {
                ControlMessage::Inputs(inputs) => self.inputs = inputs,
                ControlMessage::Clear => pulse.clear = true,
                ControlMessage::Tick => pulse.clock = true,
            }
        }

        let total_frames = data.len() / channels.max(1);
        let mut frames_written = 0;
        let mut peak = 0.0f32;

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

            for i in 0..frames {
                self.left_in[i] = self.input_rx.pop().unwrap_or(0.0);
                self.right_in[i] = self.input_rx.pop().unwrap_or(0.0);
            }

            // Clear and clock are edges: high for the first block only
            let inputs = LooperInputs {
                clear: pulse.clear,
                clock: if pulse.clock { 1.0 } else { 0.0 },
                ..self.inputs
            };
            pulse = Pulse::default();

            self.looper.process(
                &inputs,
                &self.left_in[..frames],
                &self.right_in[..frames],
                &mut self.left_out[..frames],
                &mut self.right_out[..frames],
            );

            let offset = frames_written * channels;
            for i in 0..frames {
                let (left, right) = (self.left_out[i], self.right_out[i]);
                peak = peak.max(left.abs()).max(right.abs());
                let frame = &mut data[offset + i * channels..offset + (i + 1) * channels];
                for (ch, out) in frame.iter_mut().enumerate() {
                    *out = if ch % 2 == 0 { left } else { right };
                }
                let _ = self.scope_tx.push(0.5 * (left + right));
            }

            frames_written += frames;
        }

        let _ = self.status_tx.push(LoopStatus::from_looper(&self.looper, peak));
    }
}

#[derive(Default)]
struct Pulse {
    clear: bool,
    clock: bool,
}
