//! TUI module for tapeloop
//!
//! Keyboard controls for the looper plus a live view of the loop window and
//! the output signal.

mod loop_view;
pub mod state;
mod transport;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;

use tapeloop_dsp::{looper::speed::speed_from_knob, LooperInputs};

pub use state::{ControlMessage, LoopStatus};

use loop_view::render_loop_view;
use transport::render_transport;
use waveform::render_waveform;

/// Samples shown in the oscilloscope
const SCOPE_SIZE: usize = 1024;
/// Knob travel per key press, 0.05 of speed on the speed knob
const SPEED_STEP: f32 = 0.0125;
const KNOB_STEP: f32 = 0.02;
/// Speed knob positions of zero and unity speed
const SPEED_CENTER: f32 = 0.5;
const UNITY_KNOB: f32 = 0.75;

/// Controls held by the UI and mirrored to the audio thread
pub struct Controls {
    pub inputs: LooperInputs,
    /// 0..1, mapped onto the signed speed range
    pub speed_knob: f32,
}

impl Controls {
    fn new() -> Self {
        let mut controls = Self {
            inputs: LooperInputs::default(),
            speed_knob: SPEED_CENTER,
        };
        controls.set_speed_knob(UNITY_KNOB);
        controls
    }

    fn nudge(value: &mut f32, delta: f32, min: f32, max: f32) {
        *value = (*value + delta).clamp(min, max);
    }

    fn set_speed_knob(&mut self, value: f32) {
        self.speed_knob = value.clamp(0.0, 1.0);
        self.inputs.speed = speed_from_knob(self.speed_knob, SPEED_CENTER);
    }

    fn nudge_speed(&mut self, delta: f32) {
        self.set_speed_knob(self.speed_knob + delta);
    }

    /// Mirror the knob around its center.
    fn reverse(&mut self) {
        self.set_speed_knob(2.0 * SPEED_CENTER - self.speed_knob);
    }
}

/// UI application state
pub struct UiApp {
    control_tx: Producer<ControlMessage>,
    status_rx: Consumer<LoopStatus>,
    scope_rx: Consumer<f32>,
    status: LoopStatus,
    controls: Controls,
    scope: Vec<f32>,
    capacity: usize,
    sample_rate: f32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        control_tx: Producer<ControlMessage>,
        status_rx: Consumer<LoopStatus>,
        scope_rx: Consumer<f32>,
        capacity: usize,
        sample_rate: f32,
    ) -> Self {
        Self {
            control_tx,
            status_rx,
            scope_rx,
            status: LoopStatus::default(),
            controls: Controls::new(),
            scope: vec![0.0; SCOPE_SIZE],
            capacity,
            sample_rate,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();
            self.poll_status();

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Keep the last SCOPE_SIZE output samples
    fn poll_scope(&mut self) {
        let available = self.scope_rx.slots();
        if available == 0 {
            return;
        }
        self.scope.extend(std::iter::from_fn(|| self.scope_rx.pop().ok()).take(available));
        if self.scope.len() > SCOPE_SIZE {
            let excess = self.scope.len() - SCOPE_SIZE;
            self.scope.drain(0..excess);
        }
    }

    /// Keep only the latest status
    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let controls = &mut self.controls;
        let message = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(' ') => {
                controls.inputs.recording = !controls.inputs.recording;
                None
            }
            KeyCode::Left => {
                controls.nudge_speed(-SPEED_STEP);
                None
            }
            KeyCode::Right => {
                controls.nudge_speed(SPEED_STEP);
                None
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                controls.reverse();
                None
            }
            KeyCode::Up => {
                Controls::nudge(&mut controls.inputs.length, KNOB_STEP, 0.0, 1.0);
                None
            }
            KeyCode::Down => {
                Controls::nudge(&mut controls.inputs.length, -KNOB_STEP, 0.0, 1.0);
                None
            }
            KeyCode::Char('[') => {
                Controls::nudge(&mut controls.inputs.start, -KNOB_STEP, 0.0, 1.0);
                None
            }
            KeyCode::Char(']') => {
                Controls::nudge(&mut controls.inputs.start, KNOB_STEP, 0.0, 1.0);
                None
            }
            KeyCode::Char('f') => {
                Controls::nudge(&mut controls.inputs.filter, -KNOB_STEP, 0.0, 1.0);
                None
            }
            KeyCode::Char('F') => {
                Controls::nudge(&mut controls.inputs.filter, KNOB_STEP, 0.0, 1.0);
                None
            }
            KeyCode::Char('s') => {
                Controls::nudge(&mut controls.inputs.sound_on_sound, -KNOB_STEP, 0.0, 1.0);
                None
            }
            KeyCode::Char('S') => {
                Controls::nudge(&mut controls.inputs.sound_on_sound, KNOB_STEP, 0.0, 1.0);
                None
            }
            KeyCode::Char('c') | KeyCode::Char('C') => Some(ControlMessage::Clear),
            KeyCode::Char('t') | KeyCode::Char('T') => Some(ControlMessage::Tick),
            _ => return,
        };

        let message = message.unwrap_or(ControlMessage::Inputs(self.controls.inputs));
        if self.control_tx.push(message).is_err() {
            tracing::warn!("Control queue full, dropped {:?}", message);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Length(4), // Loop window
                Constraint::Min(6),    // Oscilloscope
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_transport(frame, chunks[0], &self.status, self.sample_rate);
        render_loop_view(frame, chunks[1], &self.status, &self.controls, self.capacity);
        render_waveform(frame, chunks[2], &self.scope);

        let help = Paragraph::new(
            " [Space] Rec  [←/→] Speed  [r] Reverse  [↑/↓] Length  [[/]] Start  [f/F] Filter  [s/S] SOS  [c] Clear  [t] Tick  [q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
