//! Status bar - record state, speed, clock and level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use tapeloop_dsp::looper::{Direction, TriggerStage};

use super::LoopStatus;

/// Render the status bar
pub fn render_transport(frame: &mut Frame, area: Rect, status: &LoopStatus, sample_rate: f32) {
    let block = Block::default().title(" tapeloop ").borders(Borders::ALL);

    let (record_symbol, record_color) = if status.clearing {
        ("◌ Clearing", Color::Yellow)
    } else if status.recording {
        ("● Rec", Color::Red)
    } else {
        ("○ Play", Color::Green)
    };

    let arrow = match status.direction {
        Direction::Forward => "▶",
        Direction::Backward => "◀",
        Direction::Stalled => "■",
    };
    let lock = if status.speed_locked { " [lock]" } else { "" };

    let clock = if status.clock_external {
        "Clock: ext"
    } else {
        "Clock: free"
    };
    let trigger = match status.trigger {
        TriggerStage::Idle => "",
        TriggerStage::FadingOut | TriggerStage::FadingIn => " ↺",
    };

    let seconds = status.length / sample_rate;

    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", record_symbol),
            Style::default().fg(record_color),
        ),
        Span::styled(
            format!("{} {:+.2}x{}  ", arrow, status.speed, lock),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Loop {:.3}s  ", seconds),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{}{}  ", clock, trigger),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}", status.peak),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
