//! Loop window over the whole buffer
//!
//! ```text
//! |......[=========|==========]..........................|
//!        start     phase      start + length
//! ```

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Controls, LoopStatus};

pub fn render_loop_view(
    frame: &mut Frame,
    area: Rect,
    status: &LoopStatus,
    controls: &Controls,
    capacity: usize,
) {
    let block = Block::default().title(" Loop ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    if width == 0 || capacity == 0 {
        return;
    }

    let cell = |position: f32| -> usize {
        let wrapped = position.rem_euclid(capacity as f32);
        ((wrapped / capacity as f32) * width as f32) as usize
    };
    let first = cell(status.start);
    let cells = ((status.length / capacity as f32) * width as f32).ceil().max(1.0) as usize;
    let head = cell(status.start + status.phase);

    let bar: String = (0..width)
        .map(|i| {
            let inside = (i + width - first) % width < cells;
            if i == head {
                '|'
            } else if inside {
                '='
            } else {
                '.'
            }
        })
        .collect();

    let color = if status.fading {
        Color::Yellow
    } else {
        Color::Cyan
    };

    let lines = vec![
        Line::from(Span::styled(bar, Style::default().fg(color))),
        Line::from(Span::styled(
            format!(
                " start {:.2}  length {:.2}  speed {:+.2}  filter {:.2}  sos {:.2}",
                controls.inputs.start,
                controls.inputs.length,
                controls.inputs.speed,
                controls.inputs.filter,
                controls.inputs.sound_on_sound,
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
