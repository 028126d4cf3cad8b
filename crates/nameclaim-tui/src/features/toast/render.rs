use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::{ToastKind, ToastState};
use crate::common::truncate_with_ellipsis;

const TOAST_WIDTH: u16 = 56;
const TOAST_HEIGHT: u16 = 3;

/// Renders active toasts stacked from the top edge, newest on top.
pub fn render_toasts(frame: &mut Frame, toasts: &ToastState, area: Rect) {
    let width = TOAST_WIDTH.min(area.width.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;

    for (row, toast) in toasts.items().iter().rev().enumerate() {
        let y = area.y + row as u16 * TOAST_HEIGHT;
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let toast_area = Rect::new(x, y, width, TOAST_HEIGHT);
        let color = match toast.kind {
            ToastKind::Info => Color::Green,
            ToastKind::Error => Color::Red,
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
            .border_style(Style::default().fg(color));
        let text_width = width.saturating_sub(8) as usize;
        let mut spans = vec![Span::styled(
            truncate_with_ellipsis(&toast.message, text_width),
            Style::default().fg(Color::White),
        )];
        if row == 0 {
            spans.push(Span::styled("  Esc", Style::default().fg(Color::DarkGray)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), toast_area);
    }
}
