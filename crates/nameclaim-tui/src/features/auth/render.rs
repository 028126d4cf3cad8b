//! Auth feature view.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::AuthState;
use crate::common::render_utils::{InputHint, button, centered_area, render_card, render_hints};

const CARD_WIDTH: u16 = 48;
const CARD_HEIGHT: u16 = 9;

pub fn render_sign_in_page(frame: &mut Frame, auth: &AuthState, spinner: &str, area: Rect) {
    let card = centered_area(area, CARD_WIDTH, CARD_HEIGHT);
    let inner = render_card(frame, card, "Enter", Color::Blue);

    let status = if auth.sign_in_pending {
        Line::from(Span::styled(
            format!("{spinner} Waiting for {}...", auth.provider_label),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from("")
    };
    let lines = vec![
        Line::from(""),
        Line::from(button(
            &format!("Sign In with {}", auth.provider_label),
            Color::Blue,
            !auth.sign_in_pending,
        )),
        Line::from(""),
        status,
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);

    render_hints(
        frame,
        inner,
        &[InputHint::new("Enter", "sign in"), InputHint::new("q", "quit")],
        Color::Blue,
    );
}

pub fn render_sign_out_page(
    frame: &mut Frame,
    auth: &AuthState,
    display_name: &str,
    username: &str,
    area: Rect,
) {
    let card = centered_area(area, CARD_WIDTH, CARD_HEIGHT);
    let inner = render_card(frame, card, "Enter", Color::Red);

    let lines = vec![
        Line::from(vec![
            Span::raw("Signed in as "),
            Span::styled(format!("@{username}"), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            display_name.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(button("Sign Out", Color::Red, !auth.sign_out_pending)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);

    render_hints(
        frame,
        inner,
        &[InputHint::new("Enter", "sign out"), InputHint::new("q", "quit")],
        Color::Red,
    );
}
