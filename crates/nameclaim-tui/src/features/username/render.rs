//! Username form view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::UsernameFormState;
use crate::common::render_utils::{
    InputHint, InputLine, button, centered_area, input_line, render_card, render_hints,
};

const CARD_WIDTH: u16 = 52;
const CARD_HEIGHT: u16 = 13;

pub fn render_username_form(
    frame: &mut Frame,
    form: &UsernameFormState,
    display_name: &str,
    show_debug_state: bool,
    spinner: &str,
    area: Rect,
) {
    let height = if show_debug_state {
        CARD_HEIGHT + 2
    } else {
        CARD_HEIGHT
    };
    let card = centered_area(area, CARD_WIDTH, height);
    let inner = render_card(frame, card, "Choose Username", Color::Cyan);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Welcome, {display_name}"),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        input_line(
            &InputLine {
                value: &form.candidate,
                placeholder: Some("username"),
                prompt: "@ ",
                prompt_color: Color::Cyan,
                text_color: Color::White,
                placeholder_color: Color::DarkGray,
                cursor_color: Color::Cyan,
            },
            inner.width,
        ),
        helper_line(form),
        Line::from(""),
        submit_line(form, spinner),
    ];

    if show_debug_state {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Debug State",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("Username valid: {}", form.is_valid)));
    }

    frame.render_widget(Paragraph::new(lines), inner);

    render_hints(
        frame,
        inner,
        &[
            InputHint::new("Enter", "submit"),
            InputHint::new("Esc", "dismiss/quit"),
        ],
        Color::Cyan,
    );
}

fn helper_line(form: &UsernameFormState) -> Line<'static> {
    let Some(helper) = form.helper_text() else {
        return Line::from("");
    };
    let color = if helper.is_error() {
        Color::Red
    } else {
        Color::Green
    };
    Line::from(Span::styled(helper.message(), Style::default().fg(color)))
}

fn submit_line(form: &UsernameFormState, spinner: &str) -> Line<'static> {
    if form.is_loading || form.is_submitting {
        Line::from(Span::styled(
            format!("{spinner} Loading..."),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(button("Submit", Color::Green, form.can_submit()))
    }
}
