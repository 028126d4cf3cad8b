//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::page::Page;
use crate::state::AppState;
use crate::{auth, toast, username};

/// Height of the title bar.
const HEADER_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_page(frame, app, chunks[1]);
    toast::render_toasts(frame, &app.toasts, area);
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let who = match (&app.session.identity, &app.session.claimed_username) {
        (None, _) => "signed out".to_string(),
        (Some(identity), None) => identity.display_name.clone(),
        (Some(identity), Some(name)) => format!("{} (@{name})", identity.display_name),
    };
    let line = Line::from(vec![
        Span::styled("nameclaim", Style::default().fg(Color::Cyan)),
        Span::styled(format!("  {who}"), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
}

fn render_page(frame: &mut Frame, app: &AppState, area: Rect) {
    let display_name = app
        .session
        .identity
        .as_ref()
        .map_or("", |identity| identity.display_name.as_str());

    match app.page {
        Page::SignIn => auth::render_sign_in_page(frame, &app.auth, app.spinner(), area),
        Page::UsernameForm => username::render_username_form(
            frame,
            &app.form,
            display_name,
            app.config.ui.show_debug_state,
            app.spinner(),
            area,
        ),
        Page::SignOut => auth::render_sign_out_page(
            frame,
            &app.auth,
            display_name,
            app.session.claimed_username.as_deref().unwrap_or_default(),
            area,
        ),
    }
}
