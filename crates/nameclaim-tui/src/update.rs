//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use nameclaim_core::session::Session;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::page::Page;
use crate::state::AppState;
use crate::username::UsernameFormState;
use crate::{auth, username};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            app.toasts.expire(Instant::now());
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::SessionChanged(session) => apply_session(app, session),
        UiEvent::SignInFinished(result) => {
            auth::handle_sign_in_result(&mut app.auth, &mut app.toasts, result);
            vec![]
        }
        UiEvent::SignOutFinished(result) => {
            auth::handle_sign_out_result(&mut app.auth, result);
            vec![]
        }
        UiEvent::UsernameChecked {
            request,
            candidate,
            result,
        } => {
            username::handle_check_result(
                &mut app.form,
                &mut app.lookups,
                request,
                &candidate,
                result,
            );
            vec![]
        }
        UiEvent::ClaimFinished {
            request,
            username,
            result,
        } => {
            username::handle_claim_result(
                &mut app.form,
                &mut app.claims,
                &mut app.toasts,
                request,
                &username,
                result,
            );
            vec![]
        }
    }
}

/// Stores the new session and recomposes the page.
///
/// Any page switch, or a different user on the same page, remounts the form:
/// its state is reset and pending lookups and claims are abandoned.
fn apply_session(app: &mut AppState, session: Session) -> Vec<UiEffect> {
    let page = Page::compose(&session);
    let same_user = app.session.user_id() == session.user_id();
    app.session = session;
    if page == app.page && same_user {
        return vec![];
    }

    tracing::debug!(from = ?app.page, to = ?page, "page changed");
    app.page = page;
    app.form = UsernameFormState::default();
    app.lookups.cancel();
    app.claims.cancel();
    vec![UiEffect::CancelUsernameCheck]
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) if app.page == Page::UsernameForm && !app.form.is_submitting => {
            let mut raw = app.form.candidate.clone();
            raw.push_str(text.trim());
            username::handle_input(&mut app.form, &mut app.lookups, &raw)
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }
    if key.code == KeyCode::Esc {
        if app.toasts.dismiss_latest() {
            return vec![];
        }
        return vec![UiEffect::Quit];
    }

    match app.page {
        Page::SignIn => match key.code {
            KeyCode::Enter => auth::sign_in(&mut app.auth),
            KeyCode::Char('q') => vec![UiEffect::Quit],
            _ => vec![],
        },
        Page::SignOut => match key.code {
            KeyCode::Enter => auth::sign_out(&mut app.auth),
            KeyCode::Char('q') => vec![UiEffect::Quit],
            _ => vec![],
        },
        Page::UsernameForm => username::handle_key(
            &mut app.form,
            &mut app.lookups,
            &mut app.claims,
            app.session.identity.as_ref(),
            key,
        ),
    }
}
