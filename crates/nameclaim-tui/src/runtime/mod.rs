//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! Async results come back through the inbox: handlers send `UiEvent`s to
//! `inbox_tx` and the runtime drains `inbox_rx` every loop iteration. Session
//! changes are read from the session context's `watch` receiver.

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use nameclaim_core::checker::AvailabilityChecker;
use nameclaim_core::config::Config;
use nameclaim_core::identity::IdentityProvider;
use nameclaim_core::session::{Session, SessionContext};
use nameclaim_core::store::DocumentStore;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::{mpsc, watch};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick interval while something is pending (spinner animation).
pub const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Tick interval when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is restored on drop and on panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    session_rx: watch::Receiver<Session>,
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    checker: AvailabilityChecker,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates a runtime showing the page for the session's current value.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(
        config: Config,
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        session: &SessionContext,
    ) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let mut session_rx = session.subscribe();
        let initial = session_rx.borrow_and_update().clone();
        let checker = AvailabilityChecker::new(Arc::clone(&store), config.debounce());
        let state = AppState::new(config, provider.label(), initial);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            session_rx,
            provider,
            store,
            checker,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal input fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        let result = self.event_loop();
        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }

            let events = self.collect_events()?;
            dirty = !events.is_empty();
            for event in events {
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }
        }

        self.checker.cancel();
        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from the session, the inbox and the terminal.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let needs_fast_tick = self.state.auth.sign_in_pending
            || self.state.auth.sign_out_pending
            || self.state.form.is_loading
            || self.state.form.is_submitting;
        let tick_interval = if needs_fast_tick {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        if self.session_rx.has_changed().unwrap_or(false) {
            let session = self.session_rx.borrow_and_update().clone();
            events.push(UiEvent::SessionChanged(session));
        }

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Block on terminal input only when nothing else is waiting.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };
        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a handler and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::SignIn => {
                let provider = Arc::clone(&self.provider);
                self.spawn_effect(|| handlers::sign_in(provider));
            }
            UiEffect::SignOut => {
                let provider = Arc::clone(&self.provider);
                self.spawn_effect(|| handlers::sign_out(provider));
            }
            UiEffect::ScheduleUsernameCheck { request, candidate } => {
                handlers::schedule_username_check(
                    &mut self.checker,
                    &self.inbox_tx,
                    request,
                    candidate,
                );
            }
            UiEffect::CancelUsernameCheck => {
                self.checker.cancel();
            }
            UiEffect::ClaimUsername {
                request,
                identity,
                username,
            } => {
                let store = Arc::clone(&self.store);
                self.spawn_effect(move || {
                    handlers::claim_username(store, request, identity, username)
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
