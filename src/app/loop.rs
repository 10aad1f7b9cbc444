use crate::app::{
    action::Action,
    input::map_event_to_action,
    reducer,
    runtime::{RouteNavigator, SearchRuntime},
    shortcuts::KeyListeners,
    state::AppState,
    ui,
};
use crate::domain::lookup::{Navigator, StockLookup};

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{backend::Backend, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::info;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Collaborators the palette runtime calls out to.
pub struct Services {
    pub lookup: Arc<dyn StockLookup>,
    /// `None` routes navigation back into the app as [`Action::Navigated`].
    pub navigator: Option<Arc<dyn Navigator>>,
    pub debounce_delay: Duration,
}

pub async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: AppState,
    services: Services,
) -> Result<()> {
    // User input channel
    let (event_tx, event_rx) = mpsc::channel(100);
    tokio::task::spawn_blocking(move || loop {
        match event::read() {
            Ok(evt) => {
                if event_tx.blocking_send(Ok(evt)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = event_tx.blocking_send(Err(e));
                break;
            }
        }
    });

    run_loop_with_events(terminal, app_state, services, event_rx).await
}

pub async fn run_loop_with_events<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app_state: AppState,
    services: Services,
    mut event_rx: mpsc::Receiver<Result<Event, std::io::Error>>,
) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::channel(100);
    let (route_tx, mut route_rx) = mpsc::unbounded_channel();
    let mut interval = interval(TICK_RATE);

    let navigator: Arc<dyn Navigator> = match services.navigator {
        Some(navigator) => navigator,
        None => Arc::new(RouteNavigator::new(route_tx)),
    };
    let listeners = KeyListeners::new();
    let mut runtime = SearchRuntime::new(
        services.lookup,
        navigator,
        action_tx.clone(),
        services.debounce_delay,
    );
    runtime.mount(&listeners);
    info!(
        debounce_ms = runtime.delay().as_millis() as u64,
        backend = %app_state.lookup_backend,
        "event loop started"
    );

    loop {
        // --- 1. Render ---
        terminal.draw(|f| {
            ui::draw(f, &app_state);
        })?;

        // --- 2. Event Handling (TEA Runtime) ---
        let action = tokio::select! {
            _ = interval.tick() => Some(Action::Tick),

            // User Input
            Some(res) = event_rx.recv() => {
                let event = res?;
                // Window-level listeners see keys before the mode mapping.
                let claimed = match &event {
                    Event::Key(key) => listeners.dispatch(key),
                    _ => None,
                };
                match claimed {
                    Some(action) => Some(action),
                    None => map_event_to_action(event, &app_state, terminal.size()?),
                }
            },

            // Async Results
            Some(a) = action_rx.recv() => Some(a),

            // Route changes
            Some(a) = route_rx.recv() => Some(a),
        };

        // --- 3. Update (Reducer) ---
        if let Some(action) = action {
            if let Action::Quit = action {
                break;
            }

            let command = reducer::update(&mut app_state, action);

            if app_state.should_quit {
                break;
            }

            if let Some(cmd) = command {
                runtime.handle(cmd);
            }
        }
    }

    runtime.unmount();
    info!("event loop stopped");
    Ok(())
}

#[cfg(test)]
#[path = "loop_tests.rs"]
mod tests;
