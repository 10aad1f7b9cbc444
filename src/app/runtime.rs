//! Side-effect half of the palette: executes the [`Command`]s the reducer
//! returns and feeds results back into the action channel.

use super::{
    action::Action,
    command::Command,
    debounce::{DebounceCell, DebouncedAction},
    shortcuts::{is_palette_shortcut, KeyListeners, Subscription},
};
use crate::domain::lookup::{Navigator, StockLookup};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Navigator for the terminal app: moving to a path is an action the main
/// view reacts to.
///
/// Uses its own unbounded channel. The session is already closed by the time
/// the navigation is issued, so a full channel must not lose it.
pub struct RouteNavigator {
    tx: mpsc::UnboundedSender<Action>,
}

impl RouteNavigator {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }
}

impl Navigator for RouteNavigator {
    fn navigate(&self, path: &str) {
        if self.tx.send(Action::Navigated(path.to_string())).is_err() {
            tracing::warn!(path, "navigation dropped, event loop has stopped");
        }
    }
}

/// One mounted palette instance: its debouncer, its shortcut listener and
/// the collaborators it calls out to.
pub struct SearchRuntime {
    lookup: Arc<dyn StockLookup>,
    navigator: Arc<dyn Navigator>,
    tx: mpsc::Sender<Action>,
    delay: Duration,
    due: DebouncedAction,
    // Generation the armed debounce window belongs to.
    scheduled: Arc<AtomicU64>,
    debounce: DebounceCell,
    shortcut: Option<Subscription>,
}

impl SearchRuntime {
    pub fn new(
        lookup: Arc<dyn StockLookup>,
        navigator: Arc<dyn Navigator>,
        tx: mpsc::Sender<Action>,
        delay: Duration,
    ) -> Self {
        let due_tx = tx.clone();
        let scheduled = Arc::new(AtomicU64::new(0));
        let armed = Arc::clone(&scheduled);
        let due: DebouncedAction = Arc::new(move || {
            let generation = armed.load(Ordering::Acquire);
            // Runs on the debounce task; the channel is bounded so hand off.
            let tx = due_tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(Action::LookupDue { generation }).await;
            });
        });
        Self {
            lookup,
            navigator,
            tx,
            delay,
            due,
            scheduled,
            debounce: DebounceCell::new(),
            shortcut: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Registers the global shortcut. Mounting twice keeps one listener.
    pub fn mount(&mut self, listeners: &KeyListeners) {
        if self.shortcut.is_some() {
            return;
        }
        self.shortcut = Some(
            listeners.subscribe(|key| is_palette_shortcut(key).then_some(Action::ToggleSearch)),
        );
        debug!("search palette mounted");
    }

    /// Cancels any pending lookup and drops the shortcut listener. Safe to
    /// call more than once.
    pub fn unmount(&mut self) {
        self.debounce.teardown();
        if let Some(mut subscription) = self.shortcut.take() {
            subscription.unsubscribe();
            debug!("search palette unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.shortcut.is_some()
    }

    pub fn is_lookup_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::ScheduleLookup { generation } => {
                self.scheduled.store(generation, Ordering::Release);
                self.debounce.get(&self.due, self.delay).trigger();
            }
            Command::CancelLookup => self.debounce.teardown(),
            Command::Lookup { query, generation } => {
                info!(%query, backend = self.lookup.backend_name(), "looking up stocks");
                let lookup = Arc::clone(&self.lookup);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let outcome = lookup.search(&query).await.map_err(|e| e.to_string());
                    let _ = tx
                        .send(Action::LookupResolved {
                            generation,
                            outcome,
                        })
                        .await;
                });
            }
            Command::Navigate(path) => self.navigator.navigate(&path),
            Command::Batch(commands) => {
                for command in commands {
                    self.handle(command);
                }
            }
        }
    }
}

impl Drop for SearchRuntime {
    fn drop(&mut self) {
        self.unmount();
    }
}
