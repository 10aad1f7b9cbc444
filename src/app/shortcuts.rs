use super::action::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

type KeyHandler = Arc<dyn Fn(&KeyEvent) -> Option<Action> + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, KeyHandler)>,
}

/// Window-level key listeners. They see every key press before mode-specific
/// mapping; a listener that returns an action consumes the event.
#[derive(Clone, Default)]
pub struct KeyListeners {
    registry: Arc<Mutex<Registry>>,
}

impl KeyListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&KeyEvent) -> Option<Action> + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
            active: true,
        }
    }

    /// First listener to claim the key wins.
    pub fn dispatch(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        // Handlers run outside the lock so they may subscribe or unsubscribe.
        let handlers: Vec<KeyHandler> = self
            .registry
            .lock()
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        handlers.iter().find_map(|handler| handler(key))
    }

    pub fn len(&self) -> usize {
        self.registry.lock().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by [`KeyListeners::subscribe`]. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
    active: bool,
}

impl Subscription {
    /// Returns `false` when already unsubscribed.
    pub fn unsubscribe(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().handlers.retain(|(id, _)| *id != self.id);
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Ctrl+K, or Cmd+K where the terminal reports the super/meta modifier.
/// The letter is matched case-insensitively.
pub fn is_palette_shortcut(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    let has_modifier = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META);
    has_modifier && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&'k'))
}
