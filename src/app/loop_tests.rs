use super::*;
use crate::app::action::Action;
use crate::app::command::Command;
use crate::app::runtime::{RouteNavigator, SearchRuntime};
use crate::app::shortcuts::KeyListeners;
use crate::app::state::{AppState, SearchSession};
use crate::components::modals::search_palette::list_heading;
use crate::domain::lookup::{MockNavigator, MockStockLookup, StockLookup};
use crate::domain::models::SearchableItem;
use crate::error::LookupError;
use async_trait::async_trait;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const DELAY: Duration = Duration::from_millis(300);

fn stock(symbol: &str, name: &str) -> SearchableItem {
    SearchableItem::new(symbol, name, "NASDAQ", "Common Stock")
}

fn seeded_state() -> AppState {
    AppState {
        search: SearchSession::new(vec![
            stock("AAPL", "Apple Inc."),
            stock("GOOGL", "Alphabet Inc."),
        ]),
        ..Default::default()
    }
}

/// Records every query the palette looks up and answers with `results`.
fn recording_lookup(results: Vec<SearchableItem>) -> (MockStockLookup, Arc<Mutex<Vec<String>>>) {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&queries);
    let mut mock = MockStockLookup::new();
    mock.expect_backend_name().return_const("mock");
    mock.expect_search().returning(move |query| {
        seen.lock().push(query.to_string());
        Ok(results.clone())
    });
    (mock, queries)
}

fn recording_navigator() -> (MockNavigator, Arc<Mutex<Vec<String>>>) {
    let paths = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&paths);
    let mut mock = MockNavigator::new();
    mock.expect_navigate().returning(move |path| {
        seen.lock().push(path.to_string());
    });
    (mock, paths)
}

struct Harness {
    state: AppState,
    runtime: SearchRuntime,
    listeners: KeyListeners,
    rx: mpsc::Receiver<Action>,
}

impl Harness {
    fn new(state: AppState, lookup: Arc<dyn StockLookup>, navigator: Arc<dyn Navigator>) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let listeners = KeyListeners::new();
        let mut runtime = SearchRuntime::new(lookup, navigator, tx, DELAY);
        runtime.mount(&listeners);
        Self {
            state,
            runtime,
            listeners,
            rx,
        }
    }

    fn dispatch(&mut self, action: Action) {
        if let Some(command) = reducer::update(&mut self.state, action) {
            self.runtime.handle(command);
        }
    }

    fn press(&mut self, key: KeyEvent) {
        let action = self
            .listeners
            .dispatch(&key)
            .or_else(|| map_event_to_action(Event::Key(key), &self.state, TERMINAL));
        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    /// Lets spawned timers and lookups run, feeding their actions back in.
    async fn pump(&mut self) {
        for _ in 0..4 {
            settle().await;
            while let Ok(action) = self.rx.try_recv() {
                self.dispatch(action);
            }
        }
    }

    async fn advance(&mut self, duration: Duration) {
        tokio::time::advance(duration).await;
        self.pump().await;
    }
}

const TERMINAL: ratatui::layout::Size = ratatui::layout::Size {
    width: 80,
    height: 24,
};

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn ctrl_k() -> KeyEvent {
    KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL)
}

#[tokio::test]
async fn test_lookup_command_sends_results() {
    let (lookup, queries) = recording_lookup(vec![stock("TSLA", "Tesla, Inc.")]);
    let (navigator, _) = recording_navigator();
    let (tx, mut rx) = mpsc::channel(1);
    let mut runtime = SearchRuntime::new(Arc::new(lookup), Arc::new(navigator), tx, DELAY);

    runtime.handle(Command::Lookup {
        query: "TSLA".to_string(),
        generation: 7,
    });

    let action = rx.recv().await.unwrap();
    assert_eq!(
        action,
        Action::LookupResolved {
            generation: 7,
            outcome: Ok(vec![stock("TSLA", "Tesla, Inc.")]),
        }
    );
    assert_eq!(*queries.lock(), vec!["TSLA".to_string()]);
}

#[tokio::test]
async fn test_lookup_failure_is_reported_as_outcome() {
    let mut lookup = MockStockLookup::new();
    lookup.expect_backend_name().return_const("mock");
    lookup
        .expect_search()
        .returning(|_| Err(LookupError::Status(500)));
    let (navigator, _) = recording_navigator();
    let (tx, mut rx) = mpsc::channel(1);
    let mut runtime = SearchRuntime::new(Arc::new(lookup), Arc::new(navigator), tx, DELAY);

    runtime.handle(Command::Lookup {
        query: "ERROR".to_string(),
        generation: 1,
    });

    match rx.recv().await.unwrap() {
        Action::LookupResolved {
            outcome: Err(message),
            ..
        } => assert!(message.contains("500")),
        other => panic!("Expected failed LookupResolved, got {other:?}"),
    }
}

#[tokio::test]
async fn test_batch_cancels_and_navigates() {
    let (lookup, _) = recording_lookup(Vec::new());
    let (navigator, paths) = recording_navigator();
    let (tx, _rx) = mpsc::channel(1);
    let mut runtime = SearchRuntime::new(Arc::new(lookup), Arc::new(navigator), tx, DELAY);

    runtime.handle(Command::Batch(vec![
        Command::CancelLookup,
        Command::Navigate("/stocks/AAPL".to_string()),
    ]));
    assert_eq!(*paths.lock(), vec!["/stocks/AAPL".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_end_to_end_search_flow() {
    let (lookup, queries) = recording_lookup(vec![stock("TSLA", "Tesla, Inc.")]);
    let (navigator, paths) = recording_navigator();
    let mut h = Harness::new(seeded_state(), Arc::new(lookup), Arc::new(navigator));

    h.dispatch(Action::OpenSearch);
    assert_eq!(list_heading(&h.state.search), "Popular stocks (2)");

    h.type_text("TSLA");
    h.pump().await;
    assert!(h.state.search.is_loading());
    assert_eq!(list_heading(&h.state.search), "Loading stocks...");
    assert!(queries.lock().is_empty());

    h.advance(DELAY).await;
    assert_eq!(*queries.lock(), vec!["TSLA".to_string()]);
    assert_eq!(list_heading(&h.state.search), "Search results (1)");

    // Clearing restores the seed without waiting for the debounce.
    h.press(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    assert_eq!(list_heading(&h.state.search), "Popular stocks (2)");
    assert!(!h.runtime.is_lookup_pending());

    h.type_text("TSLA");
    h.advance(DELAY).await;
    h.press(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

    assert_eq!(*paths.lock(), vec!["/stocks/TSLA".to_string()]);
    assert!(!h.state.search.is_open());
    assert_eq!(h.state.search.query(), "");
    assert_eq!(list_heading(&h.state.search), "Popular stocks (2)");
}

#[tokio::test(start_paused = true)]
async fn test_typing_burst_looks_up_once_with_trimmed_query() {
    let (lookup, queries) = recording_lookup(Vec::new());
    let (navigator, _) = recording_navigator();
    let mut h = Harness::new(seeded_state(), Arc::new(lookup), Arc::new(navigator));

    h.dispatch(Action::OpenSearch);
    h.type_text("  TS");
    h.pump().await;
    h.advance(Duration::from_millis(100)).await;
    h.type_text("LA  ");
    h.pump().await;
    h.advance(Duration::from_millis(299)).await;
    assert!(queries.lock().is_empty());

    h.advance(Duration::from_millis(1)).await;
    assert_eq!(*queries.lock(), vec!["TSLA".to_string()]);
    assert!(h.state.search.results().is_empty());
    assert_eq!(list_heading(&h.state.search), "No results found");
}

#[tokio::test(start_paused = true)]
async fn test_blank_query_never_looks_up() {
    let (lookup, queries) = recording_lookup(Vec::new());
    let (navigator, _) = recording_navigator();
    let mut h = Harness::new(seeded_state(), Arc::new(lookup), Arc::new(navigator));

    h.dispatch(Action::OpenSearch);
    h.type_text("   ");
    h.advance(Duration::from_secs(1)).await;

    assert!(queries.lock().is_empty());
    assert!(!h.state.search.is_loading());
    assert_eq!(h.state.search.results().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_pending_lookup() {
    let (lookup, queries) = recording_lookup(Vec::new());
    let (navigator, _) = recording_navigator();
    let mut h = Harness::new(seeded_state(), Arc::new(lookup), Arc::new(navigator));

    h.dispatch(Action::OpenSearch);
    h.type_text("TSLA");
    h.pump().await;
    assert!(h.runtime.is_lookup_pending());

    h.press(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    assert!(!h.runtime.is_lookup_pending());
    h.advance(Duration::from_secs(1)).await;
    assert!(queries.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_keystroke_after_window_elapses_waits_for_new_window() {
    let (lookup, queries) = recording_lookup(Vec::new());
    let (navigator, _) = recording_navigator();
    let mut h = Harness::new(seeded_state(), Arc::new(lookup), Arc::new(navigator));

    h.dispatch(Action::OpenSearch);
    h.type_text("TSLA");
    h.pump().await;

    // The window for "TSLA" fires, but its signal is still queued when the
    // next key arrives.
    tokio::time::advance(DELAY).await;
    settle().await;
    h.type_text("X");
    h.pump().await;
    assert!(queries.lock().is_empty());
    assert!(h.state.search.is_loading());

    h.advance(DELAY - Duration::from_millis(1)).await;
    assert!(queries.lock().is_empty());

    h.advance(Duration::from_millis(1)).await;
    assert_eq!(*queries.lock(), vec!["TSLAX".to_string()]);

    h.advance(DELAY * 3).await;
    assert_eq!(queries.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_cancels_pending_lookup() {
    let (lookup, queries) = recording_lookup(Vec::new());
    let (navigator, _) = recording_navigator();
    let mut h = Harness::new(seeded_state(), Arc::new(lookup), Arc::new(navigator));

    h.dispatch(Action::OpenSearch);
    h.type_text("TSLA");
    h.pump().await;
    assert!(h.runtime.is_lookup_pending());

    h.runtime.unmount();
    assert!(!h.runtime.is_lookup_pending());

    tokio::time::advance(DELAY * 2).await;
    settle().await;
    assert!(h.rx.try_recv().is_err());
    assert!(queries.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_loop_exit_cancels_pending_lookup() {
    let (lookup, queries) = recording_lookup(Vec::new());
    let services = Services {
        lookup: Arc::new(lookup),
        navigator: None,
        debounce_delay: DELAY,
    };
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let (event_tx, event_rx) = mpsc::channel(100);

    let key = |code, modifiers| Ok(Event::Key(KeyEvent::new(code, modifiers)));
    event_tx
        .send(key(KeyCode::Char('k'), KeyModifiers::CONTROL))
        .await
        .unwrap();
    for c in "TSLA".chars() {
        event_tx
            .send(key(KeyCode::Char(c), KeyModifiers::NONE))
            .await
            .unwrap();
    }
    event_tx
        .send(key(KeyCode::Char('c'), KeyModifiers::CONTROL))
        .await
        .unwrap();

    run_loop_with_events(&mut terminal, seeded_state(), services, event_rx)
        .await
        .unwrap();

    tokio::time::advance(DELAY * 2).await;
    settle().await;
    assert!(queries.lock().is_empty());
}

#[tokio::test]
async fn test_route_navigator_never_drops_navigation() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let navigator = RouteNavigator::new(tx);

    for i in 0..500 {
        navigator.navigate(&format!("/stocks/S{i}"));
    }
    let mut delivered = 0;
    while let Ok(action) = rx.try_recv() {
        assert!(matches!(action, Action::Navigated(_)));
        delivered += 1;
    }
    assert_eq!(delivered, 500);

    drop(rx);
    navigator.navigate("/stocks/AAPL");
}

/// Answers each query after a per-query latency.
struct SlowLookup {
    latency: fn(&str) -> Duration,
}

#[async_trait]
impl StockLookup for SlowLookup {
    async fn search(&self, query: &str) -> Result<Vec<SearchableItem>, LookupError> {
        tokio::time::sleep((self.latency)(query)).await;
        Ok(vec![stock(query, query)])
    }

    fn backend_name(&self) -> &'static str {
        "slow"
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_is_discarded() {
    let lookup = SlowLookup {
        latency: |query| {
            if query == "A" {
                Duration::from_millis(1000)
            } else {
                Duration::from_millis(10)
            }
        },
    };
    let (navigator, _) = recording_navigator();
    let mut h = Harness::new(seeded_state(), Arc::new(lookup), Arc::new(navigator));

    h.dispatch(Action::OpenSearch);
    h.type_text("A");
    h.pump().await;
    h.advance(DELAY).await;

    // "A" is in flight; replace the query.
    h.press(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
    h.type_text("B");
    h.pump().await;
    h.advance(DELAY).await;
    h.advance(Duration::from_millis(10)).await;
    assert_eq!(h.state.search.results(), &[stock("B", "B")]);

    h.advance(Duration::from_millis(1000)).await;
    assert_eq!(h.state.search.results(), &[stock("B", "B")]);
    assert!(!h.state.search.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_shortcut_toggles_and_unsubscribes() {
    let (lookup, _) = recording_lookup(Vec::new());
    let (navigator, _) = recording_navigator();
    let mut h = Harness::new(seeded_state(), Arc::new(lookup), Arc::new(navigator));
    assert_eq!(h.listeners.len(), 1);

    h.press(ctrl_k());
    assert!(h.state.search.is_open());
    // Consumed by the listener, not typed into the query.
    assert_eq!(h.state.search.query(), "");

    h.press(KeyEvent::new(KeyCode::Char('K'), KeyModifiers::CONTROL));
    assert!(!h.state.search.is_open());

    h.runtime.unmount();
    h.runtime.unmount();
    assert!(!h.runtime.is_mounted());
    assert!(h.listeners.is_empty());

    h.press(ctrl_k());
    assert!(!h.state.search.is_open());
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_renders_results() {
    let (lookup, _) = recording_lookup(vec![stock("TSLA", "Tesla, Inc.")]);
    let services = Services {
        lookup: Arc::new(lookup),
        navigator: None,
        debounce_delay: DELAY,
    };
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let (event_tx, event_rx) = mpsc::channel(100);

    let feeder = tokio::spawn(async move {
        let key = |code, modifiers| Ok(Event::Key(KeyEvent::new(code, modifiers)));
        event_tx
            .send(key(KeyCode::Char('k'), KeyModifiers::CONTROL))
            .await
            .unwrap();
        for c in "TSLA".chars() {
            event_tx
                .send(key(KeyCode::Char(c), KeyModifiers::NONE))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        event_tx
            .send(key(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .await
            .unwrap();
    });

    run_loop_with_events(&mut terminal, seeded_state(), services, event_rx)
        .await
        .unwrap();
    feeder.await.unwrap();

    let buffer = terminal.backend().buffer();
    let screen: String = buffer.content.iter().map(|c| c.symbol()).collect();
    assert!(screen.contains("Search results (1)"));
    assert!(screen.contains("Tesla, Inc."));
}

#[tokio::test]
async fn test_keystroke_fuzzing() {
    let mut lookup = MockStockLookup::new();
    lookup.expect_backend_name().return_const("mock");
    lookup.expect_search().returning(|query| {
        if query.len() % 3 == 0 {
            Err(LookupError::Status(503))
        } else {
            Ok(vec![
                SearchableItem::new(query, "", "NYSE", "ETF"),
                SearchableItem::new("AAPL", "Apple Inc.", "NASDAQ", "Common Stock"),
            ])
        }
    });

    let services = Services {
        lookup: Arc::new(lookup),
        navigator: None,
        debounce_delay: Duration::from_millis(5),
    };
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let (event_tx, event_rx) = mpsc::channel(100);

    // Spawn a task to feed random events
    let fuzzer_handle = tokio::spawn(async move {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..10000 {
            let event = match rng.gen_range(0..100) {
                0..=3 => {
                    let w = rng.gen_range(10..200);
                    let h = rng.gen_range(10..100);
                    Event::Resize(w, h)
                }
                4..=15 => generate_random_mouse(&mut rng, ratatui::layout::Size::new(80, 24)),
                16..=18 => Event::Key(ctrl_k()),
                19 => Event::Paste("msft".to_string()),
                _ => generate_random_key(&mut rng),
            };
            if event_tx.send(Ok(event)).await.is_err() {
                break;
            }
            // Yield to allow the loop to process events
            if rng.gen_bool(0.1) {
                tokio::task::yield_now().await;
            }
        }
        let _ = event_tx
            .send(Ok(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ))))
            .await;
    });

    let result = tokio::time::timeout(
        Duration::from_secs(30),
        run_loop_with_events(&mut terminal, seeded_state(), services, event_rx),
    )
    .await;

    match result {
        Ok(res) => res.unwrap(),
        Err(_) => panic!("Fuzzer timed out - possible deadlock or too slow"),
    }

    fuzzer_handle.await.unwrap();
}

fn generate_random_key<R: Rng>(rng: &mut R) -> Event {
    let code = match rng.gen_range(0..16) {
        0 => KeyCode::Esc,
        1 => KeyCode::Enter,
        2 => KeyCode::Up,
        3 => KeyCode::Down,
        4 => KeyCode::Tab,
        5 => KeyCode::BackTab,
        6 => KeyCode::Backspace,
        _ => match rng.gen_range(b' '..=b'~') as char {
            // 'q' quits from the home screen and would end the run early.
            'q' => KeyCode::Char('Q'),
            c => KeyCode::Char(c),
        },
    };

    // So would Ctrl+C.
    let modifiers = if rng.gen_bool(0.05) && code != KeyCode::Char('c') {
        KeyModifiers::CONTROL
    } else if rng.gen_bool(0.1) {
        KeyModifiers::SHIFT
    } else {
        KeyModifiers::empty()
    };

    Event::Key(KeyEvent::new(code, modifiers))
}

fn generate_random_mouse<R: Rng>(rng: &mut R, size: ratatui::layout::Size) -> Event {
    use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
    let kind = match rng.gen_range(0..4) {
        0 => MouseEventKind::Down(MouseButton::Left),
        1 => MouseEventKind::ScrollUp,
        2 => MouseEventKind::ScrollDown,
        _ => MouseEventKind::Moved,
    };
    Event::Mouse(MouseEvent {
        kind,
        column: rng.gen_range(0..size.width),
        row: rng.gen_range(0..size.height),
        modifiers: KeyModifiers::empty(),
    })
}
