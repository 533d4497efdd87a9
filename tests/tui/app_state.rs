//! App state driven by key input against a running coordinator.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use cachecraft_dashboard::tui::app::{App, InputMode};
use cachecraft_dashboard::tui::events::{apply_event, translate_key, InputEvent};
use cachecraft_dashboard::{
    Action, Coordinator, DashboardConfig, DashboardHandle, MockBackend, Source,
};

fn press(app: &mut App, handle: &DashboardHandle, code: KeyCode) {
    let event = translate_key(KeyEvent::new(code, KeyModifiers::NONE), app.mode);
    if let Some(action) = apply_event(app, event) {
        handle.try_dispatch(action).unwrap();
    }
}

async fn settle(app: &mut App, handle: &DashboardHandle, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    app.set_view(handle.view());
}

fn start() -> (DashboardHandle, tokio::task::JoinHandle<()>) {
    let mut config = DashboardConfig::default();
    config.session.identities = vec!["guest".into(), "alice".into()];
    let (coordinator, handle) = Coordinator::new(config, Arc::new(MockBackend::new()));
    (handle, tokio::spawn(coordinator.run()))
}

#[tokio::test(start_paused = true)]
async fn test_typed_search_reaches_backend_and_cache_table() {
    let (handle, _task) = start();
    let mut app = App::new(handle.view());

    press(&mut app, &handle, KeyCode::Char('/'));
    assert_eq!(app.mode, InputMode::Search);
    for c in "weather in goa".chars() {
        press(&mut app, &handle, KeyCode::Char(c));
    }
    press(&mut app, &handle, KeyCode::Enter);
    assert_eq!(app.mode, InputMode::Normal);

    // Next poll lands at t = 2s.
    settle(&mut app, &handle, 2500).await;
    let result = app.view.search.result.clone().unwrap();
    assert_eq!(result.source, Source::Backend);
    assert!(app.view.cache_rows().iter().any(|r| r.query == "weather in goa"));
    assert_eq!(app.view.view_model.pie[0], 1);
}

#[tokio::test(start_paused = true)]
async fn test_plus_key_raises_confidence() {
    let (handle, _task) = start();
    let mut app = App::new(handle.view());

    press(&mut app, &handle, KeyCode::Char('+'));
    press(&mut app, &handle, KeyCode::Char('+'));
    settle(&mut app, &handle, 200).await;
    assert!((app.view.confidence.value - 0.62).abs() < 1e-9);
    assert!(!app.view.confidence.busy);
}

#[tokio::test(start_paused = true)]
async fn test_tab_switches_identity() {
    let (handle, _task) = start();
    let mut app = App::new(handle.view());

    press(&mut app, &handle, KeyCode::Tab);
    settle(&mut app, &handle, 100).await;
    assert_eq!(app.view.identity.as_str(), "alice");
    press(&mut app, &handle, KeyCode::Tab);
    settle(&mut app, &handle, 100).await;
    assert_eq!(app.view.identity.as_str(), "guest");
}

#[tokio::test(start_paused = true)]
async fn test_refresh_key_spins_selected_row() {
    let (handle, _task) = start();
    handle
        .dispatch(Action::Search("weather in delhi".into()))
        .await
        .unwrap();
    let mut app = App::new(handle.view());
    settle(&mut app, &handle, 2100).await;
    assert_eq!(app.selected_query().as_deref(), Some("weather in delhi"));

    press(&mut app, &handle, KeyCode::Char('r'));
    settle(&mut app, &handle, 50).await;
    assert!(app.view.is_refreshing("weather in delhi"));
    settle(&mut app, &handle, 1000).await;
    assert!(!app.view.is_refreshing("weather in delhi"));
}

#[tokio::test(start_paused = true)]
async fn test_quit_key_stops_coordinator() {
    let (handle, task) = start();
    let mut app = App::new(handle.view());

    press(&mut app, &handle, KeyCode::Char('q'));
    assert!(app.should_quit);
    task.await.unwrap();
}

#[test]
fn test_search_mode_swallows_command_keys() {
    let event = translate_key(
        KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE),
        InputMode::Search,
    );
    assert_eq!(event, InputEvent::SearchChar('r'));
    let event = translate_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), InputMode::Search);
    assert_eq!(event, InputEvent::CancelSearch);
}
