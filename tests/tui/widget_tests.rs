//! Full-frame rendering tests using ratatui's `TestBackend`.

use std::sync::Arc;

use ratatui::backend::TestBackend;
use ratatui::Terminal;

use cachecraft_dashboard::sync::{
    reduce, DashboardView, MissRatePoint, Severity, SourceDistribution,
};
use cachecraft_dashboard::tui::app::{App, MIN_COLS, MIN_ROWS};
use cachecraft_dashboard::tui::ui;
use cachecraft_dashboard::{CacheEntry, HitRecord, Identity, Prediction, Snapshot, Source};

fn render(app: &App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn populated_view() -> DashboardView {
    let mut view = DashboardView::new(
        Identity::new("alice"),
        vec![Identity::new("guest"), Identity::new("alice")],
        0.6,
    );
    let snapshot = Snapshot {
        cache: vec![
            CacheEntry {
                query: "weather in delhi".into(),
                source: Source::Cache,
                expires_in: 10,
            },
            CacheEntry {
                query: "weather in goa".into(),
                source: Source::Backend,
                expires_in: 240,
            },
        ],
        last_10_hits: vec![HitRecord {
            query: "weather in delhi".into(),
            source: Source::Cache,
            time: Some(1_718_000_000),
        }],
        miss_rate: 0.3,
        predictions: vec![
            Prediction {
                query: "weather in gurgaon".into(),
                confidence: 0.83,
            },
            Prediction {
                query: "weather in noida".into(),
                confidence: 0.42,
            },
        ],
        api_calls_saved: 4,
        total_backend_calls: 3,
        total_cache_hits: 4,
        avg_latency_saved: 268.5,
    };
    view.distribution = SourceDistribution::from_hits(&snapshot.last_10_hits);
    view.history.push(MissRatePoint {
        timestamp_ms: 1_718_000_000_000,
        value: 0.3,
    });
    view.view_model = reduce(&view.distribution, &view.history);
    view.snapshot = Some(Arc::new(snapshot));
    view.snapshot_received_at = Some(view.now);
    view
}

#[test]
fn test_full_dashboard_renders_every_panel() {
    let mut view = populated_view();
    view.toasts.push("Served from cache", Severity::Success);
    let app = App::new(Arc::new(view));
    let screen = render(&app, 140, 44);

    for needle in [
        "alice",
        "CACHE (2)",
        "weather in delhi",
        "critical",
        "fresh",
        "RECENT HITS",
        "PREDICTIONS",
        "weather in gurgaon",
        "MISS RATE (30.0%)",
        "LAST 10 HITS BY SOURCE",
        "ANALYTICS",
        "268.5 ms",
        "Served from cache",
    ] {
        assert!(screen.contains(needle), "missing {needle:?} in:\n{screen}");
    }
}

#[test]
fn test_empty_view_renders_placeholder() {
    let view = DashboardView::new(Identity::new("guest"), vec![Identity::new("guest")], 0.6);
    let app = App::new(Arc::new(view));
    let screen = render(&app, MIN_COLS, MIN_ROWS);
    assert!(screen.contains("waiting for first poll"));
    assert!(screen.contains("no data yet"));
}

#[test]
fn test_too_small_terminal_shows_warning() {
    let view = DashboardView::new(Identity::new("guest"), vec![], 0.6);
    let app = App::new(Arc::new(view));
    let screen = render(&app, 60, 20);
    assert!(screen.contains("Terminal too small"));
}

#[test]
fn test_help_overlay_lists_keys() {
    let mut app = App::new(Arc::new(populated_view()));
    app.show_help = true;
    let screen = render(&app, 140, 44);
    assert!(screen.contains("Help"));
    assert!(screen.contains("Export JSON / CSV"));
}

#[test]
fn test_search_error_is_inline() {
    let mut view = populated_view();
    view.search.query = "goa".into();
    view.search.error = Some("Search failed: /search returned 500".into());
    let app = App::new(Arc::new(view));
    let screen = render(&app, 140, 44);
    assert!(screen.contains("Search failed: /search returned 500"));
}
