//! Demo that replays a scripted keyboard session against the offline
//! catalog backend, printing the phase walk as it goes.

use chrono::{Duration, Utc};
use halcyon_site_gateway::search::keymap::{Key, KeyChord, Keymap, SearchAction};
use halcyon_site_gateway::search::suggest::DEFAULT_SUGGEST_THRESHOLD;
use halcyon_site_gateway::search::{run_search, CatalogBackend, SearchBackend, SearchSession};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();
    let keymap = Keymap::default();
    let backend = CatalogBackend;
    let mut session = SearchSession::new();

    // (chord, ms since start): the overlay opens, then a user types
    // "kest" at a human cadence. Time is simulated, nothing sleeps.
    let script = [
        (KeyChord::platform(Key::Char('k')), 0),
        (KeyChord::plain(Key::Char('k')), 120),
        (KeyChord::plain(Key::Char('e')), 210),
        (KeyChord::plain(Key::Char('s')), 290),
        (KeyChord::plain(Key::Char('t')), 360),
    ];

    let t0 = Utc::now();
    let mut last_ms = 0;
    for (chord, at_ms) in script {
        let now = t0 + Duration::milliseconds(at_ms);
        last_ms = at_ms;
        match keymap.resolve(&chord) {
            Some(SearchAction::ToggleOpen) => session.toggle(),
            Some(SearchAction::Close) => session.close(),
            Some(SearchAction::Insert(c)) => session.push_char(c, now),
            Some(SearchAction::DeleteChar) => session.pop_char(now),
            Some(SearchAction::MoveUp) => session.select_prev(),
            Some(SearchAction::MoveDown) => session.select_next(),
            Some(SearchAction::Confirm) | None => {}
        }
        println!(
            "{at_ms:>4} ms  {:?}  query={:?}",
            session.phase(),
            session.raw_query()
        );
    }

    // The quiet period runs out 300 ms after the last keystroke.
    let deadline = t0 + Duration::milliseconds(last_ms + 300);
    if let Some(req) = session.poll_commit(deadline) {
        println!("commit #{}: {:?}", req.id, req.query);
        match backend.search(&req.query).await {
            Ok(set) => {
                session.apply_response(req.id, set);
            }
            Err(e) => {
                session.apply_error(req.id, format!("search failed: {e}"));
            }
        }
    }

    if let Some(set) = session.results() {
        for (i, hit) in set.products.iter().chain(set.news.iter()).enumerate() {
            println!("  [{i}] {} -> {}", hit.title, hit.route);
        }
    }

    // Arrow down to the news hit, Enter to navigate.
    session.select_next();
    if let Some(route) = session.confirm() {
        println!("navigate -> {route}");
    }

    // One more query, this time misspelled, through the aggregation
    // path the HTTP handler uses.
    match run_search(&backend, "kestral", 2, DEFAULT_SUGGEST_THRESHOLD).await {
        Ok(reply) => {
            if let Some(msg) = &reply.message {
                println!("{msg}");
            }
            if let Some(hint) = &reply.suggestion {
                println!("did you mean {hint}?");
            }
        }
        Err(e) => eprintln!("search failed: {e}"),
    }

    println!("search-demo done");
}
