use parking_lot::Mutex;
use roadfy_client::router::{
    MAX_NAVIGATION_DEPTH, MatchedRoute, Router, WILDCARD,
    dom::{ClickEvent, Element, EventKind, Window},
    history::History,
};
use std::sync::Arc;
use std::time::Duration;

// --- Test Utilities ---

/// Records which handler ran, in order.
#[derive(Clone, Default)]
struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn handler(&self, name: &str) -> impl Fn(&Router) -> anyhow::Result<()> + Send + Sync + 'static {
        let calls = self.clone();
        let name = name.to_string();
        move |_router: &Router| {
            calls.0.lock().push(name.clone());
            Ok(())
        }
    }

    fn all(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    fn last(&self) -> Option<String> {
        self.0.lock().last().cloned()
    }

    fn count(&self, name: &str) -> usize {
        self.0.lock().iter().filter(|call| *call == name).count()
    }
}

fn setup() -> (Window, Router, Calls) {
    let window = Window::new("/");
    let router = Router::new(window.history());
    (window, router, Calls::default())
}

// --- Resolution ---

#[test]
fn test_exact_match_beats_parameterized_pattern() {
    let (_window, router, calls) = setup();
    router.route("/llantas/:id", calls.handler("detail"));
    router.route("/llantas/comparar", calls.handler("compare"));

    router.navigate("/llantas/comparar");

    assert_eq!(calls.all(), vec!["compare"]);
    assert_eq!(
        router.matched_route(),
        Some(MatchedRoute::Exact("/llantas/comparar".to_string()))
    );
    // No parameter matched, so the id falls back to the last segment.
    assert_eq!(router.get_route_id(), "comparar");
}

#[test]
fn test_exact_match_beats_wildcard() {
    let (_window, router, calls) = setup();
    router.route("*", calls.handler("fallback"));
    router.route("/negocios", calls.handler("businesses"));

    router.navigate("/negocios");

    assert_eq!(calls.all(), vec!["businesses"]);
}

#[test]
fn test_parameterized_route_exposes_route_id() {
    let (_window, router, calls) = setup();
    router.route("/x/:id", calls.handler("x"));

    router.navigate("/x/abc");

    assert_eq!(calls.last().as_deref(), Some("x"));
    assert_eq!(router.get_route_id(), "abc");
    assert_eq!(
        router.matched_route(),
        Some(MatchedRoute::Pattern("/x/:id".to_string()))
    );
}

#[test]
fn test_parameter_does_not_match_extra_segments() {
    let (_window, router, calls) = setup();
    router.route("/", calls.handler("home"));
    router.route("/x/:id", calls.handler("x"));

    router.navigate("/x/abc/extra");

    assert_eq!(calls.count("x"), 0);
    // Unmatched without a fallback degrades to home.
    assert_eq!(calls.last().as_deref(), Some("home"));
    assert_eq!(router.current_path().as_deref(), Some("/"));
}

#[test]
fn test_first_registered_parameterized_pattern_wins() {
    let (_window, router, calls) = setup();
    router.route("/:section/:id", calls.handler("generic"));
    router.route("/x/:id", calls.handler("specific"));

    router.navigate("/x/1");
    assert_eq!(calls.last().as_deref(), Some("generic"));

    let (_window, router, calls) = setup();
    router.route("/x/:id", calls.handler("specific"));
    router.route("/:section/:id", calls.handler("generic"));

    router.navigate("/x/1");
    assert_eq!(calls.last().as_deref(), Some("specific"));
}

#[test]
fn test_reregistering_keeps_position_and_replaces_handler() {
    let (_window, router, calls) = setup();
    router.route("/a/:id", calls.handler("first"));
    router.route("/:any/:id", calls.handler("generic"));
    router.route("/a/:id", calls.handler("replacement"));

    assert_eq!(router.routes(), vec!["/a/:id", "/:any/:id"]);

    router.navigate("/a/7");
    assert_eq!(calls.all(), vec!["replacement"]);
}

#[test]
fn test_unregistered_path_without_fallback_goes_home() {
    let (window, router, calls) = setup();
    router.route("/", calls.handler("home"));
    router.route("/llantas", calls.handler("tires"));

    router.navigate("/no-existe");

    assert_eq!(calls.all(), vec!["home"]);
    assert_eq!(window.history.location().pathname, "/");
    assert_eq!(router.current_path().as_deref(), Some("/"));
}

#[test]
fn test_nothing_registered_for_root_does_not_loop() {
    let (window, router, calls) = setup();
    router.route("/llantas", calls.handler("tires"));

    router.navigate("/no-existe");

    assert!(calls.all().is_empty());
    assert_eq!(window.history.location().pathname, "/");
}

#[test]
fn test_end_to_end_scenario() {
    let (window, router, calls) = setup();
    let seen_id = Arc::new(Mutex::new(String::new()));

    router.route("/", calls.handler("A"));
    let b_calls = calls.clone();
    let b_seen = seen_id.clone();
    router.route("/t/:id", move |router: &Router| {
        b_calls.0.lock().push("B".to_string());
        *b_seen.lock() = router.get_route_id();
        Ok(())
    });
    router.route("*", calls.handler("C"));

    // init resolves the initial location ("/").
    assert!(router.init(window.document.as_ref()));
    assert_eq!(calls.all(), vec!["A"]);

    router.navigate("/t/42");
    assert_eq!(calls.last().as_deref(), Some("B"));
    assert_eq!(router.get_route_id(), "42");
    assert_eq!(*seen_id.lock(), "42");

    router.navigate("/unknown");
    assert_eq!(calls.last().as_deref(), Some("C"));
    assert_eq!(router.matched_route(), Some(MatchedRoute::Fallback));

    router.navigate("/");
    assert_eq!(calls.all(), vec!["A", "B", "C", "A"]);
}

// --- Failure Containment ---

#[test]
fn test_handler_errors_and_panics_do_not_block_navigation() {
    let (_window, router, calls) = setup();
    router.route("/roto", |_router: &Router| Err(anyhow::anyhow!("render failed")));
    router.route("/panico", |_router: &Router| -> anyhow::Result<()> {
        panic!("page exploded")
    });
    router.route("/ok", calls.handler("ok"));

    router.navigate("/roto");
    assert_eq!(router.current_path().as_deref(), Some("/roto"));

    router.navigate("/panico");
    assert_eq!(router.current_path().as_deref(), Some("/panico"));

    router.navigate("/ok");
    assert_eq!(calls.all(), vec!["ok"]);
}

#[test]
fn test_fallback_to_unregistered_root_stops_looping() {
    let (window, router, calls) = setup();
    let fallback = calls.clone();
    router.route(WILDCARD, move |router: &Router| {
        fallback.0.lock().push("fallback".to_string());
        router.navigate("/");
        Ok(())
    });

    router.navigate("/x");

    assert_eq!(calls.count("fallback"), MAX_NAVIGATION_DEPTH);
    assert_eq!(window.history.location().pathname, "/");

    // The router recovers once the loop unwinds.
    router.route("/ok", calls.handler("ok"));
    router.navigate("/ok");
    assert_eq!(calls.last().as_deref(), Some("ok"));
}

#[test]
fn test_handler_may_navigate_and_register_routes() {
    let (_window, router, calls) = setup();
    let late = calls.clone();
    router.route("/viejo", move |router: &Router| {
        router.route("/nuevo", late.handler("new"));
        router.navigate("/nuevo");
        Ok(())
    });

    router.navigate("/viejo");

    assert_eq!(calls.all(), vec!["new"]);
    assert_eq!(router.current_path().as_deref(), Some("/nuevo"));
}

// --- Init & Events ---

#[test]
fn test_init_twice_subscribes_once() {
    let (window, router, calls) = setup();
    router.route("/", calls.handler("home"));
    router.route("/a", calls.handler("a"));

    assert!(router.init(window.document.as_ref()));
    assert!(!router.init(window.document.as_ref()));
    assert!(router.is_initialized());

    assert_eq!(window.document.listener_count(EventKind::Click), 1);
    assert_eq!(window.document.listener_count(EventKind::PopState), 1);

    window.click(ClickEvent::on(Element::link("/a")));
    assert_eq!(calls.count("a"), 1);
    // The second init did not re-render the initial location either.
    assert_eq!(calls.count("home"), 1);
}

#[test]
fn test_click_inside_marked_link_is_intercepted() {
    let (window, router, calls) = setup();
    router.route("/", calls.handler("home"));
    router.route("/negocios", calls.handler("businesses"));
    router.init(window.document.as_ref());

    let click = window.click(ClickEvent::new(vec![
        Element::new("span"),
        Element::new("div").attr("class", "card"),
        Element::link("/negocios"),
        Element::new("body"),
    ]));

    assert!(click.default_prevented);
    assert!(click.propagation_stopped);
    assert_eq!(calls.last().as_deref(), Some("businesses"));
    assert_eq!(window.history.location().pathname, "/negocios");
}

#[test]
fn test_plain_internal_anchor_is_intercepted() {
    let (window, router, calls) = setup();
    router.route("/", calls.handler("home"));
    router.route("/llantas", calls.handler("tires"));
    router.init(window.document.as_ref());

    let click = window.click(ClickEvent::new(vec![
        Element::new("img"),
        Element::anchor("/llantas"),
    ]));

    assert!(click.default_prevented);
    assert_eq!(calls.last().as_deref(), Some("tires"));
}

#[test]
fn test_marker_without_href_uses_its_value() {
    let (window, router, calls) = setup();
    router.route("/", calls.handler("home"));
    router.route("/configuracion", calls.handler("settings"));
    router.init(window.document.as_ref());

    window.click(ClickEvent::on(
        Element::new("button").attr("data-link", "/configuracion"),
    ));

    assert_eq!(calls.last().as_deref(), Some("settings"));
}

#[test]
fn test_external_and_unrelated_clicks_pass_through() {
    let (window, router, calls) = setup();
    router.route("/", calls.handler("home"));
    router.init(window.document.as_ref());

    let external = window.click(ClickEvent::on(Element::anchor("https://example.com/")));
    assert!(!external.default_prevented);

    let plain = window.click(ClickEvent::new(vec![Element::new("p"), Element::new("main")]));
    assert!(!plain.default_prevented);
    assert!(!plain.propagation_stopped);

    assert_eq!(calls.all(), vec!["home"]);
    assert_eq!(window.history.len(), 1);
}

#[test]
fn test_back_and_forward_reresolve() {
    let (window, router, calls) = setup();
    router.route("/", calls.handler("home"));
    router.route("/llantas/:id", calls.handler("detail"));
    router.route("/negocios", calls.handler("businesses"));
    router.init(window.document.as_ref());

    router.navigate("/llantas/9");
    router.navigate("/negocios");

    assert!(window.back());
    assert_eq!(calls.last().as_deref(), Some("detail"));
    assert_eq!(router.get_route_id(), "9");

    assert!(window.forward());
    assert_eq!(calls.last().as_deref(), Some("businesses"));
    assert!(!window.forward());
}

// --- Params ---

#[test]
fn test_get_params_decodes_query() {
    let (_window, router, calls) = setup();
    router.route("/llantas/comparar-multi", calls.handler("multi"));

    router.navigate("/llantas/comparar-multi?a=1&b=two%20words");

    let params = router.get_params();
    assert_eq!(params.len(), 2);
    assert_eq!(params.get("a").map(String::as_str), Some("1"));
    assert_eq!(params.get("b").map(String::as_str), Some("two words"));
    // The query never takes part in matching.
    assert_eq!(calls.all(), vec!["multi"]);
}

// --- Async Handlers ---

#[tokio::test]
async fn test_async_handler_runs_fire_and_forget() {
    let (_window, router, _calls) = setup();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    router.route_async("/negocios/:id", move |router: Router| {
        let tx = tx.clone();
        async move {
            tokio::task::yield_now().await;
            tx.send(router.get_route_id())?;
            anyhow::Ok(())
        }
    });

    router.navigate("/negocios/neg-7");

    let id = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("handler did not run")
        .expect("channel closed");
    assert_eq!(id, "neg-7");
}

#[test]
fn test_async_handler_without_runtime_is_contained() {
    let (_window, router, calls) = setup();
    router.route_async("/async", |_router: Router| async { anyhow::Ok(()) });
    router.route("/ok", calls.handler("ok"));

    router.navigate("/async");
    router.navigate("/ok");

    assert_eq!(calls.all(), vec!["ok"]);
}
