//! Client-side router.
//!
//! Maps URL paths to page handlers and drives navigation without reloads. Resolution order
//! for the current pathname:
//!
//! 1. a pattern equal to the path,
//! 2. the first parameterized pattern (registration order) matching the whole path,
//! 3. the `*` fallback,
//! 4. otherwise navigate to `/`.
//!
//! Handler failures (errors and panics) are logged and swallowed so a broken page never
//! blocks later navigation; whatever the handler rendered before failing stays on screen.

pub mod dom;
pub mod history;
pub mod pattern;

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use dom::{ClickEvent, Element, Event, EventKind, EventTarget, LINK_ATTRIBUTE};
use history::{History, parse_query};
use pattern::RoutePattern;

pub use pattern::WILDCARD;

/// Path every unmatched navigation degrades to.
pub const ROOT: &str = "/";

/// How deep handlers may nest navigations (a handler navigating from inside a handler)
/// before the router refuses to resolve further.
pub const MAX_NAVIGATION_DEPTH: usize = 16;

/// A page handler. It receives the router so it can read params or navigate on.
pub type RouteHandler = Arc<dyn Fn(&Router) -> anyhow::Result<()> + Send + Sync>;

/// Navigator
///
/// The one router capability other services need: send the user somewhere else.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// MatchedRoute
///
/// Which registration served the current location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedRoute {
    /// A pattern equal to the path.
    Exact(String),
    /// A parameterized pattern, stored as registered (e.g. `/llantas/:id`).
    Pattern(String),
    /// The `*` catch-all.
    Fallback,
}

impl MatchedRoute {
    fn parameterized_pattern(&self) -> Option<&str> {
        match self {
            MatchedRoute::Pattern(pattern) => Some(pattern),
            _ => None,
        }
    }
}

/// NavigationState
///
/// The last resolved path and the registration that served it. Not persisted; on restart
/// the history's location is the source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current_path: Option<String>,
    pub matched: Option<MatchedRoute>,
}

struct RouteEntry {
    pattern: RoutePattern,
    handler: RouteHandler,
}

// Insertion order is matching priority among parameterized patterns. Re-registering a
// pattern replaces its handler in place.
#[derive(Default)]
struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    fn insert(&mut self, pattern: &str, handler: RouteHandler) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.pattern.as_str() == pattern)
        {
            Some(entry) => entry.handler = handler,
            None => self.entries.push(RouteEntry {
                pattern: RoutePattern::parse(pattern),
                handler,
            }),
        }
    }

    fn resolve(&self, path: &str) -> Option<(MatchedRoute, RouteHandler)> {
        if let Some(entry) = self.entries.iter().find(|e| e.pattern.as_str() == path) {
            return Some((MatchedRoute::Exact(path.to_string()), entry.handler.clone()));
        }

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.pattern.is_parameterized() && e.pattern.matches(path))
        {
            tracing::debug!(pattern = entry.pattern.as_str(), "Router: matched parameterized route");
            return Some((
                MatchedRoute::Pattern(entry.pattern.as_str().to_string()),
                entry.handler.clone(),
            ));
        }

        self.entries
            .iter()
            .find(|e| e.pattern.is_wildcard())
            .map(|entry| {
                tracing::debug!("Router: using default route (*)");
                (MatchedRoute::Fallback, entry.handler.clone())
            })
    }

    fn patterns(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.pattern.as_str().to_string())
            .collect()
    }
}

struct RouterInner {
    history: Arc<dyn History>,
    routes: RwLock<RouteTable>,
    state: Mutex<NavigationState>,
    initialized: AtomicBool,
    depth: AtomicUsize,
}

// Counts one level of route resolution for as long as it lives.
struct DepthGuard<'a>(&'a AtomicUsize);

impl<'a> DepthGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> (Self, usize) {
        let depth = counter.fetch_add(1, Ordering::SeqCst);
        (Self(counter), depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Router
///
/// Cheap clonable handle; all clones share one route table and navigation state. Build one
/// per running app and pass it to whatever needs to navigate.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

/// WeakRouter
///
/// Non-owning handle for services the router's own handlers depend on (the HTTP client),
/// so no reference cycle keeps the app alive.
#[derive(Clone)]
pub struct WeakRouter {
    inner: Weak<RouterInner>,
}

impl WeakRouter {
    pub fn upgrade(&self) -> Option<Router> {
        self.inner.upgrade().map(|inner| Router { inner })
    }
}

impl Navigator for WeakRouter {
    fn navigate(&self, path: &str) {
        match self.upgrade() {
            Some(router) => router.navigate(path),
            None => tracing::debug!(path, "Router: dropped, navigation ignored"),
        }
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) {
        Router::navigate(self, path)
    }
}

impl Router {
    pub fn new(history: Arc<dyn History>) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                history,
                routes: RwLock::new(RouteTable::default()),
                state: Mutex::new(NavigationState::default()),
                initialized: AtomicBool::new(false),
                depth: AtomicUsize::new(0),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakRouter {
        WeakRouter {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// route
    ///
    /// Registers (or replaces) the handler for `pattern`.
    pub fn route<F>(&self, pattern: &str, handler: F)
    where
        F: Fn(&Router) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.inner.routes.write().insert(pattern, Arc::new(handler));
    }

    /// route_async
    ///
    /// Registers a handler whose work is asynchronous. Each resolution spawns the future on
    /// the current tokio runtime and returns immediately; the future's error is logged when
    /// it completes. Nothing cancels it if the user navigates away first.
    pub fn route_async<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(Router) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let route = pattern.to_string();
        self.route(pattern, move |router: &Router| {
            let runtime = tokio::runtime::Handle::try_current()
                .map_err(|e| anyhow::anyhow!("no async runtime to render {}: {}", route, e))?;
            let page = handler(router.clone());
            let route = route.clone();
            runtime.spawn(async move {
                if let Err(e) = page.await {
                    tracing::error!(route = %route, "Router: async handler failed: {:#}", e);
                }
            });
            Ok(())
        });
    }

    /// init
    ///
    /// Subscribes to popstate and to document-wide clicks, then resolves the current
    /// location. Only the first call does anything; returns whether this call initialised.
    pub fn init(&self, target: &dyn EventTarget) -> bool {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            tracing::debug!("Router: already initialized");
            return false;
        }

        let weak = self.downgrade();
        target.add_listener(
            EventKind::PopState,
            Arc::new(move |_event: &mut Event| {
                if let Some(router) = weak.upgrade() {
                    router.handle_route();
                }
            }),
        );

        let weak = self.downgrade();
        target.add_listener(
            EventKind::Click,
            Arc::new(move |event: &mut Event| {
                if let (Event::Click(click), Some(router)) = (event, weak.upgrade()) {
                    router.intercept_click(click);
                }
            }),
        );

        tracing::info!(routes = ?self.routes(), "Router: initialized");
        self.handle_route();
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.load(Ordering::SeqCst)
    }

    /// navigate
    ///
    /// Pushes `path` onto the history and resolves the new location.
    pub fn navigate(&self, path: &str) {
        self.inner.history.push_state(path);
        self.handle_route();
    }

    /// handle_route
    ///
    /// Resolves the current location and runs the matching handler. Also the popstate
    /// reaction.
    pub fn handle_route(&self) {
        let path = self.inner.history.location().pathname;
        tracing::debug!(path = %path, "Router: handling route");

        // A `*` handler that navigates to an unregistered `/` would otherwise recurse
        // until the stack overflows.
        let (_guard, depth) = DepthGuard::enter(&self.inner.depth);
        if depth >= MAX_NAVIGATION_DEPTH {
            tracing::error!(path = %path, depth, "Router: navigation loop detected, stopping");
            return;
        }

        // The table lock is released before the handler runs; handlers may register
        // routes or navigate again.
        let resolved = self.inner.routes.read().resolve(&path);

        match resolved {
            Some((matched, handler)) => {
                tracing::debug!(path = %path, matched = ?matched, "Router: executing handler");
                {
                    let mut state = self.inner.state.lock();
                    state.current_path = Some(path.clone());
                    state.matched = Some(matched);
                }
                self.invoke(&path, handler);
            }
            None if path == ROOT => {
                tracing::error!("Router: no handler for / and no default route registered");
            }
            None => {
                tracing::warn!(path = %path, "Router: no handler found, navigating to /");
                self.navigate(ROOT);
            }
        }
    }

    fn invoke(&self, path: &str, handler: RouteHandler) {
        match panic::catch_unwind(AssertUnwindSafe(|| handler(self))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(path, "Router: error executing handler: {:#}", e);
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(path, "Router: handler panicked: {}", message);
            }
        }
    }

    /// intercept_click
    ///
    /// Turns a click inside an in-app link into a router navigation. The nearest element
    /// carrying `data-link` wins; otherwise the nearest `<a>` whose `href` starts with `/`.
    /// Returns whether the click was intercepted.
    pub fn intercept_click(&self, click: &mut ClickEvent) -> bool {
        let link = click
            .closest(|el| el.has_attribute(LINK_ATTRIBUTE))
            .or_else(|| click.closest(is_internal_anchor));

        let Some(link) = link else {
            return false;
        };

        let target = link
            .attribute("href")
            .filter(|href| !href.is_empty())
            .or_else(|| link.attribute(LINK_ATTRIBUTE))
            .map(str::to_string);

        click.prevent_default();
        click.stop_propagation();

        match target {
            Some(path) if path.starts_with('/') => self.navigate(&path),
            other => tracing::debug!(target = ?other, "Router: link without an in-app path"),
        }
        true
    }

    /// get_params
    ///
    /// The current query string as a flat map of decoded pairs.
    pub fn get_params(&self) -> HashMap<String, String> {
        parse_query(&self.inner.history.location().search)
    }

    /// get_route_id
    ///
    /// The current resource id: the segment under the first `:param` of the last matched
    /// pattern, or the final path segment.
    pub fn get_route_id(&self) -> String {
        let path = self.inner.history.location().pathname;
        let state = self.inner.state.lock();
        let matched_pattern = state
            .matched
            .as_ref()
            .and_then(MatchedRoute::parameterized_pattern);
        pattern::route_id(matched_pattern, &path)
    }

    pub fn current_path(&self) -> Option<String> {
        self.inner.state.lock().current_path.clone()
    }

    pub fn matched_route(&self) -> Option<MatchedRoute> {
        self.inner.state.lock().matched.clone()
    }

    pub fn navigation_state(&self) -> NavigationState {
        self.inner.state.lock().clone()
    }

    /// Registered patterns in registration order.
    pub fn routes(&self) -> Vec<String> {
        self.inner.routes.read().patterns()
    }

    /// The location the history currently points at.
    pub fn location(&self) -> history::Location {
        self.inner.history.location()
    }
}

fn is_internal_anchor(element: &Element) -> bool {
    element.is("a")
        && element
            .attribute("href")
            .is_some_and(|href| href.starts_with('/'))
}
