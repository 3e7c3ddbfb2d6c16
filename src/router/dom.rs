use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::history::{History, MemoryHistory};

/// Attribute that marks an element as an in-app link.
pub const LINK_ATTRIBUTE: &str = "data-link";

/// Element
///
/// The slice of a DOM node click interception needs: its tag and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
        }
    }

    /// Plain anchor with an `href`.
    pub fn anchor(href: &str) -> Self {
        Self::new("a").attr("href", href)
    }

    /// Anchor carrying the in-app link marker.
    pub fn link(href: &str) -> Self {
        Self::anchor(href).attr(LINK_ATTRIBUTE, "")
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

/// ClickEvent
///
/// A click as seen by a document-level listener. `path` is the propagation path:
/// the clicked element first, then each ancestor up to the root.
#[derive(Debug, Clone, Default)]
pub struct ClickEvent {
    pub path: Vec<Element>,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl ClickEvent {
    pub fn new(path: Vec<Element>) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Click directly on `element` with no ancestors of interest.
    pub fn on(element: Element) -> Self {
        Self::new(vec![element])
    }

    /// The nearest element on the path (target included) satisfying `predicate`.
    pub fn closest(&self, predicate: impl Fn(&Element) -> bool) -> Option<&Element> {
        self.path.iter().find(|element| predicate(element))
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    PopState,
}

#[derive(Debug, Clone)]
pub enum Event {
    Click(ClickEvent),
    PopState,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click(_) => EventKind::Click,
            Event::PopState => EventKind::PopState,
        }
    }
}

pub type Listener = Arc<dyn Fn(&mut Event) + Send + Sync>;

/// EventTarget
///
/// Anything the router can subscribe to. Subscriptions are permanent.
pub trait EventTarget: Send + Sync {
    fn add_listener(&self, kind: EventKind, listener: Listener);
}

/// Document
///
/// Holds listeners and delivers events to every listener registered for the event's kind,
/// in registration order.
#[derive(Default)]
pub struct Document {
    listeners: Mutex<Vec<(EventKind, Listener)>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, event: &mut Event) {
        let kind = event.kind();
        // Listeners may navigate, which may register more listeners; never hold the lock.
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .filter(|(registered, _)| *registered == kind)
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|(registered, _)| *registered == kind)
            .count()
    }
}

impl EventTarget for Document {
    fn add_listener(&self, kind: EventKind, listener: Listener) {
        self.listeners.lock().push((kind, listener));
    }
}

/// Window
///
/// Headless stand-in for the browser window: a history stack plus the document that
/// receives clicks and popstate.
#[derive(Clone)]
pub struct Window {
    pub history: Arc<MemoryHistory>,
    pub document: Arc<Document>,
}

impl Window {
    pub fn new(initial_url: &str) -> Self {
        Self {
            history: Arc::new(MemoryHistory::new(initial_url)),
            document: Arc::new(Document::new()),
        }
    }

    /// History handle in the form the router takes.
    pub fn history(&self) -> Arc<dyn History> {
        self.history.clone()
    }

    /// Browser back button. Fires popstate only when there was an entry to go back to.
    pub fn back(&self) -> bool {
        let moved = self.history.back();
        if moved {
            self.document.dispatch(&mut Event::PopState);
        }
        moved
    }

    /// Browser forward button.
    pub fn forward(&self) -> bool {
        let moved = self.history.forward();
        if moved {
            self.document.dispatch(&mut Event::PopState);
        }
        moved
    }

    /// Dispatches a click and hands back the event so callers can inspect its flags.
    pub fn click(&self, click: ClickEvent) -> ClickEvent {
        let mut event = Event::Click(click);
        self.document.dispatch(&mut event);
        match event {
            Event::Click(click) => click,
            Event::PopState => ClickEvent::default(),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new("/")
    }
}
