use parking_lot::Mutex;
use std::collections::HashMap;

/// Location
///
/// The part of the current URL the router reads: the path and the raw `?query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Raw query string including the leading `?`, or empty.
    pub search: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            pathname: "/".to_string(),
            search: String::new(),
        }
    }
}

impl Location {
    /// parse
    ///
    /// Splits an in-app URL (`/llantas/comparar-multi?tire_ids=1,2#top`) into pathname and
    /// search. The fragment is dropped and relative paths are anchored at `/`.
    pub fn parse(url: &str) -> Self {
        let without_fragment = url.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_fragment, ""),
        };

        let pathname = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let search = if query.is_empty() {
            String::new()
        } else {
            format!("?{}", query)
        };

        Self { pathname, search }
    }

    /// The full in-app URL (`pathname` + `search`).
    pub fn href(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }
}

/// parse_query
///
/// Turns `?a=1&b=two%20words` into a flat map of percent-decoded pairs. Repeated keys
/// keep the last value. Each pair is split at its first `=`; a key without `=` maps to
/// an empty string. Sequences that do not decode to UTF-8 are kept raw.
pub fn parse_query(search: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let query = search.strip_prefix('?').unwrap_or(search);

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key.is_empty() {
            continue;
        }
        params.insert(decode_component(key), decode_component(value));
    }

    params
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// History
///
/// The browser history surface: push an entry without reloading and read the current
/// location.
pub trait History: Send + Sync {
    fn push_state(&self, url: &str);
    fn location(&self) -> Location;
}

/// MemoryHistory
///
/// An entry stack with a cursor. `push_state` truncates forward entries like a browser
/// does; `back`/`forward` only move the cursor, the popstate event is the host's job
/// (see `dom::Window`).
pub struct MemoryHistory {
    state: Mutex<HistoryState>,
}

struct HistoryState {
    entries: Vec<Location>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial_url: &str) -> Self {
        Self {
            state: Mutex::new(HistoryState {
                entries: vec![Location::parse(initial_url)],
                cursor: 0,
            }),
        }
    }

    /// Moves one entry back. Returns false at the start of the stack.
    pub fn back(&self) -> bool {
        let mut state = self.state.lock();
        if state.cursor == 0 {
            return false;
        }
        state.cursor -= 1;
        true
    }

    /// Moves one entry forward. Returns false at the end of the stack.
    pub fn forward(&self) -> bool {
        let mut state = self.state.lock();
        if state.cursor + 1 >= state.entries.len() {
            return false;
        }
        state.cursor += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn push_state(&self, url: &str) {
        let mut state = self.state.lock();
        let keep = state.cursor + 1;
        state.entries.truncate(keep);
        state.entries.push(Location::parse(url));
        state.cursor = state.entries.len() - 1;
    }

    fn location(&self) -> Location {
        let state = self.state.lock();
        state.entries[state.cursor].clone()
    }
}
