use regex::Regex;

/// Catch-all pattern.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone)]
enum PatternKind {
    Literal,
    Parameterized(Regex),
    Wildcard,
}

/// RoutePattern
///
/// A registered path pattern. `:name` marks a parameter that matches exactly one path
/// segment; `*` alone is the catch-all. The regex for parameterized patterns is compiled
/// once, at registration.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    kind: PatternKind,
}

impl RoutePattern {
    pub fn parse(raw: &str) -> Self {
        let kind = if raw == WILDCARD {
            PatternKind::Wildcard
        } else if raw.contains(':') {
            match Regex::new(&to_regex_source(raw)) {
                Ok(regex) => PatternKind::Parameterized(regex),
                Err(e) => {
                    tracing::warn!(pattern = raw, "Router: pattern treated as literal: {}", e);
                    PatternKind::Literal
                }
            }
        } else {
            PatternKind::Literal
        };

        Self {
            raw: raw.to_string(),
            kind,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_parameterized(&self) -> bool {
        matches!(self.kind, PatternKind::Parameterized(_))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, PatternKind::Wildcard)
    }

    /// Whether this parameterized pattern matches the whole `path`. Literal and wildcard
    /// patterns are resolved by the route table and never match here.
    pub fn matches(&self, path: &str) -> bool {
        match &self.kind {
            PatternKind::Parameterized(regex) => regex.is_match(path),
            _ => false,
        }
    }
}

// "/llantas/:id" -> "^/llantas/([^/]+)$". Literal text is escaped; a parameter runs
// from ':' up to the next '/'.
fn to_regex_source(raw: &str) -> String {
    let mut source = String::from("^");
    let mut literal = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek().is_some_and(|next| *next != '/') {
            source.push_str(&regex::escape(&literal));
            literal.clear();
            while chars.peek().is_some_and(|next| *next != '/') {
                chars.next();
            }
            source.push_str("([^/]+)");
        } else {
            literal.push(c);
        }
    }

    source.push_str(&regex::escape(&literal));
    source.push('$');
    source
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// route_id
///
/// The path segment aligned with the first `:param` segment of `pattern`, when the
/// pattern has one and the path is long enough; otherwise the last path segment
/// (empty for `/`).
pub fn route_id(pattern: Option<&str>, path: &str) -> String {
    let parts = segments(path);

    if let Some(pattern) = pattern.filter(|p| p.contains(':')) {
        let param_index = segments(pattern)
            .iter()
            .position(|segment| segment.starts_with(':'));
        if let Some(value) = param_index.and_then(|index| parts.get(index)) {
            return (*value).to_string();
        }
    }

    parts.last().map(|s| s.to_string()).unwrap_or_default()
}
