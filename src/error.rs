use std::fmt;

/// A source adapter's backing store (profile directory, places database,
/// Bookmarks file) is missing. Kept distinguishable from plain I/O
/// failures so callers can report the source by name and decide whether
/// to continue with the remaining sources.
///
/// `Display`/`Error` are implemented by hand because `thiserror` treats a
/// field named `source` as the error's cause, which this string is not.
#[derive(Debug)]
pub struct SourceNotFound {
    pub source: &'static str,
    pub detail: String,
}

impl fmt::Display for SourceNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not found: {}", self.source, self.detail)
    }
}

impl std::error::Error for SourceNotFound {}

impl SourceNotFound {
    pub fn new(source: &'static str, detail: impl Into<String>) -> Self {
        Self {
            source,
            detail: detail.into(),
        }
    }
}
