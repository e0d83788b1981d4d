use serde::{Deserialize, Serialize};

/// Canonical bookmark record. Every source adapter produces these and
/// every downstream stage (merge, tree build, export) consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub title: String,
    pub url: Option<String>,
    /// Folder path from root to the containing folder. Empty means the
    /// bookmark sits at the root level.
    pub folder: Vec<String>,
    /// Creation time as epoch-seconds decimal string, empty when the
    /// source has none. Carried through opaquely, never used as a key.
    pub add_date: String,
}

impl BookmarkRecord {
    /// The title falls back to the URL when the source provides none.
    pub fn new(
        title: impl Into<String>,
        url: Option<String>,
        folder: Vec<String>,
        add_date: impl Into<String>,
    ) -> Self {
        let mut title = title.into();
        if title.is_empty() {
            title = url.clone().unwrap_or_default();
        }
        Self {
            title,
            url,
            folder,
            add_date: add_date.into(),
        }
    }

    /// Records without a usable URL have no dedup key and are dropped
    /// by the merge stage.
    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}
