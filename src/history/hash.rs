//! Hash-based history: the navigable path is the URL fragment.

use crate::history::{split_location, HistoryError, HistoryMode, HistoryStrategy};

#[derive(Debug, Clone)]
pub struct HashHistory {
    base: String,
}

impl HashHistory {
    /// `base` must already be normalised.
    pub fn new(base: String) -> Self {
        Self { base }
    }
}

impl HistoryStrategy for HashHistory {
    fn mode(&self) -> HistoryMode {
        HistoryMode::Hash
    }

    fn base(&self) -> &str {
        &self.base
    }

    fn location_to_path(&self, location: &str) -> Result<String, HistoryError> {
        let location = split_location(location)?;
        // No fragment (or a bare `#`) is the root route.
        Ok(match location.fragment.as_deref() {
            None | Some("") => "/".to_string(),
            Some(fragment) if fragment.starts_with('/') => fragment.to_string(),
            Some(fragment) => format!("/{fragment}"),
        })
    }

    fn create_href(&self, path: &str) -> String {
        format!("{}#{}", self.base, path)
    }
}
