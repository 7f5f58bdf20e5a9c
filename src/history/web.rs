//! Path-based history: the navigable path is the URL path below the base.

use crate::history::{split_location, HistoryError, HistoryMode, HistoryStrategy};

#[derive(Debug, Clone)]
pub struct WebHistory {
    base: String,
}

impl WebHistory {
    /// `base` must already be normalised.
    pub fn new(base: String) -> Self {
        Self { base }
    }
}

impl HistoryStrategy for WebHistory {
    fn mode(&self) -> HistoryMode {
        HistoryMode::Path
    }

    fn base(&self) -> &str {
        &self.base
    }

    fn location_to_path(&self, location: &str) -> Result<String, HistoryError> {
        let location = split_location(location)?;
        let path = location.path;

        // `/app/x` → `x`, and `/app` alone is the root.
        let bare_base = self.base.trim_end_matches('/');
        let rest = match path.strip_prefix(bare_base) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') => rest,
            _ => {
                return Err(HistoryError::OutsideBase {
                    path: path.clone(),
                    base: self.base.clone(),
                })
            }
        };

        Ok(if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{rest}")
        })
    }

    fn create_href(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }
}
