//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Query parameters accepted by list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring matched against the record name
    pub search: Option<String>,
}

impl ListQuery {
    /// The search term, or `None` when it is blank
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Case-insensitive substring match used by the list filters
pub fn matches_search(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.trim().to_lowercase())
}
