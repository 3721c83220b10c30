//! Request bodies for the v3 API

use serde::{Deserialize, Serialize};

/// Body of a paged `*/list` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    pub length: u32,
    pub offset: u32,
    pub filter: String,
}

impl ListRequest {
    /// First page of `length` entities, unfiltered
    #[must_use]
    pub fn first_page(length: u32) -> Self {
        Self {
            length,
            offset: 0,
            filter: String::new(),
        }
    }
}

/// Body of the free-text `search` call
///
/// Only autocompletions are requested; they carry the entity identifier
/// needed to resolve a host name to a VM UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub user_query: String,
    pub explicit_query: bool,
    pub generate_autocompletions_only: bool,
    pub is_autocomplete_selection: bool,
}

impl SearchRequest {
    #[must_use]
    pub fn autocomplete(query: impl Into<String>) -> Self {
        Self {
            user_query: query.into(),
            explicit_query: true,
            generate_autocompletions_only: true,
            is_autocomplete_selection: false,
        }
    }
}
