//! Filter state for one list view.
//!
//! Invariant: any change to a non-page key sends the view back to page 1, so
//! a new filter is always seen from its first page. Setting a key to the
//! value it already holds is not a change and does not reset the page.

use std::collections::BTreeMap;

pub const SEARCH_KEY: &str = "search";
pub const PAGE_KEY: &str = "page";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    values: BTreeMap<String, String>,
    page: u32,
    limit: u32,
}

impl FilterState {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self { values: BTreeMap::new(), page: 1, limit: limit.max(1) }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Current value of `key`; unset and blank are the same thing.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.get(SEARCH_KEY)
    }

    /// Set `key` to `value` (blank clears it). Returns `true` if anything
    /// changed. The `page` key is routed to [`FilterState::set_page`].
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        if key == PAGE_KEY {
            return value
                .trim()
                .parse::<u32>()
                .is_ok_and(|page| self.set_page(page));
        }
        let value = value.trim();
        let changed = if value.is_empty() {
            self.values.remove(key).is_some()
        } else if self.get(key) == Some(value) {
            false
        } else {
            self.values.insert(key.to_owned(), value.to_owned());
            true
        };
        if changed {
            self.page = 1;
        }
        changed
    }

    pub fn clear(&mut self, key: &str) -> bool {
        self.set(key, "")
    }

    /// Remove every non-page filter.
    pub fn clear_all(&mut self) -> bool {
        if self.values.is_empty() {
            return false;
        }
        self.values.clear();
        self.page = 1;
        true
    }

    /// Move to `page` (clamped to at least 1). Returns `true` if it moved.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Set filters in key order, skipping `page`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;
