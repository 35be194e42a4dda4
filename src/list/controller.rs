//! Resource list controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every list screen (assignments, users, classes, notifications) runs the
//! same protocol: filters drive a fetch, the latest response wins, mutations
//! confirm with the server before touching rendered rows, and failures land
//! in a banner without blanking the page. This module owns that protocol;
//! [`super::source`] supplies the resource-specific query.
//!
//! DESIGN
//! ======
//! Fetching is split into [`ListController::begin_fetch`], which issues a
//! numbered [`FetchTicket`], and [`ListController::finish_fetch`], which only
//! applies a result whose ticket is still the newest. The async
//! [`ListController::refresh`] is the two halves back to back; the list
//! driver runs the middle on a spawned task so it can abort it.
//!
//! ERROR HANDLING
//! ==============
//! Fetch errors move the phase to `Failed` and keep the previous snapshot on
//! screen. Mutation errors go to the banner and leave rows untouched.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::banner::{Banners, DeleteConfirm};
use super::filters::FilterState;
use super::source::{Keyed, ListError, ListSource, RemoveSource, Snapshot};
use crate::config::ClientConfig;
use crate::net::ApiError;
use crate::net::types::Pagination;

/// Where a list view is in its fetch cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum ListPhase<T> {
    /// Nothing requested yet.
    Idle,
    /// A fetch is in flight; `stale` is what was on screen before it.
    Loading { stale: Option<Snapshot<T>> },
    Loaded(Snapshot<T>),
    /// The latest fetch failed; `stale` stays on screen.
    Failed { error: String, stale: Option<Snapshot<T>> },
}

impl<T> ListPhase<T> {
    fn snapshot(&self) -> Option<&Snapshot<T>> {
        match self {
            Self::Idle => None,
            Self::Loaded(snap) => Some(snap),
            Self::Loading { stale } | Self::Failed { stale, .. } => stale.as_ref(),
        }
    }

    fn snapshot_mut(&mut self) -> Option<&mut Snapshot<T>> {
        match self {
            Self::Idle => None,
            Self::Loaded(snap) => Some(snap),
            Self::Loading { stale } | Self::Failed { stale, .. } => stale.as_mut(),
        }
    }

    fn into_snapshot(self) -> Option<Snapshot<T>> {
        match self {
            Self::Idle => None,
            Self::Loaded(snap) => Some(snap),
            Self::Loading { stale } | Self::Failed { stale, .. } => stale,
        }
    }
}

/// One issued fetch: its sequence number and the filters it was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub filters: FilterState,
}

pub struct ListController<S: ListSource> {
    source: Arc<S>,
    filters: FilterState,
    phase: ListPhase<S::Item>,
    issued: u64,
    banners: Banners,
    delete: DeleteConfirm,
}

impl<S: ListSource> ListController<S> {
    #[must_use]
    pub fn new(source: S, page_limit: u32, flash_ttl: Duration) -> Self {
        Self {
            source: Arc::new(source),
            filters: FilterState::new(page_limit),
            phase: ListPhase::Idle,
            issued: 0,
            banners: Banners::new(flash_ttl),
            delete: DeleteConfirm::default(),
        }
    }

    #[must_use]
    pub fn from_config(source: S, config: &ClientConfig) -> Self {
        Self::new(source, config.page_limit, config.flash_ttl)
    }

    #[must_use]
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub fn phase(&self) -> &ListPhase<S::Item> {
        &self.phase
    }

    /// Rows on screen. Kept through loading and failure; empty before the
    /// first successful fetch.
    #[must_use]
    pub fn items(&self) -> &[S::Item] {
        self.phase
            .snapshot()
            .map_or(&[], |snap| snap.items.as_slice())
    }

    #[must_use]
    pub fn item(&self, key: &str) -> Option<&S::Item> {
        self.items().iter().find(|item| item.key() == key)
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        self.phase
            .snapshot()
            .map_or_else(|| Pagination::first(self.filters.limit()), |snap| snap.pagination)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ListPhase::Loading { .. })
    }

    /// Fetch error for the current filters, if the latest fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ListPhase::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    pub fn banners_mut(&mut self) -> &mut Banners {
        &mut self.banners
    }

    // =========================================================================
    // FILTERS
    // =========================================================================

    /// Change one filter. Returns `true` when the caller must fetch.
    pub fn set_filter(&mut self, key: &str, value: &str) -> bool {
        self.filters.set(key, value)
    }

    pub fn clear_filter(&mut self, key: &str) -> bool {
        self.filters.clear(key)
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        self.filters.set_page(page)
    }

    /// Set a filter and fetch if it changed.
    pub async fn apply_filter(&mut self, key: &str, value: &str) {
        if self.set_filter(key, value) {
            self.refresh().await;
        }
    }

    pub async fn go_to_page(&mut self, page: u32) {
        if self.set_page(page) {
            self.refresh().await;
        }
    }

    // =========================================================================
    // FETCH
    // =========================================================================

    /// Issue a new ticket for the current filters and enter `Loading`.
    /// Any older ticket is superseded.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        let stale = std::mem::replace(&mut self.phase, ListPhase::Idle).into_snapshot();
        self.phase = ListPhase::Loading { stale };
        debug!(resource = S::NOUN, request_id = self.issued, page = self.filters.page(), "list: fetch issued");
        FetchTicket { id: self.issued, filters: self.filters.clone() }
    }

    /// Apply the result of ticket `id`. Returns `false` (and changes
    /// nothing) if a newer ticket has been issued since.
    pub fn finish_fetch(&mut self, id: u64, result: Result<Snapshot<S::Item>, ListError>) -> bool {
        if id != self.issued {
            debug!(resource = S::NOUN, request_id = id, latest = self.issued, "list: discarding stale response");
            return false;
        }
        let previous = std::mem::replace(&mut self.phase, ListPhase::Idle);
        self.phase = match result {
            Ok(snapshot) => ListPhase::Loaded(snapshot),
            Err(e) => {
                warn!(resource = S::NOUN, request_id = id, error = %e, "list: fetch failed");
                ListPhase::Failed { error: e.to_string(), stale: previous.into_snapshot() }
            }
        };
        true
    }

    /// Fetch the current filters and apply the result.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.source.fetch(&ticket.filters).await;
        self.finish_fetch(ticket.id, result);
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Patch one rendered row in place. Returns `false` if it is not on
    /// screen.
    pub fn patch_item(&mut self, key: &str, patch: impl FnOnce(&mut S::Item)) -> bool {
        let Some(item) = self
            .phase
            .snapshot_mut()
            .and_then(|snap| snap.items.iter_mut().find(|item| item.key() == key))
        else {
            return false;
        };
        patch(item);
        true
    }

    /// Patch every rendered row.
    pub fn patch_all(&mut self, mut patch: impl FnMut(&mut S::Item)) {
        if let Some(snap) = self.phase.snapshot_mut() {
            snap.items.iter_mut().for_each(&mut patch);
        }
    }

    /// Apply `patch` to row `key` only if the server accepted the change.
    ///
    /// # Errors
    ///
    /// Returns the server error unchanged after putting it in the banner.
    pub fn settle_patch(
        &mut self,
        key: &str,
        outcome: Result<(), ApiError>,
        patch: impl FnOnce(&mut S::Item),
    ) -> Result<(), ApiError> {
        match outcome {
            Ok(()) => {
                self.banners.clear_error();
                if !self.patch_item(key, patch) {
                    debug!(resource = S::NOUN, key, "list: patched row no longer on screen");
                }
                Ok(())
            }
            Err(e) => {
                warn!(resource = S::NOUN, key, error = %e, "list: update rejected");
                self.banners.set_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Arm the two-step delete for row `key`.
    pub fn request_delete(&mut self, key: impl Into<String>) {
        self.delete.arm(key);
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<&str> {
        self.delete.armed()
    }
}

impl<S: RemoveSource> ListController<S> {
    /// Delete row `key` if it was armed with [`ListController::request_delete`],
    /// then refetch. Returns `Ok(false)` without a network call when `key`
    /// is not armed.
    ///
    /// # Errors
    ///
    /// Returns the server error after putting it in the banner; the arm is
    /// consumed either way.
    pub async fn confirm_delete(&mut self, key: &str) -> Result<bool, ApiError> {
        if !self.delete.take(key) {
            return Ok(false);
        }
        let outcome = self.source.remove(key).await;
        match outcome {
            Ok(()) => {
                info!(resource = S::NOUN, key, "list: deleted");
                self.banners.clear_error();
                self.banners
                    .flash_success(format!("{} deleted successfully", S::NOUN));
                self.refresh().await;
                Ok(true)
            }
            Err(e) => {
                warn!(resource = S::NOUN, key, error = %e, "list: delete failed");
                self.banners.set_error(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
