//! List driver: one tokio task that owns a [`ListController`].
//!
//! SYSTEM CONTEXT
//! ==============
//! A screen talks to its list through a [`ListHandle`]: commands go in over
//! an `mpsc` channel, rendered state comes back over a `watch` channel. The
//! task is the controller's only writer.
//!
//! DESIGN
//! ======
//! The loop waits on the next command, the search debounce deadline, the
//! success banner's expiry and the in-flight fetch, whichever comes first. Fetches run on their own
//! spawned task so a newer fetch can abort the one it supersedes; the
//! controller's ticket check discards anything that slips through anyway.
//! Dropping the handle aborts the driver, and the driver aborts its fetch on
//! the way out.

use std::future::{Future, pending};
use std::pin::Pin;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use super::controller::ListController;
use super::debounce::Debouncer;
use super::filters::{FilterState, SEARCH_KEY};
use super::source::{ListError, ListSource, Snapshot};
use crate::net::types::Pagination;

const COMMAND_BUFFER: usize = 32;

/// Boxed closure run against the controller inside the driver task.
pub type Mutation<S> =
    Box<dyn for<'a> FnOnce(&'a mut ListController<S>) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> + Send>;

pub enum ListCommand<S: ListSource> {
    /// A keystroke in the search box; committed after the quiet period.
    SearchInput(String),
    /// Commit any pending search now.
    SubmitSearch,
    SetFilter { key: String, value: String },
    ClearFilter(String),
    SetPage(u32),
    Refresh,
    Apply(Mutation<S>),
}

/// Rendered state published after every change.
#[derive(Clone, Debug, PartialEq)]
pub struct ListView<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub filters: FilterState,
    pub loading: bool,
    pub error: Option<String>,
    pub banner_error: Option<String>,
    pub success: Option<String>,
    pub pending_delete: Option<String>,
    pub pending_search: Option<String>,
}

impl<T> ListView<T> {
    /// View before the driver's first fetch settles.
    fn starting(filters: FilterState) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::first(filters.limit()),
            filters,
            loading: true,
            error: None,
            banner_error: None,
            success: None,
            pending_delete: None,
            pending_search: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("list driver has shut down")]
pub struct DriverClosed;

// =============================================================================
// HANDLE
// =============================================================================

pub struct ListHandle<S: ListSource> {
    commands: mpsc::Sender<ListCommand<S>>,
    view: watch::Receiver<ListView<S::Item>>,
    task: JoinHandle<()>,
}

impl<S: ListSource> ListHandle<S> {
    /// Start the driver. The first fetch is issued immediately.
    #[must_use]
    pub fn spawn(controller: ListController<S>, debounce: std::time::Duration) -> Self {
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, view) = watch::channel(ListView::starting(controller.filters().clone()));
        let driver = Driver { controller, search: Debouncer::new(debounce), in_flight: None, commands: rx, view: view_tx };
        let task = tokio::spawn(driver.run());
        Self { commands, view, task }
    }

    async fn send(&self, command: ListCommand<S>) -> Result<(), DriverClosed> {
        self.commands
            .send(command)
            .await
            .map_err(|_| DriverClosed)
    }

    /// # Errors
    ///
    /// Returns [`DriverClosed`] if the driver task has exited.
    pub async fn search(&self, text: impl Into<String>) -> Result<(), DriverClosed> {
        self.send(ListCommand::SearchInput(text.into())).await
    }

    /// # Errors
    ///
    /// Returns [`DriverClosed`] if the driver task has exited.
    pub async fn submit_search(&self) -> Result<(), DriverClosed> {
        self.send(ListCommand::SubmitSearch).await
    }

    /// # Errors
    ///
    /// Returns [`DriverClosed`] if the driver task has exited.
    pub async fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) -> Result<(), DriverClosed> {
        self.send(ListCommand::SetFilter { key: key.into(), value: value.into() })
            .await
    }

    /// # Errors
    ///
    /// Returns [`DriverClosed`] if the driver task has exited.
    pub async fn clear_filter(&self, key: impl Into<String>) -> Result<(), DriverClosed> {
        self.send(ListCommand::ClearFilter(key.into())).await
    }

    /// # Errors
    ///
    /// Returns [`DriverClosed`] if the driver task has exited.
    pub async fn set_page(&self, page: u32) -> Result<(), DriverClosed> {
        self.send(ListCommand::SetPage(page)).await
    }

    /// # Errors
    ///
    /// Returns [`DriverClosed`] if the driver task has exited.
    pub async fn refresh(&self) -> Result<(), DriverClosed> {
        self.send(ListCommand::Refresh).await
    }

    /// Run `mutation` against the controller inside the driver task.
    ///
    /// # Errors
    ///
    /// Returns [`DriverClosed`] if the driver task has exited.
    pub async fn apply<F>(&self, mutation: F) -> Result<(), DriverClosed>
    where
        F: for<'a> FnOnce(&'a mut ListController<S>) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> + Send + 'static,
    {
        self.send(ListCommand::Apply(Box::new(mutation))).await
    }

    #[must_use]
    pub fn view(&self) -> ListView<S::Item> {
        self.view.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListView<S::Item>> {
        self.view.clone()
    }

    /// Wait until the published view satisfies `ready`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverClosed`] if the driver exits first.
    pub async fn wait_for(
        &self,
        ready: impl FnMut(&ListView<S::Item>) -> bool,
    ) -> Result<ListView<S::Item>, DriverClosed> {
        let mut rx = self.view.clone();
        rx.wait_for(ready)
            .await
            .map(|view| (*view).clone())
            .map_err(|_| DriverClosed)
    }
}

impl<S: ListSource> Drop for ListHandle<S> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// DRIVER TASK
// =============================================================================

type FetchResult<T> = Result<Snapshot<T>, ListError>;

struct InFlight<T> {
    id: u64,
    handle: JoinHandle<FetchResult<T>>,
}

impl<T> Drop for InFlight<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

enum Wake<S: ListSource> {
    Command(Option<ListCommand<S>>),
    SearchDue,
    FlashExpired,
    Fetched(Result<FetchResult<S::Item>, JoinError>),
}

struct Driver<S: ListSource> {
    controller: ListController<S>,
    search: Debouncer<String>,
    in_flight: Option<InFlight<S::Item>>,
    commands: mpsc::Receiver<ListCommand<S>>,
    view: watch::Sender<ListView<S::Item>>,
}

async fn at_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => pending().await,
    }
}

impl<S: ListSource> Driver<S> {
    async fn run(mut self) {
        self.dispatch();
        loop {
            self.publish();
            let search_due = self.search.deadline();
            let flash_due = self.controller.banners().success_deadline();
            let commands = &mut self.commands;
            let in_flight = &mut self.in_flight;
            let wake = tokio::select! {
                cmd = commands.recv() => Wake::Command(cmd),
                () = at_deadline(search_due) => Wake::SearchDue,
                () = at_deadline(flash_due) => Wake::FlashExpired,
                joined = async {
                    match in_flight.as_mut() {
                        Some(fetch) => (&mut fetch.handle).await,
                        None => pending().await,
                    }
                } => Wake::Fetched(joined),
            };
            match wake {
                Wake::Command(None) => break,
                Wake::Command(Some(cmd)) => self.handle(cmd).await,
                Wake::SearchDue => {
                    if let Some(text) = self.search.poll_at(Instant::now()) {
                        self.commit_search(&text);
                    }
                }
                Wake::FlashExpired => self.controller.banners_mut().expire_success(),
                Wake::Fetched(joined) => self.settle(joined),
            }
        }
        debug!("list driver: command channel closed");
    }

    async fn handle(&mut self, cmd: ListCommand<S>) {
        match cmd {
            ListCommand::SearchInput(text) => self.search.input(text),
            ListCommand::SubmitSearch => {
                if let Some(text) = self.search.flush() {
                    self.commit_search(&text);
                }
            }
            ListCommand::SetFilter { key, value } => {
                if self.controller.set_filter(&key, &value) {
                    self.dispatch();
                }
            }
            ListCommand::ClearFilter(key) => {
                if self.controller.clear_filter(&key) {
                    self.dispatch();
                }
            }
            ListCommand::SetPage(page) => {
                if self.controller.set_page(page) {
                    self.dispatch();
                }
            }
            ListCommand::Refresh => self.dispatch(),
            ListCommand::Apply(mutation) => mutation(&mut self.controller).await,
        }
    }

    fn commit_search(&mut self, text: &str) {
        if self.controller.set_filter(SEARCH_KEY, text) {
            self.dispatch();
        }
    }

    /// Issue a fetch for the current filters, aborting the one in flight.
    fn dispatch(&mut self) {
        let ticket = self.controller.begin_fetch();
        if let Some(previous) = self.in_flight.take() {
            debug!(request_id = previous.id, "list driver: aborting superseded fetch");
        }
        let source = std::sync::Arc::clone(self.controller.source());
        let handle = tokio::spawn(async move { source.fetch(&ticket.filters).await });
        self.in_flight = Some(InFlight { id: ticket.id, handle });
    }

    fn settle(&mut self, joined: Result<FetchResult<S::Item>, JoinError>) {
        let Some(fetch) = self.in_flight.take() else {
            return;
        };
        let result = match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => return,
            Err(e) => {
                warn!(request_id = fetch.id, error = %e, "list driver: fetch task failed");
                Err(ListError::Interrupted(e.to_string()))
            }
        };
        self.controller.finish_fetch(fetch.id, result);
    }

    fn publish(&self) {
        let c = &self.controller;
        let view = ListView {
            items: c.items().to_vec(),
            pagination: c.pagination(),
            filters: c.filters().clone(),
            loading: c.is_loading(),
            error: c.error().map(str::to_owned),
            banner_error: c.banners().error().map(str::to_owned),
            success: c.banners().success().map(str::to_owned),
            pending_delete: c.pending_delete().map(str::to_owned),
            pending_search: self.search.pending().cloned(),
        };
        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod tests;
