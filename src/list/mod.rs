//! Paginated, filterable resource lists.

mod actions;
pub mod banner;
pub mod controller;
pub mod debounce;
pub mod driver;
pub mod filters;
pub mod pagination;
pub mod source;

pub use banner::{Banners, DeleteConfirm};
pub use controller::{FetchTicket, ListController, ListPhase};
pub use debounce::Debouncer;
pub use driver::{DriverClosed, ListCommand, ListHandle, ListView};
pub use filters::{FilterState, PAGE_KEY, SEARCH_KEY};
pub use pagination::page_window;
pub use source::{
    ClassSource, Keyed, ListError, ListSource, NotificationSource, RemoveSource, SearchMode, Snapshot, TaskSource,
    UserSource,
};
