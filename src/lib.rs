//! # classroom
//!
//! Headless client core for the classroom task-management dashboards.
//! Students, teachers, and admins manage classes, assignments, users, and
//! notifications through a REST backend; this crate holds everything between
//! that backend and a rendering layer.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` is the typed REST client, `session` tracks who is logged in, `list`
//! keeps paginated/filterable collections in sync with the server, `forms`
//! validates and submits create/edit modals, and `poller` refreshes the
//! notification badge in the background. The `cli` crate drives all of it.

pub mod config;
pub mod forms;
pub mod list;
pub mod net;
pub mod poller;
pub mod session;
