//! Generic create/edit modal.
//!
//! The modal owns one form and nothing else. It never touches a list
//! controller: after a successful save it calls the caller's `on_saved`
//! hook, and the caller decides what to refetch.

use tracing::{debug, warn};

use super::ResourceForm;
use crate::net::{ApiClient, ApiError};

/// Result of [`CrudModal::submit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Saved; `on_saved` ran and the modal closed.
    Saved,
    /// Local validation failed; no request was sent.
    Invalid,
    /// The server rejected the request; the modal stays open.
    Failed,
    /// Nothing to submit.
    NotOpen,
    /// A save from this modal is already in flight.
    Busy,
}

enum ModalState<F: ResourceForm> {
    Closed,
    Open { form: F, editing: Option<F::Resource>, error: Option<String>, submitting: bool },
}

pub struct CrudModal<F: ResourceForm> {
    state: ModalState<F>,
}

impl<F: ResourceForm> Default for CrudModal<F> {
    fn default() -> Self {
        Self { state: ModalState::Closed }
    }
}

impl<F: ResourceForm> CrudModal<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_create(&mut self) {
        self.state = ModalState::Open { form: F::blank(), editing: None, error: None, submitting: false };
    }

    pub fn open_edit(&mut self, resource: F::Resource) {
        let form = F::from_resource(&resource);
        self.state = ModalState::Open { form, editing: Some(resource), error: None, submitting: false };
    }

    pub fn close(&mut self) {
        self.state = ModalState::Closed;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    #[must_use]
    pub fn is_edit(&self) -> bool {
        matches!(self.state, ModalState::Open { editing: Some(_), .. })
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, ModalState::Open { submitting: true, .. })
    }

    #[must_use]
    pub fn form(&self) -> Option<&F> {
        match &self.state {
            ModalState::Open { form, .. } => Some(form),
            ModalState::Closed => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        match &mut self.state {
            ModalState::Open { form, .. } => Some(form),
            ModalState::Closed => None,
        }
    }

    #[must_use]
    pub fn editing(&self) -> Option<&F::Resource> {
        match &self.state {
            ModalState::Open { editing, .. } => editing.as_ref(),
            ModalState::Closed => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ModalState::Open { error, .. } => error.as_deref(),
            ModalState::Closed => None,
        }
    }

    /// Validate and mark the modal as submitting. The returned request
    /// owns a copy of the form, so the modal stays readable (and shows
    /// [`CrudModal::is_submitting`]) while it is in flight.
    ///
    /// # Errors
    ///
    /// [`SubmitOutcome::NotOpen`], [`SubmitOutcome::Busy`] or
    /// [`SubmitOutcome::Invalid`]; nothing is sent in any of these cases.
    pub fn begin_submit(&mut self) -> Result<PendingSave<F>, SubmitOutcome> {
        let ModalState::Open { form, editing, error, submitting } = &mut self.state else {
            return Err(SubmitOutcome::NotOpen);
        };
        if *submitting {
            return Err(SubmitOutcome::Busy);
        }
        *error = None;
        if let Err(e) = form.validate(editing.as_ref()) {
            debug!(error = %e, "modal: validation failed");
            *error = Some(e.to_string());
            return Err(SubmitOutcome::Invalid);
        }
        *submitting = true;
        Ok(PendingSave { form: form.clone(), editing: editing.clone() })
    }

    /// Apply the result of a [`PendingSave`]. On success runs `on_saved`
    /// and closes; on failure keeps every field and shows the message.
    /// A save that lands after the modal was closed still runs `on_saved`.
    pub fn finish_submit(&mut self, result: Result<(), ApiError>, on_saved: impl FnOnce()) -> SubmitOutcome {
        match result {
            Ok(()) => {
                on_saved();
                self.state = ModalState::Closed;
                SubmitOutcome::Saved
            }
            Err(e) => {
                warn!(error = %e, "modal: save failed");
                if let ModalState::Open { error, submitting, .. } = &mut self.state {
                    *submitting = false;
                    *error = Some(e.to_string());
                }
                SubmitOutcome::Failed
            }
        }
    }

    /// [`CrudModal::begin_submit`], send, then [`CrudModal::finish_submit`].
    pub async fn submit(&mut self, api: &ApiClient, on_saved: impl FnOnce()) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(pending) => {
                let result = pending.send(api).await;
                self.finish_submit(result, on_saved)
            }
            Err(outcome) => outcome,
        }
    }
}

/// A validated create or update, detached from its modal.
pub struct PendingSave<F: ResourceForm> {
    form: F,
    editing: Option<F::Resource>,
}

impl<F: ResourceForm> PendingSave<F> {
    #[must_use]
    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    /// # Errors
    ///
    /// Returns the server error.
    pub async fn send(&self, api: &ApiClient) -> Result<(), ApiError> {
        self.form.submit(api, self.editing.as_ref()).await
    }
}

#[cfg(test)]
#[path = "modal_test.rs"]
mod tests;
