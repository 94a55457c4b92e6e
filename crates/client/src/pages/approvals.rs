//! Admin approval queue.
//!
//! Lists claim and creation requests by status. Selecting an item opens its
//! review panel; approving takes optional notes, rejecting requires them.

use buzzgram_core::forms::validate_rejection_notes;
use buzzgram_core::models::Approval;
use buzzgram_core::{ApprovalId, ApprovalStatus};
use tracing::instrument;

use super::{query_keys, record};
use crate::app::App;
use crate::error::ClientError;
use crate::mutation::Mutation;

const APPROVAL_FAILED: &str = "Approval failed";
const REJECTION_FAILED: &str = "Rejection failed";

pub struct AdminApprovalsPage {
    app: App,
    status: ApprovalStatus,
    approvals: Vec<Approval>,
    selected: Option<ApprovalId>,
    pub notes: String,
    pub error: Option<String>,
    approve_mutation: Mutation,
    reject_mutation: Mutation,
}

impl AdminApprovalsPage {
    /// Page showing pending items.
    #[must_use]
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            status: ApprovalStatus::Pending,
            approvals: Vec::new(),
            selected: None,
            notes: String::new(),
            error: None,
            approve_mutation: Mutation::new(),
            reject_mutation: Mutation::new(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> ApprovalStatus {
        self.status
    }

    #[must_use]
    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    /// # Errors
    ///
    /// Returns the server's error.
    #[instrument(skip(self), fields(status = self.status.as_str()))]
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let status = self.status;
        let api = self.app.consumer.api();
        self.approvals = self
            .app
            .cache
            .fetch(query_keys::admin_approvals_by_status(status), || {
                api.get_approvals(status)
            })
            .await?;
        Ok(())
    }

    /// Switch the status tab and reload.
    ///
    /// # Errors
    ///
    /// Returns the server's error.
    pub async fn set_status(&mut self, status: ApprovalStatus) -> Result<(), ClientError> {
        self.status = status;
        self.close();
        self.load().await
    }

    /// Open the review panel for `id`. Notes and error start empty.
    pub fn select(&mut self, id: ApprovalId) {
        self.selected = Some(id);
        self.notes.clear();
        self.error = None;
    }

    /// Close the review panel.
    pub fn close(&mut self) {
        self.selected = None;
        self.notes.clear();
        self.error = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Approval> {
        self.selected
            .and_then(|id| self.approvals.iter().find(|a| a.id == id))
    }

    /// Whether either review action is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.approve_mutation.is_pending() || self.reject_mutation.is_pending()
    }

    /// Approve the selected item with the current notes, if any.
    ///
    /// # Errors
    ///
    /// Returns the server's error; `error` is set and the panel stays open.
    #[instrument(skip(self))]
    pub async fn approve(&mut self) -> Result<(), ClientError> {
        let Some(id) = self.selected else {
            return Ok(());
        };
        let notes = self.notes.trim();
        let notes = (!notes.is_empty()).then_some(notes);

        let api = self.app.consumer.api();
        let result = self
            .approve_mutation
            .run(&self.app.cache, &[query_keys::admin_approvals()], async {
                api.approve(id, notes).await
            })
            .await;
        self.finish(result, APPROVAL_FAILED).await
    }

    /// Reject the selected item. Notes are required.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for blank notes without calling the
    /// server, otherwise the server's error.
    #[instrument(skip(self))]
    pub async fn reject(&mut self) -> Result<(), ClientError> {
        let Some(id) = self.selected else {
            return Ok(());
        };
        let result = match validate_rejection_notes(&self.notes) {
            Ok(notes) => {
                let api = self.app.consumer.api();
                self.reject_mutation
                    .run(&self.app.cache, &[query_keys::admin_approvals()], async {
                        api.reject(id, notes).await
                    })
                    .await
            }
            Err(e) => Err(e.into()),
        };
        self.finish(result, REJECTION_FAILED).await
    }

    async fn finish(
        &mut self,
        result: Result<(), ClientError>,
        fallback: &str,
    ) -> Result<(), ClientError> {
        record(&mut self.error, &result, fallback);
        result?;
        self.close();
        self.load().await
    }
}
