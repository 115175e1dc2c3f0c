use std::future::Future;

use courier_models::contact::{ContactMessageRecord, ContactSubmission, ContactValidationErrors};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validates and stores a contact form submission and forwards it via
    /// email.
    ///
    /// The stored message is kept even if the email cannot be sent.
    fn submit(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<ContactMessageRecord, ContactSubmitError>> + Send;

    /// Returns all stored contact messages, newest first.
    fn list(&self) -> impl Future<Output = anyhow::Result<Vec<ContactMessageRecord>>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("Invalid contact form submission.")]
    Validation(ContactValidationErrors),
    #[error("Failed to send email: {0}")]
    Send(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        submission: ContactSubmission,
        result: Result<ContactMessageRecord, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_list(mut self, result: Vec<ContactMessageRecord>) -> Self {
        self.expect_list()
            .once()
            .return_once(|| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
