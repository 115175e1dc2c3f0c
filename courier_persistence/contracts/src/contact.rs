use std::future::Future;

use courier_models::contact::ContactMessageRecord;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactRepository<Txn: Send + Sync + 'static>: Send + Sync + 'static {
    /// Returns all stored contact messages, newest first.
    fn list(
        &self,
        txn: &mut Txn,
    ) -> impl Future<Output = anyhow::Result<Vec<ContactMessageRecord>>> + Send;

    /// Stores a new contact message. Records are never updated or deleted.
    fn create(
        &self,
        txn: &mut Txn,
        record: &ContactMessageRecord,
    ) -> impl Future<Output = Result<(), ContactRepoError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactRepoError {
    #[error("A contact message with the same id already exists.")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl<Txn: Send + Sync + 'static> MockContactRepository<Txn> {
    pub fn with_create(
        mut self,
        record: ContactMessageRecord,
        result: Result<(), ContactRepoError>,
    ) -> Self {
        self.expect_create()
            .once()
            .with(
                mockall::predicate::always(),
                mockall::predicate::eq(record),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_list(mut self, result: Vec<ContactMessageRecord>) -> Self {
        self.expect_list()
            .once()
            .with(mockall::predicate::always())
            .return_once(|_| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
