use std::sync::Arc;

use anyhow::Context;
use courier_core_contact_contracts::{ContactFeatureService, ContactSubmitError};
use courier_di::Build;
use courier_email_contracts::{Email, EmailService};
use courier_models::{
    contact::{ContactMessage, ContactMessageRecord, ContactSubmission},
    email_address::EmailAddress,
};
use courier_persistence_contracts::{contact::ContactRepository, Database, Transaction};
use courier_shared_contracts::{id::IdService, time::TimeService};
use courier_utils::trace_instrument;
use tracing::{info, warn};

#[derive(Debug, Clone, Build)]
pub struct ContactFeatureServiceImpl<Db, Id, Time, EmailS, ContactRepo> {
    db: Db,
    id: Id,
    time: Time,
    email: EmailS,
    contact_repo: ContactRepo,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ContactFeatureConfig {
    /// Fixed address to forward contact messages to. If unset, the message is
    /// sent back to the address given in the submission.
    pub recipient: Option<Arc<EmailAddress>>,
}

impl<Db, Id, Time, EmailS, ContactRepo> ContactFeatureService
    for ContactFeatureServiceImpl<Db, Id, Time, EmailS, ContactRepo>
where
    Db: Database,
    Id: IdService,
    Time: TimeService,
    EmailS: EmailService,
    ContactRepo: ContactRepository<Db::Transaction>,
{
    #[trace_instrument(skip(self))]
    async fn submit(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactMessageRecord, ContactSubmitError> {
        let message = ContactMessage::try_from(submission).map_err(ContactSubmitError::Validation)?;

        let record = ContactMessageRecord {
            id: self.id.generate(),
            message,
            created_at: self.time.now(),
        };

        let mut txn = self.db.begin_transaction().await?;
        self.contact_repo
            .create(&mut txn, &record)
            .await
            .context("Failed to store contact message")?;
        txn.commit().await?;

        if let Err(err) = self.email.send(self.make_email(&record.message)).await {
            warn!(id = %*record.id, "Failed to send contact message: {err:#}");
            return Err(ContactSubmitError::Send(format!("{err:#}")));
        }

        info!(id = %*record.id, "Contact message submitted");

        Ok(record)
    }

    #[trace_instrument(skip(self))]
    async fn list(&self) -> anyhow::Result<Vec<ContactMessageRecord>> {
        let mut txn = self.db.begin_transaction().await?;
        self.contact_repo
            .list(&mut txn)
            .await
            .context("Failed to list contact messages")
    }
}

impl<Db, Id, Time, EmailS, ContactRepo> ContactFeatureServiceImpl<Db, Id, Time, EmailS, ContactRepo> {
    fn make_email(&self, message: &ContactMessage) -> Email {
        let (recipient, reply_to) = match &self.config.recipient {
            Some(recipient) => (
                (**recipient).clone().into(),
                Some(message.email.clone().into()),
            ),
            None => (message.email.clone().into(), None),
        };

        Email {
            recipient,
            subject: (*message.subject).clone(),
            body: format!(
                "From: {} <{}>\n\nMessage:\n{}",
                *message.name, message.email, *message.message
            ),
            reply_to,
        }
    }
}
