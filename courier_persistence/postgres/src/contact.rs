use bb8_postgres::tokio_postgres::{self, error::SqlState, Row};
use courier_di::Build;
use courier_models::contact::{ContactMessage, ContactMessageRecord};
use courier_persistence_contracts::contact::{ContactRepoError, ContactRepository};
use courier_utils::trace_instrument;
use uuid::Uuid;

use crate::{arg_indices, columns, ColumnCounter, PostgresTransaction};

#[derive(Debug, Clone, Copy, Default, Build)]
pub struct PostgresContactRepository;

columns!(contact_messages as "cm": "id", "name", "email", "subject", "message", "created_at");

impl ContactRepository<PostgresTransaction> for PostgresContactRepository {
    #[trace_instrument(skip(self, txn))]
    async fn list(&self, txn: &mut PostgresTransaction) -> anyhow::Result<Vec<ContactMessageRecord>> {
        txn.txn()?
            .query(
                &format!(
                    "select {CONTACT_MESSAGES_COLS} from contact_messages cm order by cm.created_at desc, cm.id"
                ),
                &[],
            )
            .await
            .map_err(Into::into)
            .and_then(|rows| {
                rows.iter()
                    .map(|row| decode_contact_message(row, &mut Default::default()))
                    .collect()
            })
    }

    #[trace_instrument(skip(self, txn))]
    async fn create(
        &self,
        txn: &mut PostgresTransaction,
        record: &ContactMessageRecord,
    ) -> Result<(), ContactRepoError> {
        let ContactMessage {
            name,
            email,
            subject,
            message,
        } = &record.message;

        txn.txn()?
            .execute(
                &format!(
                    "insert into contact_messages ({CONTACT_MESSAGES_COL_NAMES}) values ({})",
                    arg_indices(1..=CONTACT_MESSAGES_CNT)
                ),
                &[
                    &*record.id,
                    &name.as_str(),
                    &email.as_str(),
                    &subject.as_str(),
                    &message.as_str(),
                    &record.created_at,
                ],
            )
            .await
            .map_err(map_contact_repo_error)?;

        Ok(())
    }
}

fn decode_contact_message(row: &Row, cnt: &mut ColumnCounter) -> anyhow::Result<ContactMessageRecord> {
    Ok(ContactMessageRecord {
        id: row.get::<_, Uuid>(cnt.idx()).into(),
        message: ContactMessage {
            name: row.get::<_, String>(cnt.idx()).try_into()?,
            email: row.get::<_, String>(cnt.idx()).parse()?,
            subject: row.get::<_, String>(cnt.idx()).try_into()?,
            message: row.get::<_, String>(cnt.idx()).try_into()?,
        },
        created_at: row.get(cnt.idx()),
    })
}

fn map_contact_repo_error(err: tokio_postgres::Error) -> ContactRepoError {
    let conflict = err
        .as_db_error()
        .is_some_and(|err| *err.code() == SqlState::UNIQUE_VIOLATION);

    if conflict {
        ContactRepoError::Conflict
    } else {
        ContactRepoError::Other(err.into())
    }
}
