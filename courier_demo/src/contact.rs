use std::sync::LazyLock;

use chrono::{TimeDelta, TimeZone, Utc};
use courier_models::contact::{ContactMessage, ContactMessageRecord};
use courier_persistence_contracts::contact::ContactRepository;
use uuid::uuid;

pub static ALL_MESSAGES: LazyLock<Vec<&ContactMessageRecord>> =
    LazyLock::new(|| vec![&ALICE, &BOB]);

pub static ALICE: LazyLock<ContactMessageRecord> = LazyLock::new(|| ContactMessageRecord {
    id: uuid!("a5d2c1f3-0b7e-4e7a-9d1c-3f0e8b6a4c21").into(),
    message: ContactMessage {
        name: "Alice".try_into().unwrap(),
        email: "alice@example.com".parse().unwrap(),
        subject: "Hi".try_into().unwrap(),
        message: "Hello there".try_into().unwrap(),
    },
    created_at: Utc.with_ymd_and_hms(2024, 11, 20, 10, 0, 0).unwrap(),
});

pub static BOB: LazyLock<ContactMessageRecord> = LazyLock::new(|| ContactMessageRecord {
    id: uuid!("0f3e9c4b-8d2a-4b61-a7e5-c1b9d6f24e88").into(),
    message: ContactMessage {
        name: "Bob".try_into().unwrap(),
        email: "bob@example.org".parse().unwrap(),
        subject: "Question about pricing".try_into().unwrap(),
        message: "Do you offer discounts for students?\nThanks, Bob"
            .try_into()
            .unwrap(),
    },
    created_at: ALICE.created_at + TimeDelta::minutes(42),
});

pub async fn create<Txn: Send + Sync + 'static>(
    txn: &mut Txn,
    repo: impl ContactRepository<Txn>,
) -> anyhow::Result<()> {
    for &message in &*ALL_MESSAGES {
        repo.create(txn, message).await?;
    }
    Ok(())
}
