use courier_persistence_contracts::contact::ContactRepository;
use uuid::{uuid, Uuid};

pub mod contact;

pub const UUID1: Uuid = uuid!("eb1cd87a-4475-4d68-a2c2-0216bdaac8f7");

pub async fn create<Txn: Send + Sync + 'static>(
    txn: &mut Txn,
    contact: impl ContactRepository<Txn>,
) -> anyhow::Result<()> {
    contact::create(txn, contact).await?;
    Ok(())
}
