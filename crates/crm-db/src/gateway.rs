use anyhow::Result;
use crm_schemas::Entity;

/// CRUD access to one entity type in the backing store.
///
/// Every method may fail with an infrastructure error (store unreachable,
/// constraint violation). Callers do not retry.
#[async_trait::async_trait]
pub trait Gateway<E: Entity>: Send + Sync {
    /// All records, ordered by id.
    async fn find_all(&self) -> Result<Vec<E>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<E>>;

    /// Insert when `id` is `None` or unknown, otherwise overwrite the record's
    /// fields. Returns the stored record.
    async fn save(&self, id: Option<i64>, fields: E::Fields) -> Result<E>;

    /// Remove the record. Absent ids are a no-op.
    async fn delete_by_id(&self, id: i64) -> Result<()>;
}

/// Outcome of [`replace`]: which branch of the upsert ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert<E> {
    Updated(E),
    Created(E),
}

impl<E> Upsert<E> {
    pub fn was_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }

    pub fn into_inner(self) -> E {
        match self {
            Upsert::Updated(e) | Upsert::Created(e) => e,
        }
    }
}

/// Replace the record at `id`, creating it under that id when absent.
///
/// `merge` receives the current record (if any) and returns the fields to
/// store.
pub async fn replace<E, F>(gateway: &dyn Gateway<E>, id: i64, merge: F) -> Result<Upsert<E>>
where
    E: Entity,
    F: FnOnce(Option<&E>) -> E::Fields + Send,
{
    let existing = gateway.find_by_id(id).await?;
    let fields = merge(existing.as_ref());
    let saved = gateway.save(Some(id), fields).await?;

    Ok(match existing {
        Some(_) => Upsert::Updated(saved),
        None => Upsert::Created(saved),
    })
}
