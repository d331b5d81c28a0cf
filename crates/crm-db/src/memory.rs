//! Process-local gateway. Mirrors the Postgres semantics closely enough for
//! handler tests: ids are assigned from a counter that always stays ahead of
//! any explicitly supplied id.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use crm_schemas::Entity;
use tokio::sync::RwLock;

use crate::Gateway;

pub struct MemoryGateway<E: Entity> {
    table: RwLock<Table<E>>,
}

struct Table<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

impl<E: Entity> Default for MemoryGateway<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MemoryGateway<E> {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Start with `rows` already stored under their own ids.
    pub fn seeded(rows: Vec<E>) -> Self {
        let rows: BTreeMap<i64, E> = rows.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = rows.keys().next_back().map_or(1, |max| max.saturating_add(1));
        Self {
            table: RwLock::new(Table { rows, next_id }),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl<E: Entity> Gateway<E> for MemoryGateway<E> {
    async fn find_all(&self) -> Result<Vec<E>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, id: Option<i64>, fields: E::Fields) -> Result<E> {
        let mut t = self.table.write().await;
        let id = match id {
            Some(id) => id,
            // The counter saturates at i64::MAX; never hand that id out twice.
            None if t.rows.contains_key(&t.next_id) => bail!("id space exhausted"),
            None => t.next_id,
        };
        t.next_id = t.next_id.max(id.saturating_add(1));

        let row = E::from_parts(id, fields);
        t.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.table.write().await.rows.remove(&id);
        Ok(())
    }
}
