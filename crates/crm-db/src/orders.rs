use anyhow::{anyhow, Context, Result};
use crm_schemas::{Order, OrderFields, OrderStatus};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::Gateway;

/// Postgres-backed order gateway. Status is stored as its wire name and
/// guarded by a CHECK constraint.
#[derive(Debug, Clone)]
pub struct PgOrderGateway {
    pool: PgPool,
}

impl PgOrderGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_from_row(row: &PgRow) -> Result<Order> {
    let status: String = row.try_get("status")?;
    Ok(Order {
        id: row.try_get("id")?,
        description: row.try_get("description")?,
        status: OrderStatus::parse(&status).map_err(|e| anyhow!(e))?,
    })
}

#[async_trait::async_trait]
impl Gateway<Order> for PgOrderGateway {
    async fn find_all(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query("select id, description, status from orders order by id")
            .fetch_all(&self.pool)
            .await
            .context("orders find_all failed")?;

        rows.iter().map(order_from_row).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        let row = sqlx::query("select id, description, status from orders where id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("orders find_by_id failed")?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn save(&self, id: Option<i64>, fields: OrderFields) -> Result<Order> {
        let Some(id) = id else {
            let row = sqlx::query(
                r#"
                insert into orders (description, status)
                values ($1, $2)
                returning id, description, status
                "#,
            )
            .bind(&fields.description)
            .bind(fields.status.as_str())
            .fetch_one(&self.pool)
            .await
            .context("orders insert failed")?;
            return order_from_row(&row);
        };

        let mut tx = self.pool.begin().await.context("orders save: begin failed")?;

        let row = sqlx::query(
            r#"
            insert into orders (id, description, status)
            values ($1, $2, $3)
            on conflict (id) do update
               set description = excluded.description,
                   status      = excluded.status
            returning id, description, status
            "#,
        )
        .bind(id)
        .bind(&fields.description)
        .bind(fields.status.as_str())
        .fetch_one(&mut *tx)
        .await
        .context("orders upsert failed")?;

        // Move the identity sequence forward past `id`, never back: deleted
        // ids must not be reissued.
        sqlx::query(
            r#"
            select setval(pg_get_serial_sequence('orders', 'id'), $1)
             where $1 > coalesce(
                   pg_sequence_last_value(pg_get_serial_sequence('orders', 'id')::regclass),
                   0)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("orders sequence advance failed")?;

        tx.commit().await.context("orders save: commit failed")?;

        order_from_row(&row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        sqlx::query("delete from orders where id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("orders delete failed")?;
        Ok(())
    }
}
