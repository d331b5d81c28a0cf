use anyhow::{Context, Result};
use crm_schemas::{Customer, CustomerFields};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::Gateway;

/// Postgres-backed customer gateway.
#[derive(Debug, Clone)]
pub struct PgCustomerGateway {
    pool: PgPool,
}

impl PgCustomerGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn customer_from_row(row: &PgRow) -> Result<Customer> {
    Ok(Customer {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        birth_date: row.try_get("birth_date")?,
    })
}

#[async_trait::async_trait]
impl Gateway<Customer> for PgCustomerGateway {
    async fn find_all(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            select id, first_name, last_name, birth_date
            from customers
            order by id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("customers find_all failed")?;

        rows.iter().map(customer_from_row).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            select id, first_name, last_name, birth_date
            from customers
            where id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("customers find_by_id failed")?;

        row.as_ref().map(customer_from_row).transpose()
    }

    async fn save(&self, id: Option<i64>, fields: CustomerFields) -> Result<Customer> {
        let Some(id) = id else {
            let row = sqlx::query(
                r#"
                insert into customers (first_name, last_name, birth_date)
                values ($1, $2, $3)
                returning id, first_name, last_name, birth_date
                "#,
            )
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(fields.birth_date)
            .fetch_one(&self.pool)
            .await
            .context("customers insert failed")?;
            return customer_from_row(&row);
        };

        let mut tx = self.pool.begin().await.context("customers save: begin failed")?;

        let row = sqlx::query(
            r#"
            insert into customers (id, first_name, last_name, birth_date)
            values ($1, $2, $3, $4)
            on conflict (id) do update
               set first_name = excluded.first_name,
                   last_name  = excluded.last_name,
                   birth_date = excluded.birth_date
            returning id, first_name, last_name, birth_date
            "#,
        )
        .bind(id)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.birth_date)
        .fetch_one(&mut *tx)
        .await
        .context("customers upsert failed")?;

        // Move the identity sequence forward past `id`, never back: deleted
        // ids must not be reissued.
        sqlx::query(
            r#"
            select setval(pg_get_serial_sequence('customers', 'id'), $1)
             where $1 > coalesce(
                   pg_sequence_last_value(pg_get_serial_sequence('customers', 'id')::regclass),
                   0)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("customers sequence advance failed")?;

        tx.commit().await.context("customers save: commit failed")?;

        customer_from_row(&row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        sqlx::query("delete from customers where id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("customers delete failed")?;
        Ok(())
    }
}
