//! Shared fixtures and gateway doubles for scenario tests.
//!
//! Nothing here is used by production code paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use crm_db::{Gateway, MemoryGateway};
use crm_schemas::{Customer, Entity, Order, OrderStatus};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Customers 1 and 2, in insertion order.
pub fn customers() -> Vec<Customer> {
    vec![
        Customer {
            id: 1,
            first_name: "Joaquim".to_string(),
            last_name: "Jose".to_string(),
            birth_date: date(1746, 11, 12),
        },
        Customer {
            id: 2,
            first_name: "Joaquim".to_string(),
            last_name: "Silverio".to_string(),
            birth_date: date(1756, 1, 1),
        },
    ]
}

/// Orders 3 (COMPLETED), 4 (IN_PROGRESS) and 5 (CANCELLED).
pub fn orders() -> Vec<Order> {
    vec![
        order(3, "MacBook Pro", OrderStatus::Completed),
        order(4, "iPhone", OrderStatus::InProgress),
        order(5, "iPad Pro", OrderStatus::Cancelled),
    ]
}

pub fn order(id: i64, description: &str, status: OrderStatus) -> Order {
    Order {
        id,
        description: description.to_string(),
        status,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("fixture dates are valid")
}

pub fn seeded_customers() -> Arc<MemoryGateway<Customer>> {
    Arc::new(MemoryGateway::seeded(customers()))
}

pub fn seeded_orders() -> Arc<MemoryGateway<Order>> {
    Arc::new(MemoryGateway::seeded(orders()))
}

// ---------------------------------------------------------------------------
// FailingGateway
// ---------------------------------------------------------------------------

/// Every call fails as if the store were unreachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingGateway;

pub const STORE_DOWN: &str = "store unreachable (testkit)";

#[async_trait::async_trait]
impl<E: Entity> Gateway<E> for FailingGateway {
    async fn find_all(&self) -> Result<Vec<E>> {
        Err(anyhow!(STORE_DOWN))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<E>> {
        Err(anyhow!(STORE_DOWN))
    }

    async fn save(&self, _id: Option<i64>, _fields: E::Fields) -> Result<E> {
        Err(anyhow!(STORE_DOWN))
    }

    async fn delete_by_id(&self, _id: i64) -> Result<()> {
        Err(anyhow!(STORE_DOWN))
    }
}

// ---------------------------------------------------------------------------
// RecordingGateway
// ---------------------------------------------------------------------------

/// Delegates to a [`MemoryGateway`] and counts writes, so tests can assert
/// that a rejected operation never reached the store.
pub struct RecordingGateway<E: Entity> {
    inner: MemoryGateway<E>,
    saves: AtomicUsize,
    deletes: AtomicUsize,
}

impl<E: Entity> RecordingGateway<E> {
    pub fn seeded(rows: Vec<E>) -> Self {
        Self {
            inner: MemoryGateway::seeded(rows),
            saves: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl<E: Entity> Gateway<E> for RecordingGateway<E> {
    async fn find_all(&self) -> Result<Vec<E>> {
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, id: Option<i64>, fields: E::Fields) -> Result<E> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(id, fields).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }
}
