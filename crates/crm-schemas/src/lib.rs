//! Domain types shared by every crm crate.
//!
//! Entities here are plain data: no I/O, no HTTP. The persistence gateways
//! (`crm-db`) store them and the daemon assembles them into representations.

pub mod customer;
pub mod order;
pub mod workflow;

pub use customer::{Customer, CustomerFields};
pub use order::{Order, OrderFields, OrderPayload, OrderStatus};
pub use workflow::{OrderEvent, TransitionError};

/// A stored record addressed by a numeric identifier.
///
/// `Fields` is everything except the id: what a caller supplies on create and
/// what a replace overwrites.
pub trait Entity: Clone + Send + Sync + 'static {
    type Fields: Clone + Send + Sync + 'static;

    /// Name used in user-facing messages ("Could not find Customer: 7").
    const NAME: &'static str;

    fn id(&self) -> i64;

    fn from_parts(id: i64, fields: Self::Fields) -> Self;

    fn into_fields(self) -> Self::Fields;
}
