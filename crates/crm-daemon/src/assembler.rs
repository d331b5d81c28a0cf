//! Representation assembly.
//!
//! Pure functions from (entity, [`RouteTable`]) to a wire model. Nothing here
//! touches the store or the request; the only conditional is the order
//! workflow links, present exactly while the order is `IN_PROGRESS`.

use std::collections::BTreeMap;

use crm_schemas::{Customer, Entity, Order, OrderEvent};
use serde::Serialize;

use crate::api_types::{CollectionModel, EntityModel, Link, Links};

pub const REL_SELF: &str = "self";
pub const REL_CUSTOMERS: &str = "customers";
pub const REL_ORDERS: &str = "orders";
pub const REL_CANCEL: &str = "cancel";
pub const REL_COMPLETE: &str = "complete";

// ---------------------------------------------------------------------------
// RouteTable
// ---------------------------------------------------------------------------

/// URI scheme for every resource. `base` is prepended verbatim, so an empty
/// base yields root-relative links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    base: String,
}

impl RouteTable {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            base: base.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn customers(&self) -> String {
        format!("{}/customers", self.base)
    }

    pub fn customer(&self, id: i64) -> String {
        format!("{}/customers/{id}", self.base)
    }

    pub fn orders(&self) -> String {
        format!("{}/orders", self.base)
    }

    pub fn order(&self, id: i64) -> String {
        format!("{}/orders/{id}", self.base)
    }

    pub fn order_transition(&self, id: i64, event: OrderEvent) -> String {
        format!("{}/orders/{id}/{}", self.base, event.verb())
    }
}

// ---------------------------------------------------------------------------
// Represent
// ---------------------------------------------------------------------------

/// An entity that can be turned into a hypermedia model.
pub trait Represent: Entity + Serialize {
    /// Key under `_embedded` for collections ("customerList").
    const LIST_KEY: &'static str;

    fn collection_href(routes: &RouteTable) -> String;

    fn links(&self, routes: &RouteTable) -> Links;
}

fn link(links: &mut Links, rel: &str, href: String) {
    links.insert(rel.to_string(), Link::new(href));
}

impl Represent for Customer {
    const LIST_KEY: &'static str = "customerList";

    fn collection_href(routes: &RouteTable) -> String {
        routes.customers()
    }

    fn links(&self, routes: &RouteTable) -> Links {
        let mut links = Links::new();
        link(&mut links, REL_SELF, routes.customer(self.id));
        link(&mut links, REL_CUSTOMERS, routes.customers());
        links
    }
}

impl Represent for Order {
    const LIST_KEY: &'static str = "orderList";

    fn collection_href(routes: &RouteTable) -> String {
        routes.orders()
    }

    fn links(&self, routes: &RouteTable) -> Links {
        let mut links = Links::new();
        link(&mut links, REL_SELF, routes.order(self.id));
        link(&mut links, REL_ORDERS, routes.orders());

        for (rel, event) in [
            (REL_CANCEL, OrderEvent::Cancel),
            (REL_COMPLETE, OrderEvent::Complete),
        ] {
            if self.allows(event) {
                link(&mut links, rel, routes.order_transition(self.id, event));
            }
        }
        links
    }
}

pub fn to_model<E: Represent>(entity: E, routes: &RouteTable) -> EntityModel<E> {
    let links = entity.links(routes);
    EntityModel {
        content: entity,
        links,
    }
}

pub fn to_collection<E: Represent>(entities: Vec<E>, routes: &RouteTable) -> CollectionModel<E> {
    let models: Vec<EntityModel<E>> = entities.into_iter().map(|e| to_model(e, routes)).collect();

    let mut embedded = BTreeMap::new();
    if !models.is_empty() {
        embedded.insert(E::LIST_KEY.to_string(), models);
    }

    let mut links = Links::new();
    link(&mut links, REL_SELF, E::collection_href(routes));

    CollectionModel { embedded, links }
}
