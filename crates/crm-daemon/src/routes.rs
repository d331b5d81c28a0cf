//! Axum router and all HTTP handlers for crm-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Scenario tests in `tests/` compose the bare router.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use crm_db::{replace, Upsert};
use crm_schemas::{Customer, CustomerFields, Entity, Order, OrderEvent, OrderPayload};
use tracing::{info, warn};

use crate::{
    api_types::{CollectionModel, EntityModel, HealthResponse},
    assembler::{to_collection, to_model, Represent, REL_SELF},
    error::{ApiError, ApiResult},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer)
                .put(replace_customer)
                .delete(delete_customer),
        )
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order).put(replace_order))
        .route("/orders/:id/cancel", delete(cancel_order))
        .route("/orders/:id/complete", put(complete_order))
        .with_state(state)
}

/// 201 with `Location` pointing at the entity's own URI.
fn created<E: Represent>(model: EntityModel<E>) -> Response {
    let location = model
        .links
        .get(REL_SELF)
        .map(|l| l.href.clone())
        .unwrap_or_default();
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(model),
    )
        .into_response()
}

fn upserted<E: Represent>(st: &AppState, outcome: Upsert<E>) -> Response {
    let kind = if outcome.was_created() {
        "created"
    } else {
        "updated"
    };
    let entity = outcome.into_inner();
    info!(entity = E::NAME, id = entity.id(), outcome = kind, "replace");
    created(to_model(entity, &st.routes))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
            store: st.store_label().to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// /customers
// ---------------------------------------------------------------------------

pub(crate) async fn list_customers(
    State(st): State<Arc<AppState>>,
) -> ApiResult<Json<CollectionModel<Customer>>> {
    let all = st.customers.find_all().await?;
    Ok(Json(to_collection(all, &st.routes)))
}

pub(crate) async fn get_customer(
    State(st): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EntityModel<Customer>>> {
    let customer = st
        .customers
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found::<Customer>(id))?;
    Ok(Json(to_model(customer, &st.routes)))
}

pub(crate) async fn create_customer(
    State(st): State<Arc<AppState>>,
    Json(fields): Json<CustomerFields>,
) -> ApiResult<Response> {
    let customer = st.customers.save(None, fields).await?;
    info!(id = customer.id, "customer created");
    Ok(created(to_model(customer, &st.routes)))
}

/// Upsert: overwrites first name, last name and birth date, or creates the
/// customer under `id`. Both branches answer 201.
pub(crate) async fn replace_customer(
    State(st): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(fields): Json<CustomerFields>,
) -> ApiResult<Response> {
    let id = ApiError::check_id(id)?;
    let outcome = replace(st.customers.as_ref(), id, move |_| fields).await?;
    Ok(upserted(&st, outcome))
}

pub(crate) async fn delete_customer(
    State(st): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    st.customers.delete_by_id(id).await?;
    info!(id, "customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// /orders
// ---------------------------------------------------------------------------

pub(crate) async fn list_orders(
    State(st): State<Arc<AppState>>,
) -> ApiResult<Json<CollectionModel<Order>>> {
    let all = st.orders.find_all().await?;
    Ok(Json(to_collection(all, &st.routes)))
}

pub(crate) async fn get_order(
    State(st): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EntityModel<Order>>> {
    let order = find_order(&st, id).await?;
    Ok(Json(to_model(order, &st.routes)))
}

/// Status in the body is ignored: new orders always start `IN_PROGRESS`.
pub(crate) async fn create_order(
    State(st): State<Arc<AppState>>,
    Json(payload): Json<OrderPayload>,
) -> ApiResult<Response> {
    let order = st.orders.save(None, payload.into_new_fields()).await?;
    info!(id = order.id, "order created");
    Ok(created(to_model(order, &st.routes)))
}

/// Upsert with no workflow guard: any status may be written here.
pub(crate) async fn replace_order(
    State(st): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderPayload>,
) -> ApiResult<Response> {
    let id = ApiError::check_id(id)?;
    let outcome = replace(st.orders.as_ref(), id, move |existing| {
        payload.into_replacement(existing)
    })
    .await?;
    Ok(upserted(&st, outcome))
}

// ---------------------------------------------------------------------------
// DELETE /orders/:id/cancel, PUT /orders/:id/complete
// ---------------------------------------------------------------------------

pub(crate) async fn cancel_order(
    State(st): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EntityModel<Order>>> {
    transition(&st, id, OrderEvent::Cancel).await
}

pub(crate) async fn complete_order(
    State(st): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EntityModel<Order>>> {
    transition(&st, id, OrderEvent::Complete).await
}

/// Load, apply `event`, persist. A refused event returns before the gateway
/// is written.
async fn transition(
    st: &AppState,
    id: i64,
    event: OrderEvent,
) -> ApiResult<Json<EntityModel<Order>>> {
    let mut order = find_order(st, id).await?;

    if let Err(refused) = order.apply(event) {
        warn!(id, status = %refused.from, event = event.verb(), "transition refused");
        return Err(refused.into());
    }

    let saved = st.orders.save(Some(id), order.into_fields()).await?;
    info!(id, status = %saved.status, event = event.verb(), "order transitioned");
    Ok(Json(to_model(saved, &st.routes)))
}

async fn find_order(st: &AppState, id: i64) -> ApiResult<Order> {
    st.orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found::<Order>(id))
}
