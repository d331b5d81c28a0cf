//! In-process scenario tests for the /customers endpoints.
//!
//! The router runs over the in-memory gateway seeded with customers 1 and 2;
//! no TCP socket is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use crm_config::StoreKind;
use crm_daemon::{assembler::RouteTable, routes, state::AppState};
use http_body_util::BodyExt;
use tower::ServiceExt; // oneshot

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_state() -> Arc<AppState> {
    Arc::new(AppState::new(
        StoreKind::Memory,
        crm_testkit::seeded_customers(),
        crm_testkit::seeded_orders(),
        RouteTable::default(),
    ))
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    content_type: Option<String>,
    body: bytes::Bytes,
}

async fn call(router: axum::Router, req: Request<Body>) -> Reply {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let header_str = |name: header::HeaderName| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let location = header_str(header::LOCATION);
    let content_type = header_str(header::CONTENT_TYPE);
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    Reply {
        status,
        location,
        content_type,
        body,
    }
}

fn parse_json(b: &bytes::Bytes) -> serde_json::Value {
    serde_json::from_slice(b).expect("body is not valid JSON")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn with_json(method: &str, uri: &str, json: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ---------------------------------------------------------------------------
// GET /customers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_seeded_customers_with_links() {
    let router = routes::build_router(make_state());
    let reply = call(router, get("/customers")).await;
    assert_eq!(reply.status, StatusCode::OK);

    let json = parse_json(&reply.body);
    let list = json["_embedded"]["customerList"]
        .as_array()
        .expect("customerList array");
    assert_eq!(list.len(), 2);

    assert_eq!(list[0]["id"], 1);
    assert_eq!(list[0]["firstName"], "Joaquim");
    assert_eq!(list[0]["lastName"], "Jose");
    assert_eq!(list[0]["birthDate"], "12-11-1746");
    assert_eq!(list[0]["_links"]["self"]["href"], "/customers/1");
    assert_eq!(list[0]["_links"]["customers"]["href"], "/customers");

    assert_eq!(list[1]["id"], 2);
    assert_eq!(list[1]["lastName"], "Silverio");
    assert_eq!(list[1]["birthDate"], "01-01-1756");

    assert_eq!(json["_links"]["self"]["href"], "/customers");
}

#[tokio::test]
async fn list_of_empty_store_omits_embedded() {
    let st = Arc::new(AppState::in_memory(RouteTable::default()));
    let reply = call(routes::build_router(st), get("/customers")).await;
    assert_eq!(reply.status, StatusCode::OK);

    let json = parse_json(&reply.body);
    assert!(json.get("_embedded").is_none(), "got: {json}");
    assert_eq!(json["_links"]["self"]["href"], "/customers");
}

// ---------------------------------------------------------------------------
// GET /customers/:id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_existing_customer() {
    let reply = call(routes::build_router(make_state()), get("/customers/2")).await;
    assert_eq!(reply.status, StatusCode::OK);

    let json = parse_json(&reply.body);
    assert_eq!(json["firstName"], "Joaquim");
    assert_eq!(json["lastName"], "Silverio");
    assert_eq!(json["_links"]["self"]["href"], "/customers/2");
}

#[tokio::test]
async fn get_unknown_customer_is_404_plain_text() {
    let reply = call(routes::build_router(make_state()), get("/customers/99")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(&reply.body[..], b"Could not find Customer: 99");
    assert!(
        reply
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("text/plain")),
        "content-type: {:?}",
        reply.content_type
    );
}

// ---------------------------------------------------------------------------
// POST /customers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_location() {
    let st = make_state();
    let body = serde_json::json!({
        "firstName": "Maria",
        "lastName": "Quiteria",
        "birthDate": "27-07-1792"
    });
    let reply = call(
        routes::build_router(Arc::clone(&st)),
        with_json("POST", "/customers", body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);

    let json = parse_json(&reply.body);
    assert_eq!(json["id"], 3, "ids continue after the seeded rows");
    assert_eq!(json["birthDate"], "27-07-1792");
    assert_eq!(reply.location.as_deref(), Some("/customers/3"));

    let fetched = call(routes::build_router(st), get("/customers/3")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(parse_json(&fetched.body)["firstName"], "Maria");
}

#[tokio::test]
async fn create_with_malformed_date_is_rejected() {
    let body = serde_json::json!({
        "firstName": "Maria",
        "lastName": "Quiteria",
        "birthDate": "not a date"
    });
    let reply = call(
        routes::build_router(make_state()),
        with_json("POST", "/customers", body),
    )
    .await;
    assert!(reply.status.is_client_error(), "got {}", reply.status);
}

// ---------------------------------------------------------------------------
// PUT /customers/:id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn replace_existing_changes_first_name_only() {
    let st = make_state();
    let body = serde_json::json!({
        "firstName": "Joaquim_changed",
        "lastName": "Jose",
        "birthDate": "12-11-1746"
    });
    let reply = call(
        routes::build_router(Arc::clone(&st)),
        with_json("PUT", "/customers/1", body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.location.as_deref(), Some("/customers/1"));

    let json = parse_json(&reply.body);
    assert_eq!(json["id"], 1);
    assert_eq!(json["firstName"], "Joaquim_changed");
    assert_eq!(json["lastName"], "Jose");
    assert_eq!(json["birthDate"], "12-11-1746");

    let list = call(routes::build_router(st), get("/customers")).await;
    let json = parse_json(&list.body);
    assert_eq!(
        json["_embedded"]["customerList"].as_array().map(Vec::len),
        Some(2),
        "replace must not add a record"
    );
}

#[tokio::test]
async fn replace_unknown_id_creates_under_that_id() {
    let st = make_state();
    let body = serde_json::json!({
        "firstName": "Tiradentes",
        "lastName": "Xavier",
        "birthDate": "1746-11-12"
    });
    let reply = call(
        routes::build_router(Arc::clone(&st)),
        with_json("PUT", "/customers/42", body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.location.as_deref(), Some("/customers/42"));
    assert_eq!(parse_json(&reply.body)["birthDate"], "12-11-1746");

    let fetched = call(routes::build_router(st), get("/customers/42")).await;
    assert_eq!(fetched.status, StatusCode::OK);
}

#[tokio::test]
async fn replace_with_negative_id_is_400_and_stores_nothing() {
    let st = make_state();
    let body = serde_json::json!({
        "firstName": "Joaquim",
        "lastName": "Jose",
        "birthDate": "12-11-1746"
    });
    let reply = call(
        routes::build_router(Arc::clone(&st)),
        with_json("PUT", "/customers/-1", body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(&reply.body[..], b"Invalid id: -1");

    let list = call(routes::build_router(st), get("/customers")).await;
    assert_eq!(
        parse_json(&list.body)["_embedded"]["customerList"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
async fn body_id_is_ignored_on_replace() {
    let body = serde_json::json!({
        "id": 7,
        "firstName": "Joaquim",
        "lastName": "Jose",
        "birthDate": "12-11-1746"
    });
    let reply = call(
        routes::build_router(make_state()),
        with_json("PUT", "/customers/1", body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(parse_json(&reply.body)["id"], 1);
}

// ---------------------------------------------------------------------------
// DELETE /customers/:id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_is_204_and_idempotent() {
    let st = make_state();

    let first = call(routes::build_router(Arc::clone(&st)), delete("/customers/1")).await;
    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert!(first.body.is_empty());

    let second = call(routes::build_router(Arc::clone(&st)), delete("/customers/1")).await;
    assert_eq!(second.status, StatusCode::NO_CONTENT);
    assert!(second.body.is_empty());

    let gone = call(routes::build_router(st), get("/customers/1")).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
