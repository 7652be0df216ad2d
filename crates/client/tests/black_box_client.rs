use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use curdworks_client::console::{self, Command};
use curdworks_client::{ClientConfig, HttpApi, Workbench};
use curdworks_core::{CustomerId, GatewayError};
use curdworks_parties::CustomerField;
use curdworks_products::ProductField;
use curdworks_sales::{PendingField, SubmitOutcome};

/// In-memory stand-in for the back-office API.
#[derive(Clone, Default)]
struct StubApi {
    customers: Arc<Mutex<Vec<Value>>>,
    products: Arc<Mutex<Vec<Value>>>,
    orders: Arc<Mutex<Vec<Value>>>,
    fail_orders: Arc<AtomicBool>,
    posts: Arc<AtomicUsize>,
    next_id: Arc<AtomicUsize>,
}

impl StubApi {
    fn seeded() -> Self {
        let stub = Self::default();
        stub.customers
            .lock()
            .unwrap()
            .push(json!({ "_id": "C1", "name": "Alpine Deli", "email": "deli@example.com" }));
        stub.products.lock().unwrap().extend([
            json!({ "_id": "A", "name": "Emmental", "price_per_kg": 4.5, "stock_kg": 80.0, "is_active": true }),
            json!({ "_id": "B", "name": "Roquefort", "price_per_kg": 9.0, "stock_kg": 12.0, "is_active": true }),
        ]);
        stub
    }

    fn assign_id(&self, prefix: &str, mut doc: Value) -> Value {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        doc["_id"] = json!(format!("{prefix}{n}"));
        doc
    }
}

async fn list_customers(State(s): State<StubApi>) -> Json<Value> {
    Json(Value::Array(s.customers.lock().unwrap().clone()))
}

async fn create_customer(State(s): State<StubApi>, Json(body): Json<Value>) -> impl IntoResponse {
    s.posts.fetch_add(1, Ordering::SeqCst);
    let doc = s.assign_id("c", body);
    s.customers.lock().unwrap().push(doc.clone());
    (StatusCode::CREATED, Json(doc))
}

async fn list_products(State(s): State<StubApi>) -> Json<Value> {
    Json(Value::Array(s.products.lock().unwrap().clone()))
}

async fn create_product(State(s): State<StubApi>, Json(body): Json<Value>) -> impl IntoResponse {
    s.posts.fetch_add(1, Ordering::SeqCst);
    let doc = s.assign_id("p", body);
    s.products.lock().unwrap().push(doc.clone());
    (StatusCode::CREATED, Json(doc))
}

async fn list_orders(State(s): State<StubApi>) -> Json<Value> {
    Json(Value::Array(s.orders.lock().unwrap().clone()))
}

async fn create_order(State(s): State<StubApi>, Json(body): Json<Value>) -> axum::response::Response {
    s.posts.fetch_add(1, Ordering::SeqCst);
    if s.fail_orders.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }

    let total: f64 = body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|i| i["unit_price"].as_f64().unwrap_or(0.0) * i["quantity_kg"].as_f64().unwrap_or(0.0))
                .sum()
        })
        .unwrap_or(0.0);

    let mut doc = s.assign_id("o", body);
    doc["status"] = json!("pending");
    doc["total"] = json!(total);
    doc["order_date"] = json!("2026-10-16");
    s.orders.lock().unwrap().push(doc.clone());
    (StatusCode::CREATED, Json(doc)).into_response()
}

struct TestServer {
    base_url: String,
    stub: StubApi,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(stub: StubApi) -> Self {
        let app = Router::new()
            .route("/api/customers", get(list_customers).post(create_customer))
            .route("/api/products", get(list_products).post(create_product))
            .route("/api/orders", get(list_orders).post(create_order))
            .with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            stub,
            handle,
        }
    }

    fn workbench(&self) -> Workbench<HttpApi> {
        let api = HttpApi::new(&ClientConfig::new(&self.base_url)).unwrap();
        Workbench::new(api)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn fill_scenario_draft(wb: &mut Workbench<HttpApi>) {
    wb.select_customer(Some(CustomerId::new("C1")));
    wb.set_pending(PendingField::Product, "A");
    wb.set_pending(PendingField::Quantity, "2");
    wb.add_item().unwrap();
    wb.set_pending(PendingField::Product, "B");
    wb.set_pending(PendingField::Quantity, "1");
    wb.set_pending(PendingField::UnitPrice, "7.00");
    wb.add_item().unwrap();
    wb.set_notes("pickup friday");
}

#[tokio::test]
async fn compose_and_submit_order_end_to_end() {
    let srv = TestServer::spawn(StubApi::seeded()).await;
    let mut wb = srv.workbench();

    wb.refresh_all().await;
    assert_eq!(wb.customers().len(), 1);
    assert_eq!(wb.catalog().products().len(), 2);
    assert!(wb.orders().is_empty());
    assert!(!wb.can_submit());

    fill_scenario_draft(&mut wb);
    assert_eq!(wb.subtotal(), 16.0);
    assert!(wb.can_submit());

    let lines = wb.draft_lines();
    assert_eq!(lines[0].product_name, "Emmental");
    assert_eq!(lines[1].line_total, 7.0);

    let outcome = wb.submit_order().await;
    match &outcome {
        SubmitOutcome::Created { order, .. } => {
            assert_eq!(order.as_ref().unwrap().total, Some(16.0));
        }
        other => panic!("expected Created, got {other:?}"),
    }

    assert_eq!(wb.draft().item_count(), 0);
    assert!(wb.draft().customer_id().is_none());
    assert_eq!(wb.draft().notes(), "");
    assert_eq!(wb.subtotal(), 0.0);
    assert!(!wb.can_submit());
    assert_eq!(wb.notice().unwrap().text, "Order created");

    assert_eq!(wb.orders().len(), 1);
    let rows = wb.recent_orders();
    assert_eq!(rows[0].total, "16.00");
    assert_eq!(rows[0].customer, "C1");

    let sent = srv.stub.orders.lock().unwrap()[0].clone();
    assert_eq!(sent["customer_id"], json!("C1"));
    assert_eq!(sent["notes"], json!("pickup friday"));
    assert_eq!(
        sent["items"],
        json!([
            { "product_id": "A", "quantity_kg": 2.0, "unit_price": 4.5 },
            { "product_id": "B", "quantity_kg": 1.0, "unit_price": 7.0 }
        ])
    );
}

#[tokio::test]
async fn failed_submit_preserves_draft_and_retry_succeeds() {
    let srv = TestServer::spawn(StubApi::seeded()).await;
    let mut wb = srv.workbench();
    wb.refresh_all().await;
    fill_scenario_draft(&mut wb);

    srv.stub.fail_orders.store(true, Ordering::SeqCst);
    let before = wb.draft().clone();

    let outcome = wb.submit_order().await;
    match outcome {
        SubmitOutcome::Failed(GatewayError::Api(status, body)) => {
            assert_eq!(status, 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("expected Api failure, got {other:?}"),
    }
    assert_eq!(*wb.draft(), before);
    assert!(wb.notice().unwrap().is_failure());
    assert!(wb.orders().is_empty());

    srv.stub.fail_orders.store(false, Ordering::SeqCst);
    assert!(wb.submit_order().await.is_created());
    assert_eq!(wb.orders().len(), 1);
    assert_eq!(srv.stub.posts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreachable_api_is_reported_without_losing_state() {
    // Reserve a port, then close it so connections are refused.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpApi::new(&ClientConfig::new(format!("http://{}", addr))).unwrap();
    let mut wb = Workbench::new(api);

    wb.refresh_all().await;
    assert!(wb.customers().is_empty());
    assert!(matches!(wb.refresh_orders().await, Err(GatewayError::Network(_))));

    // Without a catalog the default price degrades to zero.
    wb.select_customer(Some(CustomerId::new("C1")));
    wb.set_pending(PendingField::Product, "A");
    wb.set_pending(PendingField::Quantity, "1.5");
    assert_eq!(wb.add_item().unwrap().unit_price, 0.0);

    let before = wb.draft().clone();
    let outcome = wb.submit_order().await;
    assert!(matches!(outcome, SubmitOutcome::Failed(ref e) if e.is_network()));
    assert_eq!(*wb.draft(), before);
}

#[tokio::test]
async fn customer_and_product_forms_create_and_refresh() {
    let srv = TestServer::spawn(StubApi::seeded()).await;
    let mut wb = srv.workbench();
    wb.refresh_all().await;

    wb.set_customer_field(CustomerField::Name, "Chez Marcel");
    wb.set_customer_field(CustomerField::Phone, "555-0199");
    assert!(wb.save_customer().await);
    assert_eq!(wb.notice().unwrap().text, "Customer added");
    assert_eq!(wb.customers().len(), 2);
    assert_eq!(wb.new_customer().name, "");
    let stored = srv.stub.customers.lock().unwrap()[1].clone();
    assert!(stored.get("email").is_none());

    wb.set_product_field(ProductField::Name, "Tomme");
    wb.set_product_field(ProductField::PricePerKg, "12.5");
    assert!(wb.save_product().await);
    assert_eq!(wb.notice().unwrap().text, "Product added");
    assert_eq!(wb.catalog().products().len(), 3);
    let stored = srv.stub.products.lock().unwrap()[2].clone();
    assert_eq!(stored["stock_kg"], json!(0.0));
    assert_eq!(stored["is_active"], json!(true));
}

#[tokio::test]
async fn invalid_forms_never_reach_the_api() {
    let srv = TestServer::spawn(StubApi::seeded()).await;
    let mut wb = srv.workbench();

    wb.set_product_field(ProductField::Name, "Brie");
    wb.set_product_field(ProductField::PricePerKg, "a lot");
    assert!(!wb.save_product().await);
    assert!(wb.notice().unwrap().is_failure());
    assert_eq!(wb.new_product().price_per_kg, "a lot");

    assert!(!wb.save_customer().await);
    assert!(wb.notice().unwrap().text.contains("name is required"));

    assert_eq!(srv.stub.posts.load(Ordering::SeqCst), 0);
}

async fn run(wb: &mut Workbench<HttpApi>, line: &str) -> String {
    let cmd = Command::parse(line).unwrap_or_else(|e| panic!("`{line}` did not parse: {e}"));
    console::execute(wb, cmd).await
}

#[tokio::test]
async fn console_session_composes_and_submits_order() {
    let srv = TestServer::spawn(StubApi::seeded()).await;
    let mut wb = srv.workbench();

    assert_eq!(run(&mut wb, "refresh").await, "1 customers, 2 products, 0 orders");

    let empty = run(&mut wb, "draft").await;
    assert!(empty.starts_with("customer: -"));
    assert!(empty.ends_with("items: 0\tsubtotal: $0.00\t(not ready to submit)"));

    assert_eq!(run(&mut wb, "customer C1").await, "customer: Alpine Deli (C1)");
    run(&mut wb, "product A").await;
    assert_eq!(run(&mut wb, "qty 2").await, "pending: product=A qty=2 price=-");
    let after_first = run(&mut wb, "add").await;
    assert!(after_first.contains("\n1\tEmmental\t2.00\t$4.50\t$9.00"));

    run(&mut wb, "product B").await;
    run(&mut wb, "qty 1").await;
    run(&mut wb, "price 7.00").await;
    run(&mut wb, "add").await;
    assert_eq!(run(&mut wb, "notes pickup friday").await, "notes updated");

    let full = run(&mut wb, "draft").await;
    assert!(full.starts_with("customer: Alpine Deli (C1)"));
    assert!(full.contains("\n2\tRoquefort\t1.00\t$7.00\t$7.00"));
    assert!(full.contains("\nnotes: pickup friday"));
    assert!(full.ends_with("items: 2\tsubtotal: $16.00"));

    assert_eq!(run(&mut wb, "submit").await, "Order created");

    let reset = run(&mut wb, "draft").await;
    assert_eq!(reset, "customer: -\nitems: 0\tsubtotal: $0.00\t(not ready to submit)");

    let orders = run(&mut wb, "orders").await;
    assert_eq!(orders, "DATE\tCUSTOMER\tSTATUS\tTOTAL\n2026-10-16\tC1\tpending\t$16.00");
}

#[tokio::test]
async fn console_remove_uses_one_based_line_numbers() {
    let srv = TestServer::spawn(StubApi::seeded()).await;
    let mut wb = srv.workbench();
    wb.refresh_all().await;
    fill_scenario_draft(&mut wb);

    let after = run(&mut wb, "remove 1").await;
    assert!(after.contains("\n1\tRoquefort\t1.00\t$7.00\t$7.00"));
    assert!(!after.contains("Emmental"));
    assert!(after.ends_with("items: 1\tsubtotal: $7.00"));

    // Out of range: the draft is shown unchanged.
    let unchanged = run(&mut wb, "remove 5").await;
    assert_eq!(unchanged, after);
    assert_eq!(wb.draft().item_count(), 1);
}

#[tokio::test]
async fn console_incomplete_entries_and_submits_are_no_ops() {
    let srv = TestServer::spawn(StubApi::seeded()).await;
    let mut wb = srv.workbench();
    wb.refresh_all().await;

    run(&mut wb, "product A").await;
    run(&mut wb, "qty lots").await;
    assert_eq!(run(&mut wb, "add").await, "pending: product=A qty=lots price=-");
    assert_eq!(wb.draft().item_count(), 0);

    assert_eq!(
        run(&mut wb, "submit").await,
        "select a customer and add at least one item first"
    );
    assert_eq!(srv.stub.posts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn skipped_submit_clears_previous_failure_notice() {
    let srv = TestServer::spawn(StubApi::seeded()).await;
    let mut wb = srv.workbench();
    wb.refresh_all().await;
    fill_scenario_draft(&mut wb);

    srv.stub.fail_orders.store(true, Ordering::SeqCst);
    let failed = run(&mut wb, "submit").await;
    assert!(failed.starts_with("Failed to create order:"));
    assert!(wb.notice().unwrap().is_failure());

    run(&mut wb, "customer -").await;
    assert_eq!(
        run(&mut wb, "submit").await,
        "select a customer and add at least one item first"
    );
    assert!(wb.notice().is_none());
    assert_eq!(srv.stub.posts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn console_forms_pass_pipe_separated_fields() {
    let srv = TestServer::spawn(StubApi::seeded()).await;
    let mut wb = srv.workbench();
    wb.refresh_all().await;

    assert_eq!(
        run(&mut wb, "new-customer Chez Marcel |  | 555-0199 | 3 Rue du Lac").await,
        "Customer added"
    );
    let stored = srv.stub.customers.lock().unwrap()[1].clone();
    assert_eq!(stored["name"], json!("Chez Marcel"));
    assert!(stored.get("email").is_none());
    assert_eq!(stored["phone"], json!("555-0199"));
    assert_eq!(stored["address"], json!("3 Rue du Lac"));
    assert!(run(&mut wb, "customers").await.contains("Chez Marcel\t-\t555-0199"));

    assert_eq!(run(&mut wb, "new-product Tomme | TOM-1 | 12.5 | 30").await, "Product added");
    let stored = srv.stub.products.lock().unwrap()[2].clone();
    assert_eq!(stored["sku"], json!("TOM-1"));
    assert_eq!(stored["price_per_kg"], json!(12.5));
    assert_eq!(stored["stock_kg"], json!(30.0));
    assert!(run(&mut wb, "products").await.contains("Tomme\tTOM-1\t$12.50"));

    let posts = srv.stub.posts.load(Ordering::SeqCst);
    run(&mut wb, "new-product Brie | | a lot").await;
    assert!(wb.notice().unwrap().is_failure());
    assert_eq!(wb.new_product().price_per_kg, "a lot");
    assert_eq!(srv.stub.posts.load(Ordering::SeqCst), posts);
}
