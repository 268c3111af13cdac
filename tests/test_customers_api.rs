//! End-to-end API test: serve the router in-process and drive it over HTTP.
//!
//! Uses the in-memory store, so no database is required.

use customer_update_service::infra::legacy::{ExternalValidator, SimulatedLegacyValidator, StubLegacyValidator};
use customer_update_service::{transport, AppConfig, CustomerService, InMemoryCustomerStore};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start(store: InMemoryCustomerStore, validator: Arc<dyn ExternalValidator>) -> Self {
        let config = Arc::new(AppConfig {
            environment: "Test".to_string(),
            ..AppConfig::default()
        });
        let customers = Arc::new(CustomerService::new(
            Arc::new(store),
            validator,
            Some(Duration::from_secs(5)),
        ));
        let router = transport::http::create_router(transport::http::AppState { customers, config });

        // Bind to an ephemeral port to avoid conflicts with a running server.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn customer(name: &str, tax_id: &str) -> Value {
    json!({
        "name": name,
        "phone": "+1 555-010-9999",
        "email": "someone@example.com",
        "address": "221B Baker Street, London",
        "taxId": tax_id
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_customer_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start(InMemoryCustomerStore::new(), Arc::new(StubLegacyValidator)).await;
    let client = &server.client;

    // --- CREATE ---
    let resp = client
        .post(server.url("/customers"))
        .json(&customer("Sherlock Holmes", "12345678901"))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let created: Value = resp.json().await?;
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Customer created successfully");
    assert_eq!(created["data"]["status"], "Active");
    assert_eq!(created["data"]["createdAt"], created["data"]["updatedAt"]);
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(location, Some(format!("/customers/{}", id)));

    // --- TAX ID CHECK ---
    let taken = client
        .get(server.url("/customers/validate-tax-id/12345678901"))
        .send()
        .await?;
    assert_eq!(taken.status(), 400);
    let taken: Value = taken.json().await?;
    assert_eq!(taken["success"], false);
    assert!(taken["error"].as_str().unwrap().contains("already exists"));

    let free = client
        .get(server.url("/customers/validate-tax-id/10987654321"))
        .send()
        .await?;
    assert_eq!(free.status(), 200);
    assert_eq!(free.json::<Value>().await?["success"], true);

    // --- GET / LIST ---
    let got: Value = client
        .get(server.url(&format!("/customers/{}", id)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(got["data"]["taxId"], "12345678901");

    let list: Value = client.get(server.url("/customers")).send().await?.json().await?;
    assert_eq!(list["success"], true);
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    // --- UPDATE (same tax id keeps working) ---
    let resp = client
        .put(server.url(&format!("/customers/{}", id)))
        .json(&customer("Sherlock H. Holmes", "12345678901"))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await?;
    assert_eq!(updated["data"]["name"], "Sherlock H. Holmes");
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);

    // --- DELETE twice ---
    let first = client
        .delete(server.url(&format!("/customers/{}", id)))
        .send()
        .await?;
    assert_eq!(first.status(), 200);
    assert_eq!(first.json::<Value>().await?["success"], true);

    let second = client
        .delete(server.url(&format!("/customers/{}", id)))
        .send()
        .await?;
    assert_eq!(second.status(), 404);
    let second: Value = second.json().await?;
    assert_eq!(
        second["error"],
        format!("Customer with ID {} does not exist", id)
    );

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failure_envelopes() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start(
        InMemoryCustomerStore::with_demo_data(),
        Arc::new(StubLegacyValidator),
    )
    .await;
    let client = &server.client;

    // Field validation collects every violation.
    let resp = client
        .post(server.url("/customers"))
        .json(&json!({ "name": "X", "address": "here", "taxId": "12345" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);

    // Missing customer.
    let resp = client.get(server.url("/customers/424242")).send().await?;
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.json::<Value>().await?["error"],
        "Customer with ID 424242 does not exist"
    );

    // Update onto another customer's tax id (demo 1001 holds 12345678901).
    let resp = client
        .put(server.url("/customers/1002"))
        .json(&customer("Jane Smith", "12345678901"))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Tax ID already exists");
    let jane: Value = client
        .get(server.url("/customers/1002"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(jane["data"]["taxId"], "23456789012");

    // Update of a missing id.
    let resp = client
        .put(server.url("/customers/9999"))
        .json(&customer("Nobody Atall", "55555555555"))
        .send()
        .await?;
    assert_eq!(resp.status(), 404);

    // Non-numeric id and non-JSON body.
    let resp = client.get(server.url("/customers/abc")).send().await?;
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.json::<Value>().await?["success"], false);

    let resp = client
        .post(server.url("/customers"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(resp.status(), 422);

    // Health.
    let health: Value = client.get(server.url("/health")).send().await?.json().await?;
    assert_eq!(health["success"], true);
    assert_eq!(health["data"]["status"], "Healthy");
    assert_eq!(health["data"]["environment"], "Test");
    assert!(health["data"]["version"].is_string());
    assert!(health["data"]["timestamp"].is_string());

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_legacy_rejection_is_surfaced() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start(
        InMemoryCustomerStore::new(),
        Arc::new(SimulatedLegacyValidator::new(Duration::ZERO)),
    )
    .await;
    let client = &server.client;

    // 98765432109 is already known to the simulated legacy system.
    let resp = client
        .post(server.url("/customers"))
        .json(&customer("Mycroft Holmes", "98765432109"))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Legacy validation failed");
    assert_eq!(body["errors"], json!(["Tax ID already exists in database"]));

    let list: Value = client.get(server.url("/customers")).send().await?.json().await?;
    assert!(list["data"].as_array().unwrap().is_empty());

    Ok(())
}
