use rd_catalog::api::handlers::AppState;
use rd_catalog::api::routes::build_app;
use rd_catalog::seed::load_seed_data;
use rd_catalog::store::{EditSessionCache, MemoryStore};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

// Test client wrapper for making API calls as a given actor
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        actor: Option<(&str, &str)>,
    ) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some((name, role)) = actor {
            builder = builder.header("x-user-name", name).header("x-user-role", role);
        }
        builder
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.request(reqwest::Method::GET, path, None).send().await
    }

    async fn post(&self, path: &str, actor: (&str, &str)) -> reqwest::Result<reqwest::Response> {
        self.request(reqwest::Method::POST, path, Some(actor)).send().await
    }

    async fn patch(
        &self,
        path: &str,
        actor: (&str, &str),
        json: Value,
    ) -> reqwest::Result<reqwest::Response> {
        self.request(reqwest::Method::PATCH, path, Some(actor))
            .json(&json)
            .send()
            .await
    }

    async fn delete(&self, path: &str, actor: (&str, &str)) -> reqwest::Result<reqwest::Response> {
        self.request(reqwest::Method::DELETE, path, Some(actor)).send().await
    }
}

const FACULTY: (&str, &str) = ("Dr. Meera Iyer", "faculty");
const OTHER_FACULTY: (&str, &str) = ("Dr. Arjun Nair", "faculty");
const STUDENT: (&str, &str) = ("Ravi Kumar", "student");

async fn spawn_server() -> TestClient {
    let store = Arc::new(MemoryStore::new());
    load_seed_data(&*store).await.expect("Failed to seed store");
    let state = Arc::new(AppState::new(store, EditSessionCache::default(), 2023));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, build_app(state))
            .await
            .expect("Server error");
    });

    TestClient::new(format!("http://{}", address))
}

async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.expect("Response was not JSON")
}

#[tokio::test]
async fn test_funding_edit_session_workflow() {
    let client = spawn_server().await;

    // 1. Committed ledger before editing
    let ledger = json_body(client.get("/patents/pat-001/funding").await.unwrap()).await;
    assert_eq!(ledger["steps"].as_array().unwrap().len(), 3);
    assert_eq!(ledger["aggregate"]["percentage"], 54);

    // 2. A student is turned away before any session exists
    let response = client
        .post("/patents/pat-001/funding/sessions", STUDENT)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // 3. Faculty enters edit mode
    let response = client
        .post("/patents/pat-001/funding/sessions", FACULTY)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let session = json_body(response).await;
    assert_eq!(session["mode"], "editing");
    let session_id = session["session_id"].as_str().unwrap().to_string();

    // Reopening by the same actor resumes; another editor is locked out
    let resumed = json_body(
        client
            .post("/patents/pat-001/funding/sessions", FACULTY)
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(resumed["session_id"], session_id.as_str());
    let response = client
        .post("/patents/pat-001/funding/sessions", OTHER_FACULTY)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Knowing the session id does not let another editor touch it
    let write_paths = [
        format!("/funding-sessions/{}/steps", session_id),
        format!("/funding-sessions/{}/commit", session_id),
    ];
    for path in &write_paths {
        let response = client.post(path, OTHER_FACULTY).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
    let response = client
        .delete(&format!("/funding-sessions/{}", session_id), OTHER_FACULTY)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let view = json_body(
        client
            .get(&format!("/funding-sessions/{}", session_id))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(view["mode"], "editing");
    assert_eq!(view["steps"].as_array().unwrap().len(), 3);

    // 4. Add a step and fill it in
    let view = json_body(
        client
            .post(&format!("/funding-sessions/{}/steps", session_id), FACULTY)
            .await
            .unwrap(),
    )
    .await;
    let steps = view["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[3]["name"], "New Step");
    let new_step = steps[3]["id"].as_str().unwrap().to_string();

    let step_path = format!("/funding-sessions/{}/steps/{}", session_id, new_step);
    client
        .patch(&step_path, FACULTY, json!({"field": "planned", "value": "70000"}))
        .await
        .unwrap();
    let view = json_body(
        client
            .patch(&step_path, FACULTY, json!({"field": "spent", "value": "75000"}))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(view["aggregate"]["total_budget"], 300000.0);
    assert_eq!(view["aggregate"]["amount_spent"], 200000.0);
    assert_eq!(view["aggregate"]["percentage"], 67);

    // Invalid input is rejected inline and changes nothing
    let response = client
        .patch(&step_path, FACULTY, json!({"field": "spent", "value": "lots"}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // 5. Delete the first step by id; the new step keeps its identity
    let first_step = steps[0]["id"].as_str().unwrap().to_string();
    let view = json_body(
        client
            .delete(
                &format!("/funding-sessions/{}/steps/{}", session_id, first_step),
                FACULTY,
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(view["steps"].as_array().unwrap().len(), 3);
    assert_eq!(view["steps"][2]["id"], new_step.as_str());
    assert_eq!(view["steps"][2]["spent"], 75000.0);

    // Master ledger is untouched until "Done"
    let ledger = json_body(client.get("/patents/pat-001/funding").await.unwrap()).await;
    assert_eq!(ledger["steps"].as_array().unwrap().len(), 3);
    assert_eq!(ledger["steps"][0]["id"], first_step.as_str());

    // 6. Done commits the working copy
    let response = client
        .post(&format!("/funding-sessions/{}/commit", session_id), FACULTY)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let committed = json_body(response).await;
    assert_eq!(committed["aggregate"]["total_budget"], 250000.0);

    let ledger = json_body(client.get("/patents/pat-001/funding").await.unwrap()).await;
    assert_eq!(ledger["steps"], committed["steps"]);

    // The session is gone once committed
    let response = client
        .get(&format!("/funding-sessions/{}", session_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_closing_a_session_discards_edits() {
    let client = spawn_server().await;
    let before = json_body(client.get("/patents/pat-002/funding").await.unwrap()).await;

    let session = json_body(
        client
            .post("/patents/pat-002/funding/sessions", FACULTY)
            .await
            .unwrap(),
    )
    .await;
    let session_id = session["session_id"].as_str().unwrap().to_string();

    client
        .post(&format!("/funding-sessions/{}/steps", session_id), FACULTY)
        .await
        .unwrap();

    let response = client
        .delete(&format!("/funding-sessions/{}", session_id), FACULTY)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let closed = json_body(response).await;
    assert_eq!(closed["mode"], "viewing");

    let after = json_body(client.get("/patents/pat-002/funding").await.unwrap()).await;
    assert_eq!(before, after);

    // Another editor can now open the ledger
    let response = client
        .post("/patents/pat-002/funding/sessions", OTHER_FACULTY)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_over_budget_ledger_is_reported() {
    let client = spawn_server().await;
    let ledger = json_body(client.get("/patents/pat-002/funding").await.unwrap()).await;

    // 57000 of 100000 overall, though the first step alone is over budget
    assert_eq!(ledger["aggregate"]["percentage"], 57);
    assert_eq!(ledger["aggregate"]["over_budget"], false);
    assert!(ledger["steps"][0]["spent"].as_f64().unwrap() > ledger["steps"][0]["planned"].as_f64().unwrap());
}
