#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Form, Router};
use homework_submit::{
    models::{AssignmentContext, StudentIdentity},
    services::{HttpScorerClient, MemoryCooldownStore, SubmissionGate, SubmissionService},
};
use url::Url;

/// In-process stand-in for the remote scorer: answers every POST with a fixed
/// status and body and remembers the form fields it received.
#[derive(Clone)]
pub struct FakeScorer {
    pub received: Arc<Mutex<Vec<HashMap<String, String>>>>,
    status: StatusCode,
    body: String,
}

impl FakeScorer {
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.received.lock().unwrap().clone()
    }
}

async fn score(
    State(scorer): State<FakeScorer>,
    Form(fields): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    scorer.received.lock().unwrap().push(fields);
    (scorer.status, scorer.body.clone())
}

pub async fn spawn_fake_scorer(status: StatusCode, body: &str) -> (Url, FakeScorer) {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let scorer = FakeScorer {
        received: Arc::new(Mutex::new(Vec::new())),
        status,
        body: body.to_string(),
    };

    let app = Router::new()
        .route("/macros/s/test/exec", post(score))
        .with_state(scorer.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = Url::parse(&format!("http://{}/macros/s/test/exec", addr)).unwrap();
    (url, scorer)
}

/// Endpoint on a port nobody listens on.
pub async fn dead_endpoint() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/exec", addr)).unwrap()
}

pub fn http_service(endpoint: Url, store: Arc<MemoryCooldownStore>) -> SubmissionService {
    SubmissionService::new(
        SubmissionGate::new(store, 120_000),
        Arc::new(HttpScorerClient::new(endpoint)),
    )
}

pub fn homework() -> AssignmentContext {
    AssignmentContext::new(
        "geo-9b",
        "hw3",
        4,
        ["A", "C", "B", "D"].iter().map(|s| s.to_string()).collect(),
    )
    .unwrap()
}

pub fn jane() -> StudentIdentity {
    StudentIdentity::new("Jane", "Doe").unwrap()
}
