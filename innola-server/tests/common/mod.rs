#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Method, Request, StatusCode, header};
use innola_server::config::BootstrapUser;
use innola_server::email::{Mailer, OutboxMailer};
use innola_server::kv::{Binding, DocumentStore, MemoryStore};
use innola_server::seed::Seeds;
use innola_server::{AppState, Config, api};
use serde_json::{Value, json};
use shared::models::{BoardMember, TaskBoard};
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "innola-test-admin";
pub const MEMBER_SECRET: &str = "test-secret-32-bytes-minimum-xx";

pub fn test_config() -> Config {
    Config {
        admin_password: ADMIN_PASSWORD.to_string(),
        member_secret: Some(MEMBER_SECRET.to_string()),
        board_pins: HashMap::from([
            ("shannon".to_string(), "101010".to_string()),
            ("erin".to_string(), "202020".to_string()),
        ]),
        bootstrap_users: vec![BootstrapUser {
            username: "admin".to_string(),
            password: "correct horse".to_string(),
            role: "admin".to_string(),
        }],
        login_rate_limit: 1000,
        ..Config::default()
    }
}

fn board_member(id: &str, name: &str, order: i64) -> BoardMember {
    BoardMember {
        id: id.to_string(),
        name: name.to_string(),
        role: "Director".to_string(),
        email: String::new(),
        bio: String::new(),
        photo: String::new(),
        photo_position: None,
        order,
        updated_at: None,
    }
}

pub fn test_seeds() -> Seeds {
    let tasks: TaskBoard = serde_json::from_value(json!({
        "phases": [
            { "id": "phase_1", "title": "Launch", "description": "", "tasks": [
                { "id": "task_1", "text": "Publish site", "owner": "tech", "done": false }
            ] },
            { "id": "phase_2", "title": "Membership", "description": "", "tasks": [] }
        ]
    }))
    .unwrap();

    Seeds {
        board: vec![
            board_member("erin", "Erin Walsh", 2),
            board_member("shannon", "Shannon Byrne", 1),
        ],
        events: serde_json::from_value(json!([{
            "id": "celtic-fest",
            "title": "Celtic Nations Festival",
            "date": "2099-03-14",
            "location": "Irish Channel",
            "description": "Music and dancing",
        }]))
        .unwrap(),
        tasks,
    }
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub outbox: Arc<OutboxMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(test_config(), Arc::new(MemoryStore::new()), OutboxMailer::new())
    }

    pub fn with_bindings(bindings: &[Binding]) -> Self {
        Self::build(
            test_config(),
            Arc::new(MemoryStore::with_bindings(bindings)),
            OutboxMailer::new(),
        )
    }

    pub fn build(config: Config, store: Arc<dyn DocumentStore>, mailer: OutboxMailer) -> Self {
        let outbox = Arc::new(mailer);
        let state = AppState::with_services(
            config,
            store,
            outbox.clone() as Arc<dyn Mailer>,
            test_seeds(),
        )
        .unwrap();
        Self {
            app: api::build_app(state.clone()),
            state,
            outbox,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(body)).await
    }
}
