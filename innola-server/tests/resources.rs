mod common;

use std::sync::Arc;

use axum::body::Body;
use common::{ADMIN_PASSWORD, TestApp, test_config};
use http::{Method, Request, StatusCode, header};
use innola_server::Config;
use innola_server::email::OutboxMailer;
use innola_server::kv::{Binding, DocumentStore, MemoryStore};
use serde_json::json;

// ========== Health / fallback ==========

#[tokio::test]
async fn test_health_and_unknown_route() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

// ========== Admin login ==========

#[tokio::test]
async fn test_admin_login() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/auth", json!({ "username": " Admin ", "password": "correct horse" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["apiToken"], ADMIN_PASSWORD);

    let (status, wrong_password) = app
        .post("/api/auth", json!({ "username": "admin", "password": "battery" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown_user) = app
        .post("/api/auth", json!({ "username": "nobody", "password": "correct horse" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);

    let (status, body) = app.post("/api/auth", json!({ "username": "admin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username and password are required");
}

#[tokio::test]
async fn test_login_rate_limit() {
    let config = Config {
        login_rate_limit: 2,
        ..test_config()
    };
    let app = TestApp::build(config, Arc::new(MemoryStore::new()), OutboxMailer::new());
    let attempt = json!({ "username": "admin", "password": "nope" });

    for _ in 0..2 {
        let (status, _) = app.post("/api/auth", attempt.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _) = app.post("/api/auth", attempt).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // other routes keep their own budget
    let (status, _) = app
        .post("/api/members/login", json!({ "username": "x", "pin": "1" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ========== Board ==========

#[tokio::test]
async fn test_board_roster_seeded_and_sorted() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/board").await;
    assert_eq!(status, StatusCode::OK);
    let members = body["members"].as_array().unwrap();
    assert_eq!(members[0]["id"], "shannon");
    assert_eq!(members[1]["id"], "erin");
    assert!(body.get("source").is_none());

    let unbound = TestApp::with_bindings(&[]);
    let (status, body) = unbound.get("/api/board").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "default");
    assert_eq!(body["members"][0]["id"], "shannon");
}

#[tokio::test]
async fn test_board_pin_edits_own_record_only() {
    let app = TestApp::new();

    let (status, body) = app
        .put(
            "/api/board",
            json!({ "username": "shannon", "pin": "202020", "bio": "Not mine" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or PIN");

    let (status, body) = app
        .put(
            "/api/board",
            json!({ "username": "Shannon", "pin": "101010", "bio": "Fiddler", "name": "  " }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["bio"], "Fiddler");
    assert_eq!(body["member"]["name"], "Shannon Byrne");
    assert_eq!(body["member"]["photoPosition"], "50% 50%");
    assert!(body["member"]["updatedAt"].is_string());

    let (_, body) = app.get("/api/board").await;
    assert_eq!(body["members"][0]["bio"], "Fiddler");
    assert_eq!(body["members"][1]["bio"], "");

    let (status, _) = app.put("/api/board", json!({ "username": "shannon" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Store failures ==========

#[tokio::test]
async fn test_corrupt_document_is_store_error() {
    let store = MemoryStore::new();
    store
        .put(Binding::Events, "all_events", "{not json".to_string())
        .await
        .unwrap();
    let app = TestApp::build(test_config(), Arc::new(store), OutboxMailer::new());

    let (status, body) = app.get("/api/events").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 9002);
    assert_eq!(body["error"], "Storage error");
    assert!(body.get("details").is_none());
}

// ========== Events ==========

#[tokio::test]
async fn test_events_crud_and_split() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/events",
            json!({ "adminPassword": ADMIN_PASSWORD, "title": "Ceili", "date": "2099-05-01", "description": "Dancing" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: location");

    let mut ids = Vec::new();
    for date in ["2000-01-01", "2099-05-01"] {
        let (status, body) = app
            .post(
                "/api/events",
                json!({
                    "adminPassword": ADMIN_PASSWORD,
                    "title": format!("Ceili {date}"),
                    "date": date,
                    "location": "Parish Hall",
                    "description": "Dancing",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["event"]["id"].as_str().unwrap().to_string());
    }

    let (_, body) = app.get("/api/events").await;
    assert_eq!(body["upcoming"].as_array().unwrap().len(), 1);
    assert_eq!(body["past"][0]["date"], "2000-01-01");

    let (status, body) = app
        .put(
            "/api/events",
            json!({ "adminPassword": ADMIN_PASSWORD, "eventId": ids[1], "title": "Spring Ceili" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["title"], "Spring Ceili");
    assert_eq!(body["event"]["id"], ids[1]);

    let delete = json!({ "adminPassword": ADMIN_PASSWORD, "eventId": ids[0] });
    let (status, _) = app.delete("/api/events", delete.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.delete("/api/events", delete).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found");
}

#[tokio::test]
async fn test_events_seed_once() {
    let app = TestApp::new();
    let seed = json!({ "adminPassword": ADMIN_PASSWORD });

    let (status, body) = app.post("/api/events/seed", seed.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["count"], 1);
    assert_eq!(body["events"][0]["id"], "celtic-fest");

    let (status, body) = app.post("/api/events/seed", seed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["existingCount"], 1);
}

#[tokio::test]
async fn test_events_unbound() {
    let app = TestApp::with_bindings(&[Binding::Board]);
    let (status, body) = app.get("/api/events").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "KV not configured");

    let (status, body) = app
        .post("/api/events", json!({ "adminPassword": ADMIN_PASSWORD }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "EVENTS_KV not configured");
}

// ========== Tickets ==========

#[tokio::test]
async fn test_ticket_lifecycle() {
    let app = TestApp::new();

    let (status, _) = app
        .post("/api/tickets", json!({ "title": "x", "description": "y" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post(
            "/api/tickets",
            json!({
                "adminPassword": ADMIN_PASSWORD,
                "title": "Fix <b>printer</b>",
                "description": "Jammed",
                "priority": "high",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ticket"]["title"], "Fix &lt;b&gt;printer&lt;/b&gt;");
    assert_eq!(body["ticket"]["status"], "open");
    let first = body["ticket"]["id"].as_str().unwrap().to_string();

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "[Tech Request] Fix <b>printer</b> (High)");

    let (_, body) = app
        .post(
            "/api/tickets",
            json!({ "adminPassword": ADMIN_PASSWORD, "title": "Update site", "description": "Photos" }),
        )
        .await;
    assert_eq!(body["ticket"]["priority"], "medium");

    let (status, body) = app
        .put(
            "/api/tickets",
            json!({ "adminPassword": ADMIN_PASSWORD, "ticketId": first, "addComment": { "text": "On it" } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Comment added successfully");
    assert_eq!(body["ticket"]["comments"][0]["author"], "Board Member");

    let (_, body) = app
        .put(
            "/api/tickets",
            json!({ "adminPassword": ADMIN_PASSWORD, "ticketId": first, "status": "completed" }),
        )
        .await;
    assert_eq!(body["message"], "Ticket updated successfully");

    let (_, body) = app
        .get(&format!("/api/tickets?adminPassword={ADMIN_PASSWORD}"))
        .await;
    let tickets = body["tickets"].as_array().unwrap();
    assert_eq!(tickets[0]["title"], "Update site");
    assert_eq!(tickets[1]["status"], "completed");

    let (status, _) = app
        .delete("/api/tickets", json!({ "adminPassword": ADMIN_PASSWORD, "ticketId": first }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .delete("/api/tickets", json!({ "adminPassword": ADMIN_PASSWORD, "ticketId": first }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ticket_saved_when_notification_fails() {
    let app = TestApp::build(
        test_config(),
        Arc::new(MemoryStore::new()),
        OutboxMailer::failing("provider down"),
    );
    let (status, _) = app
        .post(
            "/api/tickets",
            json!({ "adminPassword": ADMIN_PASSWORD, "title": "Wifi", "description": "Slow" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app
        .get(&format!("/api/tickets?adminPassword={ADMIN_PASSWORD}"))
        .await;
    assert_eq!(body["tickets"].as_array().unwrap().len(), 1);
}

// ========== Tasks ==========

#[tokio::test]
async fn test_task_board() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/tasks").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .get(&format!("/api/tasks?adminPassword={ADMIN_PASSWORD}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phases"][0]["tasks"][0]["id"], "task_1");

    let (status, body) = app
        .post(
            "/api/tasks",
            json!({ "adminPassword": ADMIN_PASSWORD, "phaseIndex": 0, "task": { "text": "Test form" }, "parentTaskId": "task_1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let sub = body["task"]["id"].as_str().unwrap().to_string();
    assert!(sub.starts_with("sub_"));
    assert_eq!(body["task"]["owner"], "tech");

    let (status, body) = app
        .post(
            "/api/tasks",
            json!({ "adminPassword": ADMIN_PASSWORD, "phaseIndex": 1, "task": { "text": "Roster import", "owner": "board" } }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["task"]["id"].as_str().unwrap().starts_with("task_"));

    let (status, body) = app
        .post(
            "/api/tasks",
            json!({ "adminPassword": ADMIN_PASSWORD, "phaseIndex": 7, "task": { "text": "Nowhere" } }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid phase index");

    let (status, body) = app
        .post(
            "/api/tasks",
            json!({ "adminPassword": ADMIN_PASSWORD, "phaseIndex": 0, "task": { "text": "Orphan" }, "parentTaskId": "task_x" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Parent task not found");

    let (status, body) = app
        .put(
            "/api/tasks",
            json!({ "adminPassword": ADMIN_PASSWORD, "taskId": sub, "field": "done", "value": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["done"], true);

    let (status, body) = app
        .put(
            "/api/tasks",
            json!({ "adminPassword": ADMIN_PASSWORD, "taskId": sub, "field": "id", "value": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid field");

    let (status, _) = app
        .put(
            "/api/tasks",
            json!({ "adminPassword": ADMIN_PASSWORD, "taskId": sub, "field": "done", "value": "yes" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let delete = json!({ "adminPassword": ADMIN_PASSWORD, "taskId": sub });
    let (status, body) = app.delete("/api/tasks", delete.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted");
    let (status, _) = app.delete("/api/tasks", delete).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .get(&format!("/api/tasks?adminPassword={ADMIN_PASSWORD}"))
        .await;
    assert_eq!(body["phases"][0]["tasks"][0]["subtasks"], json!([]));
    assert_eq!(body["phases"][1]["tasks"][0]["owner"], "board");
}

// ========== Village positions ==========

#[tokio::test]
async fn test_village_positions() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/village-positions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, body) = app
        .put(
            "/api/village-positions",
            json!({ "adminPassword": ADMIN_PASSWORD, "positions": { "pub": { "top": "12px" } } }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("\"pub.top\""));

    let (status, _) = app
        .put(
            "/api/village-positions",
            json!({ "adminPassword": ADMIN_PASSWORD, "positions": "nope" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let positions = json!({ "pub": { "top": "12.5%", "left": null } });
    let (status, body) = app
        .put(
            "/api/village-positions",
            json!({ "adminPassword": ADMIN_PASSWORD, "positions": positions }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Positions saved");

    let (_, body) = app.get("/api/village-positions").await;
    assert_eq!(body, positions);
}

// ========== Contact ==========

#[tokio::test]
async fn test_contact_json_and_form() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/contact",
            json!({ "name": "Mary", "email": "mary@example.ie", "message": "Hello" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("name=Sean&email=sean%40example.ie&message=Hi+there"))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);

    let boundary = "innola-boundary";
    let multipart = [("name", "Aoife"), ("email", "aoife@example.ie"), ("message", "Sent from FormData")]
        .iter()
        .map(|(field, value)| {
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n")
        })
        .collect::<String>()
        + &format!("--{boundary}--\r\n");
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].reply_to.as_deref(), Some("mary@example.ie"));
    assert_eq!(sent[1].subject, "[IN-NOLA Contact] Message from Sean");
    assert!(sent[1].text.contains("Hi there"));
    assert_eq!(sent[2].reply_to.as_deref(), Some("aoife@example.ie"));
    assert!(sent[2].text.contains("Sent from FormData"));
}

#[tokio::test]
async fn test_contact_rejections() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/contact", json!({ "name": "Mary", "email": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(
        body["details"]["fields"],
        json!({ "name": false, "email": true, "message": true })
    );

    let (status, body) = app
        .post(
            "/api/contact",
            json!({ "name": "Mary", "email": "mary-at-example", "message": "Hi" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email address");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid content type");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (_, body) = app.send(request).await;
    assert_eq!(body["error"], "Failed to parse request");

    assert!(app.outbox.sent().is_empty());
}

#[tokio::test]
async fn test_contact_mailer_failure() {
    let app = TestApp::build(
        test_config(),
        Arc::new(MemoryStore::new()),
        OutboxMailer::failing("quota exceeded"),
    );
    let (status, body) = app
        .post(
            "/api/contact",
            json!({ "name": "Mary", "email": "mary@example.ie", "message": "Hello" }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to send message. Please try again later.");
}
