//! API integration tests

use bookshelf_server::{api, AppConfig, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Start a fresh server on an ephemeral port and return its base URL
async fn spawn_server() -> String {
    let app = api::create_router(AppState::new(AppConfig::default()));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{}", addr)
}

fn dune() -> Value {
    json!({
        "name": "Dune",
        "year": 1965,
        "author": "Frank Herbert",
        "summary": "Desert planet politics",
        "publisher": "Chilton",
        "pageCount": 412,
        "readPage": 412,
        "reading": false
    })
}

fn book(name: &str, publisher: &str, page_count: i64, read_page: i64, reading: bool) -> Value {
    json!({
        "name": name,
        "year": 2000,
        "author": "Someone",
        "summary": "...",
        "publisher": publisher,
        "pageCount": page_count,
        "readPage": read_page,
        "reading": reading
    })
}

async fn create(client: &Client, base: &str, body: &Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}/books", base))
        .json(body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body: Value = response.json().await.expect("Failed to parse response");
    (status, body)
}

async fn get_json(client: &Client, url: String) -> (StatusCode, Value) {
    let response = client.get(url).send().await.expect("Failed to send request");
    let status = response.status();
    let body: Value = response.json().await.expect("Failed to parse response");
    (status, body)
}

async fn list_ids(client: &Client, base: &str, query: &str) -> Vec<String> {
    let (status, body) = get_json(client, format!("{}/books{}", base, query)).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["books"]
        .as_array()
        .expect("books is not an array")
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_server().await;
    let (status, body) = get_json(&Client::new(), format!("{}/health", base)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["books"], 0);
}

#[tokio::test]
async fn test_create_get_delete_scenario() {
    let base = spawn_server().await;
    let client = Client::new();

    let (status, body) = create(&client, &base, &dune()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert!(body["message"].is_string());
    let id = body["data"]["bookId"].as_str().expect("No book ID").to_string();
    assert_eq!(id.len(), 16);

    let (status, body) = get_json(&client, format!("{}/books/{}", base, id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let record = &body["data"]["book"];
    assert_eq!(record["id"], id.as_str());
    assert_eq!(record["name"], "Dune");
    assert_eq!(record["year"], 1965);
    assert_eq!(record["pageCount"], 412);
    assert_eq!(record["finished"], true);
    assert_eq!(record["reading"], false);
    assert_eq!(record["insertedAt"], record["updatedAt"]);

    let response = client
        .delete(format!("{}/books/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert!(body.get("data").is_none());

    let (status, body) = get_json(&client, format!("{}/books/{}", base, id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn test_create_missing_name() {
    let base = spawn_server().await;
    let client = Client::new();

    let (status, body) = create(&client, &base, &book("", "P", 100, 50, false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Failed to add book. Please provide the book name");

    // Absent name, with an invalid page range too: the name check wins
    let (status, body) = create(&client, &base, &json!({"pageCount": 1, "readPage": 5})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to add book. Please provide the book name");

    assert!(list_ids(&client, &base, "").await.is_empty());
}

#[tokio::test]
async fn test_create_read_page_exceeds_page_count() {
    let base = spawn_server().await;
    let client = Client::new();

    let (status, body) = create(&client, &base, &book("X", "P", 100, 150, false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Failed to add book. readPage must not be greater than pageCount"
    );
    assert!(list_ids(&client, &base, "").await.is_empty());
}

#[tokio::test]
async fn test_malformed_body() {
    let base = spawn_server().await;
    let response = Client::new()
        .post(format!("{}/books", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_create_with_null_fields() {
    let base = spawn_server().await;
    let client = Client::new();

    let (status, body) = create(
        &client,
        &base,
        &json!({"name": "Dune", "publisher": null, "pageCount": 10, "readPage": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["bookId"].as_str().expect("No book ID").to_string();

    let (status, body) = get_json(&client, format!("{}/books/{}", base, id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["book"]["publisher"], "");
    assert_eq!(body["data"]["book"]["finished"], false);
}

#[tokio::test]
async fn test_malformed_query() {
    let base = spawn_server().await;
    let response = Client::new()
        .get(format!("{}/books?reading=1&reading=0", base))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_list_projection_and_order() {
    let base = spawn_server().await;
    let client = Client::new();

    let mut ids = Vec::new();
    for (name, publisher) in [("Dune", "Chilton"), ("Emma", "Murray"), ("Dune Messiah", "Putnam")] {
        let (_, body) = create(&client, &base, &book(name, publisher, 10, 0, false)).await;
        ids.push(body["data"]["bookId"].as_str().unwrap().to_string());
    }

    let (status, body) = get_json(&client, format!("{}/books", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 3);
    for (entry, id) in books.iter().zip(&ids) {
        assert_eq!(entry["id"], id.as_str());
        let keys: Vec<_> = entry.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
    }
    assert_eq!(books[1]["publisher"], "Murray");
}

#[tokio::test]
async fn test_list_filters() {
    let base = spawn_server().await;
    let client = Client::new();

    let mut ids = Vec::new();
    for body in [
        book("Dune", "A", 10, 10, false),
        book("Dune Messiah", "B", 10, 3, true),
        book("Emma", "C", 10, 10, true),
    ] {
        let (_, body) = create(&client, &base, &body).await;
        ids.push(body["data"]["bookId"].as_str().unwrap().to_string());
    }

    assert_eq!(list_ids(&client, &base, "?name=dune").await, vec![ids[0].clone(), ids[1].clone()]);
    assert_eq!(list_ids(&client, &base, "?name=MESSIAH").await, vec![ids[1].clone()]);
    assert_eq!(list_ids(&client, &base, "?reading=1").await, vec![ids[1].clone(), ids[2].clone()]);
    assert_eq!(list_ids(&client, &base, "?reading=0").await, vec![ids[0].clone()]);
    assert_eq!(list_ids(&client, &base, "?finished=1").await, vec![ids[0].clone(), ids[2].clone()]);
    assert_eq!(
        list_ids(&client, &base, "?name=dune&finished=0&reading=1").await,
        vec![ids[1].clone()]
    );
    assert!(list_ids(&client, &base, "?name=tolkien").await.is_empty());
}

#[tokio::test]
async fn test_update_book() {
    let base = spawn_server().await;
    let client = Client::new();

    let (_, body) = create(&client, &base, &book("Dune", "Chilton", 412, 10, true)).await;
    let id = body["data"]["bookId"].as_str().unwrap().to_string();
    let (_, before) = get_json(&client, format!("{}/books/{}", base, id)).await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = client
        .put(format!("{}/books/{}", base, id))
        .json(&book("Dune Messiah", "Putnam", 256, 256, false))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Book updated successfully");

    let (_, after) = get_json(&client, format!("{}/books/{}", base, id)).await;
    let (before, after) = (&before["data"]["book"], &after["data"]["book"]);
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["insertedAt"], before["insertedAt"]);
    assert_ne!(after["updatedAt"], before["updatedAt"]);
    assert_eq!(after["name"], "Dune Messiah");
    assert_eq!(after["publisher"], "Putnam");
    assert_eq!(after["finished"], true);
    assert_eq!(after["reading"], false);
}

#[tokio::test]
async fn test_update_errors() {
    let base = spawn_server().await;
    let client = Client::new();

    let (_, body) = create(&client, &base, &dune()).await;
    let id = body["data"]["bookId"].as_str().unwrap().to_string();

    let cases = [
        (id.as_str(), book("", "P", 1, 1, false), StatusCode::BAD_REQUEST,
            "Failed to update book. Please provide the book name"),
        (id.as_str(), book("X", "P", 1, 2, false), StatusCode::BAD_REQUEST,
            "Failed to update book. readPage must not be greater than pageCount"),
        // Field validation comes before the id lookup
        ("missing", book("", "P", 1, 1, false), StatusCode::BAD_REQUEST,
            "Failed to update book. Please provide the book name"),
        ("missing", book("X", "P", 1, 1, false), StatusCode::NOT_FOUND,
            "Failed to update book. Id not found"),
    ];

    for (target, payload, expected_status, expected_message) in cases {
        let response = client
            .put(format!("{}/books/{}", base, target))
            .json(&payload)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), expected_status);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], expected_message);
    }

    let (_, body) = get_json(&client, format!("{}/books/{}", base, id)).await;
    assert_eq!(body["data"]["book"]["name"], "Dune");
}

#[tokio::test]
async fn test_delete_missing_and_order() {
    let base = spawn_server().await;
    let client = Client::new();

    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let (_, body) = create(&client, &base, &book(name, "P", 1, 0, false)).await;
        ids.push(body["data"]["bookId"].as_str().unwrap().to_string());
    }

    let response = client
        .delete(format!("{}/books/{}", base, ids[1]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{}/books/{}", base, ids[1]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Failed to delete book. Id not found");

    assert_eq!(list_ids(&client, &base, "").await, vec![ids[0].clone(), ids[2].clone()]);
}

#[tokio::test]
async fn test_openapi_document() {
    let base = spawn_server().await;
    let (status, body) = get_json(&Client::new(), format!("{}/api-docs/openapi.json", base)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books"].is_object());
    assert!(body["paths"]["/books/{id}"].is_object());
}
