//! End-to-end tests of the JSON API over HTTP.

#![allow(clippy::panic)]

mod common;

use blog_cms::store::AuthorDeletePolicy;
use reqwest::Method;
use serde_json::json;

use common::{json_body, spawn, spawn_with};

#[tokio::test]
async fn created_post_echoes_input_and_is_listed() {
    let server = spawn().await;
    let author = server.create_author("Ada", "Lovelace").await;
    let post = server.create_post("Hello", "First words", &author).await;

    assert!(post["id"].as_i64().is_some_and(|id| id > 0));
    assert_eq!(post["title"], "Hello");
    assert_eq!(post["content"], "First words");
    assert_eq!(post["author"], author["id"]);

    let listed = json_body(server.get("/posts/").await).await;
    assert_eq!(listed, json!([post]));
}

#[tokio::test]
async fn post_with_unknown_author_is_rejected_and_not_stored() {
    let server = spawn().await;
    let body = json!({"title": "Orphan", "content": "No one wrote this", "author": 999});
    let response = server.send_json(Method::POST, "/posts/", &body).await;
    assert_eq!(response.status(), 400);

    let error = json_body(response).await;
    assert_eq!(error["error"]["code"], 1001);
    assert_eq!(
        error["error"]["details"]["author"],
        json!(["Invalid pk \"999\" - object does not exist."])
    );

    let listed = json_body(server.get("/posts/").await).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn missing_fields_are_reported_per_field() {
    let server = spawn().await;
    let response = server
        .send_json(Method::POST, "/authors/", &json!({"first_name": "", "email": "nope"}))
        .await;
    assert_eq!(response.status(), 400);
    let details = json_body(response).await["error"]["details"].clone();
    assert_eq!(details["first_name"], json!(["This field may not be blank."]));
    assert_eq!(details["last_name"], json!(["This field is required."]));
    assert_eq!(details["email"], json!(["Enter a valid email address."]));
    assert!(details.get("phone_number").is_none());
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_not_found() {
    let server = spawn().await;
    for path in ["/posts/42/", "/authors/42/", "/posts/abc/", "/authors/0/"] {
        let response = server.get(path).await;
        assert_eq!(response.status(), 404, "{path}");
        let error = json_body(response).await;
        assert_eq!(error["error"]["code"], 2001, "{path}");
    }
    let response = server.delete("/posts/42/").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn patch_changes_only_the_supplied_field() {
    let server = spawn().await;
    let author = server.create_author("Ada", "Lovelace").await;
    let post = server.create_post("Draft", "Body text", &author).await;
    let path = format!("/posts/{}/", post["id"]);

    let response = server
        .send_json(Method::PATCH, &path, &json!({"title": "Final"}))
        .await;
    assert_eq!(response.status(), 200);
    let patched = json_body(response).await;
    assert_eq!(patched["title"], "Final");

    let fetched = json_body(server.get(&path).await).await;
    assert_eq!(fetched["title"], "Final");
    assert_eq!(fetched["content"], post["content"]);
    assert_eq!(fetched["author"], post["author"]);
    assert_eq!(fetched["id"], post["id"]);
}

#[tokio::test]
async fn put_requires_every_field() {
    let server = spawn().await;
    let author = server.create_author("Ada", "Lovelace").await;
    let post = server.create_post("Draft", "Body text", &author).await;
    let path = format!("/posts/{}/", post["id"]);

    let response = server
        .send_json(Method::PUT, &path, &json!({"title": "Only title"}))
        .await;
    assert_eq!(response.status(), 400);
    let details = json_body(response).await["error"]["details"].clone();
    assert!(details.get("content").is_some());
    assert!(details.get("author").is_some());

    let unchanged = json_body(server.get(&path).await).await;
    assert_eq!(unchanged["title"], "Draft");
}

#[tokio::test]
async fn put_without_optional_phone_keeps_it() {
    let server = spawn().await;
    let created = json_body(
        server
            .send_json(
                Method::POST,
                "/authors/",
                &json!({
                    "first_name": "Grace",
                    "last_name": "Hopper",
                    "email": "grace@example.com",
                    "phone_number": "+44 20 7946 0000"
                }),
            )
            .await,
    )
    .await;
    let path = format!("/authors/{}/", created["id"]);

    let response = server
        .send_json(
            Method::PUT,
            &path,
            &json!({"first_name": "Grace", "last_name": "Brewster", "email": "gbh@example.com"}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let replaced = json_body(response).await;
    assert_eq!(replaced["last_name"], "Brewster");
    assert_eq!(replaced["phone_number"], "+44 20 7946 0000");

    let fetched = json_body(server.get(&path).await).await;
    assert_eq!(fetched["phone_number"], "+44 20 7946 0000");

    let cleared = server
        .send_json(
            Method::PUT,
            &path,
            &json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "email": "grace@example.com",
                "phone_number": ""
            }),
        )
        .await;
    assert_eq!(json_body(cleared).await["phone_number"], "");
}

#[tokio::test]
async fn deleted_post_is_gone() {
    let server = spawn().await;
    let author = server.create_author("Ada", "Lovelace").await;
    let keep = server.create_post("Keep", "stays", &author).await;
    let drop = server.create_post("Drop", "goes", &author).await;
    let path = format!("/posts/{}/", drop["id"]);

    let response = server.delete(&path).await;
    assert_eq!(response.status(), 204);
    assert_eq!(server.get(&path).await.status(), 404);

    let listed = json_body(server.get("/posts/").await).await;
    assert_eq!(listed, json!([keep]));
}

#[tokio::test]
async fn api_lists_keep_insertion_order() {
    let server = spawn().await;
    let zoe = server.create_author("Zoe", "Adams").await;
    let alan = server.create_author("Alan", "Turing").await;
    let listed = json_body(server.get("/authors/").await).await;
    assert_eq!(listed, json!([zoe, alan]));
}

#[tokio::test]
async fn body_that_is_not_json_is_malformed() {
    let server = spawn().await;
    let Ok(response) = server
        .client
        .post(server.url("/authors/"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 400);
    let error = json_body(response).await;
    assert_eq!(error["error"]["code"], 1002);
}

#[tokio::test]
async fn deleting_an_author_cascades_to_posts_by_default() {
    let server = spawn().await;
    let ada = server.create_author("Ada", "Lovelace").await;
    let alan = server.create_author("Alan", "Turing").await;
    server.create_post("Notes", "on the engine", &ada).await;
    let other = server.create_post("Machines", "can think", &alan).await;

    let response = server.delete(&format!("/authors/{}/", ada["id"])).await;
    assert_eq!(response.status(), 204);

    let listed = json_body(server.get("/posts/").await).await;
    assert_eq!(listed, json!([other]));
}

#[tokio::test]
async fn restrict_policy_refuses_author_with_posts() {
    let server = spawn_with(AuthorDeletePolicy::Restrict).await;
    let ada = server.create_author("Ada", "Lovelace").await;
    let post = server.create_post("Notes", "on the engine", &ada).await;
    let author_path = format!("/authors/{}/", ada["id"]);

    let response = server.delete(&author_path).await;
    assert_eq!(response.status(), 409);
    assert_eq!(json_body(response).await["error"]["code"], 2002);
    assert_eq!(server.get(&author_path).await.status(), 200);

    server.delete(&format!("/posts/{}/", post["id"])).await;
    assert_eq!(server.delete(&author_path).await.status(), 204);
}

#[tokio::test]
async fn health_reports_memory_store() {
    let server = spawn().await;
    let response = server.get("/health").await;
    assert_eq!(response.status(), 200);
    let health = json_body(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["store"], "memory");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = spawn().await;
    let response = server.get("/api-docs/openapi.json").await;
    assert_eq!(response.status(), 200);
    let doc = json_body(response).await;
    assert!(doc["paths"].get("/posts/{id}/").is_some());
    assert!(doc["components"]["schemas"].get("Author").is_some());
}
