//! Shared harness: serves the application on an ephemeral port backed by
//! the in-memory store.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;

use blog_cms::config::BlogConfig;
use blog_cms::routing;
use blog_cms::store::{AuthorDeletePolicy, MemoryStore};
use serde_json::{Value, json};

/// A running server and a client that does not follow redirects.
pub struct TestServer {
    /// `http://127.0.0.1:<port>`
    pub base: String,
    /// HTTP client.
    pub client: reqwest::Client,
}

/// Starts the application with the default configuration.
pub async fn spawn() -> TestServer {
    spawn_with(AuthorDeletePolicy::Cascade).await
}

/// Starts the application with the given author delete policy.
pub async fn spawn_with(policy: AuthorDeletePolicy) -> TestServer {
    let config = BlogConfig {
        author_delete_policy: policy,
        ..BlogConfig::default()
    };
    let store = Arc::new(MemoryStore::new(policy));
    let Ok(app) = routing::app(store, &config) else {
        panic!("application failed to build");
    };
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let Ok(client) = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
    else {
        panic!("failed to build client");
    };
    TestServer {
        base: format!("http://{addr}"),
        client,
    }
}

impl TestServer {
    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Sends a `GET`.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        let Ok(response) = self.client.get(self.url(path)).send().await else {
            panic!("GET {path} failed");
        };
        response
    }

    /// Sends a JSON body with `method`.
    pub async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
    ) -> reqwest::Response {
        let Ok(response) = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
        else {
            panic!("request to {path} failed");
        };
        response
    }

    /// Sends a `DELETE`.
    pub async fn delete(&self, path: &str) -> reqwest::Response {
        let Ok(response) = self.client.delete(self.url(path)).send().await else {
            panic!("DELETE {path} failed");
        };
        response
    }

    /// Submits an url-encoded form.
    pub async fn submit_form(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        let Ok(response) = self.client.post(self.url(path)).form(fields).send().await else {
            panic!("form submit to {path} failed");
        };
        response
    }

    /// Creates an author through the API and returns its JSON.
    pub async fn create_author(&self, first: &str, last: &str) -> Value {
        let body = json!({
            "first_name": first,
            "last_name": last,
            "email": format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        });
        let response = self.send_json(reqwest::Method::POST, "/authors/", &body).await;
        assert_eq!(response.status(), 201, "author creation failed");
        json_body(response).await
    }

    /// Creates a post through the API and returns its JSON.
    pub async fn create_post(&self, title: &str, content: &str, author: &Value) -> Value {
        let body = json!({"title": title, "content": content, "author": author["id"]});
        let response = self.send_json(reqwest::Method::POST, "/posts/", &body).await;
        assert_eq!(response.status(), 201, "post creation failed");
        json_body(response).await
    }
}

/// Decodes a JSON response body.
pub async fn json_body(response: reqwest::Response) -> Value {
    let Ok(value) = response.json::<Value>().await else {
        panic!("response body is not JSON");
    };
    value
}

/// Reads a response body as text.
pub async fn text_body(response: reqwest::Response) -> String {
    let Ok(text) = response.text().await else {
        panic!("response body is not text");
    };
    text
}

/// `Location` header of a redirect.
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
