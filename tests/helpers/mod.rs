use notekeep::infrastructure::NotesApi;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Test fixture: a local HTTP server standing in for the notes service
#[allow(dead_code)]
pub struct TestServer {
    pub server: MockServer,
    pub api: NotesApi,
}

impl TestServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let api = NotesApi::new(&server.uri()).expect("mock server URI should be valid");
        Self { server, api }
    }

    /// Number of requests the server has seen so far
    #[allow(dead_code)]
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

/// Note JSON as the mock service returns it
#[allow(dead_code)]
pub fn note_json(id: u32, title: &str) -> Value {
    json!({
        "id": id.to_string(),
        "createdAt": format!("2025-06-15T10:00:{:02}.000Z", id % 60),
        "title": title,
        "content": format!("Content of {title}"),
        "color": "#F8F9FA",
        "name": "mock-name",
        "avatar": "https://example.com/avatar.png"
    })
}

#[allow(dead_code)]
pub fn notes_json(count: u32) -> Value {
    Value::Array((1..=count).map(|i| note_json(i, &format!("Note {i}"))).collect())
}
