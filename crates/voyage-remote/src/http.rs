//! Shared HTTP plumbing

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use voyage_storage::{Result, StorageError};

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub base_url: String,
    pub api_key: String,
}

impl Endpoint {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the project key as both `apikey` and bearer token
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("voyage/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| StorageError::Transport(format!("Failed to create HTTP client: {}", e)))
}

pub fn transport(e: reqwest::Error) -> StorageError {
    StorageError::Transport(e.to_string())
}

/// Turn a non-2xx response into [`StorageError::Remote`]
pub async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Remote {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Pull `message` (or `error`) out of a JSON error body, else use the raw text
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .get("message")
            .or_else(|| json.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let endpoint = Endpoint::new("https://abc.example.co/", "key");
        assert_eq!(
            endpoint.url("/rest/v1/travel_packages"),
            "https://abc.example.co/rest/v1/travel_packages"
        );
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"code":"23505","message":"duplicate key value"}"#),
            "duplicate key value"
        );
        assert_eq!(error_message(r#"{"error":"Bucket not found"}"#), "Bucket not found");
        assert_eq!(error_message(" Bad Gateway \n"), "Bad Gateway");
    }
}
