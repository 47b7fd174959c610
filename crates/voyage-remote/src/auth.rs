//! Password sign-in against the hosted auth service

use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;
use voyage_storage::Result;

use crate::http::{Endpoint, build_client, check, transport};

pub struct RestAuth {
    http: Client,
    endpoint: Endpoint,
}

impl RestAuth {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            endpoint: Endpoint::new(base_url, api_key),
        })
    }

    fn token_url(&self) -> String {
        self.endpoint.url("auth/v1/token?grant_type=password")
    }

    /// `Ok(false)` when the service rejects the credentials
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<bool> {
        debug!("Signing in {email}");
        let request = self
            .http
            .post(self.token_url())
            .json(&json!({ "email": email, "password": password }));
        let response = self
            .endpoint
            .authorize(request)
            .send()
            .await
            .map_err(transport)?;
        if rejected(response.status()) {
            return Ok(false);
        }
        check(response).await?;
        Ok(true)
    }
}

fn rejected(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}
