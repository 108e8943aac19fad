use anyhow::{anyhow, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Config;

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
}

/// Credentials of a signed-in user, attached to every request.
///
/// Signing in and refreshing happen elsewhere; this only carries the token.
#[derive(Clone)]
pub struct SessionAuth {
    client: Client,
    auth_url: String,
    anon_key: String,
    access_token: String,
    user_id: Arc<Mutex<Option<String>>>,
}

impl SessionAuth {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            auth_url: config.auth_url(),
            anon_key: config.anon_key.clone(),
            access_token: config.access_token.clone(),
            user_id: Arc::new(Mutex::new(None)),
        }
    }

    /// Add the `apikey` and bearer headers.
    pub fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
    }

    /// Id of the user the token belongs to. Looked up once, then cached.
    pub async fn get_user_id(&self) -> Result<String> {
        {
            let cached = self.user_id.lock().await;
            if let Some(ref id) = *cached {
                return Ok(id.clone());
            }
        }

        let url = format!("{}/user", self.auth_url);
        let resp = self.authorize(self.client.get(&url)).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Failed to resolve user: {} - {}", status, body));
        }

        let user: UserResponse = resp.json().await?;
        debug!(user_id = %user.id, "resolved session user");

        *self.user_id.lock().await = Some(user.id.clone());
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn attaches_api_key_and_bearer() {
        let config = Config::new("https://demo.supabase.co", "anon", "jwt");
        let auth = SessionAuth::new(&config);

        let req = auth
            .authorize(Client::new().get("https://demo.supabase.co/rest/v1/profiles"))
            .build()
            .unwrap();

        assert_eq!(req.headers()["apikey"], "anon");
        assert_eq!(req.headers()["authorization"], "Bearer jwt");
    }

    #[tokio::test]
    async fn cached_user_id_skips_lookup() {
        let config = Config::new("http://127.0.0.1:9", "anon", "jwt");
        let auth = SessionAuth::new(&config);
        *auth.user_id.lock().await = Some("user-1".to_string());

        assert_eq!(auth.get_user_id().await.unwrap(), "user-1");
    }
}
