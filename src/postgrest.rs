use anyhow::{anyhow, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

use crate::auth::SessionAuth;
use crate::config::Config;

/// Thin client over the PostgREST endpoint that fronts the project tables.
#[derive(Clone)]
pub struct PostgrestClient {
    client: Client,
    rest_url: String,
    auth: SessionAuth,
}

/// `column=eq.value`
pub fn eq(value: impl Display) -> String {
    format!("eq.{}", value)
}

/// `column=gte.value`
pub fn gte(value: impl Display) -> String {
    format!("gte.{}", value)
}

/// `column=lte.value`
pub fn lte(value: impl Display) -> String {
    format!("lte.{}", value)
}

impl PostgrestClient {
    pub fn new(config: &Config, auth: SessionAuth) -> Self {
        Self {
            client: Client::new(),
            rest_url: config.rest_url(),
            auth,
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(&self, method: Method, table: &str, query: &[(&str, String)]) -> RequestBuilder {
        let req = self
            .client
            .request(method, self.table_url(table))
            .query(query);
        self.auth.authorize(req)
    }

    /// GET rows. `query` carries filters (`("user_id", eq(id))`), `select`,
    /// `order` and `limit` exactly as PostgREST expects them.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        debug!(table, ?query, "select");
        let resp = self.request(Method::GET, table, query).send().await?;
        let resp = check(resp, "GET", table).await?;
        Ok(resp.json().await?)
    }

    /// POST a single row and return it as stored.
    pub async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<T> {
        debug!(table, "insert");
        let resp = self
            .request(Method::POST, table, &[])
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let resp = check(resp, "POST", table).await?;

        let mut rows: Vec<T> = resp.json().await?;
        if rows.is_empty() {
            return Err(anyhow!("POST {} returned no rows", table));
        }
        Ok(rows.swap_remove(0))
    }

    /// PATCH every row matching `filters` and return the updated rows.
    pub async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        patch: &B,
    ) -> Result<Vec<T>> {
        if filters.is_empty() {
            return Err(anyhow!("Refusing to PATCH {} without filters", table));
        }
        debug!(table, ?filters, "update");
        let resp = self
            .request(Method::PATCH, table, filters)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        let resp = check(resp, "PATCH", table).await?;
        Ok(resp.json().await?)
    }
}

async fn check(resp: Response, method: &str, table: &str) -> Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(anyhow!("{} {} failed: {} - {}", method, table, status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PostgrestClient {
        let config = Config::new("https://demo.supabase.co", "anon", "jwt");
        let auth = SessionAuth::new(&config);
        PostgrestClient::new(&config, auth)
    }

    #[test]
    fn filters_use_postgrest_operators() {
        assert_eq!(eq("abc"), "eq.abc");
        assert_eq!(gte("2025-01-01"), "gte.2025-01-01");
        assert_eq!(lte(5), "lte.5");
    }

    #[test]
    fn builds_filtered_request() {
        let client = client();
        let req = client
            .request(
                Method::GET,
                "check_ins",
                &[
                    ("user_id", eq("u1")),
                    ("order", "checked_in_at.desc".to_string()),
                    ("limit", 4.to_string()),
                ],
            )
            .build()
            .unwrap();

        assert_eq!(
            req.url().as_str(),
            "https://demo.supabase.co/rest/v1/check_ins?user_id=eq.u1&order=checked_in_at.desc&limit=4"
        );
        assert_eq!(req.headers()["apikey"], "anon");
    }

    #[tokio::test]
    async fn update_requires_filters() {
        let patch = serde_json::json!({"onboarded": true});
        let err = client()
            .update::<_, serde_json::Value>("profiles", &[], &patch)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("without filters"));
    }
}
