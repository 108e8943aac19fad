use anyhow::{anyhow, Result};

pub const URL_VAR: &str = "SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const ACCESS_TOKEN_VAR: &str = "SUPABASE_ACCESS_TOKEN";

/// Connection settings for the backend project.
#[derive(Clone)]
pub struct Config {
    /// Project URL, e.g. `https://abc.supabase.co`, without a trailing slash.
    pub url: String,
    /// Public anon key sent as `apikey` on every request.
    pub anon_key: String,
    /// Access token of an already signed-in user.
    pub access_token: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn new(url: &str, anon_key: &str, access_token: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Read `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `SUPABASE_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("Missing environment variable {}", name))
        };

        Ok(Self::new(
            &get(URL_VAR)?,
            &get(ANON_KEY_VAR)?,
            &get(ACCESS_TOKEN_VAR)?,
        ))
    }

    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }
}
