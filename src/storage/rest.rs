//! PostgREST storage implementation.
//!
//! Talks to the managed database through its REST interface:
//!
//! ```text
//! GET    /rest/v1/memorials?select=*&order=date.desc[&verified=eq.true]
//! GET    /rest/v1/memorials?select=id,name,media&or=(name.eq."…",media->>xPost.eq."…")
//! GET    /rest/v1/memorials?select=id,name,media&id=eq.<id>
//! POST   /rest/v1/memorials?on_conflict=id        (Prefer: resolution=merge-duplicates)
//! PATCH  /rest/v1/memorials?id=eq.<id>
//! DELETE /rest/v1/memorials?id=eq.<id>
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};

use crate::error::Result;
use crate::models::{MemorialRow, StoreConfig};
use crate::storage::{MemorialStore, RowPatch, Selection};
use crate::utils::http::ensure_success;

/// Store backed by a PostgREST endpoint.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    endpoint: String,
    key: String,
}

impl RestStore {
    /// Create a store for `table` under the project at `base_url`.
    pub fn new(client: Client, base_url: &str, key: impl Into<String>, table: &str) -> Result<Self> {
        let base = url::Url::parse(base_url)?;
        let endpoint = format!(
            "{}/rest/v1/{}",
            base.as_str().trim_end_matches('/'),
            table
        );

        Ok(Self {
            client,
            endpoint,
            key: key.into(),
        })
    }

    /// Create a store from configuration.
    ///
    /// Returns `Ok(None)` when the endpoint or key is missing.
    pub fn from_config(config: &StoreConfig, client: Client) -> Result<Option<Self>> {
        match config.credentials() {
            Some((url, key)) => Self::new(client, url, key, &config.table).map(Some),
            None => Ok(None),
        }
    }

    /// Table endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }
}

/// Quote a value for use inside a PostgREST logical filter.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Build the `or=(…)` filter for a duplicate lookup.
fn or_filter(name: Option<&str>, x_post: Option<&str>) -> Option<String> {
    let mut clauses = Vec::new();
    if let Some(name) = name {
        clauses.push(format!("name.eq.{}", quote(name)));
    }
    if let Some(x_post) = x_post {
        clauses.push(format!("media->>xPost.eq.{}", quote(x_post)));
    }

    (!clauses.is_empty()).then(|| format!("({})", clauses.join(",")))
}

#[async_trait]
impl MemorialStore for RestStore {
    async fn select(&self, selection: Selection<'_>) -> Result<Option<Vec<MemorialRow>>> {
        let request = match selection {
            Selection::All { verified_only } => {
                let mut query = vec![("select", "*".to_string()), ("order", "date.desc".to_string())];
                if verified_only {
                    query.push(("verified", "eq.true".to_string()));
                }
                self.request(Method::GET).query(&query)
            }
            Selection::NameOrPost { name, x_post } => {
                let Some(filter) = or_filter(name, x_post) else {
                    return Ok(Some(Vec::new()));
                };
                self.request(Method::GET)
                    .query(&[("select", "id,name,media"), ("or", filter.as_str())])
            }
            Selection::Id(id) => self
                .request(Method::GET)
                .query(&[("select", "id,name,media".to_string()), ("id", format!("eq.{}", id))]),
        };

        let response = ensure_success(request.send().await?).await?;
        let rows: Option<Vec<MemorialRow>> = response.json().await?;
        log::debug!(
            "Selected {} rows from {}",
            rows.as_ref().map_or(0, Vec::len),
            self.endpoint
        );
        Ok(rows)
    }

    async fn upsert(&self, row: &MemorialRow) -> Result<()> {
        let request = self
            .request(Method::POST)
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row);

        ensure_success(request.send().await?).await?;
        log::debug!("Upserted row {}", row.id);
        Ok(())
    }

    async fn update(&self, id: &str, patch: &RowPatch) -> Result<()> {
        let request = self
            .request(Method::PATCH)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(patch);

        ensure_success(request.send().await?).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE)
            .query(&[("id", format!("eq.{}", id))]);

        ensure_success(request.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let store = RestStore::new(Client::new(), "https://abc.supabase.co/", "k", "memorials").unwrap();
        assert_eq!(store.endpoint(), "https://abc.supabase.co/rest/v1/memorials");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(RestStore::new(Client::new(), "abc.supabase", "k", "memorials").is_err());
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let mut config = StoreConfig::default();
        config.url = Some("https://abc.supabase.co".into());
        assert!(RestStore::from_config(&config, Client::new()).unwrap().is_none());

        config.key = Some("anon".into());
        assert!(RestStore::from_config(&config, Client::new()).unwrap().is_some());
    }

    #[test]
    fn test_or_filter_quotes_values() {
        assert_eq!(
            or_filter(Some("Ali \"Reza\""), Some("https://x.com/a/status/1")),
            Some(r#"(name.eq."Ali \"Reza\"",media->>xPost.eq."https://x.com/a/status/1")"#.to_string())
        );
        assert_eq!(
            or_filter(Some("a,b"), None),
            Some(r#"(name.eq."a,b")"#.to_string())
        );
        assert_eq!(or_filter(None, None), None);
    }
}
