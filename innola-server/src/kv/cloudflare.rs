//! Cloudflare Workers KV over its REST API
//!
//! Each binding maps to a namespace id; a binding with no namespace id is
//! unbound and every access to it fails with `X_KV not configured`.

use super::{Binding, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;

pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

#[derive(Debug, Clone)]
pub struct CloudflareKvConfig {
    pub account_id: String,
    pub api_token: String,
    /// binding -> namespace id
    pub namespaces: HashMap<Binding, String>,
    pub api_base: String,
}

pub struct CloudflareKvStore {
    client: reqwest::Client,
    config: CloudflareKvConfig,
}

impl CloudflareKvStore {
    pub fn new(config: CloudflareKvConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, config })
    }

    fn value_url(&self, binding: Binding, key: &str) -> StoreResult<String> {
        let namespace = self
            .config
            .namespaces
            .get(&binding)
            .ok_or(StoreError::Unbound(binding))?;
        Ok(format!(
            "{}/accounts/{}/storage/kv/namespaces/{}/values/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_id,
            namespace,
            key
        ))
    }
}

async fn api_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    StoreError::Api { status, message }
}

#[async_trait]
impl DocumentStore for CloudflareKvStore {
    fn is_bound(&self, binding: Binding) -> bool {
        self.config.namespaces.contains_key(&binding)
    }

    async fn get(&self, binding: Binding, key: &str) -> StoreResult<Option<String>> {
        let url = self.value_url(binding, key)?;
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(response.text().await?)),
            _ => {
                let err = api_error(response).await;
                tracing::warn!(binding = %binding, key, error = %err, "KV read failed");
                Err(err)
            }
        }
    }

    async fn put(&self, binding: Binding, key: &str, value: String) -> StoreResult<()> {
        let url = self.value_url(binding, key)?;
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.config.api_token)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(value)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let err = api_error(response).await;
            tracing::warn!(binding = %binding, key, error = %err, "KV write failed");
            Err(err)
        }
    }
}
