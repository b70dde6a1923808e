//! Async JSON-RPC client wrapping reqwest.
//!
//! One request at a time, no retries. Every failure surfaces as a
//! [`ZabbixError`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::ZabbixConfig;
use crate::types::{
    JsonRpcRequest, JsonRpcResponse, ZabbixError, ZabbixResult, JSONRPC_CONTENT_TYPE,
};

/// Longest response body echoed back in an HTTP status error.
const MAX_ERROR_BODY: usize = 512;

/// Client for one Zabbix server.
pub struct ZabbixClient {
    client: reqwest::Client,
    url: String,
    token: String,
    next_id: AtomicI64,
    dry_run: bool,
    /// Template copies made or found this run, keyed by (host trigger, template).
    template_copies: Mutex<HashMap<(String, String), String>>,
}

impl ZabbixClient {
    pub fn new(config: &ZabbixConfig) -> ZabbixResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .user_agent(concat!("zabbix-deps/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if !config.verify_tls {
            tracing::warn!("TLS certificate verification is disabled");
        }

        Ok(Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
            next_id: AtomicI64::new(1),
            dry_run: false,
            template_copies: Mutex::new(HashMap::new()),
        })
    }

    /// Suppress mutating calls; lookups still go to the server.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) async fn cached_template_copy(
        &self,
        host_triggerid: &str,
        templateid: &str,
    ) -> Option<String> {
        self.template_copies
            .lock()
            .await
            .get(&(host_triggerid.to_string(), templateid.to_string()))
            .cloned()
    }

    pub(crate) async fn remember_template_copy(
        &self,
        host_triggerid: &str,
        templateid: &str,
        copy: &str,
    ) {
        self.template_copies.lock().await.insert(
            (host_triggerid.to_string(), templateid.to_string()),
            copy.to_string(),
        );
    }

    /// Call `method` and return the raw `result` value.
    pub async fn call_value(&self, method: &str, params: Value) -> ZabbixResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        tracing::debug!("Calling API method: {method} (id {id})");

        let mut builder = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, JSONRPC_CONTENT_TYPE);
        if request.requires_auth() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", self.token));
        }

        let body = serde_json::to_vec(&request)?;
        let response = builder.body(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let mut body = text;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(ZabbixError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
                body,
            });
        }

        let envelope: JsonRpcResponse = serde_json::from_str(&text)?;

        if let Some(error) = envelope.error {
            return Err(ZabbixError::api(method, error));
        }

        envelope
            .result
            .ok_or_else(|| ZabbixError::MissingResult(method.to_string()))
    }

    /// Call `method` and decode the `result` into `T`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ZabbixResult<T> {
        let value = self.call_value(method, params).await?;
        Ok(serde_json::from_value(value)?)
    }
}
