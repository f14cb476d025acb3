//! HTTP client implementation using reqwest

use crate::config::{ConnectionConfig, SecretString};
use crate::http::{CreateParams, EndpointVariant, ProviderClient};
use crate::providers::error::ClientError;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default user agent
const USER_AGENT: &str = concat!("probegen/", env!("CARGO_PKG_VERSION"));

/// Client for OpenAI-style REST endpoints
pub struct OpenAIClient {
    /// The underlying reqwest client
    client: Client,

    /// API root, without trailing slash (e.g. `https://api.openai.com/v1`)
    base_url: String,

    api_key: SecretString,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.partial_redact())
            .finish()
    }
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

impl OpenAIClient {
    /// Create a new client for `base_url` authenticated with `api_key`
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        connection: &ConnectionConfig,
    ) -> Result<Self, ClientError> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_millis(connection.connect_timeout_ms))
            .timeout(Duration::from_millis(connection.request_timeout_ms))
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| ClientError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, builder: RequestBuilder, request_id: Uuid) -> RequestBuilder {
        builder
            .bearer_auth(self.api_key.expose_secret())
            .header("X-Request-ID", request_id.to_string())
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, builder: RequestBuilder, request_id: Uuid) -> Result<String, ClientError> {
        let response = builder.send().await.map_err(|e| {
            warn!("Request failed [request_id: {}]: {}", request_id, e);
            ClientError::from(e)
        })?;

        let status = response.status();
        debug!("Response status: {} [request_id: {}]", status, request_id);

        if !status.is_success() {
            let body = response.text().await.ok();
            warn!(
                "Request failed with status {} [request_id: {}]",
                status, request_id
            );
            return Err(crate::http::error::map_http_error(status, body, request_id));
        }

        read_body(response, request_id).await
    }
}

async fn read_body(response: Response, request_id: Uuid) -> Result<String, ClientError> {
    response.text().await.map_err(|e| {
        ClientError::Connection(format!(
            "Failed to read response body: {} [request_id: {}]",
            e, request_id
        ))
    })
}

#[async_trait]
impl ProviderClient for OpenAIClient {
    async fn create(
        &self,
        variant: EndpointVariant,
        params: &CreateParams,
    ) -> Result<Value, ClientError> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, variant.endpoint());

        info!("Executing {} request [request_id: {}]", variant, request_id);
        debug!("Request URL: {}", url);

        let builder = self.authorize(self.client.post(&url).json(params), request_id);
        let text = self.send(builder, request_id).await?;

        serde_json::from_str(&text).map_err(|e| {
            warn!("Undecodable response body [request_id: {}]: {}", request_id, e);
            ClientError::Decode(format!("{} [request_id: {}]", e, request_id))
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, ClientError> {
        let request_id = Uuid::new_v4();
        let url = format!("{}/models", self.base_url);

        info!("Listing models [request_id: {}]", request_id);

        let builder = self.authorize(self.client.get(&url), request_id);
        let text = self.send(builder, request_id).await?;
        let list: ModelList = serde_json::from_str(&text)?;

        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}
