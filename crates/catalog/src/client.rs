//! Low-level GraphQL transport for the catalog service.

use serde::Deserialize;

/// HTTP client for one catalog instance.
///
/// Holds a shared [`reqwest::Client`] so connections are pooled across
/// queries. All operations go through [`CatalogClient::query`], which
/// separates transport failures from query-level failures; callers must
/// never treat either as an empty result.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Errors from the catalog query layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-2xx status code.
    #[error("Catalog returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The catalog executed the request but reported query errors.
    #[error("Catalog query error: {0}")]
    Query(String),

    /// The response body did not have the expected shape.
    #[error("Catalog response decode error: {0}")]
    Decode(String),
}

/// Envelope of a GraphQL response: `data` and/or `errors`.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl CatalogClient {
    /// Create a client for a catalog instance.
    ///
    /// * `base_url` - base HTTP URL, e.g. `http://host:9999`.
    /// * `api_key`  - optional `ApiKey` header value.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Base HTTP URL of the catalog instance.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute one GraphQL query document and return its `data` value.
    ///
    /// Failure taxonomy:
    /// - transport / non-2xx -> [`CatalogError::Http`] / [`CatalogError::Status`]
    /// - `errors` array present -> [`CatalogError::Query`]
    /// - missing `data` -> [`CatalogError::Decode`]
    pub async fn query(
        &self,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, CatalogError> {
        let body = serde_json::json!({
            "query": document,
            "variables": variables,
        });

        let mut request = self
            .http
            .post(format!("{}/graphql", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("ApiKey", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let joined = errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(CatalogError::Query(joined));
            }
        }

        envelope
            .data
            .ok_or_else(|| CatalogError::Decode("response has no data field".to_string()))
    }
}
