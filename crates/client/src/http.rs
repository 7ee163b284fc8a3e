use std::time::Duration;

use reqwest::{RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{ApiError, FALLBACK_MESSAGE, TokenStore};

/// Hard cap on any single request. A call that exceeds it fails with
/// [`ApiError::Timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Non-2xx responses carry this envelope when the backend produced them.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: Option<String>,
}

/// Single chokepoint for all outbound calls.
///
/// Joins endpoint paths onto the configured base URL, attaches the bearer
/// token when one is present in [`TokenStore`], and normalizes every failure
/// into [`ApiError`]. It never mutates application state.
#[derive(Clone, Debug)]
pub struct Http {
    base_url: String,
    client: reqwest::Client,
    tokens: TokenStore,
}

impl Http {
    pub fn new(base_url: &str, tokens: TokenStore) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, tokens, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        tokens: TokenStore,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(self.client.get(self.url(path))).await?;
        Self::json(resp).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.client.post(self.url(path)).json(body)).await?;
        Self::json(resp).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(self.client.post(self.url(path))).await?;
        Self::json(resp).await
    }

    /// POST without a request body, discarding the response body.
    pub async fn post_empty_unit(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.client.post(self.url(path))).await?;
        Ok(())
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.client.put(self.url(path)).json(body)).await?;
        Self::json(resp).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .send(self.client.patch(self.url(path)).json(body))
            .await?;
        Self::json(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(path))).await?;
        Ok(())
    }

    /// Multipart file upload. The bearer token is still attached; the JSON
    /// content type is not, reqwest sets the multipart boundary instead.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<T, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(ApiError::Network)?;
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);
        let resp = self
            .send(self.client.post(self.url(path)).multipart(form))
            .await?;
        Self::json(resp).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let req = match self.tokens.get() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await.map_err(ApiError::transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.message.unwrap_or(body.error),
            Err(_) => FALLBACK_MESSAGE.to_string(),
        };
        tracing::debug!("request failed with {status}: {message}");
        Err(ApiError::Server { status, message })
    }

    async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        resp.json::<T>().await.map_err(ApiError::transport)
    }
}
