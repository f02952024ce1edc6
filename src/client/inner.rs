//! Internal client implementation.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};

use crate::auth::TokenCache;
use crate::Error;

pub(crate) struct ClientInner {
    /// The data hub base URL.
    pub url: url::Url,

    /// HTTP client shared with the authenticator.
    pub http: reqwest::Client,

    /// Current token and refresh gate.
    pub tokens: TokenCache,
}

impl ClientInner {
    /// Joins a path onto the base URL, keeping any base path prefix.
    fn build_url(&self, path: &str) -> Result<url::Url, Error> {
        let base = self.url.as_str().trim_end_matches('/');
        url::Url::parse(&format!("{}{}", base, path))
            .map_err(|e| Error::parameter(format!("invalid request path {}", path)).with_source(e))
    }

    /// Ensures a token is available and builds the request headers.
    async fn build_headers(&self) -> Result<HeaderMap, Error> {
        // Authentication failures abort before the domain request is sent.
        let token = self.tokens.ensure_valid().await?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = token {
            let auth_value = format!("Bearer {}", token.access_token());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value).map_err(|e| {
                    Error::authentication(self.tokens.strategy(), "invalid access token format")
                        .with_source(e)
                })?,
            );
        }

        Ok(headers)
    }

    /// Sends an authenticated request and returns the raw body of a 2xx
    /// response.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        what: &'static str,
    ) -> Result<Vec<u8>, Error> {
        let headers = self.build_headers().await?;

        let response = request
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::request(format!("unable to {}", what)).with_source(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "request failed");
            return Err(Error::request(format!("unable to {}", what)).with_status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::request(format!("unable to {}", what)).with_source(e))?;
        Ok(body.to_vec())
    }

    /// Makes an authenticated GET request and returns the body.
    pub(crate) async fn get_raw(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<Vec<u8>, Error> {
        let url = self.build_url(path)?;
        self.send(self.http.get(url).query(query), what).await
    }

    /// Makes an authenticated GET request and decodes the JSON body.
    pub(crate) async fn get_json<R>(&self, path: &str, what: &'static str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let body = self.get_raw(path, &[], what).await?;
        serde_json::from_slice(&body).map_err(|e| {
            Error::client_processing(format!("unable to process response to {}", what))
                .with_source(e)
        })
    }

    /// Makes an authenticated POST request with a JSON body and returns the
    /// response body.
    pub(crate) async fn post_raw<T>(
        &self,
        path: &str,
        body: &T,
        what: &'static str,
    ) -> Result<Vec<u8>, Error>
    where
        T: Serialize + ?Sized,
    {
        let url = self.build_url(path)?;
        let payload = serde_json::to_vec(body).map_err(|e| {
            Error::parameter(format!("unable to encode request to {}", what)).with_source(e)
        })?;
        self.send(self.http.post(url).body(payload), what).await
    }

    /// Makes an authenticated POST request with a JSON body, ignoring the
    /// response body.
    pub(crate) async fn post_json<T>(
        &self,
        path: &str,
        body: &T,
        what: &'static str,
    ) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        self.post_raw(path, body, what).await?;
        Ok(())
    }
}
