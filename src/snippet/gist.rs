use super::{
    SnippetError, SnippetHost, SnippetHostResult, SnippetRequest, SnippetResult, is_gist_id,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LOCATION};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// GitHub gists as the snippet host.
pub struct GistClient {
    client: reqwest::Client,
    api_base: String,
    shortener_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateGistRequest<'a> {
    public: bool,
    files: BTreeMap<&'a str, GistFile<'a>>,
}

#[derive(Debug, Serialize)]
struct GistFile<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct GithubErrorBody {
    message: String,
}

impl GistClient {
    pub fn new(api_base: impl Into<String>, shortener_url: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        // The shortener answers with a redirect-style Location header that
        // must be read, not followed.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("repaste/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            shortener_url,
        })
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => request.header(AUTHORIZATION, format!("token {}", token)),
            None => request,
        }
    }

    async fn host_error(response: reqwest::Response) -> SnippetError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GithubErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        SnippetError::Host { status, message }
    }

    /// Best effort: any shortener problem leaves the long URL in place.
    async fn shorten(&self, url: &str) -> String {
        let Some(shortener) = &self.shortener_url else {
            return url.to_string();
        };

        let response = match self
            .client
            .post(shortener)
            .form(&[("url", url)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(_) => return url.to_string(),
        };

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return url.to_string();
        }

        if let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("http"))
        {
            return location.to_string();
        }

        match response.text().await {
            Ok(body) if body.trim().starts_with("http") => body.trim().to_string(),
            _ => url.to_string(),
        }
    }
}

#[async_trait]
impl SnippetHost for GistClient {
    async fn create(&self, request: SnippetRequest) -> SnippetHostResult<SnippetResult> {
        let body = CreateGistRequest {
            public: true,
            files: request
                .files
                .iter()
                .map(|(name, content)| (name.as_str(), GistFile { content }))
                .collect(),
        };

        let http_request = self
            .client
            .post(format!("{}/gists", self.api_base))
            .json(&body);
        let response = self
            .authorize(http_request, request.token.as_deref())
            .send()
            .await
            .map_err(|e| SnippetError::Unknown(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::host_error(response).await);
        }

        let gist: GistResponse = response
            .json()
            .await
            .map_err(|e| SnippetError::Unknown(format!("Invalid gist response: {}", e)))?;

        let url = if request.try_short_url {
            self.shorten(&gist.html_url).await
        } else {
            gist.html_url
        };

        Ok(SnippetResult { url })
    }

    async fn delete(&self, id: &str, token: &str) -> SnippetHostResult<()> {
        if !is_gist_id(id) {
            return Err(SnippetError::InvalidId(id.to_string()));
        }

        let http_request = self
            .client
            .delete(format!("{}/gists/{}", self.api_base, id));
        let response = self
            .authorize(http_request, Some(token))
            .send()
            .await
            .map_err(|e| SnippetError::Unknown(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::host_error(response).await);
        }

        Ok(())
    }
}
